//! 标准输入事件来源：每行作为一个推送负载

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::warn;

use crate::domain::model::{PushEvent, PushMessageData};
use crate::domain::repository::PushEventSource;

/// 按原始字节读取，非 UTF-8 的行交给负载的有损解码
pub struct StdinPushEventSource<R = BufReader<Stdin>> {
    reader: R,
}

impl StdinPushEventSource {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl Default for StdinPushEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> StdinPushEventSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn from_reader(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R> PushEventSource for StdinPushEventSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_event(&mut self) -> Option<PushEvent> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line).await {
            Ok(0) => None,
            Ok(_) => {
                if line.last() == Some(&b'\n') {
                    line.pop();
                    if line.last() == Some(&b'\r') {
                        line.pop();
                    }
                }
                Some(PushEvent::new(Some(PushMessageData::new(line))))
            }
            Err(e) => {
                warn!(error = %e, "failed to read push payload from input, closing source");
                None
            }
        }
    }
}
