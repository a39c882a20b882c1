//! 推送发送器实现

pub mod encryption;
pub mod http;
pub mod loopback;
pub mod noop;
pub mod vapid;

pub use http::HttpPushSender;
pub use loopback::LoopbackPushSender;
pub use noop::NoopPushSender;
pub use vapid::VapidSigner;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use task_push_relay::PushEventSender;

use crate::config::PushServerConfig;
use crate::domain::repository::PushSender;

pub type PushSenderRef = Arc<dyn PushSender>;

/// 按配置构建推送发送器
///
/// `loopback` 需要进程内中继的投递入口。
pub fn build_push_sender(
    config: &PushServerConfig,
    relay: Option<PushEventSender>,
) -> Result<PushSenderRef> {
    let sender: PushSenderRef = match config.push_provider.as_str() {
        "http" => {
            let signer = match config.vapid_private_key_pem.as_deref() {
                Some(pem) => Some(
                    VapidSigner::from_config(
                        pem,
                        config.vapid_public_key.as_deref().unwrap_or_default(),
                        config.vapid_subject.as_deref(),
                    )
                    .context("Failed to load VAPID key")?,
                ),
                None => None,
            };
            Arc::new(
                HttpPushSender::new(config.push_ttl_seconds, signer)
                    .context("Failed to build http push sender")?,
            )
        }
        "loopback" => {
            let Some(relay) = relay else {
                bail!("loopback push provider requires an in-process relay");
            };
            Arc::new(LoopbackPushSender::new(relay))
        }
        "noop" => Arc::new(NoopPushSender),
        other => bail!("unknown push provider: {}", other),
    };

    tracing::info!(provider = %config.push_provider, "Push sender initialized");
    Ok(sender)
}
