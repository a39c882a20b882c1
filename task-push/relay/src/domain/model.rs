use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 通知标题（固定）
pub const NOTIFICATION_TITLE: &str = "Task Notification";

/// 通知图标（固定远程资源）
pub const NOTIFICATION_ICON_URL: &str =
    "https://www.gstatic.com/images/icons/material/system/2x/event_black_48dp.png";

/// 推送负载，发送方传输的原始字节
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushMessageData {
    bytes: Vec<u8>,
}

impl PushMessageData {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// 按 UTF-8 解码；非法字节序列替换为 U+FFFD，永不失败
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<&str> for PushMessageData {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes().to_vec())
    }
}

impl From<String> for PushMessageData {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<Vec<u8>> for PushMessageData {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

/// 推送事件
#[derive(Debug, Clone)]
pub struct PushEvent {
    pub id: Uuid,
    pub data: Option<PushMessageData>,
    pub received_at: DateTime<Utc>,
}

impl PushEvent {
    pub fn new(data: Option<PushMessageData>) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
            received_at: Utc::now(),
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(Some(PushMessageData::from(text.into())))
    }

    /// 负载文本；没有负载时为空字符串
    pub fn payload_text(&self) -> String {
        self.data
            .as_ref()
            .map(PushMessageData::text)
            .unwrap_or_default()
    }
}

/// 通知选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
}

/// 通知展示请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    #[serde(flatten)]
    pub options: NotificationOptions,
}

impl NotificationRequest {
    /// 任务通知：固定标题与图标，正文为推送文本
    pub fn task_notification(body: impl Into<String>) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            options: NotificationOptions {
                body: body.into(),
                icon: NOTIFICATION_ICON_URL.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_decoded_as_is() {
        let data = PushMessageData::from("Task 'Buy milk' is due");
        assert_eq!(data.text(), "Task 'Buy milk' is due");
    }

    #[test]
    fn invalid_utf8_is_replaced_instead_of_failing() {
        let data = PushMessageData::new(vec![b'o', b'k', 0xff, 0xfe]);
        assert_eq!(data.text(), "ok\u{fffd}\u{fffd}");
    }

    #[test]
    fn missing_data_reads_as_empty_text() {
        let event = PushEvent::new(None);
        assert_eq!(event.payload_text(), "");
    }

    #[test]
    fn json_payload_can_be_parsed() {
        let data = PushMessageData::from(r#"{"task":"Buy milk"}"#);
        let value: serde_json::Value = data.json().unwrap();
        assert_eq!(value["task"], "Buy milk");
    }

    #[test]
    fn request_serializes_flat() {
        let request = NotificationRequest::task_notification("hi");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["title"], NOTIFICATION_TITLE);
        assert_eq!(value["body"], "hi");
        assert_eq!(value["icon"], NOTIFICATION_ICON_URL);
    }
}
