//! 命令结构体定义（Command DTO）

use crate::domain::model::PushEvent;

/// 处理推送事件命令
#[derive(Debug, Clone)]
pub struct HandlePushEventCommand {
    /// 推送事件
    pub event: PushEvent,
}
