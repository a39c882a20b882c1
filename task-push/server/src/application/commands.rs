//! 命令结构体定义（Command DTO）

use serde::{Deserialize, Serialize};

use crate::domain::model::{PushSubscription, Task};

/// 添加任务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTaskCommand {
    pub task: Task,
}

/// 按下标删除任务
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RemoveTaskCommand {
    pub index: usize,
}

/// 登记推送订阅
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeCommand {
    pub subscription: PushSubscription,
}
