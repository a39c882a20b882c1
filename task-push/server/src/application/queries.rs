//! 查询结构体定义（Query DTO）

use serde::{Deserialize, Serialize};

/// 查询任务列表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTasksQuery;

/// 规划日程
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanScheduleQuery {
    /// 时区（为空时使用服务配置）
    pub time_zone: Option<String>,
}
