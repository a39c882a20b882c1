//! 查询处理器（查询侧）- 直接读取仓储，不经过领域服务

use std::sync::Arc;

use task_push_core::error::{ErrorBuilder, ErrorCode, Result};
use tracing::instrument;

use crate::application::queries::{ListTasksQuery, PlanScheduleQuery};
use crate::domain::model::{SchedulePlan, Task};
use crate::domain::repository::TaskRepository;
use crate::domain::service::SchedulePlanner;

/// 任务查询处理器
pub struct TaskQueryHandler {
    tasks: Arc<dyn TaskRepository>,
    planner: SchedulePlanner,
}

impl TaskQueryHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>, planner: SchedulePlanner) -> Self {
        Self { tasks, planner }
    }

    #[instrument(skip_all)]
    pub async fn handle_list_tasks(&self, _query: ListTasksQuery) -> Result<Vec<Task>> {
        self.tasks.load_tasks().await
    }

    #[instrument(skip(self))]
    pub async fn handle_plan_schedule(&self, query: PlanScheduleQuery) -> Result<SchedulePlan> {
        let planner = match query.time_zone.as_deref() {
            Some(time_zone) => SchedulePlanner::new(time_zone).map_err(|e| {
                ErrorBuilder::new(ErrorCode::InvalidParameter, "invalid time zone")
                    .details(e)
                    .build_error()
            })?,
            None => self.planner,
        };

        let tasks = self.tasks.load_tasks().await?;
        Ok(planner.plan(&tasks))
    }
}
