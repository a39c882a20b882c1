//! 推送中继领域服务 - 推送事件到系统通知的转换

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::lifetime::LifetimeExtension;
use crate::domain::model::{NotificationRequest, PushEvent};
use crate::domain::repository::NotificationDisplay;

/// 推送中继领域服务
///
/// 无状态：每个事件独立处理，调用之间不共享可变数据。
pub struct PushRelayDomainService {
    display: Arc<dyn NotificationDisplay>,
}

impl PushRelayDomainService {
    pub fn new(display: Arc<dyn NotificationDisplay>) -> Self {
        Self { display }
    }

    /// 处理推送事件
    ///
    /// 先取出负载文本，再请求展示通知，并把展示操作原样交给 `wait_until`。
    /// 展示失败不在这里处理，由宿主在结束时观察。
    #[instrument(skip_all, fields(event_id = %event.id))]
    pub fn handle_push(&self, event: &PushEvent, extension: &mut LifetimeExtension) {
        let body = event.payload_text();
        let request = NotificationRequest::task_notification(body);

        let pending = self.display.show_notification(request);
        debug!(operation_id = %pending.id(), "notification display requested");

        extension.wait_until(pending);
    }
}
