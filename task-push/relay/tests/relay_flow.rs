// 中继端到端测试：HTTP 接入 -> 调度器 -> 通知展示
use std::time::Duration;

use task_push_relay::infrastructure::display::MemoryNotificationDisplay;
use task_push_relay::service::initialize_with_display;
use task_push_relay::{NOTIFICATION_ICON_URL, NOTIFICATION_TITLE, RelayConfig};

#[tokio::test]
async fn http_push_is_shown_as_task_notification() -> anyhow::Result<()> {
    task_push_core::tracing::init_tracing_from_config(None);

    let config = RelayConfig {
        event_source: "http".to_string(),
        ingress_address: "127.0.0.1:0".to_string(),
        ..Default::default()
    };
    let display = MemoryNotificationDisplay::shared();
    let context = initialize_with_display(&config, display.clone()).await?;

    let ingress = context.ingress.expect("http source binds an ingress");
    let addr = ingress.local_addr()?;
    let ingress_task = tokio::spawn(ingress.run());
    let dispatcher_task = tokio::spawn(context.dispatcher.run());

    let response = reqwest::Client::new()
        .post(format!("http://{}/push/browser-1", addr))
        .body("Task 'Buy milk' is due")
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 201);

    tokio::time::timeout(Duration::from_secs(5), async {
        while display.is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await?;

    let shown = display.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].request.title, NOTIFICATION_TITLE);
    assert_eq!(shown[0].request.options.body, "Task 'Buy milk' is due");
    assert_eq!(shown[0].request.options.icon, NOTIFICATION_ICON_URL);

    ingress_task.abort();
    dispatcher_task.abort();
    Ok(())
}
