use task_push_core::load_config;
use task_push_core::tracing::init_tracing;
use task_push_relay::ApplicationBootstrap;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = load_config(None);
    init_tracing("task-push-relay", Some(&app_config.logging));

    ApplicationBootstrap::run(app_config).await
}
