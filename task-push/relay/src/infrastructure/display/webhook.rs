//! Webhook 展示后端：把通知以 JSON POST 给外部展示服务

use reqwest::Client;
use task_push_core::error::{ErrorBuilder, ErrorCode, Result};

use crate::domain::lifetime::PendingOperation;
use crate::domain::model::NotificationRequest;
use crate::domain::repository::NotificationDisplay;

#[derive(Clone)]
pub struct WebhookNotificationDisplay {
    client: Client,
    endpoint: String,
}

impl WebhookNotificationDisplay {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = Client::builder().use_rustls_tls().build().map_err(|err| {
            ErrorBuilder::new(ErrorCode::ConfigurationError, "failed to build http client")
                .details(err)
                .build_error()
        })?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl NotificationDisplay for WebhookNotificationDisplay {
    fn show_notification(&self, request: NotificationRequest) -> PendingOperation {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        PendingOperation::new(async move {
            let response = client
                .post(&endpoint)
                .json(&request)
                .send()
                .await
                .map_err(|err| {
                    ErrorBuilder::new(ErrorCode::ServiceUnavailable, "notification webhook unreachable")
                        .details(err)
                        .build_error()
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(ErrorBuilder::new(
                    ErrorCode::ServiceUnavailable,
                    "notification webhook rejected request",
                )
                .details(status)
                .build_error());
            }

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use crate::domain::model::{NOTIFICATION_ICON_URL, NOTIFICATION_TITLE};

    #[derive(Clone, Default)]
    struct Captured {
        bodies: Arc<Mutex<Vec<Value>>>,
    }

    async fn accept(State(captured): State<Captured>, Json(body): Json<Value>) -> StatusCode {
        captured.bodies.lock().unwrap().push(body);
        StatusCode::NO_CONTENT
    }

    async fn display_service() -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route("/notify", post(accept))
            .route("/gone", post(|| async { StatusCode::GONE }))
            .with_state(captured.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), captured)
    }

    #[tokio::test]
    async fn posts_flattened_notification_json() {
        let (base, captured) = display_service().await;
        let display = WebhookNotificationDisplay::new(&format!("{}/notify", base)).unwrap();

        display
            .show_notification(NotificationRequest::task_notification("Task 'Buy milk' is due"))
            .await
            .unwrap();

        let bodies = captured.bodies.lock().unwrap();
        assert_eq!(
            bodies[0],
            json!({
                "title": NOTIFICATION_TITLE,
                "body": "Task 'Buy milk' is due",
                "icon": NOTIFICATION_ICON_URL,
            })
        );
    }

    #[tokio::test]
    async fn non_success_status_rejects_the_operation() {
        let (base, _) = display_service().await;
        let display = WebhookNotificationDisplay::new(&format!("{}/gone", base)).unwrap();

        let err = display
            .show_notification(NotificationRequest::task_notification("late"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
