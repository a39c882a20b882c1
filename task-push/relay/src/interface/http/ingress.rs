//! HTTP 推送接入
//!
//! 推送发送方把负载原样 POST 到 `/push`（或 `/push/{subscription}`），
//! 请求体即推送负载；接受后立即返回 201，通知展示异步进行。

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::domain::model::PushMessageData;
use crate::infrastructure::source::PushEventSender;

#[derive(Clone)]
struct IngressState {
    sender: PushEventSender,
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn accept(state: &IngressState, subscription: Option<&str>, body: Bytes) -> Response {
    match state.sender.deliver(PushMessageData::new(body.to_vec())).await {
        Ok(event_id) => {
            info!(%event_id, subscription = subscription.unwrap_or("-"), "push event accepted");
            (StatusCode::CREATED, Json(json!({ "event_id": event_id }))).into_response()
        }
        Err(e) => {
            warn!(error = %e, "push event rejected");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "relay is shutting down" })),
            )
                .into_response()
        }
    }
}

async fn receive_push(State(state): State<IngressState>, body: Bytes) -> Response {
    accept(&state, None, body).await
}

async fn receive_subscription_push(
    State(state): State<IngressState>,
    Path(subscription): Path<String>,
    body: Bytes,
) -> Response {
    accept(&state, Some(&subscription), body).await
}

/// 构建接入路由
pub fn ingress_router(sender: PushEventSender) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/push", post(receive_push))
        .route("/push/{subscription}", post(receive_subscription_push))
        .with_state(IngressState { sender })
}

/// 已绑定端口的接入服务
pub struct IngressServer {
    listener: TcpListener,
    router: Router,
}

impl IngressServer {
    pub async fn bind(address: &str, sender: PushEventSender) -> Result<Self> {
        let addr: SocketAddr = address
            .parse()
            .with_context(|| format!("invalid ingress address: {}", address))?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind ingress address {}", addr))?;
        Ok(Self {
            listener,
            router: ingress_router(sender),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self) -> Result<()> {
        info!(address = %self.local_addr()?, "Push ingress listening");
        axum::serve(self.listener, self.router.into_make_service())
            .await
            .context("push ingress server failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::domain::repository::PushEventSource;
    use crate::infrastructure::source::push_event_channel;

    #[tokio::test]
    async fn posted_body_becomes_push_event() {
        let (sender, mut source) = push_event_channel(4);
        let app = ingress_router(sender);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/push/device-1")
                    .body(Body::from("Task added: Buy milk"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let event = source.next_event().await.unwrap();
        assert_eq!(value["event_id"], event.id.to_string());
        assert_eq!(event.payload_text(), "Task added: Buy milk");
    }

    #[tokio::test]
    async fn closed_relay_answers_service_unavailable() {
        let (sender, source) = push_event_channel(1);
        drop(source);

        let response = ingress_router(sender)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/push")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
