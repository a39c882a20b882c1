//! 任务推送 HTTP API

mod error;
mod handlers;

pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

use crate::application::handlers::{TaskCommandHandler, TaskQueryHandler};

/// 路由共享状态
#[derive(Clone)]
pub struct ApiState {
    pub command_handler: Arc<TaskCommandHandler>,
    pub query_handler: Arc<TaskQueryHandler>,
    pub vapid_public_key: Option<String>,
}

pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/tasks", get(handlers::list_tasks).post(handlers::add_task))
        .route("/tasks/{index}/remove", post(handlers::remove_task))
        .route("/subscribe", post(handlers::subscribe))
        .route("/vapid-public-key", get(handlers::vapid_public_key))
        .route("/schedule", get(handlers::plan_schedule))
        .with_state(state)
}

/// 已绑定端口的 HTTP 服务
pub struct HttpServer {
    listener: TcpListener,
    router: Router,
}

impl HttpServer {
    pub async fn bind(address: &str, state: ApiState) -> Result<Self> {
        let addr: SocketAddr = address
            .parse()
            .with_context(|| format!("invalid server address: {}", address))?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind server address {}", addr))?;
        Ok(Self {
            listener,
            router: api_router(state),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run_until<S>(self, shutdown: S) -> Result<()>
    where
        S: std::future::Future<Output = ()> + Send + 'static,
    {
        info!(address = %self.local_addr()?, "Task push server listening");
        axum::serve(self.listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .context("task push server failed")
    }
}
