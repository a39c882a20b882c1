//! HTTP 推送发送器：按订阅密钥加密负载后 POST 到推送端点

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE};
use task_push_core::error::{ErrorBuilder, ErrorCode, Result};
use tracing::debug;
use url::Url;

use crate::domain::model::PushSubscription;
use crate::domain::repository::PushSender;
use crate::infrastructure::push::encryption::{self, SubscriberKeys};
use crate::infrastructure::push::vapid::VapidSigner;

#[derive(Clone)]
pub struct HttpPushSender {
    client: Client,
    ttl_seconds: u64,
    signer: Option<VapidSigner>,
}

impl HttpPushSender {
    pub fn new(ttl_seconds: u64, signer: Option<VapidSigner>) -> Result<Self> {
        let client = Client::builder().use_rustls_tls().build().map_err(|err| {
            ErrorBuilder::new(ErrorCode::ConfigurationError, "failed to build http client")
                .details(err)
                .build_error()
        })?;
        Ok(Self {
            client,
            ttl_seconds,
            signer,
        })
    }
}

#[async_trait]
impl PushSender for HttpPushSender {
    async fn send(&self, subscription: &PushSubscription, payload: &str) -> Result<()> {
        let endpoint = Url::parse(&subscription.endpoint).map_err(|e| {
            ErrorBuilder::new(ErrorCode::InvalidParameter, "invalid subscription endpoint")
                .details(e)
                .build_error()
        })?;

        // 没有加密密钥的订阅无法投递负载
        let Some(keys) = subscription.keys.as_ref() else {
            return Err(ErrorBuilder::new(
                ErrorCode::InvalidParameter,
                "subscription has no encryption keys",
            )
            .build_error());
        };
        let body = encryption::encrypt(&SubscriberKeys::from_subscription(keys)?, payload.as_bytes())?;

        let mut request = self
            .client
            .post(endpoint.clone())
            .header("TTL", self.ttl_seconds.to_string())
            .header(CONTENT_ENCODING, encryption::CONTENT_ENCODING)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body);

        if let Some(signer) = &self.signer {
            request = request.header(AUTHORIZATION, signer.authorization(&endpoint)?);
        }

        let response = request.send().await.map_err(|err| {
            ErrorBuilder::new(ErrorCode::ServiceUnavailable, "push service unreachable")
                .details(err)
                .build_error()
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ErrorBuilder::new(ErrorCode::ServiceUnavailable, "push service rejected message")
                .details(status)
                .build_error());
        }

        debug!(endpoint = %subscription.endpoint, %status, "Push sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use tokio::net::TcpListener;

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use p256::SecretKey;
    use p256::elliptic_curve::sec1::ToEncodedPoint;
    use rand::rngs::OsRng;

    use crate::domain::model::SubscriptionKeys;
    use crate::infrastructure::push::encryption::tests::decrypt;
    use crate::infrastructure::push::vapid::tests::{TEST_PRIVATE_KEY_PEM, TEST_PUBLIC_KEY};

    const AUTH_SECRET: [u8; 16] = [9; 16];

    #[derive(Clone, Default)]
    struct Captured {
        requests: Arc<Mutex<Vec<(HeaderMap, Bytes)>>>,
    }

    async fn accept(State(captured): State<Captured>, headers: HeaderMap, body: Bytes) -> StatusCode {
        captured.requests.lock().unwrap().push((headers, body));
        StatusCode::CREATED
    }

    async fn push_service() -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route("/send/{id}", post(accept))
            .route("/gone", post(|| async { StatusCode::GONE }))
            .with_state(captured.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), captured)
    }

    fn subscription(endpoint: String, browser_key: &SecretKey) -> PushSubscription {
        PushSubscription {
            endpoint,
            expiration_time: None,
            keys: Some(SubscriptionKeys {
                p256dh: URL_SAFE_NO_PAD
                    .encode(browser_key.public_key().to_encoded_point(false).as_bytes()),
                auth: URL_SAFE_NO_PAD.encode(AUTH_SECRET),
            }),
        }
    }

    #[tokio::test]
    async fn posts_encrypted_payload_with_ttl_and_vapid_header() {
        let (base, captured) = push_service().await;
        let signer = VapidSigner::from_config(TEST_PRIVATE_KEY_PEM, TEST_PUBLIC_KEY, None).unwrap();
        let sender = HttpPushSender::new(60, Some(signer)).unwrap();
        let browser_key = SecretKey::random(&mut OsRng);

        sender
            .send(
                &subscription(format!("{}/send/abc", base), &browser_key),
                "Task added: Buy milk",
            )
            .await
            .unwrap();

        let requests = captured.requests.lock().unwrap();
        let (headers, body) = &requests[0];
        assert_eq!(headers.get("content-encoding").unwrap(), "aes128gcm");
        assert_ne!(body.as_ref(), b"Task added: Buy milk");
        assert_eq!(
            decrypt(&browser_key, &AUTH_SECRET, body),
            b"Task added: Buy milk"
        );
        assert_eq!(headers.get("ttl").unwrap(), "60");
        assert!(headers
            .get("authorization")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("vapid t="));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (base, _) = push_service().await;
        let sender = HttpPushSender::new(0, None).unwrap();

        let browser_key = SecretKey::random(&mut OsRng);

        let err = sender
            .send(&subscription(format!("{}/gone", base), &browser_key), "hello")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn subscription_without_keys_is_not_sent() {
        let (base, captured) = push_service().await;
        let sender = HttpPushSender::new(0, None).unwrap();
        let mut subscription = subscription(
            format!("{}/send/abc", base),
            &SecretKey::random(&mut OsRng),
        );
        subscription.keys = None;

        let err = sender.send(&subscription, "hello").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        assert!(captured.requests.lock().unwrap().is_empty());
    }
}
