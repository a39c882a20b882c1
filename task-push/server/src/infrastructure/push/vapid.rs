//! VAPID 签名（RFC 8292）
//!
//! 以推送服务的 origin 为受众签发 ES256 JWT，
//! 生成 `Authorization: vapid t=<jwt>, k=<public key>` 头。

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use task_push_core::error::{ErrorBuilder, ErrorCode, Result};
use url::Url;

pub const DEFAULT_VAPID_SUBJECT: &str = "mailto:admin@localhost";

/// 令牌有效期（秒），规范上限为 24 小时
const TOKEN_TTL_SECS: i64 = 12 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VapidClaims {
    pub aud: String,
    pub exp: i64,
    pub sub: String,
}

#[derive(Clone)]
pub struct VapidSigner {
    key: EncodingKey,
    public_key: String,
    subject: String,
}

impl VapidSigner {
    /// `private_key_pem` 为 PKCS#8 格式的 P-256 私钥
    pub fn from_config(private_key_pem: &str, public_key: &str, subject: Option<&str>) -> Result<Self> {
        let key = EncodingKey::from_ec_pem(private_key_pem.as_bytes()).map_err(|e| {
            ErrorBuilder::new(ErrorCode::ConfigurationError, "invalid VAPID private key")
                .details(e)
                .build_error()
        })?;

        Ok(Self {
            key,
            public_key: public_key.to_string(),
            subject: subject.unwrap_or(DEFAULT_VAPID_SUBJECT).to_string(),
        })
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn sign(&self, endpoint: &Url) -> Result<String> {
        let claims = VapidClaims {
            aud: endpoint.origin().ascii_serialization(),
            exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
            sub: self.subject.clone(),
        };

        encode(&Header::new(Algorithm::ES256), &claims, &self.key).map_err(|e| {
            ErrorBuilder::new(ErrorCode::InternalError, "failed to sign VAPID token")
                .details(e)
                .build_error()
        })
    }

    /// 生成 Authorization 头的值
    pub fn authorization(&self, endpoint: &Url) -> Result<String> {
        let token = self.sign(endpoint)?;
        Ok(format!("vapid t={}, k={}", token, self.public_key))
    }
}
