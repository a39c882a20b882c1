//! Web Push 负载加密（RFC 8291，aes128gcm 内容编码）
//!
//! 每条消息生成一次性的 P-256 密钥对与 16 字节 salt，
//! 与订阅的 `p256dh` / `auth` 协商出内容密钥，输出单记录的 aes128gcm 消息体。

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use task_push_core::error::{ErrorBuilder, ErrorCode, Result, TaskPushError};

use crate::domain::model::SubscriptionKeys;

pub const CONTENT_ENCODING: &str = "aes128gcm";
pub const RECORD_SIZE: u32 = 4096;

const SALT_LEN: usize = 16;
const PUBLIC_KEY_LEN: usize = 65;
const TAG_LEN: usize = 16;
/// salt + rs + idlen + keyid
pub const HEADER_LEN: usize = SALT_LEN + 4 + 1 + PUBLIC_KEY_LEN;
/// 推送服务接受的消息体上限为 4096 字节，负载后还有 1 字节分隔符
pub const MAX_PAYLOAD_LEN: usize = RECORD_SIZE as usize - HEADER_LEN - TAG_LEN - 1;

type HmacSha256 = Hmac<Sha256>;

/// 订阅方（浏览器）的加密参数
#[derive(Debug, Clone)]
pub struct SubscriberKeys {
    public_key: PublicKey,
    auth_secret: Vec<u8>,
}

impl SubscriberKeys {
    pub fn from_subscription(keys: &SubscriptionKeys) -> Result<Self> {
        let public = decode_base64url(&keys.p256dh)?;
        let public_key = PublicKey::from_sec1_bytes(&public).map_err(|e| {
            ErrorBuilder::new(ErrorCode::InvalidParameter, "invalid subscription p256dh key")
                .details(e)
                .build_error()
        })?;

        let auth_secret = decode_base64url(&keys.auth)?;
        if auth_secret.is_empty() {
            return Err(ErrorBuilder::new(
                ErrorCode::InvalidParameter,
                "subscription auth secret is empty",
            )
            .build_error());
        }

        Ok(Self {
            public_key,
            auth_secret,
        })
    }
}

/// 加密推送负载，返回 aes128gcm 消息体
pub fn encrypt(keys: &SubscriberKeys, payload: &[u8]) -> Result<Vec<u8>> {
    let sender_secret = SecretKey::random(&mut OsRng);
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    encrypt_with(keys, payload, &sender_secret, &salt)
}

pub(crate) fn encrypt_with(
    keys: &SubscriberKeys,
    payload: &[u8],
    sender_secret: &SecretKey,
    salt: &[u8; SALT_LEN],
) -> Result<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(ErrorBuilder::new(ErrorCode::InvalidParameter, "push payload too large")
            .details(format!("{} > {} bytes", payload.len(), MAX_PAYLOAD_LEN))
            .build_error());
    }

    let sender_public = sender_secret.public_key().to_encoded_point(false);
    let subscriber_public = keys.public_key.to_encoded_point(false);
    let shared = p256::ecdh::diffie_hellman(
        sender_secret.to_nonzero_scalar(),
        keys.public_key.as_affine(),
    );

    // 以 auth 为 salt 提取，再以 key_info 扩展出 IKM
    let prk_key = hmac_sha256(&keys.auth_secret, &[shared.raw_secret_bytes().as_slice()])?;
    let ikm = hmac_sha256(
        &prk_key,
        &[
            b"WebPush: info\0",
            subscriber_public.as_bytes(),
            sender_public.as_bytes(),
            &[0x01],
        ],
    )?;

    let prk = hmac_sha256(salt, &[&ikm])?;
    let cek = hmac_sha256(&prk, &[b"Content-Encoding: aes128gcm\0", &[0x01]])?;
    let nonce = hmac_sha256(&prk, &[b"Content-Encoding: nonce\0", &[0x01]])?;

    // 单记录：负载后接 0x02 分隔符，不填充
    let mut plaintext = Vec::with_capacity(payload.len() + 1);
    plaintext.extend_from_slice(payload);
    plaintext.push(0x02);

    let cipher = <Aes128Gcm as KeyInit>::new_from_slice(&cek[..16]).map_err(crypto_error)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce[..12]), plaintext.as_slice())
        .map_err(crypto_error)?;

    let mut body = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    body.extend_from_slice(salt);
    body.extend_from_slice(&RECORD_SIZE.to_be_bytes());
    body.push(PUBLIC_KEY_LEN as u8);
    body.extend_from_slice(sender_public.as_bytes());
    body.extend_from_slice(&ciphertext);
    Ok(body)
}

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 32]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).map_err(crypto_error)?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().into())
}

/// 浏览器导出的密钥可能带填充或使用标准字母表
fn decode_base64url(value: &str) -> Result<Vec<u8>> {
    let normalized: String = value
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    URL_SAFE_NO_PAD.decode(normalized).map_err(|e| {
        ErrorBuilder::new(ErrorCode::InvalidParameter, "subscription key is not base64url")
            .details(e)
            .build_error()
    })
}

fn crypto_error(err: impl ToString) -> TaskPushError {
    ErrorBuilder::new(ErrorCode::InternalError, "push payload encryption failed")
        .details(err.to_string())
        .build_error()
}
