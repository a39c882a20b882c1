//! 任务推送服务配置

use std::env;

use chrono_tz::Tz;
use task_push_core::config::TaskPushAppConfig;

#[derive(Debug, Clone)]
pub struct PushServerConfig {
    pub address: String,
    pub data_dir: String,
    pub push_provider: String, // "http" | "loopback" | "noop"
    /// 推送消息在推送服务中的保留时间（秒）
    pub push_ttl_seconds: u64,
    // VAPID 配置
    pub vapid_public_key: Option<String>,
    pub vapid_private_key_pem: Option<String>,
    pub vapid_subject: Option<String>,
    pub schedule_time_zone: String,
}

impl Default for PushServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".to_string(),
            data_dir: "data".to_string(),
            push_provider: "http".to_string(),
            push_ttl_seconds: 0,
            vapid_public_key: None,
            vapid_private_key_pem: None,
            vapid_subject: None,
            schedule_time_zone: crate::domain::service::DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

impl PushServerConfig {
    pub fn from_app_config(app: &TaskPushAppConfig) -> Self {
        let service = app.push_server_service();
        let defaults = Self::default();

        let address = env::var("PUSH_SERVER_ADDRESS")
            .ok()
            .or_else(|| service.address.clone())
            .unwrap_or(defaults.address);

        let data_dir = env::var("PUSH_SERVER_DATA_DIR")
            .ok()
            .or_else(|| service.data_dir.clone())
            .unwrap_or(defaults.data_dir);

        let push_provider = env::var("PUSH_SERVER_PUSH_PROVIDER")
            .ok()
            .or_else(|| service.push_provider.clone())
            .unwrap_or(defaults.push_provider);

        let push_ttl_seconds = env::var("PUSH_SERVER_PUSH_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .or(service.push_ttl_seconds)
            .unwrap_or(defaults.push_ttl_seconds);

        let vapid_public_key = env::var("PUSH_SERVER_VAPID_PUBLIC_KEY")
            .ok()
            .or_else(|| service.vapid_public_key.clone());

        let vapid_private_key_pem = env::var("PUSH_SERVER_VAPID_PRIVATE_KEY_PEM")
            .ok()
            .or_else(|| service.vapid_private_key_pem.clone());

        let vapid_subject = env::var("PUSH_SERVER_VAPID_SUBJECT")
            .ok()
            .or_else(|| service.vapid_subject.clone());

        // 非法时区回退到默认值
        let schedule_time_zone = env::var("PUSH_SERVER_SCHEDULE_TIME_ZONE")
            .ok()
            .or_else(|| service.schedule_time_zone.clone())
            .filter(|tz| tz.parse::<Tz>().is_ok())
            .unwrap_or(defaults.schedule_time_zone);

        Self {
            address,
            data_dir,
            push_provider,
            push_ttl_seconds,
            vapid_public_key,
            vapid_private_key_pem,
            vapid_subject,
            schedule_time_zone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_push_core::config::{PushServerServiceConfig, ServicesConfig};

    #[test]
    fn invalid_time_zone_falls_back_to_default() {
        let app = TaskPushAppConfig {
            services: ServicesConfig {
                relay: None,
                push_server: Some(PushServerServiceConfig {
                    data_dir: Some("/var/lib/task-push".to_string()),
                    schedule_time_zone: Some("Mars/Olympus_Mons".to_string()),
                    ..Default::default()
                }),
            },
            ..Default::default()
        };

        let config = PushServerConfig::from_app_config(&app);
        if env::var("PUSH_SERVER_SCHEDULE_TIME_ZONE").is_err() {
            assert_eq!(config.schedule_time_zone, "Asia/Kolkata");
        }
        if env::var("PUSH_SERVER_DATA_DIR").is_err() {
            assert_eq!(config.data_dir, "/var/lib/task-push");
        }
    }
}
