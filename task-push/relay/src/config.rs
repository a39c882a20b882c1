//! 通知中继配置

use std::env;

use task_push_core::config::TaskPushAppConfig;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub display_provider: String, // "log" | "desktop" | "webhook" | "memory"
    pub display_webhook_endpoint: Option<String>,
    pub event_source: String, // "http" | "stdin" | "channel"
    pub ingress_address: String,
    // 并发配置
    pub max_in_flight: usize,
    pub channel_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            display_provider: "log".to_string(),
            display_webhook_endpoint: None,
            event_source: "http".to_string(),
            ingress_address: "127.0.0.1:8081".to_string(),
            max_in_flight: 64,
            channel_capacity: 256,
        }
    }
}

impl RelayConfig {
    pub fn from_app_config(app: &TaskPushAppConfig) -> Self {
        let service = app.relay_service();
        let defaults = Self::default();

        let display_provider = env::var("RELAY_DISPLAY_PROVIDER")
            .ok()
            .or_else(|| service.display_provider.clone())
            .unwrap_or(defaults.display_provider);

        let display_webhook_endpoint = env::var("RELAY_DISPLAY_WEBHOOK_ENDPOINT")
            .ok()
            .or_else(|| service.display_webhook_endpoint.clone());

        let event_source = env::var("RELAY_EVENT_SOURCE")
            .ok()
            .or_else(|| service.event_source.clone())
            .unwrap_or(defaults.event_source);

        let ingress_address = env::var("RELAY_INGRESS_ADDRESS")
            .ok()
            .or_else(|| service.ingress_address.clone())
            .unwrap_or(defaults.ingress_address);

        let max_in_flight = env::var("RELAY_MAX_IN_FLIGHT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .or(service.max_in_flight)
            .filter(|v| *v > 0)
            .unwrap_or(defaults.max_in_flight);

        let channel_capacity = env::var("RELAY_CHANNEL_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .or(service.channel_capacity)
            .filter(|v| *v > 0)
            .unwrap_or(defaults.channel_capacity);

        Self {
            display_provider,
            display_webhook_endpoint,
            event_source,
            ingress_address,
            max_in_flight,
            channel_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_push_core::config::{RelayServiceConfig, ServicesConfig};

    #[test]
    fn file_values_fill_in_when_env_is_unset() {
        let app = TaskPushAppConfig {
            services: ServicesConfig {
                relay: Some(RelayServiceConfig {
                    display_provider: Some("memory".to_string()),
                    max_in_flight: Some(0),
                    channel_capacity: Some(4),
                    ..Default::default()
                }),
                push_server: None,
            },
            ..Default::default()
        };

        let config = RelayConfig::from_app_config(&app);
        // 环境变量可能被外部设置，只在未设置时断言文件值
        if env::var("RELAY_DISPLAY_PROVIDER").is_err() {
            assert_eq!(config.display_provider, "memory");
        }
        if env::var("RELAY_MAX_IN_FLIGHT").is_err() {
            assert_eq!(config.max_in_flight, 64);
        }
        if env::var("RELAY_CHANNEL_CAPACITY").is_err() {
            assert_eq!(config.channel_capacity, 4);
        }
    }
}
