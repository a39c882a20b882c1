//! Task Push Core 配置模块
//!
//! 该模块提供了应用程序配置管理功能，包括：
//! - 配置文件（单文件或分片目录）加载和解析
//! - 环境特定配置覆盖
//! - 中继服务与推送服务的配置定义

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use toml::Value;
use tracing::warn;

mod manager;
pub use manager::ConfigManager;

/// 全局应用配置实例，使用 OnceLock 确保只初始化一次
static APP_CONFIG: OnceLock<TaskPushAppConfig> = OnceLock::new();

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别（RUST_LOG 未设置时生效）
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub with_target: bool,
    #[serde(default)]
    pub with_thread_ids: bool,
    #[serde(default)]
    pub with_file: bool,
    #[serde(default)]
    pub with_line_number: bool,
    /// 输出格式：text | json
    #[serde(default)]
    pub format: LogFormat,
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            with_target: true,
            with_thread_ids: false,
            with_file: false,
            with_line_number: false,
            format: LogFormat::Text,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// 通知中继服务配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RelayServiceConfig {
    /// 通知展示后端（log | desktop | webhook | memory）
    #[serde(default)]
    pub display_provider: Option<String>,
    /// webhook 展示后端的目标地址
    #[serde(default)]
    pub display_webhook_endpoint: Option<String>,
    /// 推送事件来源（http | stdin | channel）
    #[serde(default)]
    pub event_source: Option<String>,
    /// HTTP 接入监听地址
    #[serde(default)]
    pub ingress_address: Option<String>,
    /// 同时处理中的事件上限
    #[serde(default)]
    pub max_in_flight: Option<usize>,
    /// 进程内事件通道容量
    #[serde(default)]
    pub channel_capacity: Option<usize>,
}

/// 任务推送服务配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PushServerServiceConfig {
    /// HTTP 监听地址
    #[serde(default)]
    pub address: Option<String>,
    /// 数据目录（tasks.json / subscriptions.json）
    #[serde(default)]
    pub data_dir: Option<String>,
    /// 推送发送器（http | loopback | noop）
    #[serde(default)]
    pub push_provider: Option<String>,
    /// 推送消息 TTL（秒）
    #[serde(default)]
    pub push_ttl_seconds: Option<u64>,
    /// VAPID 公钥（base64url，下发给浏览器）
    #[serde(default)]
    pub vapid_public_key: Option<String>,
    /// VAPID 私钥（PKCS#8 PEM 内容，非文件路径）
    #[serde(default)]
    pub vapid_private_key_pem: Option<String>,
    /// VAPID subject（mailto: 或 https: URL）
    #[serde(default)]
    pub vapid_subject: Option<String>,
    /// 日程规划使用的时区
    #[serde(default)]
    pub schedule_time_zone: Option<String>,
}

/// 服务配置集合
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServicesConfig {
    #[serde(default)]
    pub relay: Option<RelayServiceConfig>,
    #[serde(default)]
    pub push_server: Option<PushServerServiceConfig>,
}

/// Task Push 应用配置主结构体
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TaskPushAppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub services: ServicesConfig,
}

impl TaskPushAppConfig {
    /// 获取中继服务配置
    pub fn relay_service(&self) -> RelayServiceConfig {
        self.services.relay.clone().unwrap_or_default()
    }

    /// 获取推送服务配置
    pub fn push_server_service(&self) -> PushServerServiceConfig {
        self.services.push_server.clone().unwrap_or_default()
    }
}

/// 加载配置
pub fn load_config(path: Option<&str>) -> &'static TaskPushAppConfig {
    let candidates: Vec<PathBuf> = match path {
        Some(p) => vec![PathBuf::from(p)],
        None => vec![PathBuf::from("config"), PathBuf::from("config.toml")],
    };

    APP_CONFIG.get_or_init(|| {
        let mut root = load_with_fallback(&candidates);
        // 加载环境特定配置
        if let Err(e) = ConfigManager::load_environment_config(&mut root) {
            warn!("failed to load environment config: {}", e);
        }
        let parsed: Result<TaskPushAppConfig, _> = root.try_into();
        match parsed {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("invalid configuration after environment overlay: {}", e);
                TaskPushAppConfig::default()
            }
        }
    })
}

/// 获取应用配置
pub fn app_config() -> &'static TaskPushAppConfig {
    APP_CONFIG.get_or_init(TaskPushAppConfig::default)
}

/// 使用备选方案加载配置
fn load_with_fallback(candidates: &[PathBuf]) -> Value {
    for path in candidates {
        match load_config_from_source(path) {
            Ok(value) => return value,
            Err(err) => {
                warn!("failed to load config from {}: {err}", path.display());
            }
        }
    }

    warn!("no configuration source succeeded, falling back to defaults");
    Value::Table(toml::map::Map::new())
}

/// 从源加载配置（返回尚未反序列化的 TOML 树）
pub(crate) fn load_config_from_source(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(anyhow!(
            "configuration path {} does not exist",
            path.display()
        ));
    }

    let metadata = path
        .metadata()
        .with_context(|| format!("unable to read metadata for {}", path.display()))?;

    let value = if metadata.is_dir() {
        load_config_from_directory(path)?
    } else {
        load_toml_value(path)?
    };

    // 提前校验结构，避免合并后才发现格式错误
    let _checked: TaskPushAppConfig = value
        .clone()
        .try_into()
        .with_context(|| format!("invalid config format: {}", path.display()))?;

    Ok(value)
}

/// 从目录加载配置
fn load_config_from_directory(path: &Path) -> Result<Value> {
    let base_file = path.join("base.toml");
    if !base_file.exists() {
        return Err(anyhow!(
            "missing base configuration: {}",
            base_file.display()
        ));
    }

    let mut merged = load_toml_value(&base_file)?;

    if !merged.is_table() {
        return Err(anyhow!(
            "base configuration must be a table: {}",
            base_file.display()
        ));
    }

    merge_directory(&mut merged, &path.join("shared"))?;
    merge_directory(&mut merged, &path.join("services"))?;
    merge_directory(&mut merged, &path.join("overrides"))?;

    Ok(merged)
}

/// 合并目录中的配置
fn merge_directory(root: &mut Value, dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("unable to read config directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(OsStr::to_str)
                .map(|ext| ext.eq_ignore_ascii_case("toml"))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();

    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let value = load_toml_value(&entry.path())?;
        merge_value(root, value);
    }

    Ok(())
}

/// 加载 TOML 值
fn load_toml_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read config fragment {}", path.display()))?;
    let value: Value = toml::from_str(&content)
        .with_context(|| format!("invalid TOML content in fragment {}", path.display()))?;
    Ok(value)
}

/// 合并值
pub(crate) fn merge_value(base: &mut Value, overlay: Value) {
    match overlay {
        Value::Table(overlay_table) => {
            if let Value::Table(base_table) = base {
                for (key, overlay_value) in overlay_table.into_iter() {
                    match base_table.get_mut(&key) {
                        Some(base_value) => merge_value(base_value, overlay_value),
                        None => {
                            base_table.insert(key, overlay_value);
                        }
                    }
                }
            } else {
                *base = Value::Table(overlay_table);
            }
        }
        other => {
            *base = other;
        }
    }
}
