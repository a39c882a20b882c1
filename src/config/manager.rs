//! 配置管理器 - 负责处理不同环境下的配置覆盖
//!
//! 加载 `config/environments/{environment}.toml` 并合并到基础配置中

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use toml::Value;

use super::merge_value;

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取当前环境名称
    ///
    /// 从环境变量 TASK_PUSH_ENV 获取，未设置时默认为 "development"
    pub fn get_environment() -> String {
        env::var("TASK_PUSH_ENV").unwrap_or_else(|_| "development".to_string())
    }

    /// 当前环境对应的覆盖文件路径
    pub fn environment_config_path(environment: &str) -> PathBuf {
        PathBuf::from(format!("config/environments/{}.toml", environment))
    }

    /// 根据环境加载特定配置并合并到基础配置树中
    pub fn load_environment_config(root: &mut Value) -> Result<()> {
        let path = Self::environment_config_path(&Self::get_environment());
        Self::apply_overlay_file(root, &path)
    }

    /// 合并单个覆盖文件；文件不存在时不做任何事
    pub fn apply_overlay_file(root: &mut Value, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("无法读取环境配置文件: {}", path.display()))?;
        let overlay: Value = toml::from_str(&content)
            .with_context(|| format!("无效的环境配置格式: {}", path.display()))?;

        merge_value(root, overlay);
        Ok(())
    }
}
