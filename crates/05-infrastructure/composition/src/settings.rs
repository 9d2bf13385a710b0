//! 容器配置
//!
//! 配置来源按优先级从低到高：默认值、TOML/JSON 文件、`LORN_CONTAINER__*` 环境变量。
//! 例如 `LORN_CONTAINER__GRACEFUL_SHUTDOWN__ENABLED=true`。

use crate::error::CompositionResult;
use config::{Config, Environment, File};
use di_abstractions::{ContainerConfig, ResolveOptions, ShutdownOrder};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "LORN_CONTAINER";

/// 未指定文件时尝试加载的默认配置文件（不含扩展名）
pub const DEFAULT_CONFIG_FILE: &str = "config/container";

/// 优雅关闭配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GracefulShutdownSettings {
    /// 是否启用
    pub enabled: bool,
    /// 宽限期（毫秒）
    pub grace_period_ms: u64,
}

impl Default for GracefulShutdownSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            grace_period_ms: 5000,
        }
    }
}

impl GracefulShutdownSettings {
    /// 宽限期
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

/// 日志配置项
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志级别
    pub level: String,
    /// 是否输出 JSON
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// 容器配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// 是否拒绝重复的服务标识
    pub strict_identifiers: bool,
    /// 依赖解析遇到第一个错误即停止
    pub fail_fast_resolution: bool,
    /// 停止顺序
    pub shutdown_order: ShutdownOrder,
    /// 优雅关闭
    pub graceful_shutdown: GracefulShutdownSettings,
    /// 日志
    pub logging: LoggingSettings,
}

impl ContainerSettings {
    /// 加载配置
    ///
    /// 指定的文件必须存在；未指定时尝试加载 [`DEFAULT_CONFIG_FILE`]，不存在则忽略。
    pub fn load(path: Option<&Path>) -> CompositionResult<Self> {
        Self::load_with_env(path, Self::environment())
    }

    /// 使用自定义环境变量源加载配置
    pub fn load_with_env(path: Option<&Path>, env: Environment) -> CompositionResult<Self> {
        let file = match path {
            Some(path) => {
                debug!("加载容器配置文件: {}", path.display());
                File::from(path).required(true)
            }
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize::<Self>()?;

        debug!(?settings, "容器配置加载完成");
        Ok(settings)
    }

    /// 默认的环境变量源
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// 转换为注册表配置
    pub fn to_container_config(&self) -> ContainerConfig {
        ContainerConfig::new()
            .with_strict_identifiers(self.strict_identifiers)
            .with_shutdown_order(self.shutdown_order)
            .with_resolve_options(ResolveOptions::default().fail_fast(self.fail_fast_resolution))
    }
}
