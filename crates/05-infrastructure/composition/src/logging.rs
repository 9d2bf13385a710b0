//! 日志初始化

use crate::error::{CompositionError, CompositionResult};
use crate::settings::LoggingSettings;
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 存在时以其为准
    pub level: Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 从配置项创建
    pub fn from_settings(settings: &LoggingSettings) -> CompositionResult<Self> {
        let level = Level::from_str(&settings.level).map_err(|_| CompositionError::InvalidLogLevel {
            level: settings.level.clone(),
        })?;

        Ok(Self {
            level,
            json_format: settings.json,
            ..Self::default()
        })
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_ascii_lowercase()))
    }

    /// 安装全局日志订阅者
    ///
    /// 全局订阅者已存在时返回 [`CompositionError::Logging`]。
    pub fn init(&self) -> CompositionResult<()> {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| CompositionError::Logging {
            message: e.to_string(),
        })?;

        info!(level = %self.level, json = self.json_format, "日志系统初始化完成");
        Ok(())
    }
}
