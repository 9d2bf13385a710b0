//! 组合层错误类型

use infrastructure_common::ContainerError;
use thiserror::Error;

/// 组合层错误类型
#[derive(Error, Debug)]
pub enum CompositionError {
    /// 配置文件或环境变量无法加载或反序列化
    #[error("配置加载失败: {source}")]
    Config {
        /// 底层配置错误
        #[from]
        source: config::ConfigError,
    },

    /// 日志级别无法解析为过滤指令
    #[error("无效的日志级别: {level}")]
    InvalidLogLevel {
        /// 原始级别字符串
        level: String,
    },

    /// 全局日志订阅器安装失败
    #[error("日志初始化失败: {message}")]
    Logging {
        /// 失败原因
        message: String,
    },

    /// 服务注册或优雅关闭配置失败
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// 结果类型别名
pub type CompositionResult<T> = Result<T, CompositionError>;
