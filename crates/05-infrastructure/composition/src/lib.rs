//! # 服务容器组合层
//!
//! 把配置加载、日志初始化和服务注册组合成一个可运行的服务容器。
//!
//! ## 主要功能
//!
//! - **容器配置**: 通过 `config` crate 从 TOML/JSON 文件和环境变量加载 [`ContainerSettings`]
//! - **日志初始化**: [`LoggingConfig`] 安装 `tracing-subscriber`
//! - **容器构建器**: [`ContainerBuilder`] 按顺序注册服务并启用优雅关闭
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::ServiceContainer;
//! use infrastructure_common::Service;
//! use infrastructure_composition::ContainerBuilder;
//! use std::sync::Arc;
//!
//! struct Seed;
//!
//! impl Service for Seed {}
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ContainerBuilder::load(None)?
//!         .with_configured_logging()?
//!         .register("seed", Arc::new(Seed))
//!         .build()?;
//!
//!     registry.ready().await?;
//!     registry.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod error;
pub mod logging;
pub mod settings;

// 重新导出主要类型
pub use builder::ContainerBuilder;
pub use error::{CompositionError, CompositionResult};
pub use logging::LoggingConfig;
pub use settings::{ContainerSettings, GracefulShutdownSettings, LoggingSettings};
