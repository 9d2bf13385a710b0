//! # Service Container Abstractions
//!
//! 服务容器抽象层，定义服务注册、依赖解析和生命周期编排的核心接口。
//!
//! ## 核心接口
//!
//! - [`ServiceContainer`] - 服务容器接口
//! - [`DependencyResolver`] - 依赖解析器接口
//! - [`DependencyGraph`] - 依赖图，用于校验与诊断
//! - [`GracefulShutdown`] - 优雅关闭配置（信号源 + 进程终止器）

pub mod container;
pub mod registry;
pub mod resolver;
pub mod shutdown;

pub use container::*;
pub use registry::*;
pub use resolver::*;
pub use shutdown::*;
