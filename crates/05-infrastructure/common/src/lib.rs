//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn 服务容器的公共 traits、注入槽和错误类型。
//!
//! ## 核心组件
//!
//! - [`Service`] - 可注册服务 trait，声明注入点和可选能力
//! - [`Inject`] - 依赖注入槽，在容器就绪时被填充且只填充一次
//! - [`Lifecycle`] - 服务启动/停止生命周期能力
//! - [`ContainerAware`] - 感知容器能力，启动前获得容器的非拥有引用
//! - [`ContainerError`] - 容器错误分类
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的显式注入点声明，不依赖运行时反射
//! - 异步优先的生命周期接口
//! - 注入是纯引用复制，服务实例在容器与调用方之间共享同一个 `Arc`

pub mod errors;
pub mod inject;
pub mod lifecycle;
pub mod service;

pub use errors::*;
pub use inject::*;
pub use lifecycle::*;
pub use service::*;

/// 重新导出 `async_trait`，供 `#[derive(Service)]` 生成的代码使用
pub use async_trait::async_trait;
