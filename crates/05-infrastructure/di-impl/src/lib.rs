//! # 服务容器具体实现
//!
//! 提供具体的服务注册表、依赖解析器、生命周期编排和优雅关闭实现
//!
//! ```rust
//! use di_abstractions::ServiceContainer;
//! use di_impl::ServiceRegistry;
//! use infrastructure_common::{Inject, InjectionPoint, Service};
//! use std::sync::Arc;
//!
//! struct Seed {
//!     name: String,
//! }
//!
//! impl Service for Seed {}
//!
//! struct Base {
//!     seed: Inject<Seed>,
//! }
//!
//! impl Service for Base {
//!     fn injection_points(&self) -> Vec<InjectionPoint<'_>> {
//!         vec![InjectionPoint::new("seed", "seed", &self.seed)]
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let registry = ServiceRegistry::new();
//! registry.register_service("seed", Arc::new(Seed { name: "x".to_string() }))?;
//! registry.register_service("base", Arc::new(Base { seed: Inject::new() }))?;
//! registry.ready().await?;
//!
//! let base = registry.get::<Base>("base").unwrap();
//! assert_eq!(base.seed.get().unwrap().name, "x");
//! # Ok::<(), infrastructure_common::ContainerError>(())
//! # }).unwrap();
//! ```

mod lifecycle;
pub mod registry;
pub mod resolver;
mod signal;

pub use registry::ServiceRegistry;
pub use resolver::DefaultDependencyResolver;
