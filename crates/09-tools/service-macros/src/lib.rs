//! # Service Macros
//!
//! 这个 crate 提供了 `#[derive(Service)]`，根据字段注解生成服务的注入点声明
//! 和可选能力。
//!
//! ## 使用示例
//!
//! ```rust
//! use infrastructure_common::{BoxError, Inject};
//! use service_macros::Service;
//!
//! #[derive(Service)]
//! struct Seed {
//!     name: String,
//! }
//!
//! #[derive(Service)]
//! #[service(start = "open")]
//! struct Base {
//!     #[inject("seed")]
//!     seed_ref: Inject<Seed>,
//! }
//!
//! impl Base {
//!     async fn open(&self) -> Result<(), BoxError> {
//!         Ok(())
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod lifecycle;
mod service;
mod utils;

/// 服务派生宏
///
/// 为结构体实现 `infrastructure_common::Service`。
///
/// # 字段注解
///
/// - `#[inject("id")]` / `#[inject(name = "id")]` - 注入指定标识的服务
/// - `#[inject]` - 使用字段名作为服务标识（仅命名字段）
///
/// 被注解的字段必须是 `Inject<T>`。
///
/// # 结构体注解
///
/// - `#[service(lifecycle)]` - 暴露手写的 `Lifecycle` 实现
/// - `#[service(container_aware)]` - 暴露手写的 `ContainerAware` 实现
/// - `#[service(start = "method", stop = "method")]` - 生成 `Lifecycle` 实现，
///   调用给定的异步方法
///
/// # 示例
///
/// ```rust
/// use infrastructure_common::Inject;
/// use service_macros::Service;
///
/// #[derive(Service)]
/// struct Seed;
///
/// #[derive(Service)]
/// struct Cool {
///     #[inject]
///     seed: Inject<Seed>,
/// }
/// ```
#[proc_macro_derive(Service, attributes(inject, service))]
pub fn derive_service(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    service::derive_service_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
