//! 服务容器抽象接口
//!
//! 提供服务容器的核心抽象

use crate::resolver::ResolveOptions;
use crate::shutdown::GracefulShutdown;
use async_trait::async_trait;
use infrastructure_common::{ContainerResult, Service, ServiceHandle, ServiceRef};
use std::sync::Arc;
use std::time::Duration;

/// 服务容器 trait
///
/// 生命周期：注册服务 → [`ready`](ServiceContainer::ready) 填充依赖并按注册顺序启动 →
/// [`shutdown`](ServiceContainer::shutdown) 按配置顺序停止。
#[async_trait]
pub trait ServiceContainer: Send + Sync {
    /// 注册服务句柄
    fn register_handle(&self, id: String, handle: ServiceHandle) -> ContainerResult<()>;

    /// 注册服务
    fn register_service<T>(&self, id: impl Into<String>, service: Arc<T>) -> ContainerResult<()>
    where
        T: Service,
        Self: Sized,
    {
        self.register_handle(id.into(), ServiceHandle::new(service))
    }

    /// 按给定顺序批量注册服务，遇到第一个错误即停止
    fn register_services<I, S>(&self, services: I) -> ContainerResult<()>
    where
        I: IntoIterator<Item = (S, ServiceHandle)>,
        S: Into<String>,
        Self: Sized,
    {
        for (id, handle) in services {
            self.register_handle(id.into(), handle)?;
        }
        Ok(())
    }

    /// 按标识查找服务
    fn get_service(&self, id: &str) -> Option<ServiceRef>;

    /// 填充依赖、封闭容器并启动所有服务
    async fn ready(&self) -> ContainerResult<()>;

    /// 停止所有服务
    async fn shutdown(&self) -> ContainerResult<()>;

    /// 启用优雅关闭：收到一次中断信号后执行关闭，并在宽限期后结束进程
    fn handle_graceful_shutdown(&self, grace_period: Duration) -> ContainerResult<()> {
        self.handle_graceful_shutdown_with(GracefulShutdown::new(grace_period))
    }

    /// 使用自定义信号源和进程终止器启用优雅关闭
    fn handle_graceful_shutdown_with(&self, graceful: GracefulShutdown) -> ContainerResult<()>;
}

/// 停止顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownOrder {
    /// 与注册顺序相同
    #[default]
    Registration,
    /// 注册顺序的逆序，依赖方先于被依赖方停止
    Reverse,
}

/// 容器配置
#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    /// 是否拒绝重复的服务标识；关闭时后注册的服务替换先注册的服务
    pub strict_identifiers: bool,
    /// 停止顺序
    pub shutdown_order: ShutdownOrder,
    /// 依赖解析选项
    pub resolve: ResolveOptions,
}

impl ContainerConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置是否拒绝重复的服务标识
    pub fn with_strict_identifiers(mut self, strict: bool) -> Self {
        self.strict_identifiers = strict;
        self
    }

    /// 设置停止顺序
    pub fn with_shutdown_order(mut self, order: ShutdownOrder) -> Self {
        self.shutdown_order = order;
        self
    }

    /// 设置依赖解析选项
    pub fn with_resolve_options(mut self, options: ResolveOptions) -> Self {
        self.resolve = options;
        self
    }
}
