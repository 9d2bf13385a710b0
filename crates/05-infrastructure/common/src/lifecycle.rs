//! 服务生命周期能力

use crate::errors::BoxError;
use crate::inject::ServiceRef;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// 服务生命周期管理 trait
///
/// 容器就绪后按注册顺序调用 [`Lifecycle::start`]，关闭时调用 [`Lifecycle::stop`]。
/// 单个服务的失败只会被记录，不会阻止其他服务的启动或停止。
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// 服务启动
    async fn start(&self) -> Result<(), BoxError>;

    /// 服务停止
    async fn stop(&self) -> Result<(), BoxError>;
}

/// 服务定位器
///
/// 容器交给感知容器服务的非拥有引用，只用于后续按标识查找服务。
pub trait ServiceLocator: Send + Sync {
    /// 按标识查找服务
    fn get_service(&self, id: &str) -> Option<ServiceRef>;

    /// 是否存在指定标识的服务
    fn contains(&self, id: &str) -> bool {
        self.get_service(id).is_some()
    }
}

impl dyn ServiceLocator {
    /// 按标识查找服务并转换为具体类型
    pub fn get<T>(&self, id: &str) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.get_service(id)?.downcast::<T>().ok()
    }
}

/// 感知容器 trait
///
/// 仅对同时实现了生命周期能力的服务生效，在 `start` 之前调用一次。
pub trait ContainerAware: Send + Sync {
    /// 注入容器引用
    fn set_container(&self, container: Arc<dyn ServiceLocator>);
}

/// 容器生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// 未就绪
    #[default]
    Idle,
    /// 启动中
    Starting,
    /// 运行中
    Running,
    /// 停止中
    Stopping,
    /// 已停止
    Stopped,
}

impl LifecycleState {
    /// 是否已经进入关闭流程
    pub fn is_shutting_down(self) -> bool {
        matches!(self, Self::Stopping | Self::Stopped)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
