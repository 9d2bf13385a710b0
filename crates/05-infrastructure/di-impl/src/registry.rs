//! 服务注册表
//!
//! 按标识保存服务句柄并记录注册顺序。`ready` 之后注册表被封闭，
//! 启动和停止都按注册顺序（或配置的逆序）执行。

use crate::lifecycle;
use crate::resolver::DefaultDependencyResolver;
use crate::signal;
use async_trait::async_trait;
use di_abstractions::{
    ContainerConfig, DependencyGraph, DependencyResolver, GracefulShutdown, ProcessTerminator,
    ResolveContext, ServiceContainer, ServiceDescriptor, ShutdownOrder, SignalSource,
};
use infrastructure_common::{
    ContainerError, ContainerResult, DependencyRequirement, LifecycleState, ServiceHandle,
    ServiceLocator, ServiceRef,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Default)]
struct Entries {
    services: HashMap<String, ServiceHandle>,
    order: Vec<String>,
    requirements: HashMap<String, Vec<DependencyRequirement>>,
    sealed: bool,
}

impl Entries {
    fn ordered(&self) -> Vec<(String, ServiceHandle)> {
        self.order
            .iter()
            .filter_map(|id| {
                self.services
                    .get(id)
                    .map(|handle| (id.clone(), handle.clone()))
            })
            .collect()
    }
}

struct GracefulState {
    grace_period: Duration,
    terminator: Arc<dyn ProcessTerminator>,
    exit_code: i32,
    signal: Option<SignalSource>,
}

struct RegistryInner {
    config: ContainerConfig,
    resolver: Box<dyn DependencyResolver>,
    entries: RwLock<Entries>,
    state: Mutex<LifecycleState>,
    graceful: Mutex<Option<GracefulState>>,
    listener_installed: AtomicBool,
}

/// 服务注册表
///
/// 克隆得到的是同一个注册表的另一个引用。
#[derive(Clone)]
pub struct ServiceRegistry {
    inner: Arc<RegistryInner>,
}

impl ServiceRegistry {
    /// 使用默认配置创建注册表
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建注册表
    pub fn with_config(config: ContainerConfig) -> Self {
        Self::with_resolver(config, DefaultDependencyResolver::new())
    }

    /// 使用自定义依赖解析器创建注册表
    pub fn with_resolver<R>(config: ContainerConfig, resolver: R) -> Self
    where
        R: DependencyResolver + 'static,
    {
        Self {
            inner: Arc::new(RegistryInner {
                config,
                resolver: Box::new(resolver),
                entries: RwLock::new(Entries::default()),
                state: Mutex::new(LifecycleState::Idle),
                graceful: Mutex::new(None),
                listener_installed: AtomicBool::new(false),
            }),
        }
    }

    /// 注册表配置
    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    /// 按标识查找服务并转换为具体类型
    pub fn get<T>(&self, id: &str) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.inner.entries.read().services.get(id)?.downcast::<T>()
    }

    /// 已注册的服务数量
    pub fn len(&self) -> usize {
        self.inner.entries.read().order.len()
    }

    /// 是否没有注册任何服务
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 是否存在指定标识的服务
    pub fn contains(&self, id: &str) -> bool {
        self.inner.entries.read().services.contains_key(id)
    }

    /// 按注册顺序返回服务标识
    pub fn service_ids(&self) -> Vec<String> {
        self.inner.entries.read().order.clone()
    }

    /// 当前生命周期状态
    pub fn state(&self) -> LifecycleState {
        *self.inner.state.lock()
    }

    /// 是否已经封闭
    pub fn is_sealed(&self) -> bool {
        self.inner.entries.read().sealed
    }

    /// 按注册顺序返回服务描述符
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        let entries = self.inner.entries.read();
        entries
            .order
            .iter()
            .enumerate()
            .filter_map(|(order, id)| {
                let handle = entries.services.get(id)?;
                let dependencies = entries
                    .requirements
                    .get(id)
                    .map(|reqs| reqs.iter().map(|req| req.target.clone()).collect())
                    .unwrap_or_default();
                Some(ServiceDescriptor {
                    id: id.clone(),
                    order,
                    type_name: handle.type_name().to_string(),
                    dependencies,
                    lifecycle: handle.has_lifecycle(),
                    container_aware: handle.is_container_aware(),
                })
            })
            .collect()
    }

    /// 根据已记录的依赖需求构建依赖图
    pub fn dependency_graph(&self) -> DependencyGraph {
        let entries = self.inner.entries.read();
        DependencyGraph::from_requirements(
            entries.order.iter().map(String::as_str),
            entries.order.iter().filter_map(|id| entries.requirements.get(id)).flatten(),
        )
    }

    fn locator(&self) -> Arc<dyn ServiceLocator> {
        Arc::new(RegistryLocator {
            inner: Arc::downgrade(&self.inner),
        })
    }

    fn stop_sequence(&self) -> Vec<(String, ServiceHandle)> {
        let mut services = self.inner.entries.read().ordered();
        if self.inner.config.shutdown_order == ShutdownOrder::Reverse {
            services.reverse();
        }
        services
    }

    /// 优雅关闭模式下要求当前线程处于 tokio 运行时中
    fn ensure_graceful_runtime(&self) -> ContainerResult<()> {
        if self.inner.graceful.lock().is_some() {
            tokio::runtime::Handle::try_current().map_err(|_| ContainerError::NoRuntime)?;
        }
        Ok(())
    }

    fn install_signal_listener(&self) -> ContainerResult<()> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ContainerError::NoRuntime)?;

        if self.inner.listener_installed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let source = self
            .inner
            .graceful
            .lock()
            .as_mut()
            .and_then(|graceful| graceful.signal.take())
            .unwrap_or_default();

        let registry = Arc::downgrade(&self.inner);
        runtime.spawn(async move {
            if let Err(err) = signal::wait_for(source).await {
                error!(error = %err, "关闭信号监听失败");
                return;
            }

            let Some(inner) = registry.upgrade() else {
                debug!("收到关闭信号时注册表已释放");
                return;
            };

            info!("收到关闭信号，开始优雅关闭");
            let registry = ServiceRegistry { inner };
            if let Err(err) = registry.shutdown().await {
                error!(error = %err, "优雅关闭过程中出现错误");
            }
        });

        info!("关闭信号监听已安装");
        Ok(())
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceContainer for ServiceRegistry {
    fn register_handle(&self, id: String, handle: ServiceHandle) -> ContainerResult<()> {
        if id.is_empty() {
            return Err(ContainerError::EmptyIdentifier);
        }

        let requirements = handle.requirements(&id);
        let mut entries = self.inner.entries.write();

        if entries.sealed {
            return Err(ContainerError::Sealed { id });
        }

        if entries.services.contains_key(&id) {
            if self.inner.config.strict_identifiers {
                return Err(ContainerError::DuplicateIdentifier { id });
            }
            warn!(service_id = %id, type_name = handle.type_name(), "服务标识重复，替换已注册的服务");
        } else {
            entries.order.push(id.clone());
        }

        info!(
            service_id = %id,
            type_name = handle.type_name(),
            dependencies = requirements.len(),
            "注册服务"
        );
        entries.requirements.insert(id.clone(), requirements);
        entries.services.insert(id, handle);
        Ok(())
    }

    fn get_service(&self, id: &str) -> Option<ServiceRef> {
        self.inner
            .entries
            .read()
            .services
            .get(id)
            .map(|handle| handle.instance().clone())
    }

    async fn ready(&self) -> ContainerResult<()> {
        let services = {
            let mut state = self.inner.state.lock();
            if *state != LifecycleState::Idle {
                return Err(ContainerError::AlreadyReady);
            }
            self.ensure_graceful_runtime()?;

            let mut entries = self.inner.entries.write();
            let context = ResolveContext::new(&entries.order, &entries.services, &self.inner.config.resolve);
            let summary = match self.inner.resolver.resolve(&context) {
                Ok(summary) => summary,
                Err(errors) => {
                    error!(errors = errors.len(), "依赖解析失败，服务不会启动");
                    return Err(ContainerError::Resolution { errors });
                }
            };

            entries.sealed = true;
            *state = LifecycleState::Starting;
            info!(
                services = entries.order.len(),
                injected = summary.injected,
                cycles = summary.cycles.len(),
                "依赖解析完成，注册表已封闭"
            );
            entries.ordered()
        };

        let failures = lifecycle::start_all(&services, &self.locator()).await;

        {
            let mut state = self.inner.state.lock();
            if *state == LifecycleState::Starting {
                *state = LifecycleState::Running;
            }
        }

        if self.inner.graceful.lock().is_some() {
            self.install_signal_listener()?;
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ContainerError::ServiceStart { failures })
        }
    }

    async fn shutdown(&self) -> ContainerResult<()> {
        {
            let mut state = self.inner.state.lock();
            if state.is_shutting_down() {
                debug!(state = %*state, "注册表已在关闭，忽略重复的关闭请求");
                return Ok(());
            }
            self.ensure_graceful_runtime()?;
            *state = LifecycleState::Stopping;
        }

        let services = self.stop_sequence();
        let failures = lifecycle::stop_all(&services).await;
        *self.inner.state.lock() = LifecycleState::Stopped;
        info!(failed = failures.len(), "注册表已停止");

        let graceful = self
            .inner
            .graceful
            .lock()
            .as_ref()
            .map(|graceful| (graceful.grace_period, Arc::clone(&graceful.terminator), graceful.exit_code));

        if let Some((grace_period, terminator, exit_code)) = graceful {
            info!(grace_period_ms = grace_period.as_millis() as u64, "等待宽限期后结束进程");
            tokio::time::sleep(grace_period).await;
            terminator.terminate(exit_code);
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ContainerError::ServiceStop { failures })
        }
    }

    fn handle_graceful_shutdown_with(&self, graceful: GracefulShutdown) -> ContainerResult<()> {
        let GracefulShutdown {
            grace_period,
            signal,
            terminator,
            exit_code,
        } = graceful;

        let signal = if self.inner.listener_installed.load(Ordering::SeqCst) {
            warn!("关闭信号监听已安装，新的信号源被忽略");
            None
        } else {
            Some(signal)
        };

        *self.inner.graceful.lock() = Some(GracefulState {
            grace_period,
            terminator,
            exit_code,
            signal,
        });
        info!(grace_period_ms = grace_period.as_millis() as u64, "已启用优雅关闭");

        if self.state() == LifecycleState::Running {
            self.install_signal_listener()?;
        }
        Ok(())
    }
}

/// 注册表的非拥有引用，注册表释放后查找返回 `None`
struct RegistryLocator {
    inner: Weak<RegistryInner>,
}

impl ServiceLocator for RegistryLocator {
    fn get_service(&self, id: &str) -> Option<ServiceRef> {
        let inner = self.inner.upgrade()?;
        let entries = inner.entries.read();
        entries.services.get(id).map(|handle| handle.instance().clone())
    }
}
