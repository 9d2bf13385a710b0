//! 容器构建器

use crate::error::CompositionResult;
use crate::logging::LoggingConfig;
use crate::settings::ContainerSettings;
use di_abstractions::{GracefulShutdown, ServiceContainer};
use di_impl::ServiceRegistry;
use infrastructure_common::{Service, ServiceHandle};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 容器构建器
///
/// 使用建造者模式把配置、日志和服务注册组装成一个 [`ServiceRegistry`]
pub struct ContainerBuilder {
    /// 容器配置
    settings: ContainerSettings,
    /// 日志配置，未设置时不初始化日志
    logging: Option<LoggingConfig>,
    /// 按注册顺序排列的服务
    services: Vec<(String, ServiceHandle)>,
    /// 显式指定的优雅关闭配置，优先于配置文件
    graceful: Option<GracefulShutdown>,
}

impl ContainerBuilder {
    /// 使用默认配置创建构建器
    pub fn new() -> Self {
        Self::from_settings(ContainerSettings::default())
    }

    /// 使用给定配置创建构建器
    pub fn from_settings(settings: ContainerSettings) -> Self {
        Self {
            settings,
            logging: None,
            services: Vec::new(),
            graceful: None,
        }
    }

    /// 从配置文件和环境变量加载配置并创建构建器
    pub fn load(path: Option<&Path>) -> CompositionResult<Self> {
        Ok(Self::from_settings(ContainerSettings::load(path)?))
    }

    /// 当前配置
    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// 使用配置文件中的日志配置
    pub fn with_configured_logging(self) -> CompositionResult<Self> {
        let config = LoggingConfig::from_settings(&self.settings.logging)?;
        Ok(self.with_logging(config))
    }

    /// 注册服务
    pub fn register<T: Service>(self, id: impl Into<String>, service: Arc<T>) -> Self {
        self.register_handle(id, ServiceHandle::new(service))
    }

    /// 注册服务句柄
    pub fn register_handle(mut self, id: impl Into<String>, handle: ServiceHandle) -> Self {
        self.services.push((id.into(), handle));
        self
    }

    /// 启用优雅关闭
    pub fn with_graceful_shutdown(mut self, graceful: GracefulShutdown) -> Self {
        self.graceful = Some(graceful);
        self
    }

    /// 构建注册表
    ///
    /// 服务按添加顺序注册；返回的注册表尚未就绪，需要调用 `ready`。
    pub fn build(self) -> CompositionResult<ServiceRegistry> {
        if let Some(logging) = &self.logging {
            if let Err(err) = logging.init() {
                warn!(error = %err, "日志系统已初始化，跳过");
            }
        }

        info!(services = self.services.len(), "开始构建服务容器");
        let registry = ServiceRegistry::with_config(self.settings.to_container_config());
        registry.register_services(self.services)?;

        let graceful = self.graceful.or_else(|| {
            let settings = &self.settings.graceful_shutdown;
            settings
                .enabled
                .then(|| GracefulShutdown::new(settings.grace_period()))
        });
        if let Some(graceful) = graceful {
            registry.handle_graceful_shutdown_with(graceful)?;
        }

        info!(services = registry.len(), "服务容器构建完成");
        Ok(registry)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::ShutdownOrder;
    use infrastructure_common::{ContainerError, Inject, InjectionPoint};
    use crate::error::CompositionError;

    struct Seed;

    impl Service for Seed {}

    struct Base {
        seed: Inject<Seed>,
    }

    impl Service for Base {
        fn injection_points(&self) -> Vec<InjectionPoint<'_>> {
            vec![InjectionPoint::new("seed", "seed", &self.seed)]
        }
    }

    #[tokio::test]
    async fn test_build_registers_in_order() {
        let base = Arc::new(Base { seed: Inject::new() });
        let registry = ContainerBuilder::new()
            .register("base", base.clone())
            .register("seed", Arc::new(Seed))
            .build()
            .unwrap();

        assert_eq!(registry.service_ids(), vec!["base", "seed"]);
        registry.ready().await.unwrap();
        assert!(base.seed.is_injected());
    }

    #[test]
    fn test_build_applies_settings() {
        let settings = ContainerSettings {
            strict_identifiers: true,
            shutdown_order: ShutdownOrder::Reverse,
            ..ContainerSettings::default()
        };

        let result = ContainerBuilder::from_settings(settings)
            .register("seed", Arc::new(Seed))
            .register("seed", Arc::new(Seed))
            .build();

        assert!(matches!(
            result,
            Err(CompositionError::Container(ContainerError::DuplicateIdentifier { .. }))
        ));
    }
}
