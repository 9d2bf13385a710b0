//! 服务派生宏集成测试

use async_trait::async_trait;
use di_abstractions::ServiceContainer;
use di_impl::ServiceRegistry;
use infrastructure_common::{
    BoxError, ContainerAware, ContainerError, DependencyError, Inject, Lifecycle, Service, ServiceLocator,
};
use parking_lot::Mutex;
use service_macros::Service;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Service)]
struct Seed {
    name: String,
}

#[derive(Service)]
struct BaseStruct {
    id: String,
    #[inject("seed")]
    seed_ref: Inject<Seed>,
}

#[derive(Service)]
struct CoolStruct {
    name: String,
    #[inject(name = "base")]
    base: Inject<BaseStruct>,
}

#[derive(Service)]
struct Inferred {
    #[inject]
    seed: Inject<Seed>,
}

#[derive(Service)]
struct Pair(#[inject("seed")] Inject<Seed>, #[inject("base")] Inject<BaseStruct>);

/// 通过生成的生命周期实现启动和停止
#[derive(Service, Default)]
#[service(start = "open", stop = "close")]
struct Connection {
    open: AtomicBool,
}

impl Connection {
    async fn open(&self) -> Result<(), BoxError> {
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<(), std::io::Error> {
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// 手写生命周期并感知容器
#[derive(Service, Default)]
#[service(lifecycle, container_aware)]
struct Monitor {
    locator: Mutex<Option<Arc<dyn ServiceLocator>>>,
    started: AtomicBool,
}

#[async_trait]
impl Lifecycle for Monitor {
    async fn start(&self) -> Result<(), BoxError> {
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl ContainerAware for Monitor {
    fn set_container(&self, container: Arc<dyn ServiceLocator>) {
        *self.locator.lock() = Some(container);
    }
}

#[test]
fn test_derived_injection_points() {
    let base = BaseStruct {
        id: "base".to_string(),
        seed_ref: Inject::new(),
    };
    let points = base.injection_points();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].field, "seed_ref");
    assert_eq!(points[0].service_id, "seed");

    let inferred = Inferred { seed: Inject::new() };
    assert_eq!(inferred.injection_points()[0].service_id, "seed");

    let pair = Pair(Inject::new(), Inject::new());
    let fields: Vec<_> = pair.injection_points().iter().map(|p| p.field).collect();
    assert_eq!(fields, vec!["0", "1"]);

    let seed = Seed { name: "x".to_string() };
    assert!(seed.injection_points().is_empty());
    assert!(seed.as_lifecycle().is_none());
    assert!(seed.as_container_aware().is_none());
}

#[tokio::test]
async fn test_derived_services_resolve_chain() {
    let registry = ServiceRegistry::new();
    registry
        .register_service(
            "cool",
            Arc::new(CoolStruct {
                name: "a cool struct".to_string(),
                base: Inject::new(),
            }),
        )
        .unwrap();
    registry
        .register_service("seed", Arc::new(Seed { name: "x".to_string() }))
        .unwrap();
    registry
        .register_service(
            "base",
            Arc::new(BaseStruct {
                id: "base deps".to_string(),
                seed_ref: Inject::new(),
            }),
        )
        .unwrap();
    let pair = Arc::new(Pair(Inject::new(), Inject::new()));
    registry.register_service("pair", pair.clone()).unwrap();

    registry.ready().await.unwrap();

    let cool = registry.get::<CoolStruct>("cool").unwrap();
    assert_eq!(cool.name, "a cool struct");
    let base = cool.base.get().unwrap();
    assert_eq!(base.id, "base deps");
    assert_eq!(base.seed_ref.get().unwrap().name, "x");
    assert!(Arc::ptr_eq(pair.1.get().unwrap(), base));
}

#[tokio::test]
async fn test_missing_seed_reports_annotated_field() {
    let registry = ServiceRegistry::new();
    let base = Arc::new(BaseStruct {
        id: "base deps".to_string(),
        seed_ref: Inject::new(),
    });
    registry.register_service("base", base.clone()).unwrap();

    let err = registry.ready().await.unwrap_err();

    assert!(matches!(err, ContainerError::Resolution { .. }));
    assert_eq!(
        err.dependency_errors(),
        &[DependencyError::missing("base", "seed_ref", "seed")]
    );
    assert!(!base.seed_ref.is_injected());
}

#[tokio::test]
async fn test_generated_lifecycle_calls_methods() {
    let registry = ServiceRegistry::new();
    let connection = Arc::new(Connection::default());
    let monitor = Arc::new(Monitor::default());
    registry.register_service("connection", connection.clone()).unwrap();
    registry.register_service("monitor", monitor.clone()).unwrap();

    registry.ready().await.unwrap();
    assert!(connection.open.load(Ordering::SeqCst));
    assert!(monitor.started.load(Ordering::SeqCst));

    let locator = monitor.locator.lock().clone().unwrap();
    assert!(locator.contains("connection"));

    registry.shutdown().await.unwrap();
    assert!(!connection.open.load(Ordering::SeqCst));
}
