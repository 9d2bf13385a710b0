//! 服务注册表集成测试
use async_trait::async_trait;
use di_abstractions::{ContainerConfig, ResolveOptions, ServiceContainer, ShutdownOrder};
use di_impl::ServiceRegistry;
use infrastructure_common::{
    BoxError, ContainerError, DependencyError, Inject, InjectionPoint, Lifecycle, LifecyclePhase,
    LifecycleState, Service, ServiceHandle,
};
use parking_lot::Mutex;
use std::sync::Arc;

struct Seed {
    name: String,
}

impl Service for Seed {}

struct BaseStruct {
    id: String,
    seed: Inject<Seed>,
}

impl Service for BaseStruct {
    fn injection_points(&self) -> Vec<InjectionPoint<'_>> {
        vec![InjectionPoint::new("seed_ref", "seed", &self.seed)]
    }
}

struct CoolStruct {
    name: String,
    base: Inject<BaseStruct>,
}

impl Service for CoolStruct {
    fn injection_points(&self) -> Vec<InjectionPoint<'_>> {
        vec![InjectionPoint::new("base_ref", "base", &self.base)]
    }
}

type Journal = Arc<Mutex<Vec<String>>>;

/// 记录启动和停止调用的服务
struct Tracked {
    name: &'static str,
    journal: Journal,
    fail_start: bool,
    fail_stop: bool,
}

impl Tracked {
    fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: Arc::clone(journal),
            fail_start: false,
            fail_stop: false,
        }
    }
}

#[async_trait]
impl Lifecycle for Tracked {
    async fn start(&self) -> Result<(), BoxError> {
        self.journal.lock().push(format!("start:{}", self.name));
        if self.fail_start {
            return Err(format!("{} 启动失败", self.name).into());
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        self.journal.lock().push(format!("stop:{}", self.name));
        if self.fail_stop {
            return Err(format!("{} 停止失败", self.name).into());
        }
        Ok(())
    }
}

impl Service for Tracked {
    fn as_lifecycle(&self) -> Option<&dyn Lifecycle> {
        Some(self)
    }
}

/// 相互引用的服务
struct Peer {
    other: Inject<Peer>,
    other_id: &'static str,
}

impl Service for Peer {
    fn injection_points(&self) -> Vec<InjectionPoint<'_>> {
        vec![InjectionPoint::new("other", self.other_id, &self.other)]
    }
}

fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

#[tokio::test]
async fn test_seed_base_cool_chain() -> anyhow::Result<()> {
    let registry = ServiceRegistry::new();
    registry.register_service(
        "cool",
        Arc::new(CoolStruct {
            name: "a cool struct".to_string(),
            base: Inject::new(),
        }),
    )?;
    registry.register_service("seed", Arc::new(Seed { name: "x".to_string() }))?;
    registry.register_service(
        "base",
        Arc::new(BaseStruct {
            id: "base deps".to_string(),
            seed: Inject::new(),
        }),
    )?;

    registry.ready().await?;

    let cool = registry.get::<CoolStruct>("cool").unwrap();
    let base = registry.get::<BaseStruct>("base").unwrap();
    assert_eq!(cool.name, "a cool struct");
    assert_eq!(cool.base.get().unwrap().id, "base deps");
    assert_eq!(cool.base.get().unwrap().seed.get().unwrap().name, "x");
    assert!(Arc::ptr_eq(cool.base.get().unwrap(), &base));
    Ok(())
}

#[tokio::test]
async fn test_lookup_returns_registered_instance() -> anyhow::Result<()> {
    let registry = ServiceRegistry::new();
    let seed = Arc::new(Seed { name: "x".to_string() });
    registry.register_service("seed", seed.clone())?;

    let found = registry.get_service("seed").unwrap();
    assert!(Arc::ptr_eq(&found.downcast::<Seed>().unwrap(), &seed));

    registry.ready().await?;
    assert!(Arc::ptr_eq(&registry.get::<Seed>("seed").unwrap(), &seed));
    assert!(registry.get_service("unknown").is_none());
    Ok(())
}

#[tokio::test]
async fn test_missing_seed_fails_before_start() -> anyhow::Result<()> {
    let registry = ServiceRegistry::new();
    let events = journal();
    let base = Arc::new(BaseStruct {
        id: "base deps".to_string(),
        seed: Inject::new(),
    });
    registry.register_service("tracked", Arc::new(Tracked::new("tracked", &events)))?;
    registry.register_service("base", base.clone())?;

    let err = registry.ready().await.unwrap_err();

    match &err {
        ContainerError::Resolution { errors } => {
            assert_eq!(errors, &vec![DependencyError::missing("base", "seed_ref", "seed")]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(events.lock().is_empty());
    assert!(!base.seed.is_injected());
    assert_eq!(registry.state(), LifecycleState::Idle);
    Ok(())
}

#[tokio::test]
async fn test_start_and_stop_follow_registration_order() -> anyhow::Result<()> {
    let registry = ServiceRegistry::new();
    let events = journal();
    for name in ["a", "b", "c"] {
        registry.register_service(name, Arc::new(Tracked::new(name, &events)))?;
    }

    registry.ready().await?;
    registry.shutdown().await?;

    assert_eq!(
        *events.lock(),
        vec!["start:a", "start:b", "start:c", "stop:a", "stop:b", "stop:c"]
    );
    Ok(())
}

#[tokio::test]
async fn test_reverse_shutdown_order() -> anyhow::Result<()> {
    let registry = ServiceRegistry::with_config(ContainerConfig::new().with_shutdown_order(ShutdownOrder::Reverse));
    let events = journal();
    for name in ["a", "b", "c"] {
        registry.register_service(name, Arc::new(Tracked::new(name, &events)))?;
    }

    registry.ready().await?;
    registry.shutdown().await?;

    assert_eq!(
        *events.lock(),
        vec!["start:a", "start:b", "start:c", "stop:c", "stop:b", "stop:a"]
    );
    Ok(())
}

#[tokio::test]
async fn test_shutdown_is_idempotent() -> anyhow::Result<()> {
    let registry = ServiceRegistry::new();
    let events = journal();
    registry.register_service("a", Arc::new(Tracked::new("a", &events)))?;
    registry.ready().await?;

    registry.shutdown().await?;
    registry.shutdown().await?;
    registry.clone().shutdown().await?;

    let stops = events.lock().iter().filter(|e| e.starts_with("stop:")).count();
    assert_eq!(stops, 1);
    assert_eq!(registry.state(), LifecycleState::Stopped);
    Ok(())
}

#[tokio::test]
async fn test_start_failure_does_not_block_other_services() -> anyhow::Result<()> {
    let registry = ServiceRegistry::new();
    let events = journal();
    registry.register_service("a", Arc::new(Tracked::new("a", &events)))?;
    registry.register_service(
        "b",
        Arc::new(Tracked {
            fail_start: true,
            ..Tracked::new("b", &events)
        }),
    )?;
    registry.register_service("c", Arc::new(Tracked::new("c", &events)))?;

    let err = registry.ready().await.unwrap_err();

    let failures = err.lifecycle_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].service_id, "b");
    assert_eq!(failures[0].phase, LifecyclePhase::Start);
    assert_eq!(*events.lock(), vec!["start:a", "start:b", "start:c"]);
    assert_eq!(registry.state(), LifecycleState::Running);
    Ok(())
}

#[tokio::test]
async fn test_stop_failure_is_reported_after_full_pass() -> anyhow::Result<()> {
    let registry = ServiceRegistry::new();
    let events = journal();
    registry.register_service(
        "a",
        Arc::new(Tracked {
            fail_stop: true,
            ..Tracked::new("a", &events)
        }),
    )?;
    registry.register_service("b", Arc::new(Tracked::new("b", &events)))?;
    registry.ready().await?;

    let err = registry.shutdown().await.unwrap_err();

    assert!(matches!(err, ContainerError::ServiceStop { ref failures } if failures.len() == 1));
    assert!(events.lock().contains(&"stop:b".to_string()));
    assert_eq!(registry.state(), LifecycleState::Stopped);
    Ok(())
}

#[tokio::test]
async fn test_mutual_references_are_resolved() -> anyhow::Result<()> {
    let registry = ServiceRegistry::new();
    let ping = Arc::new(Peer {
        other: Inject::new(),
        other_id: "pong",
    });
    let pong = Arc::new(Peer {
        other: Inject::new(),
        other_id: "ping",
    });
    registry.register_service("ping", ping.clone())?;
    registry.register_service("pong", pong.clone())?;

    let cycles = registry.dependency_graph().find_cycles();
    assert_eq!(cycles.len(), 1);

    registry.ready().await?;

    assert!(Arc::ptr_eq(ping.other.get().unwrap(), &pong));
    assert!(Arc::ptr_eq(pong.other.get().unwrap(), &ping));
    Ok(())
}

#[tokio::test]
async fn test_register_services_keeps_iteration_order() -> anyhow::Result<()> {
    let registry = ServiceRegistry::new();
    let events = journal();

    registry.register_services(vec![
        ("z", ServiceHandle::new(Arc::new(Tracked::new("z", &events)))),
        ("seed", ServiceHandle::new(Arc::new(Seed { name: "x".to_string() }))),
        ("m", ServiceHandle::new(Arc::new(Tracked::new("m", &events)))),
    ])?;

    assert_eq!(registry.service_ids(), vec!["z", "seed", "m"]);
    registry.ready().await?;
    assert_eq!(*events.lock(), vec!["start:z", "start:m"]);
    Ok(())
}

#[tokio::test]
async fn test_fail_fast_reports_first_error_only() -> anyhow::Result<()> {
    let config = ContainerConfig::new().with_resolve_options(ResolveOptions::default().fail_fast(true));
    let registry = ServiceRegistry::with_config(config);
    registry.register_service(
        "cool",
        Arc::new(CoolStruct {
            name: "cool".to_string(),
            base: Inject::new(),
        }),
    )?;
    registry.register_service(
        "base",
        Arc::new(BaseStruct {
            id: "base".to_string(),
            seed: Inject::new(),
        }),
    )?;

    let err = registry.ready().await.unwrap_err();
    assert_eq!(err.dependency_errors().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_registration_after_ready_is_rejected() -> anyhow::Result<()> {
    let registry = ServiceRegistry::new();
    registry.register_service("seed", Arc::new(Seed { name: "x".to_string() }))?;
    registry.ready().await?;

    let err = registry
        .register_service("late", Arc::new(Seed { name: "y".to_string() }))
        .unwrap_err();

    assert!(matches!(err, ContainerError::Sealed { ref id } if id == "late"));
    assert!(!registry.contains("late"));
    Ok(())
}
