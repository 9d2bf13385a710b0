//! # 示例应用程序
//!
//! 演示如何注册相互依赖的服务、启动容器，并在收到 Ctrl+C / SIGTERM 后优雅关闭

use anyhow::Context;
use clap::Parser;
use di_abstractions::{GracefulShutdown, ServiceContainer};
use infrastructure_common::{BoxError, ContainerAware, Inject, Lifecycle, ServiceLocator};
use infrastructure_composition::{ContainerBuilder, ContainerSettings, LoggingConfig};
use parking_lot::Mutex;
use service_macros::Service;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn 服务容器示例应用")]
struct Args {
    /// 配置文件路径（TOML 或 JSON）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别，覆盖配置文件
    #[arg(long)]
    log_level: Option<String>,

    /// 优雅关闭宽限期（毫秒），覆盖配置文件
    #[arg(long)]
    grace_ms: Option<u64>,

    /// 心跳间隔（毫秒）
    #[arg(long, default_value_t = 1000)]
    heartbeat_ms: u64,
}

#[derive(Service)]
struct Seed {
    name: String,
}

#[derive(Service)]
struct Base {
    id: String,
    #[inject("seed")]
    seed_ref: Inject<Seed>,
}

#[derive(Service)]
struct Cool {
    name: String,
    #[inject(name = "base")]
    base_ref: Inject<Base>,
}

/// 周期性输出心跳的服务
#[derive(Service)]
#[service(start = "begin", stop = "end")]
struct Heartbeat {
    interval: Duration,
    #[inject("cool")]
    cool: Inject<Cool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Heartbeat {
    async fn begin(&self) -> Result<(), BoxError> {
        let cool = self.cool.cloned().ok_or("cool 服务未注入")?;
        let mut ticker = tokio::time::interval(self.interval);
        let handle = tokio::spawn(async move {
            loop {
                ticker.tick().await;
                if let Some(base) = cool.base_ref.get() {
                    info!(cool = %cool.name, base = %base.id, "心跳");
                }
            }
        });
        *self.task.lock() = Some(handle);
        Ok(())
    }

    async fn end(&self) -> Result<(), BoxError> {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
        Ok(())
    }
}

/// 启动时通过容器引用打印服务清单
#[derive(Service, Default)]
#[service(lifecycle, container_aware)]
struct Inspector {
    locator: Mutex<Option<Arc<dyn ServiceLocator>>>,
}

#[infrastructure_common::async_trait]
impl Lifecycle for Inspector {
    async fn start(&self) -> Result<(), BoxError> {
        let locator = self.locator.lock().clone().ok_or("容器引用未设置")?;
        let seed = locator.get::<Seed>("seed").ok_or("seed 服务不存在")?;
        info!(seed = %seed.name, heartbeat = locator.contains("heartbeat"), "服务清单检查完成");
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        info!("检查服务停止");
        Ok(())
    }
}

impl ContainerAware for Inspector {
    fn set_container(&self, container: Arc<dyn ServiceLocator>) {
        *self.locator.lock() = Some(container);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = ContainerSettings::load(args.config.as_deref()).context("加载容器配置失败")?;
    if let Some(level) = args.log_level {
        settings.logging.level = level;
    }
    let grace_period = args
        .grace_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| settings.graceful_shutdown.grace_period());
    let logging = LoggingConfig::from_settings(&settings.logging)?;

    let registry = ContainerBuilder::from_settings(settings)
        .with_logging(logging)
        .register("cool", Arc::new(Cool {
            name: "a cool struct".to_string(),
            base_ref: Inject::new(),
        }))
        .register("seed", Arc::new(Seed {
            name: "the seed".to_string(),
        }))
        .register("base", Arc::new(Base {
            id: "base deps".to_string(),
            seed_ref: Inject::new(),
        }))
        .register("heartbeat", Arc::new(Heartbeat {
            interval: Duration::from_millis(args.heartbeat_ms),
            cool: Inject::new(),
            task: Mutex::new(None),
        }))
        .register("inspector", Arc::new(Inspector::default()))
        .with_graceful_shutdown(GracefulShutdown::new(grace_period))
        .build()?;

    info!(
        descriptors = %serde_json::to_string(&registry.descriptors())?,
        "服务已注册"
    );

    registry.ready().await.context("服务容器启动失败")?;

    let cool = registry.get::<Cool>("cool").context("cool 服务不存在")?;
    if let Some(seed) = cool.base_ref.get().and_then(|base| base.seed_ref.get()) {
        info!(cool = %cool.name, seed = %seed.name, "依赖链已就绪");
    }

    info!(grace_period_ms = grace_period.as_millis() as u64, "按 Ctrl+C 退出");
    std::future::pending::<()>().await;
    Ok(())
}
