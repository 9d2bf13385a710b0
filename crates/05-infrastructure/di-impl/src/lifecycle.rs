//! 生命周期编排
//!
//! 启动和停止遍历都会完整执行，单个服务的失败只被记录并收集。

use infrastructure_common::{LifecycleFailure, LifecyclePhase, ServiceHandle, ServiceLocator};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// 按给定顺序启动服务
pub(crate) async fn start_all(
    services: &[(String, ServiceHandle)],
    locator: &Arc<dyn ServiceLocator>,
) -> Vec<LifecycleFailure> {
    info!(services = services.len(), "开始启动服务");
    let mut failures = Vec::new();

    for (id, handle) in services {
        let Some(lifecycle) = handle.service().as_lifecycle() else {
            debug!(service_id = %id, "服务未实现生命周期能力，跳过启动");
            continue;
        };

        if let Some(aware) = handle.service().as_container_aware() {
            aware.set_container(Arc::clone(locator));
        }

        let started = Instant::now();
        match lifecycle.start().await {
            Ok(()) => info!(
                service_id = %id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "服务启动完成"
            ),
            Err(source) => {
                error!(service_id = %id, error = %source, "服务启动失败");
                failures.push(LifecycleFailure::new(id.as_str(), LifecyclePhase::Start, source));
            }
        }
    }

    info!(failed = failures.len(), "服务启动遍历结束");
    failures
}

/// 按给定顺序停止服务
pub(crate) async fn stop_all(services: &[(String, ServiceHandle)]) -> Vec<LifecycleFailure> {
    info!(services = services.len(), "开始停止服务");
    let mut failures = Vec::new();

    for (id, handle) in services {
        let Some(lifecycle) = handle.service().as_lifecycle() else {
            continue;
        };

        let started = Instant::now();
        match lifecycle.stop().await {
            Ok(()) => info!(
                service_id = %id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "服务停止完成"
            ),
            Err(source) => {
                error!(service_id = %id, error = %source, "服务停止失败");
                failures.push(LifecycleFailure::new(id.as_str(), LifecyclePhase::Stop, source));
            }
        }
    }

    info!(failed = failures.len(), "服务停止遍历结束");
    failures
}
