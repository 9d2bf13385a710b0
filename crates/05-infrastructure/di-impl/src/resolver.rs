//! 默认依赖解析器
//!
//! 两阶段执行：先校验所有注入点并收集错误，全部通过后再统一填充。
//! 因此解析失败时任何字段都不会被修改，容器可以补充注册后重新就绪。
//! 同一个实例以多个标识注册时，它的注入点只校验和填充一次。

use di_abstractions::{DependencyGraph, DependencyResolver, ResolveContext, ResolveSummary};
use infrastructure_common::{DependencyError, InjectionPoint, ServiceHandle, SlotError};
use tracing::debug;

/// 默认依赖解析器
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDependencyResolver;

impl DefaultDependencyResolver {
    /// 创建新的解析器
    pub fn new() -> Self {
        Self
    }

    fn check<'a>(
        context: &ResolveContext<'a>,
        owner: &str,
        point: &InjectionPoint<'_>,
    ) -> Result<&'a ServiceHandle, DependencyError> {
        let target = context
            .get(point.service_id)
            .ok_or_else(|| DependencyError::missing(owner, point.field, point.service_id))?;

        if point.slot.is_filled() {
            return Err(DependencyError::AlreadyInjected {
                service: owner.to_string(),
                field: point.field.to_string(),
            });
        }

        if !point.slot.accepts(target.instance()) {
            return Err(DependencyError::TypeMismatch {
                service: owner.to_string(),
                field: point.field.to_string(),
                service_id: point.service_id.to_string(),
                expected: point.slot.target_type(),
                actual: target.type_name(),
            });
        }

        Ok(target)
    }
}

impl DependencyResolver for DefaultDependencyResolver {
    fn resolve(&self, context: &ResolveContext<'_>) -> Result<ResolveSummary, Vec<DependencyError>> {
        let fail_fast = context.options().fail_fast;
        let mut graph = DependencyGraph::new();
        let mut errors = Vec::new();
        let mut plan = Vec::new();
        let mut planned: Vec<&ServiceHandle> = Vec::new();

        'services: for (owner, handle) in context.iter() {
            graph.add_node(owner, Vec::new());

            let points = handle.service().injection_points();
            for point in &points {
                graph.add_edge(owner, point.service_id);
            }

            if let Some(first) = planned.iter().find(|seen| seen.ptr_eq(handle)) {
                debug!(service_id = %owner, type_name = first.type_name(), "实例已按其他标识解析，跳过");
                continue;
            }
            planned.push(handle);

            for point in points {
                match Self::check(context, owner, &point) {
                    Ok(target) => plan.push((owner, point, target)),
                    Err(err) => {
                        errors.push(err);
                        if fail_fast {
                            break 'services;
                        }
                    }
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        for (owner, point, target) in &plan {
            point.slot.fill(target.instance().clone()).map_err(|err| {
                let err = match err {
                    SlotError::TypeMismatch => DependencyError::TypeMismatch {
                        service: (*owner).to_string(),
                        field: point.field.to_string(),
                        service_id: point.service_id.to_string(),
                        expected: point.slot.target_type(),
                        actual: target.type_name(),
                    },
                    SlotError::AlreadyFilled => DependencyError::AlreadyInjected {
                        service: (*owner).to_string(),
                        field: point.field.to_string(),
                    },
                };
                vec![err]
            })?;

            debug!(
                service_id = %owner,
                field = %point.field,
                target = %point.service_id,
                "注入依赖"
            );
        }

        let cycles = graph.find_cycles();
        for cycle in &cycles {
            debug!(cycle = %cycle.join(" -> "), "检测到服务相互引用");
        }

        Ok(ResolveSummary {
            injected: plan.len(),
            cycles,
        })
    }
}
