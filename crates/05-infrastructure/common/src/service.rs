//! 服务基础接口定义
//!
//! 所有注册到容器的对象都必须实现 [`Service`]。该 trait 以静态声明的方式描述
//! 服务的注入点以及它支持的可选能力，容器据此完成依赖填充和生命周期调用。

use crate::inject::{InjectSlot, ServiceRef};
use crate::lifecycle::{ContainerAware, Lifecycle};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 注入点
///
/// 描述服务结构体中的一个依赖字段：字段名、目标服务标识以及字段本身。
#[derive(Clone, Copy)]
pub struct InjectionPoint<'a> {
    /// 字段名，用于错误信息和日志
    pub field: &'a str,
    /// 要注入的服务标识
    pub service_id: &'a str,
    /// 字段本身
    pub slot: &'a dyn InjectSlot,
}

impl<'a> InjectionPoint<'a> {
    /// 创建新的注入点
    pub fn new(field: &'a str, service_id: &'a str, slot: &'a dyn InjectSlot) -> Self {
        Self {
            field,
            service_id,
            slot,
        }
    }
}

impl fmt::Debug for InjectionPoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionPoint")
            .field("field", &self.field)
            .field("service_id", &self.service_id)
            .field("target_type", &self.slot.target_type())
            .field("filled", &self.slot.is_filled())
            .finish()
    }
}

/// 服务 trait
///
/// 未声明依赖、也不参与生命周期的服务只需一个空实现：
///
/// ```rust
/// use infrastructure_common::Service;
///
/// struct Seed {
///     name: String,
/// }
///
/// impl Service for Seed {}
/// ```
///
/// 需要注入的服务通常使用 `service-macros` 的 `#[derive(Service)]` 生成实现。
pub trait Service: Any + Send + Sync {
    /// 服务的注入点列表
    fn injection_points(&self) -> Vec<InjectionPoint<'_>> {
        Vec::new()
    }

    /// 生命周期能力
    fn as_lifecycle(&self) -> Option<&dyn Lifecycle> {
        None
    }

    /// 感知容器能力
    fn as_container_aware(&self) -> Option<&dyn ContainerAware> {
        None
    }
}

/// 依赖需求
///
/// 注册时从注入点复制出的拥有所有权的记录，用于构建依赖图。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyRequirement {
    /// 声明依赖的服务标识
    pub service_id: String,
    /// 字段名
    pub field: String,
    /// 被依赖的服务标识
    pub target: String,
}

/// 服务句柄
///
/// 同一个 `Arc` 的两种擦除视图：用于向下转型的 `dyn Any` 和用于能力查询的
/// `dyn Service`。克隆句柄不会复制服务本身。
#[derive(Clone)]
pub struct ServiceHandle {
    instance: ServiceRef,
    service: Arc<dyn Service>,
    type_name: &'static str,
}

impl ServiceHandle {
    /// 从具体服务创建句柄
    pub fn new<T: Service>(service: Arc<T>) -> Self {
        let instance: ServiceRef = service.clone();
        Self {
            instance,
            service,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// 类型擦除的服务实例
    pub fn instance(&self) -> &ServiceRef {
        &self.instance
    }

    /// 服务能力视图
    pub fn service(&self) -> &Arc<dyn Service> {
        &self.service
    }

    /// 服务的具体类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 转换为具体类型
    pub fn downcast<T>(&self) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.instance.clone().downcast::<T>().ok()
    }

    /// 两个句柄是否指向同一个服务实例
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.instance, &other.instance)
    }

    /// 按注入点生成依赖需求
    pub fn requirements(&self, service_id: &str) -> Vec<DependencyRequirement> {
        self.service
            .injection_points()
            .into_iter()
            .map(|point| DependencyRequirement {
                service_id: service_id.to_string(),
                field: point.field.to_string(),
                target: point.service_id.to_string(),
            })
            .collect()
    }

    /// 是否实现了生命周期能力
    pub fn has_lifecycle(&self) -> bool {
        self.service.as_lifecycle().is_some()
    }

    /// 是否实现了感知容器能力
    pub fn is_container_aware(&self) -> bool {
        self.service.as_container_aware().is_some()
    }
}

impl<T: Service> From<Arc<T>> for ServiceHandle {
    fn from(service: Arc<T>) -> Self {
        Self::new(service)
    }
}

impl fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("type_name", &self.type_name)
            .field("lifecycle", &self.has_lifecycle())
            .field("container_aware", &self.is_container_aware())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inject::Inject;

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

    #[test]
    fn test_handle_shares_instance() {
        let seed = Arc::new(Seed);
        let handle = ServiceHandle::new(seed.clone());

        let restored = handle.downcast::<Seed>().unwrap();
        assert!(Arc::ptr_eq(&restored, &seed));
        assert!(handle.ptr_eq(&handle.clone()));
        assert!(handle.downcast::<Base>().is_none());
        assert!(handle.type_name().ends_with("Seed"));
    }

    #[test]
    fn test_requirements_follow_injection_points() {
        let handle = ServiceHandle::from(Arc::new(Base {
            seed: Inject::new(),
        }));

        let requirements = handle.requirements("base");
        assert_eq!(
            requirements,
            vec![DependencyRequirement {
                service_id: "base".to_string(),
                field: "seed".to_string(),
                target: "seed".to_string(),
            }]
        );
        assert!(!handle.has_lifecycle());
        assert!(!handle.is_container_aware());
    }
}
