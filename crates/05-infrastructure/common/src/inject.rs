//! 依赖注入槽
//!
//! [`Inject<T>`] 是服务结构体中声明依赖的字段类型。容器在就绪阶段把目标服务的
//! `Arc` 克隆写入槽中，之后槽内容不再改变。

use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 类型擦除后的服务引用
pub type ServiceRef = Arc<dyn Any + Send + Sync>;

/// 注入槽填充错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotError {
    /// 目标服务类型与槽声明的类型不一致
    TypeMismatch,
    /// 槽已经被填充过
    AlreadyFilled,
}

/// 类型擦除的注入槽
///
/// 解析器只通过该 trait 操作字段，不需要知道字段的具体类型。
pub trait InjectSlot: Send + Sync {
    /// 槽期望的服务类型名称
    fn target_type(&self) -> &'static str;

    /// 检查给定服务能否写入该槽
    fn accepts(&self, service: &ServiceRef) -> bool;

    /// 槽是否已经被填充
    fn is_filled(&self) -> bool;

    /// 填充槽
    fn fill(&self, service: ServiceRef) -> Result<(), SlotError>;
}

/// 依赖注入字段
///
/// 槽持有目标服务的强引用。两个服务相互注入时会形成 `Arc` 环，注册表释放后
/// 它们也不会被回收，`Drop` 不会执行。需要在进程结束前释放资源的服务应在
/// `Lifecycle::stop` 中完成清理，而不是依赖 `Drop`。
///
/// ```rust
/// use infrastructure_common::Inject;
///
/// struct Seed {
///     name: String,
/// }
///
/// struct Base {
///     seed: Inject<Seed>,
/// }
///
/// let base = Base { seed: Inject::new() };
/// assert!(base.seed.get().is_none());
/// ```
pub struct Inject<T> {
    cell: OnceCell<Arc<T>>,
}

impl<T> Inject<T>
where
    T: Send + Sync + 'static,
{
    /// 创建空的注入槽
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// 获取已注入的服务，未注入时返回 `None`
    pub fn get(&self) -> Option<&Arc<T>> {
        self.cell.get()
    }

    /// 获取已注入服务的一份引用计数克隆
    pub fn cloned(&self) -> Option<Arc<T>> {
        self.cell.get().cloned()
    }

    /// 是否已注入
    pub fn is_injected(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for Inject<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Inject<T>
where
    T: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type", &std::any::type_name::<T>())
            .field("injected", &self.is_injected())
            .finish()
    }
}

impl<T> InjectSlot for Inject<T>
where
    T: Send + Sync + 'static,
{
    fn target_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn accepts(&self, service: &ServiceRef) -> bool {
        service.is::<T>()
    }

    fn is_filled(&self) -> bool {
        self.is_injected()
    }

    fn fill(&self, service: ServiceRef) -> Result<(), SlotError> {
        let typed = service
            .downcast::<T>()
            .map_err(|_| SlotError::TypeMismatch)?;
        self.cell.set(typed).map_err(|_| SlotError::AlreadyFilled)
    }
}
