//! 错误类型定义

use std::fmt;
use thiserror::Error;

/// 服务实现返回的错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 依赖解析错误类型
///
/// 在容器就绪（依赖解析）阶段产生，任何一项都会阻止服务启动。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    /// 注入点指向的标识没有注册任何服务
    #[error("依赖未注册: 服务 {service} 的字段 {field} 需要 {service_id}")]
    MissingDependency {
        /// 声明依赖的服务标识
        service: String,
        /// 字段名
        field: String,
        /// 缺失的服务标识
        service_id: String,
    },

    /// 已注册服务的类型与字段声明的类型不一致
    #[error(
        "依赖类型不匹配: 服务 {service} 的字段 {field} 期望 {expected}, 但 {service_id} 的类型为 {actual}"
    )]
    TypeMismatch {
        /// 声明依赖的服务标识
        service: String,
        /// 字段名
        field: String,
        /// 被依赖的服务标识
        service_id: String,
        /// 字段期望的类型
        expected: &'static str,
        /// 已注册服务的实际类型
        actual: &'static str,
    },

    /// 字段在解析前已经有值
    #[error("字段已被注入: 服务 {service} 的字段 {field}")]
    AlreadyInjected {
        /// 声明依赖的服务标识
        service: String,
        /// 字段名
        field: String,
    },
}

impl DependencyError {
    /// 创建依赖未注册错误
    pub fn missing(
        service: impl Into<String>,
        field: impl Into<String>,
        service_id: impl Into<String>,
    ) -> Self {
        Self::MissingDependency {
            service: service.into(),
            field: field.into(),
            service_id: service_id.into(),
        }
    }

    /// 出错注入点所属的服务标识
    pub fn service(&self) -> &str {
        match self {
            Self::MissingDependency { service, .. }
            | Self::TypeMismatch { service, .. }
            | Self::AlreadyInjected { service, .. } => service,
        }
    }

    /// 出错的字段名
    pub fn field(&self) -> &str {
        match self {
            Self::MissingDependency { field, .. }
            | Self::TypeMismatch { field, .. }
            | Self::AlreadyInjected { field, .. } => field,
        }
    }

    /// 注入点指向的目标服务标识
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::MissingDependency { service_id, .. } | Self::TypeMismatch { service_id, .. } => {
                Some(service_id)
            }
            Self::AlreadyInjected { .. } => None,
        }
    }
}

/// 生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// 启动
    Start,
    /// 停止
    Stop,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("启动"),
            Self::Stop => f.write_str("停止"),
        }
    }
}

/// 单个服务的生命周期失败
///
/// 在启动或停止遍历中收集，遍历结束后统一上报，不会中断遍历。
#[derive(Error, Debug)]
#[error("服务 {service_id} {phase}失败: {source}")]
pub struct LifecycleFailure {
    /// 失败的服务标识
    pub service_id: String,
    /// 失败发生的阶段
    pub phase: LifecyclePhase,
    /// 服务返回的错误
    #[source]
    pub source: BoxError,
}

impl LifecycleFailure {
    /// 创建新的生命周期失败记录
    pub fn new(service_id: impl Into<String>, phase: LifecyclePhase, source: BoxError) -> Self {
        Self {
            service_id: service_id.into(),
            phase,
            source,
        }
    }
}

/// 服务容器错误类型
#[derive(Error, Debug)]
pub enum ContainerError {
    /// 注册时使用了空标识
    #[error("服务标识不能为空")]
    EmptyIdentifier,

    /// 严格模式下重复注册同一标识
    #[error("服务标识重复: {id}")]
    DuplicateIdentifier {
        /// 重复的标识
        id: String,
    },

    /// 注册表就绪后再注册服务
    #[error("容器已封闭，无法注册服务: {id}")]
    Sealed {
        /// 被拒绝的标识
        id: String,
    },

    /// 重复调用 `ready`
    #[error("容器已就绪，依赖解析只能执行一次")]
    AlreadyReady,

    /// 依赖解析失败，没有任何服务被启动
    #[error("依赖解析失败 ({} 项): {}", .errors.len(), join_messages(.errors))]
    Resolution {
        /// 收集到的解析错误
        errors: Vec<DependencyError>,
    },

    /// 启动遍历中有服务失败
    #[error("{} 个服务启动失败: {}", .failures.len(), join_messages(.failures))]
    ServiceStart {
        /// 按启动顺序排列的失败
        failures: Vec<LifecycleFailure>,
    },

    /// 停止遍历中有服务失败
    #[error("{} 个服务停止失败: {}", .failures.len(), join_messages(.failures))]
    ServiceStop {
        /// 按停止顺序排列的失败
        failures: Vec<LifecycleFailure>,
    },

    /// 优雅关闭模式需要 tokio 运行时
    #[error("当前线程没有可用的 tokio 运行时，无法安装关闭信号监听")]
    NoRuntime,

}

impl ContainerError {
    /// 依赖解析阶段收集到的错误，其他错误返回空切片
    pub fn dependency_errors(&self) -> &[DependencyError] {
        match self {
            Self::Resolution { errors } => errors,
            _ => &[],
        }
    }

    /// 生命周期遍历中收集到的失败，其他错误返回空切片
    pub fn lifecycle_failures(&self) -> &[LifecycleFailure] {
        match self {
            Self::ServiceStart { failures } | Self::ServiceStop { failures } => failures,
            _ => &[],
        }
    }
}

fn join_messages<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// 结果类型别名
pub type ContainerResult<T> = Result<T, ContainerError>;
