//! 依赖解析器抽象接口
//!
//! 提供把注入点填充为已注册服务的能力

use infrastructure_common::{DependencyError, ServiceHandle};
use std::collections::HashMap;

/// 依赖解析器 trait
///
/// 实现必须保证：返回错误时不修改任何注入槽；返回成功时每个注入点都指向
/// 对应标识下注册的同一个服务实例。
pub trait DependencyResolver: Send + Sync {
    /// 解析并填充所有注入点
    fn resolve(&self, context: &ResolveContext<'_>) -> Result<ResolveSummary, Vec<DependencyError>>;
}

/// 解析上下文
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    order: &'a [String],
    services: &'a HashMap<String, ServiceHandle>,
    options: &'a ResolveOptions,
}

impl<'a> ResolveContext<'a> {
    /// 创建新的解析上下文
    pub fn new(
        order: &'a [String],
        services: &'a HashMap<String, ServiceHandle>,
        options: &'a ResolveOptions,
    ) -> Self {
        Self {
            order,
            services,
            options,
        }
    }

    /// 按标识查找服务
    pub fn get(&self, id: &str) -> Option<&'a ServiceHandle> {
        self.services.get(id)
    }

    /// 按注册顺序遍历服务
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a ServiceHandle)> + 'a {
        let services = self.services;
        self.order
            .iter()
            .filter_map(move |id| services.get(id).map(|handle| (id.as_str(), handle)))
    }

    /// 解析选项
    pub fn options(&self) -> &'a ResolveOptions {
        self.options
    }
}

/// 解析选项
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// 遇到第一个错误即停止；默认收集全部错误
    pub fail_fast: bool,
}

impl ResolveOptions {
    /// 设置是否快速失败
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// 解析结果摘要
#[derive(Debug, Clone, Default)]
pub struct ResolveSummary {
    /// 填充的注入点数量
    pub injected: usize,
    /// 服务之间的相互引用环，仅用于诊断
    pub cycles: Vec<Vec<String>>,
}
