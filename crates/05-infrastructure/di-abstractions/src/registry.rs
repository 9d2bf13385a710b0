//! 服务描述符与依赖图

use infrastructure_common::DependencyRequirement;
use serde::Serialize;
use std::collections::HashSet;

/// 服务描述符
///
/// 已注册服务的只读快照，用于诊断输出。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    /// 服务标识
    pub id: String,
    /// 注册顺序（从 0 开始）
    pub order: usize,
    /// 服务具体类型名称
    pub type_name: String,
    /// 声明的依赖
    pub dependencies: Vec<String>,
    /// 是否实现生命周期能力
    pub lifecycle: bool,
    /// 是否实现感知容器能力
    pub container_aware: bool,
}

/// 依赖图节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyGraphNode {
    /// 服务标识
    pub id: String,
    /// 依赖的服务标识列表
    pub dependencies: Vec<String>,
}

/// 依赖图
///
/// 节点按注册顺序排列。相互引用在这里是合法的，环只作为诊断信息报告。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    nodes: Vec<DependencyGraphNode>,
}

impl DependencyGraph {
    /// 创建空的依赖图
    pub fn new() -> Self {
        Self::default()
    }

    /// 从依赖需求构建依赖图
    pub fn from_requirements<'a, 'r, I, R>(order: I, requirements: R) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        R: IntoIterator<Item = &'r DependencyRequirement>,
    {
        let mut graph = Self::new();
        for id in order {
            graph.add_node(id, Vec::new());
        }
        for requirement in requirements {
            graph.add_edge(&requirement.service_id, &requirement.target);
        }
        graph
    }

    /// 添加节点
    pub fn add_node(&mut self, id: impl Into<String>, dependencies: Vec<String>) {
        let id = id.into();
        match self.nodes.iter_mut().find(|node| node.id == id) {
            Some(node) => node.dependencies.extend(dependencies),
            None => self.nodes.push(DependencyGraphNode { id, dependencies }),
        }
    }

    /// 添加依赖边，源节点不存在时自动创建
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.add_node(from, vec![to.to_string()]);
    }

    /// 查找节点
    pub fn node(&self, id: &str) -> Option<&DependencyGraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// 所有节点
    pub fn nodes(&self) -> &[DependencyGraphNode] {
        &self.nodes
    }

    /// 依赖指定服务的服务标识
    pub fn dependents_of(&self, id: &str) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.dependencies.iter().any(|dep| dep == id))
            .map(|node| node.id.as_str())
            .collect()
    }

    /// 指向未注册节点的依赖边 `(声明方, 目标)`
    pub fn missing_targets(&self) -> Vec<(&str, &str)> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.dependencies
                    .iter()
                    .filter(|dep| self.node(dep).is_none())
                    .map(move |dep| (node.id.as_str(), dep.as_str()))
            })
            .collect()
    }

    /// 查找所有依赖环
    ///
    /// 每个环以起点结尾，例如 `["a", "b", "a"]`。
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut visited = HashSet::new();
        let mut path = Vec::new();

        for node in &self.nodes {
            if !visited.contains(node.id.as_str()) {
                self.visit(&node.id, &mut visited, &mut path, &mut cycles);
            }
        }

        cycles
    }

    fn visit<'a>(
        &'a self,
        id: &'a str,
        visited: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        if let Some(start) = path.iter().position(|current| *current == id) {
            let mut cycle: Vec<String> = path[start..].iter().map(|s| (*s).to_string()).collect();
            cycle.push(id.to_string());
            cycles.push(cycle);
            return;
        }

        if visited.contains(id) {
            return;
        }

        let Some(node) = self.node(id) else {
            return;
        };

        path.push(id);
        for dep in &node.dependencies {
            self.visit(dep, visited, path, cycles);
        }
        path.pop();
        visited.insert(id);
    }
}
