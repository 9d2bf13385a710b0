//! 优雅关闭抽象
//!
//! 进程级副作用（信号订阅、进程退出）都隔离在这里，便于在测试中替换。

use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// 进程终止器
///
/// 宽限期结束后由容器调用。
pub trait ProcessTerminator: Send + Sync {
    /// 结束进程
    fn terminate(&self, exit_code: i32);
}

/// 默认进程终止器，直接退出当前进程
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl ProcessTerminator for ProcessExit {
    fn terminate(&self, exit_code: i32) {
        std::process::exit(exit_code);
    }
}

/// 关闭信号源
pub enum SignalSource {
    /// Ctrl+C / SIGINT
    Interrupt,
    /// SIGINT，或在 unix 平台上的 SIGTERM
    InterruptOrTerminate,
    /// 自定义信号，future 完成即视为收到信号
    Custom(BoxFuture<'static, ()>),
}

impl SignalSource {
    /// 使用自定义 future 作为信号源
    pub fn custom<F>(signal: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::Custom(Box::pin(signal))
    }
}

impl Default for SignalSource {
    fn default() -> Self {
        Self::InterruptOrTerminate
    }
}

impl fmt::Debug for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("Interrupt"),
            Self::InterruptOrTerminate => f.write_str("InterruptOrTerminate"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// 优雅关闭配置
pub struct GracefulShutdown {
    /// 停止遍历完成后到进程退出之间的等待时间
    pub grace_period: Duration,
    /// 关闭信号源
    pub signal: SignalSource,
    /// 进程终止器
    pub terminator: Arc<dyn ProcessTerminator>,
    /// 进程退出码
    pub exit_code: i32,
}

impl GracefulShutdown {
    /// 使用默认信号源和默认进程终止器
    pub fn new(grace_period: Duration) -> Self {
        Self {
            grace_period,
            signal: SignalSource::default(),
            terminator: Arc::new(ProcessExit),
            exit_code: 0,
        }
    }

    /// 设置信号源
    pub fn with_signal(mut self, signal: SignalSource) -> Self {
        self.signal = signal;
        self
    }

    /// 设置进程终止器
    pub fn with_terminator(mut self, terminator: Arc<dyn ProcessTerminator>) -> Self {
        self.terminator = terminator;
        self
    }

    /// 设置进程退出码
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }
}

impl fmt::Debug for GracefulShutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GracefulShutdown")
            .field("grace_period", &self.grace_period)
            .field("signal", &self.signal)
            .field("exit_code", &self.exit_code)
            .finish_non_exhaustive()
    }
}
