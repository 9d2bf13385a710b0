//! 关闭信号等待

use di_abstractions::SignalSource;
use std::io;

/// 等待信号源触发一次
pub(crate) async fn wait_for(source: SignalSource) -> io::Result<()> {
    match source {
        SignalSource::Interrupt => tokio::signal::ctrl_c().await,
        SignalSource::InterruptOrTerminate => interrupt_or_terminate().await,
        SignalSource::Custom(signal) => {
            signal.await;
            Ok(())
        }
    }
}

#[cfg(unix)]
async fn interrupt_or_terminate() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn interrupt_or_terminate() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
