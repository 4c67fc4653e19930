//! ### English
//! Error types reported by the bridge.
//!
//! ### 中文
//! bridge 对外报告的错误类型。

use std::io;
use std::time::Duration;

use thiserror::Error;

/// ### English
/// Errors that can occur while constructing or driving an activity bridge.
/// No error is retried; every failure is final for the bridge instance that produced it.
///
/// ### 中文
/// 构建或驱动 activity bridge 时可能出现的错误。
/// 不做任何重试；每个错误对产生它的 bridge 实例都是最终的。
#[derive(Error, Debug)]
pub enum BridgeError {
    /// ### English
    /// The worker thread could not be spawned.
    ///
    /// ### 中文
    /// 无法创建 worker 线程。
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),

    /// ### English
    /// The worker thread did not report readiness in time.
    ///
    /// ### 中文
    /// worker 线程未能在超时时间内报告就绪。
    #[error("worker thread did not become ready within {0:?}")]
    InitTimeout(Duration),

    /// ### English
    /// The worker thread exited before it reported readiness.
    ///
    /// ### 中文
    /// worker 线程在报告就绪前就已退出。
    #[error("worker thread exited during initialization")]
    WorkerExited,

    /// ### English
    /// The command channel is torn down; the bridge has been asked to quit.
    ///
    /// ### 中文
    /// 命令 channel 已被拆除；bridge 已被要求退出。
    #[error("command channel is closed")]
    ChannelClosed,

    /// ### English
    /// The bridge stopped running before the request was applied.
    ///
    /// ### 中文
    /// 请求被应用之前 bridge 已停止运行。
    #[error("bridge terminated before the request was applied")]
    Terminated,
}

impl BridgeError {
    /// ### English
    /// Whether this error happened while bringing the bridge up.
    ///
    /// ### 中文
    /// 该错误是否发生在 bridge 启动阶段。
    pub fn is_init_failure(&self) -> bool {
        matches!(
            self,
            Self::Spawn(_) | Self::InitTimeout(_) | Self::WorkerExited
        )
    }
}
