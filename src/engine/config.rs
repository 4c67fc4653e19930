//! ### English
//! Bridge configuration.
//!
//! ### 中文
//! bridge 配置。

use std::time::Duration;

use super::flags;

/// ### English
/// Default worker thread name.
///
/// ### 中文
/// worker 线程的默认名称。
pub const DEFAULT_THREAD_NAME: &str = "activity-bridge";

/// ### English
/// Default time the constructor waits for the worker to report readiness.
///
/// ### 中文
/// 构造函数等待 worker 报告就绪的默认时长。
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(30);

/// ### English
/// Construction parameters for an activity bridge.
///
/// ### 中文
/// activity bridge 的构造参数。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    /// ### English
    /// Name given to the worker thread.
    ///
    /// ### 中文
    /// worker 线程名称。
    pub thread_name: String,
    /// ### English
    /// Initial poll policy: `true` polls without blocking so idle ticks run continuously,
    /// `false` sleeps until an event arrives.
    ///
    /// ### 中文
    /// 初始轮询策略：`true` 表示非阻塞轮询，idle tick 持续运行；`false` 表示休眠直到有事件到达。
    pub animating: bool,
    /// ### English
    /// How long construction waits for the worker to become ready.
    ///
    /// ### 中文
    /// 构造时等待 worker 就绪的最长时间。
    pub init_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            animating: true,
            init_timeout: DEFAULT_INIT_TIMEOUT,
        }
    }
}

impl BridgeConfig {
    /// Sets the worker thread name.
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Sets the initial poll policy.
    #[must_use]
    pub fn with_animating(mut self, animating: bool) -> Self {
        self.animating = animating;
        self
    }

    /// Sets the readiness timeout.
    #[must_use]
    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }

    /// ### English
    /// Builds a configuration from C ABI creation flags (`ACTIVITY_BRIDGE_CREATE_FLAG_*`).
    /// Unknown bits are ignored.
    ///
    /// ### 中文
    /// 从 C ABI 创建标志（`ACTIVITY_BRIDGE_CREATE_FLAG_*`）构建配置。未知位会被忽略。
    pub fn from_create_flags(create_flags: u32) -> Self {
        let start_idle = (create_flags & flags::ACTIVITY_BRIDGE_CREATE_FLAG_START_IDLE) != 0;
        Self::default().with_animating(!start_idle)
    }
}
