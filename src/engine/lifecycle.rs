//! ### English
//! Lifecycle control (`running` / `animating` / termination) and the `Activity` context
//! handle handed to every application callback.
//!
//! ### 中文
//! 生命周期控制（`running` / `animating` / 终止），以及传给每个应用回调的 `Activity` 上下文句柄。

use std::fmt;
use std::sync::Arc;

use super::platform::Platform;
use super::state::{Shared, WorkerPhase};

impl<P: Platform> Shared<P> {
    /// ### English
    /// Clears `running`, releases handshake waiters and wakes the worker.
    /// Returns `true` if this call performed the transition.
    ///
    /// ### 中文
    /// 清除 `running`，释放握手等待方并唤醒 worker。若本次调用完成了状态切换则返回 `true`。
    pub(crate) fn stop(&self) -> bool {
        let was_running = {
            let mut state = self.state.lock();
            let was_running = std::mem::replace(&mut state.running, false);
            self.applied.notify_all();
            was_running
        };
        self.wake();
        was_running
    }

    /// ### English
    /// Stops the bridge and asks the host to finish the activity.
    /// Idempotent: the host is only asked once.
    ///
    /// ### 中文
    /// 停止 bridge 并请求宿主结束 activity。幂等：只会请求宿主一次。
    pub(crate) fn quit(&self) {
        if self.stop() {
            tracing::info!("activity quitting");
            self.platform.finish();
        }
    }

    pub(crate) fn set_animating(&self, animating: bool) {
        let changed = {
            let mut state = self.state.lock();
            std::mem::replace(&mut state.animating, animating) != animating
        };
        if changed {
            tracing::debug!(animating, "poll policy changed");
            self.wake();
        }
    }

    /// ### English
    /// Poll policy for the next multiplexer wait: `None` once stopped, otherwise whether the
    /// wait may block.
    ///
    /// ### 中文
    /// 下一次多路复用等待的轮询策略：已停止时返回 `None`，否则返回本次等待是否可以阻塞。
    pub(crate) fn poll_policy(&self) -> Option<bool> {
        let state = self.state.lock();
        state.running.then_some(!state.animating)
    }

    /// Whether an idle tick should run now.
    pub(crate) fn should_idle(&self) -> bool {
        let state = self.state.lock();
        state.running && state.surface_ready
    }
}

/// ### English
/// Context handle for one bridge instance.
///
/// Passed explicitly to every [`ActivityHandler`](super::ActivityHandler) callback and
/// available to the host through the bridge. Cheap to clone; usable from either thread.
///
/// ### 中文
/// 单个 bridge 实例的上下文句柄。
///
/// 显式传给每个 [`ActivityHandler`](super::ActivityHandler) 回调，宿主也可通过 bridge 获取。
/// clone 开销很小；可在任一线程使用。
pub struct Activity<P: Platform> {
    shared: Arc<Shared<P>>,
}

impl<P: Platform> Clone for Activity<P> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<P: Platform> fmt::Debug for Activity<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("Activity")
            .field("running", &state.running)
            .field("animating", &state.animating)
            .field("surface_ready", &state.surface_ready)
            .field("phase", &state.phase)
            .finish()
    }
}

impl<P: Platform> Activity<P> {
    pub(crate) fn from_shared(shared: Arc<Shared<P>>) -> Self {
        Self { shared }
    }

    pub(crate) fn shared(&self) -> &Shared<P> {
        &self.shared
    }

    /// ### English
    /// Stops the worker loop and requests host-level termination. Idempotent.
    ///
    /// ### 中文
    /// 停止 worker 循环并请求宿主结束 activity。幂等。
    pub fn quit(&self) {
        self.shared.quit();
    }

    /// ### English
    /// `true`: poll without blocking so idle ticks run continuously.
    /// `false`: sleep until a command or input event arrives.
    ///
    /// ### 中文
    /// `true`：非阻塞轮询，idle tick 持续运行。
    /// `false`：休眠直到有命令或输入事件到达。
    pub fn set_animating(&self, animating: bool) {
        self.shared.set_animating(animating);
    }

    pub fn is_animating(&self) -> bool {
        self.shared.state.lock().animating
    }

    pub fn is_running(&self) -> bool {
        self.shared.state.lock().running
    }

    /// ### English
    /// Whether the current surface has been initialised and idle ticks are running.
    ///
    /// ### 中文
    /// 当前 surface 是否已初始化且 idle tick 正在运行。
    pub fn is_surface_ready(&self) -> bool {
        self.shared.state.lock().surface_ready
    }

    /// ### English
    /// Authoritative surface, or `None` when there is none.
    ///
    /// ### 中文
    /// 权威 surface；不存在时为 `None`。
    pub fn current_surface(&self) -> Option<P::Surface> {
        self.shared.state.lock().surface.current().cloned()
    }

    pub fn current_input_queue(&self) -> Option<P::InputQueue> {
        self.shared.state.lock().input_queue.current().cloned()
    }

    pub fn phase(&self) -> WorkerPhase {
        self.shared.state.lock().phase
    }

    /// Host activity handle.
    pub fn platform(&self) -> &P {
        &self.shared.platform
    }
}
