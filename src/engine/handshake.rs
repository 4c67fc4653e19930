//! ### English
//! Handshake coordination between the control thread and the worker thread.
//!
//! Two patterns are supported:
//! - fire-and-forget: write a command and return;
//! - blocking handshake: store a pending value, write a command, then wait on the condition
//!   variable until the worker reports the pending value as applied.
//!
//! A new request simply overwrites the pending value. A waiter whose request was overtaken
//! returns once whatever value is pending at that moment has been applied.
//!
//! ### 中文
//! 控制线程与 worker 线程之间的握手协调。
//!
//! 支持两种模式：
//! - fire-and-forget：写入命令后立即返回；
//! - 阻塞握手：保存 pending 值、写入命令，然后在条件变量上等待，直到 worker 报告该 pending 值已应用。
//!
//! 新请求会直接覆盖 pending 值。请求被覆盖的等待方会在“此刻的 pending 值”被应用后返回。

use std::fmt;

use super::channel::CommandSender;
use super::command::Command;
use super::error::BridgeError;
use super::platform::Platform;
use super::state::{Shared, SharedState};

/// ### English
/// Pending/applied pair for one handshake kind.
///
/// ### 中文
/// 单类握手的 pending/已应用 值对。
pub(crate) struct HandshakeSlot<T> {
    /// ### English
    /// Authoritative value, written only by the worker.
    ///
    /// ### 中文
    /// 权威值，仅由 worker 写入。
    current: Option<T>,
    /// ### English
    /// Requested value, written only by the control thread.
    ///
    /// ### 中文
    /// 请求值，仅由控制线程写入。
    pending: Option<T>,
    /// ### English
    /// Set between `apply` and `settle` while the worker still runs callbacks for the change.
    ///
    /// ### 中文
    /// 在 `apply` 与 `settle` 之间置位，表示 worker 仍在为本次变更执行回调。
    settling: bool,
}

impl<T: Clone + PartialEq> HandshakeSlot<T> {
    pub(crate) const fn new() -> Self {
        Self {
            current: None,
            pending: None,
            settling: false,
        }
    }

    pub(crate) fn request(&mut self, value: Option<T>) {
        self.pending = value;
    }

    /// ### English
    /// Publishes the pending value as current and returns the previous current value.
    ///
    /// ### 中文
    /// 将 pending 值发布为当前值，并返回之前的当前值。
    pub(crate) fn apply(&mut self) -> Option<T> {
        self.begin();
        let next = self.pending.clone();
        std::mem::replace(&mut self.current, next)
    }

    pub(crate) fn begin(&mut self) {
        self.settling = true;
    }

    pub(crate) fn settle(&mut self) {
        self.settling = false;
    }

    pub(crate) fn is_applied(&self) -> bool {
        !self.settling && self.current == self.pending
    }

    pub(crate) fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// ### English
    /// Drops both values (teardown) and returns the current one.
    ///
    /// ### 中文
    /// 清空两个值（拆除阶段），并返回当前值。
    pub(crate) fn clear(&mut self) -> Option<T> {
        self.pending = None;
        self.settling = false;
        self.current.take()
    }
}

/// ### English
/// Accessor for one slot inside [`SharedState`].
///
/// ### 中文
/// 访问 [`SharedState`] 中某个槽位的函数。
pub(crate) type SlotFn<P, T> = fn(&mut SharedState<P>) -> &mut HandshakeSlot<T>;

impl<P: Platform> Shared<P> {
    /// ### English
    /// Fire-and-forget: writes `command` without waiting.
    /// A failed write means the bridge is broken, so it quits.
    ///
    /// ### 中文
    /// fire-and-forget：写入 `command` 而不等待。写入失败意味着 bridge 已损坏，因此会触发退出。
    pub(crate) fn fire(&self, commands: &CommandSender, command: Command) -> Result<(), BridgeError> {
        if commands.write(command) {
            return Ok(());
        }
        tracing::error!(?command, "command channel write failed");
        self.quit();
        Err(BridgeError::ChannelClosed)
    }

    /// ### English
    /// Blocking handshake: stores `value` as pending, writes `command`, then waits until the
    /// worker has applied the pending value.
    ///
    /// The wait also ends when the bridge stops running, so a broken channel or a shutdown
    /// never leaves the caller blocked.
    ///
    /// ### 中文
    /// 阻塞握手：将 `value` 存为 pending，写入 `command`，然后等待 worker 应用该 pending 值。
    ///
    /// bridge 停止运行时等待同样会结束，因此 channel 损坏或关闭都不会让调用方一直阻塞。
    pub(crate) fn request<T>(
        &self,
        commands: &CommandSender,
        command: Command,
        slot: SlotFn<P, T>,
        value: Option<T>,
    ) -> Result<(), BridgeError>
    where
        T: Clone + PartialEq + fmt::Debug,
    {
        debug_assert!(command.is_handshake());

        let mut state = self.state.lock();
        if !state.running {
            return Err(BridgeError::Terminated);
        }

        tracing::debug!(?command, ?value, "handshake requested");
        slot(&mut *state).request(value);

        if !commands.write(command) {
            drop(state);
            tracing::error!(?command, "command channel write failed, abandoning handshake");
            self.quit();
            return Err(BridgeError::ChannelClosed);
        }

        self.applied
            .wait_while(&mut state, |state| state.running && !slot(state).is_applied());

        if slot(&mut *state).is_applied() {
            Ok(())
        } else {
            Err(BridgeError::Terminated)
        }
    }

    /// ### English
    /// Worker side: publishes the pending input queue and returns `(previous, current)`.
    ///
    /// ### 中文
    /// worker 侧：发布 pending 输入队列，返回 `(之前的值, 当前值)`。
    pub(crate) fn publish_input_queue(&self) -> (Option<P::InputQueue>, Option<P::InputQueue>) {
        let mut state = self.state.lock();
        let previous = state.input_queue.apply();
        let current = state.input_queue.current().cloned();
        self.applied.notify_all();
        (previous, current)
    }

    pub(crate) fn settle_input_queue(&self) {
        let mut state = self.state.lock();
        state.input_queue.settle();
        self.applied.notify_all();
    }

    /// ### English
    /// Worker side: clears `surface_ready`, publishes the pending surface and returns
    /// `(previous, current)`. The slot stays settling until [`Shared::settle_surface`].
    ///
    /// ### 中文
    /// worker 侧：清除 `surface_ready`，发布 pending surface，返回 `(之前的值, 当前值)`。
    /// 在调用 [`Shared::settle_surface`] 之前该槽位一直处于 settling 状态。
    pub(crate) fn publish_surface(&self) -> (Option<P::Surface>, Option<P::Surface>) {
        let mut state = self.state.lock();
        state.surface_ready = false;
        let previous = state.surface.apply();
        let current = state.surface.current().cloned();
        (previous, current)
    }

    /// ### English
    /// Worker side: finishes a surface transition once its callbacks have returned.
    ///
    /// ### 中文
    /// worker 侧：在回调全部返回后结束一次 surface 切换。
    pub(crate) fn settle_surface(&self, ready: bool) {
        let mut state = self.state.lock();
        state.surface_ready = ready;
        state.surface.settle();
        self.applied.notify_all();
    }
}
