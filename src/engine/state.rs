//! ### English
//! State shared between the control thread and the worker thread.
//!
//! Every field lives behind one mutex; the condition variable is tied to the same mutex and
//! is used only by blocking handshakes.
//!
//! ### 中文
//! 控制线程与 worker 线程之间共享的状态。
//!
//! 所有字段都由同一把互斥锁保护；条件变量绑定同一把锁，且只用于阻塞握手。

use crossbeam_channel as channel;
use parking_lot::{Condvar, Mutex};

use super::handshake::HandshakeSlot;
use super::platform::Platform;

/// ### English
/// Worker thread state machine.
///
/// ### 中文
/// worker 线程状态机。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Registering wakeup sources.
    Initializing,
    /// Running the event loop.
    Running,
    /// Loop exited and resources were released.
    Terminated,
}

/// ### English
/// Mutex-guarded fields.
///
/// ### 中文
/// 受互斥锁保护的字段。
pub(crate) struct SharedState<P: Platform> {
    pub(crate) input_queue: HandshakeSlot<P::InputQueue>,
    pub(crate) surface: HandshakeSlot<P::Surface>,
    /// ### English
    /// True iff a surface is current and `on_surface_init` has returned for it.
    ///
    /// ### 中文
    /// 仅当存在当前 surface 且其 `on_surface_init` 已返回时为 true。
    pub(crate) surface_ready: bool,
    pub(crate) running: bool,
    pub(crate) animating: bool,
    pub(crate) phase: WorkerPhase,
}

impl<P: Platform> SharedState<P> {
    pub(crate) fn input_queue_slot(&mut self) -> &mut HandshakeSlot<P::InputQueue> {
        &mut self.input_queue
    }

    pub(crate) fn surface_slot(&mut self) -> &mut HandshakeSlot<P::Surface> {
        &mut self.surface
    }
}

/// ### English
/// Everything both threads hold through an `Arc`.
///
/// ### 中文
/// 两个线程通过 `Arc` 共同持有的全部内容。
pub(crate) struct Shared<P: Platform> {
    /// ### English
    /// Host activity handle.
    ///
    /// ### 中文
    /// 宿主 activity 句柄。
    pub(crate) platform: P,
    pub(crate) state: Mutex<SharedState<P>>,
    /// ### English
    /// Signalled whenever the worker applies or settles a handshake, and on stop.
    ///
    /// ### 中文
    /// worker 应用/完成握手时以及停止时会发出通知。
    pub(crate) applied: Condvar,
    /// ### English
    /// Coalesced wake signal for the worker's multiplexer.
    ///
    /// ### 中文
    /// 发给 worker 多路复用器的合并唤醒信号。
    wake_tx: channel::Sender<()>,
}

impl<P: Platform> Shared<P> {
    pub(crate) fn new(platform: P, wake_tx: channel::Sender<()>, animating: bool) -> Self {
        Self {
            platform,
            state: Mutex::new(SharedState {
                input_queue: HandshakeSlot::new(),
                surface: HandshakeSlot::new(),
                surface_ready: false,
                running: true,
                animating,
                phase: WorkerPhase::Initializing,
            }),
            applied: Condvar::new(),
            wake_tx,
        }
    }

    /// ### English
    /// Wakes the worker if it is blocked in its multiplexer wait.
    ///
    /// ### 中文
    /// 若 worker 阻塞在多路复用等待中，则将其唤醒。
    pub(crate) fn wake(&self) {
        let _ = self.wake_tx.try_send(());
    }

    pub(crate) fn set_phase(&self, phase: WorkerPhase) {
        let mut state = self.state.lock();
        state.phase = phase;
        self.applied.notify_all();
    }
}
