//! ### English
//! Input pump: readiness signalling from the host and draining of the attached queue on the
//! worker thread.
//!
//! ### 中文
//! 输入泵：宿主侧的就绪通知，以及 worker 线程上对已挂接队列的 drain。

use crossbeam_channel::{self as channel, TrySendError};

use super::platform::InputQueue;

/// ### English
/// Handle the host uses to report that the attached input queue has events.
///
/// Wakes are coalesced: any number of calls between two worker iterations produce a single
/// drain. Calls after the queue was detached are ignored.
///
/// ### 中文
/// 宿主用来报告“已挂接输入队列中有事件”的句柄。
///
/// 唤醒会被合并：两次 worker 迭代之间的任意多次调用只会触发一次 drain。队列 detach 之后的调用会被忽略。
#[derive(Clone, Debug)]
pub struct InputWaker {
    tx: channel::Sender<()>,
}

impl InputWaker {
    /// ### English
    /// Signals readiness. Returns `false` once the worker no longer listens to this waker.
    ///
    /// ### 中文
    /// 发出就绪信号。worker 不再监听该 waker 时返回 `false`。
    pub fn wake(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Disconnected(())) => false,
        }
    }
}

/// ### English
/// Creates a waker and the readiness receiver the worker registers with its multiplexer.
///
/// ### 中文
/// 创建 waker，以及 worker 注册到多路复用器的就绪接收端。
pub(crate) fn input_waker() -> (InputWaker, channel::Receiver<()>) {
    let (tx, rx) = channel::bounded(1);
    (InputWaker { tx }, rx)
}

/// ### English
/// Counters for one drain pass.
///
/// ### 中文
/// 单次 drain 的计数。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainStats {
    /// Events passed to the application.
    pub handled: usize,
    /// Events claimed by the platform pre-dispatch step.
    pub claimed: usize,
}

impl DrainStats {
    pub fn total(&self) -> usize {
        self.handled + self.claimed
    }
}

/// ### English
/// Drains every currently available event from `queue`.
///
/// Each event is first offered to the platform. Claimed events are skipped; the rest go to
/// `handle` and are finished with its result.
///
/// ### 中文
/// drain `queue` 中当前可取的全部事件。
///
/// 每个事件先交给平台预处理：被接管的事件直接跳过；其余交给 `handle`，并以其返回值 finish。
pub fn drain<Q, F>(queue: &Q, mut handle: F) -> DrainStats
where
    Q: InputQueue,
    F: FnMut(&Q::Event) -> bool,
{
    let mut stats = DrainStats::default();
    while let Some(event) = queue.get_event() {
        if queue.pre_dispatch(&event) {
            stats.claimed += 1;
            continue;
        }
        let handled = handle(&event);
        queue.finish_event(event, handled);
        stats.handled += 1;
    }
    if stats.total() > 0 {
        tracing::trace!(handled = stats.handled, claimed = stats.claimed, "input drained");
    }
    stats
}
