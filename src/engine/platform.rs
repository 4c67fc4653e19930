//! ### English
//! Collaborator contracts: what the host provides (`Platform`, `InputQueue`) and what the
//! application implements (`ActivityHandler`).
//!
//! ### 中文
//! 协作方契约：宿主提供的能力（`Platform`、`InputQueue`）以及应用需要实现的回调（`ActivityHandler`）。

use std::fmt;

use super::input::InputWaker;
use super::lifecycle::Activity;

/// ### English
/// Host-side activity capabilities.
///
/// The value itself is the activity handle passed at construction. Handles are cloned to
/// acquire a reference and dropped to release it.
///
/// ### 中文
/// 宿主侧 activity 能力。
///
/// 该值本身即构造时传入的 activity 句柄。句柄通过 clone 获取引用、通过 drop 释放引用。
pub trait Platform: Send + Sync + 'static {
    /// ### English
    /// Drawable target handle. Equality decides whether a handshake has been applied.
    ///
    /// ### 中文
    /// 可绘制目标句柄。握手是否已应用通过相等性判断。
    type Surface: Clone + PartialEq + Send + fmt::Debug + 'static;

    /// ### English
    /// Queue of raw input events attached to the active surface.
    ///
    /// ### 中文
    /// 挂接在当前 surface 上的原始输入事件队列。
    type InputQueue: InputQueue;

    /// ### English
    /// Requests host-level termination of the activity.
    ///
    /// ### 中文
    /// 请求宿主结束该 activity。
    fn finish(&self);
}

/// ### English
/// Host-provided input event queue.
///
/// All methods are called on the worker thread.
///
/// ### 中文
/// 宿主提供的输入事件队列。
///
/// 所有方法都在 worker 线程调用。
pub trait InputQueue: Clone + PartialEq + Send + fmt::Debug + 'static {
    /// ### English
    /// One raw input event.
    ///
    /// ### 中文
    /// 单个原始输入事件。
    type Event;

    /// ### English
    /// Starts delivering readiness notifications through `waker`.
    /// The host calls [`InputWaker::wake`] whenever new events are available.
    ///
    /// ### 中文
    /// 开始通过 `waker` 投递就绪通知。有新事件时宿主调用 [`InputWaker::wake`]。
    fn attach(&self, waker: InputWaker);

    /// ### English
    /// Stops readiness notifications. The waker given to `attach` must not be used afterwards.
    ///
    /// ### 中文
    /// 停止就绪通知。此后不得再使用 `attach` 时传入的 waker。
    fn detach(&self);

    /// ### English
    /// Returns the next pending event without blocking.
    ///
    /// ### 中文
    /// 非阻塞地返回下一个待处理事件。
    fn get_event(&self) -> Option<Self::Event>;

    /// ### English
    /// Offers the event to the platform (e.g. an IME) before the application sees it.
    /// Returns `true` if the platform claimed it; the event then must not be finished here.
    ///
    /// ### 中文
    /// 在应用看到事件之前先交给平台（例如输入法）预处理。
    /// 返回 `true` 表示平台已接管该事件；此时这里不得再 finish 它。
    fn pre_dispatch(&self, event: &Self::Event) -> bool;

    /// ### English
    /// Reports that dispatching of `event` has finished.
    ///
    /// ### 中文
    /// 报告 `event` 的派发已完成。
    fn finish_event(&self, event: Self::Event, handled: bool);
}

/// ### English
/// Shorthand for the event type of a platform's input queue.
///
/// ### 中文
/// 平台输入队列事件类型的简写。
pub type InputEvent<P> = <<P as Platform>::InputQueue as InputQueue>::Event;

/// ### English
/// Application callbacks. Every method runs on the worker thread, outside any bridge lock.
///
/// ### 中文
/// 应用回调。所有方法都在 worker 线程执行，且不持有任何 bridge 锁。
pub trait ActivityHandler<P: Platform>: Send + 'static {
    /// Lifecycle start.
    fn on_start(&mut self, _activity: &Activity<P>) {}

    /// Lifecycle stop.
    fn on_stop(&mut self, _activity: &Activity<P>) {}

    /// The host asked for a redraw.
    fn on_redraw(&mut self, _activity: &Activity<P>) {}

    /// ### English
    /// A new surface became current. Idle ticks start once this returns.
    ///
    /// ### 中文
    /// 新 surface 成为当前 surface。该方法返回后才开始 idle tick。
    fn on_surface_init(&mut self, activity: &Activity<P>, surface: &P::Surface);

    /// ### English
    /// The surface was removed, or the bridge is tearing down with a ready surface.
    /// Idle ticks have already stopped.
    ///
    /// ### 中文
    /// surface 已被移除，或 bridge 在存在就绪 surface 时拆除。此时 idle tick 已停止。
    fn on_surface_term(&mut self, activity: &Activity<P>);

    /// ### English
    /// Handles one input event; the return value is reported to the host as "handled".
    ///
    /// ### 中文
    /// 处理一个输入事件；返回值作为 “是否已处理” 报告给宿主。
    fn on_input_event(&mut self, activity: &Activity<P>, event: &InputEvent<P>) -> bool;

    /// ### English
    /// Called once per loop iteration while a surface is ready.
    ///
    /// ### 中文
    /// 在 surface 就绪期间，每次循环迭代调用一次。
    fn on_idle(&mut self, activity: &Activity<P>);
}
