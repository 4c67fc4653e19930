//! ### English
//! C ABI surface for `activity_bridge`.
//!
//! All exported symbols are `extern "C"` functions; structs are `#[repr(C)]`.
//! Surfaces, input queues and input events are opaque host pointers; the bridge never
//! dereferences them and only hands them back through the host's function tables.
//!
//! ### 中文
//! `activity_bridge` 的 C ABI 接口层。
//!
//! 所有导出符号均为 `extern "C"` 函数；结构体使用 `#[repr(C)]`。
//! surface、输入队列与输入事件均为宿主的不透明指针；bridge 从不解引用它们，
//! 只会通过宿主提供的函数表把它们传回去。
mod activity;
mod bridge;
mod input;
mod platform;

use std::ffi::c_void;

use crate::engine::{Activity, ActivityBridge as Bridge, InputWaker};

pub use activity::*;
pub use bridge::*;
pub use input::*;
pub use platform::{FfiHandler, FfiInputEvent, FfiInputQueue, FfiPlatform, FfiSurface};

#[repr(C)]
/// ### English
/// Opaque bridge handle owning the dedicated worker thread.
///
/// ### 中文
/// 不透明 bridge 句柄，持有独立的 worker 线程。
pub struct ActivityBridge {
    /// ### English
    /// Bridge runtime that owns the worker thread.
    ///
    /// ### 中文
    /// 持有 worker 线程的 bridge 运行时。
    bridge: Bridge<FfiPlatform>,
}

#[repr(transparent)]
/// ### English
/// Opaque activity context passed to every callback.
///
/// Pointers handed to callbacks are valid for the duration of the callback; the pointer
/// returned by `activity_bridge_get_activity` is valid until the bridge is destroyed.
///
/// ### 中文
/// 传给每个回调的不透明 activity 上下文。
///
/// 回调中拿到的指针仅在该回调期间有效；`activity_bridge_get_activity` 返回的指针在 bridge 销毁前有效。
pub struct ActivityBridgeActivity {
    activity: Activity<FfiPlatform>,
}

impl ActivityBridgeActivity {
    pub(crate) fn from_activity(activity: &Activity<FfiPlatform>) -> *const Self {
        (activity as *const Activity<FfiPlatform>).cast()
    }
}

#[repr(C)]
/// ### English
/// Opaque input readiness handle given to `ActivityBridgeInputQueueVTable::attach`.
/// Valid until the matching `detach` call returns.
///
/// ### 中文
/// 传给 `ActivityBridgeInputQueueVTable::attach` 的不透明输入就绪句柄。
/// 在对应的 `detach` 调用返回前有效。
pub struct ActivityBridgeInputWaker {
    waker: InputWaker,
}

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// Host activity functions.
///
/// ### 中文
/// 宿主 activity 函数表。
pub struct ActivityBridgeHost {
    /// ### English
    /// Passed back to every host function.
    ///
    /// ### 中文
    /// 原样传回给每个宿主函数。
    pub user_data: *mut c_void,
    /// ### English
    /// Asks the host to finish the activity. Called at most once, on any thread. May be NULL.
    ///
    /// ### 中文
    /// 请求宿主结束 activity。最多调用一次，可能在任意线程调用。可为 NULL。
    pub finish: Option<unsafe extern "C" fn(user_data: *mut c_void)>,
}

/// ### English
/// Callback taking only the activity context.
///
/// ### 中文
/// 仅接收 activity 上下文的回调。
pub type ActivityBridgeActivityFn =
    unsafe extern "C" fn(user_data: *mut c_void, activity: *const ActivityBridgeActivity);

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// Application callbacks. All of them run on the worker thread; any entry may be NULL.
///
/// ### 中文
/// 应用回调。全部在 worker 线程执行；任意一项都可以为 NULL。
pub struct ActivityBridgeCallbacks {
    pub user_data: *mut c_void,
    pub on_start: Option<ActivityBridgeActivityFn>,
    pub on_stop: Option<ActivityBridgeActivityFn>,
    pub on_redraw: Option<ActivityBridgeActivityFn>,
    /// ### English
    /// A new surface became current. Idle ticks start once this returns.
    ///
    /// ### 中文
    /// 新 surface 成为当前 surface。该回调返回后才开始 idle tick。
    pub on_surface_init: Option<
        unsafe extern "C" fn(
            user_data: *mut c_void,
            activity: *const ActivityBridgeActivity,
            surface: *mut c_void,
        ),
    >,
    /// ### English
    /// The surface was removed. `activity_bridge_activity_current_surface` already returns
    /// NULL and idle ticks have stopped. Not called when one surface directly replaces another.
    ///
    /// ### 中文
    /// surface 已被移除。本回调期间 `activity_bridge_activity_current_surface` 已返回 NULL，
    /// idle tick 已停止。一个 surface 直接替换另一个时不会调用。
    pub on_surface_term: Option<ActivityBridgeActivityFn>,
    /// ### English
    /// Handles one input event. The return value is reported to the queue as "handled".
    /// NULL reports every event as unhandled.
    ///
    /// ### 中文
    /// 处理一个输入事件。返回值作为 “是否已处理” 报告给队列。为 NULL 时所有事件均视为未处理。
    pub on_input_event: Option<
        unsafe extern "C" fn(
            user_data: *mut c_void,
            activity: *const ActivityBridgeActivity,
            event: *mut c_void,
        ) -> bool,
    >,
    pub on_idle: Option<ActivityBridgeActivityFn>,
}

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// Host input queue functions. Called on the worker thread.
///
/// `get_event` and `finish_event` are required; the other entries may be NULL.
///
/// ### 中文
/// 宿主输入队列函数表。在 worker 线程调用。
///
/// `get_event` 与 `finish_event` 必须提供；其余项可以为 NULL。
pub struct ActivityBridgeInputQueueVTable {
    /// ### English
    /// Starts readiness notifications: call `activity_bridge_input_waker_wake(waker)` whenever
    /// events are queued.
    ///
    /// ### 中文
    /// 开始就绪通知：有事件入队时调用 `activity_bridge_input_waker_wake(waker)`。
    pub attach:
        Option<unsafe extern "C" fn(queue: *mut c_void, waker: *const ActivityBridgeInputWaker)>,
    /// ### English
    /// Stops readiness notifications. The waker is released once this returns.
    ///
    /// ### 中文
    /// 停止就绪通知。该函数返回后 waker 即被释放。
    pub detach: Option<unsafe extern "C" fn(queue: *mut c_void)>,
    /// ### English
    /// Returns the next event, or NULL when the queue is empty. Must not block.
    ///
    /// ### 中文
    /// 返回下一个事件；队列为空时返回 NULL。不得阻塞。
    pub get_event: Option<unsafe extern "C" fn(queue: *mut c_void) -> *mut c_void>,
    /// ### English
    /// Returns true if the platform claimed the event (it then finishes the event itself).
    ///
    /// ### 中文
    /// 平台接管该事件时返回 true（此后由平台自行 finish 该事件）。
    pub pre_dispatch: Option<unsafe extern "C" fn(queue: *mut c_void, event: *mut c_void) -> bool>,
    pub finish_event:
        Option<unsafe extern "C" fn(queue: *mut c_void, event: *mut c_void, handled: bool)>,
}

/// ### English
/// C ABI version for `activity_bridge`.
///
/// ### 中文
/// `activity_bridge` 的 C ABI 版本号。
const ACTIVITY_BRIDGE_ABI_VERSION: u32 = 1;

/// ### English
/// Reports a NULL instance pointer passed to an entry point.
/// Fatal in debug builds; logged and ignored in release builds.
///
/// ### 中文
/// 报告传入入口函数的 NULL 实例指针。debug 构建下直接断言失败；release 构建下记录日志后忽略。
fn null_instance(entry: &'static str) {
    tracing::error!(entry, "protocol violation: null instance pointer");
    debug_assert!(false, "{entry}: null instance pointer");
}
