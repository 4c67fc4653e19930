use super::{ActivityBridgeInputWaker, null_instance};

#[unsafe(no_mangle)]
/// ### English
/// Signals that the attached input queue has events. Callable from any thread, between
/// `attach` and the return of `detach`. Repeated calls before the worker drains are coalesced.
///
/// Returns false once the worker no longer listens to this waker.
///
/// ### 中文
/// 通知已挂接的输入队列中有事件。可在任意线程调用，调用时机须在 `attach` 之后、`detach` 返回之前。
/// worker drain 之前的重复调用会被合并。
///
/// worker 不再监听该 waker 时返回 false。
pub unsafe extern "C" fn activity_bridge_input_waker_wake(
    waker: *const ActivityBridgeInputWaker,
) -> bool {
    if waker.is_null() {
        null_instance("activity_bridge_input_waker_wake");
        return false;
    }
    unsafe { (*waker).waker.wake() }
}
