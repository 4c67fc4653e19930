//! ### English
//! C ABI bindings for the activity context (usable from callbacks and from the host thread).
//!
//! ### 中文
//! activity 上下文相关的 C ABI 绑定（可在回调中以及宿主线程上使用）。

use std::ffi::c_void;

use super::platform::FfiPlatform;
use super::{ActivityBridgeActivity, null_instance};
use crate::engine::Activity;

/// ### English
/// Resolves an activity pointer, reporting NULL as a protocol violation.
///
/// # Safety
/// `activity` must be NULL or a pointer obtained from a callback (during that callback) or
/// from `activity_bridge_get_activity` (while the bridge is alive).
///
/// ### 中文
/// 解析 activity 指针，NULL 视为协议违规。
///
/// # Safety
/// `activity` 必须为 NULL，或是在回调期间从回调参数获得的指针，或是在 bridge 存活期间
/// 从 `activity_bridge_get_activity` 获得的指针。
unsafe fn activity_ref<'a>(
    activity: *const ActivityBridgeActivity,
    entry: &'static str,
) -> Option<&'a Activity<FfiPlatform>> {
    if activity.is_null() {
        null_instance(entry);
        return None;
    }
    Some(unsafe { &(*activity).activity })
}

#[unsafe(no_mangle)]
/// ### English
/// Stops the worker loop and asks the host to finish the activity. Idempotent.
///
/// ### 中文
/// 停止 worker 循环并请求宿主结束 activity。幂等。
pub unsafe extern "C" fn activity_bridge_activity_quit(activity: *const ActivityBridgeActivity) {
    if let Some(activity) = unsafe { activity_ref(activity, "activity_bridge_activity_quit") } {
        activity.quit();
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Selects the poll policy: `true` ticks idle continuously, `false` sleeps until an event.
///
/// ### 中文
/// 选择轮询策略：`true` 持续执行 idle tick；`false` 休眠直到有事件。
pub unsafe extern "C" fn activity_bridge_activity_set_animating(
    activity: *const ActivityBridgeActivity,
    animating: bool,
) {
    if let Some(activity) =
        unsafe { activity_ref(activity, "activity_bridge_activity_set_animating") }
    {
        activity.set_animating(animating);
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Returns the current surface, or NULL when there is none.
///
/// ### 中文
/// 返回当前 surface；不存在时返回 NULL。
pub unsafe extern "C" fn activity_bridge_activity_current_surface(
    activity: *const ActivityBridgeActivity,
) -> *mut c_void {
    unsafe { activity_ref(activity, "activity_bridge_activity_current_surface") }
        .and_then(Activity::current_surface)
        .map_or(std::ptr::null_mut(), |surface| surface.as_ptr())
}

#[unsafe(no_mangle)]
/// ### English
/// Returns whether the worker loop is still running.
///
/// ### 中文
/// 返回 worker 循环是否仍在运行。
pub unsafe extern "C" fn activity_bridge_activity_is_running(
    activity: *const ActivityBridgeActivity,
) -> bool {
    unsafe { activity_ref(activity, "activity_bridge_activity_is_running") }
        .is_some_and(Activity::is_running)
}
