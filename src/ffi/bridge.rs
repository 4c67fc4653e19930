//! ### English
//! C ABI bindings for bridge lifecycle (create/destroy) and host notifications.
//!
//! ### 中文
//! bridge 生命周期（create/destroy）与宿主通知相关的 C ABI 绑定。

use std::ffi::c_void;

use super::platform::{FfiHandler, FfiInputQueue, FfiPlatform, FfiSurface};
use super::{
    ACTIVITY_BRIDGE_ABI_VERSION, ActivityBridge, ActivityBridgeActivity, ActivityBridgeCallbacks,
    ActivityBridgeHost, ActivityBridgeInputQueueVTable, null_instance,
};
use crate::engine::{ActivityBridge as Bridge, BridgeConfig, BridgeError, HostEvent, flags};

#[unsafe(no_mangle)]
/// ### English
/// Returns the C ABI version.
///
/// ### 中文
/// 返回 C ABI 版本号。
pub extern "C" fn activity_bridge_abi_version() -> u32 {
    ACTIVITY_BRIDGE_ABI_VERSION
}

#[unsafe(no_mangle)]
/// ### English
/// Returns `ACTIVITY_BRIDGE_CREATE_FLAG_START_IDLE`.
/// (Constant getter for hosts that do not read C headers.)
///
/// ### 中文
/// 返回 `ACTIVITY_BRIDGE_CREATE_FLAG_START_IDLE`。
/// （常量获取函数，供不读取 C 头文件的宿主使用。）
pub extern "C" fn activity_bridge_create_flag_start_idle() -> u32 {
    flags::ACTIVITY_BRIDGE_CREATE_FLAG_START_IDLE
}

/// ### English
/// Resolves a bridge pointer, reporting NULL as a protocol violation.
///
/// # Safety
/// `bridge` must be NULL or a live pointer returned by `activity_bridge_create`.
///
/// ### 中文
/// 解析 bridge 指针，NULL 视为协议违规。
///
/// # Safety
/// `bridge` 必须为 NULL，或是由 `activity_bridge_create` 返回且仍存活的指针。
unsafe fn bridge_ref<'a>(bridge: *mut ActivityBridge, entry: &'static str) -> Option<&'a Bridge<FfiPlatform>> {
    if bridge.is_null() {
        null_instance(entry);
        return None;
    }
    Some(unsafe { &(*bridge).bridge })
}

fn report(entry: &'static str, result: Result<(), BridgeError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(entry, %err, "bridge request failed");
            false
        }
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Creates a bridge and starts its worker thread.
///
/// Blocks until the worker reports readiness. Returns NULL if the thread could not be
/// started. `create_flags` is a bitmask of `ACTIVITY_BRIDGE_CREATE_FLAG_*`.
///
/// ### 中文
/// 创建 bridge 并启动其 worker 线程。
///
/// 会阻塞等待 worker 报告就绪。线程无法启动时返回 NULL。
/// `create_flags` 为 `ACTIVITY_BRIDGE_CREATE_FLAG_*` 位掩码。
pub extern "C" fn activity_bridge_create(
    host: ActivityBridgeHost,
    callbacks: ActivityBridgeCallbacks,
    create_flags: u32,
) -> *mut ActivityBridge {
    let config = BridgeConfig::from_create_flags(create_flags);
    match Bridge::new(FfiPlatform::new(host), FfiHandler::new(callbacks), config) {
        Ok(bridge) => Box::into_raw(Box::new(ActivityBridge { bridge })),
        Err(err) => {
            tracing::error!(%err, init = err.is_init_failure(), "failed to create activity bridge");
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Destroys a bridge created by `activity_bridge_create`.
///
/// Stops and joins the worker thread. A ready surface gets its term callback and an attached
/// input queue is detached before this returns. Does not call the host's `finish`.
///
/// ### 中文
/// 销毁由 `activity_bridge_create` 创建的 bridge。
///
/// 会停止并 join worker 线程。返回前会对就绪 surface 执行 term 回调，并 detach 已挂接的输入队列。
/// 不会调用宿主的 `finish`。
pub unsafe extern "C" fn activity_bridge_destroy(bridge: *mut ActivityBridge) {
    if bridge.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(bridge));
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Hands an input queue to the worker and waits until it is attached.
/// Returns false if the queue or vtable is invalid or the bridge is no longer running.
///
/// ### 中文
/// 将输入队列交给 worker 并等待挂接完成。
/// 队列或函数表无效、或 bridge 已不再运行时返回 false。
pub unsafe extern "C" fn activity_bridge_input_queue_created(
    bridge: *mut ActivityBridge,
    queue: *mut c_void,
    vtable: *const ActivityBridgeInputQueueVTable,
) -> bool {
    let Some(bridge) = (unsafe { bridge_ref(bridge, "activity_bridge_input_queue_created") })
    else {
        return false;
    };
    if vtable.is_null() {
        return false;
    }
    let Some(queue) = FfiInputQueue::new(queue, unsafe { *vtable }) else {
        tracing::warn!("rejected input queue: NULL queue or incomplete vtable");
        return false;
    };
    report(
        "activity_bridge_input_queue_created",
        bridge.dispatch(HostEvent::InputQueueCreated(queue)),
    )
}

#[unsafe(no_mangle)]
/// ### English
/// Detaches the current input queue and waits until the worker no longer uses it.
///
/// ### 中文
/// detach 当前输入队列，并等待 worker 不再使用它。
pub unsafe extern "C" fn activity_bridge_input_queue_destroyed(bridge: *mut ActivityBridge) -> bool {
    let Some(bridge) = (unsafe { bridge_ref(bridge, "activity_bridge_input_queue_destroyed") })
    else {
        return false;
    };
    report(
        "activity_bridge_input_queue_destroyed",
        bridge.set_input_queue(None),
    )
}

#[unsafe(no_mangle)]
/// ### English
/// Hands a surface to the worker and waits until `on_surface_init` has returned.
/// A NULL surface is rejected; use `activity_bridge_surface_destroyed` instead.
///
/// ### 中文
/// 将 surface 交给 worker，并等待 `on_surface_init` 返回。
/// NULL surface 会被拒绝；请改用 `activity_bridge_surface_destroyed`。
pub unsafe extern "C" fn activity_bridge_surface_created(
    bridge: *mut ActivityBridge,
    surface: *mut c_void,
) -> bool {
    let Some(bridge) = (unsafe { bridge_ref(bridge, "activity_bridge_surface_created") }) else {
        return false;
    };
    let Some(surface) = FfiSurface::new(surface) else {
        return false;
    };
    report(
        "activity_bridge_surface_created",
        bridge.dispatch(HostEvent::SurfaceCreated(surface)),
    )
}

#[unsafe(no_mangle)]
/// ### English
/// Removes the current surface and waits until `on_surface_term` has returned.
/// The host may release the surface once this returns.
///
/// ### 中文
/// 移除当前 surface，并等待 `on_surface_term` 返回。该函数返回后宿主即可释放 surface。
pub unsafe extern "C" fn activity_bridge_surface_destroyed(bridge: *mut ActivityBridge) -> bool {
    let Some(bridge) = (unsafe { bridge_ref(bridge, "activity_bridge_surface_destroyed") }) else {
        return false;
    };
    report("activity_bridge_surface_destroyed", bridge.set_surface(None))
}

#[unsafe(no_mangle)]
/// ### English
/// Queues a redraw notification (non-blocking).
///
/// ### 中文
/// 投递重绘通知（非阻塞）。
pub unsafe extern "C" fn activity_bridge_redraw_needed(bridge: *mut ActivityBridge) -> bool {
    let Some(bridge) = (unsafe { bridge_ref(bridge, "activity_bridge_redraw_needed") }) else {
        return false;
    };
    report("activity_bridge_redraw_needed", bridge.dispatch(HostEvent::RedrawNeeded))
}

#[unsafe(no_mangle)]
/// ### English
/// Queues a lifecycle start notification (non-blocking).
///
/// ### 中文
/// 投递生命周期 start 通知（非阻塞）。
pub unsafe extern "C" fn activity_bridge_start(bridge: *mut ActivityBridge) -> bool {
    let Some(bridge) = (unsafe { bridge_ref(bridge, "activity_bridge_start") }) else {
        return false;
    };
    report("activity_bridge_start", bridge.dispatch(HostEvent::Start))
}

#[unsafe(no_mangle)]
/// ### English
/// Queues a lifecycle stop notification (non-blocking).
///
/// ### 中文
/// 投递生命周期 stop 通知（非阻塞）。
pub unsafe extern "C" fn activity_bridge_stop(bridge: *mut ActivityBridge) -> bool {
    let Some(bridge) = (unsafe { bridge_ref(bridge, "activity_bridge_stop") }) else {
        return false;
    };
    report("activity_bridge_stop", bridge.dispatch(HostEvent::Stop))
}

#[unsafe(no_mangle)]
/// ### English
/// Returns the bridge's activity context. Valid until the bridge is destroyed.
///
/// ### 中文
/// 返回 bridge 的 activity 上下文。在 bridge 销毁前有效。
pub unsafe extern "C" fn activity_bridge_get_activity(
    bridge: *mut ActivityBridge,
) -> *const ActivityBridgeActivity {
    let Some(bridge) = (unsafe { bridge_ref(bridge, "activity_bridge_get_activity") }) else {
        return std::ptr::null();
    };
    ActivityBridgeActivity::from_activity(bridge.activity())
}
