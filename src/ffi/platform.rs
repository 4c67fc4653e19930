//! ### English
//! `Platform` / `InputQueue` / `ActivityHandler` implementations backed by C function tables.
//!
//! ### 中文
//! 基于 C 函数表实现的 `Platform` / `InputQueue` / `ActivityHandler`。

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    ActivityBridgeActivity, ActivityBridgeCallbacks, ActivityBridgeHost,
    ActivityBridgeInputQueueVTable, ActivityBridgeInputWaker,
};
use crate::engine::{Activity, ActivityHandler, InputQueue, InputWaker, Platform};

/// ### English
/// Host activity backed by `ActivityBridgeHost`.
///
/// ### 中文
/// 基于 `ActivityBridgeHost` 的宿主 activity。
pub struct FfiPlatform {
    host: ActivityBridgeHost,
}

// SAFETY: the host promises `finish` and `user_data` may be used from any thread.
unsafe impl Send for FfiPlatform {}
unsafe impl Sync for FfiPlatform {}

impl FfiPlatform {
    pub(crate) fn new(host: ActivityBridgeHost) -> Self {
        Self { host }
    }
}

impl Platform for FfiPlatform {
    type Surface = FfiSurface;
    type InputQueue = FfiInputQueue;

    fn finish(&self) {
        if let Some(finish) = self.host.finish {
            unsafe { finish(self.host.user_data) };
        }
    }
}

/// ### English
/// Opaque host surface pointer. Compared by address.
///
/// ### 中文
/// 宿主不透明 surface 指针。按地址比较。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FfiSurface(NonNull<c_void>);

// SAFETY: the surface is an opaque token; the bridge never dereferences it.
unsafe impl Send for FfiSurface {}

impl FfiSurface {
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// ### English
/// Opaque host input event pointer.
///
/// ### 中文
/// 宿主不透明输入事件指针。
#[derive(Debug)]
pub struct FfiInputEvent(NonNull<c_void>);

impl FfiInputEvent {
    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// ### English
/// Host input queue: an opaque pointer plus its function table.
/// Clones share the attached waker; equality is by queue address.
///
/// ### 中文
/// 宿主输入队列：不透明指针及其函数表。clone 共享已挂接的 waker；按队列地址判断相等。
#[derive(Clone)]
pub struct FfiInputQueue {
    queue: NonNull<c_void>,
    vtable: ActivityBridgeInputQueueVTable,
    /// ### English
    /// Waker handed out by `attach`; kept alive until `detach` returns.
    ///
    /// ### 中文
    /// `attach` 时交出的 waker；保持存活直到 `detach` 返回。
    waker: Arc<Mutex<Option<Box<ActivityBridgeInputWaker>>>>,
}

// SAFETY: the queue pointer is only passed back to the host's own functions, which the host
// allows on the worker thread.
unsafe impl Send for FfiInputQueue {}

impl FfiInputQueue {
    /// ### English
    /// Returns `None` for a NULL queue or a vtable missing `get_event` / `finish_event`.
    ///
    /// ### 中文
    /// 队列为 NULL，或函数表缺少 `get_event` / `finish_event` 时返回 `None`。
    pub fn new(queue: *mut c_void, vtable: ActivityBridgeInputQueueVTable) -> Option<Self> {
        let queue = NonNull::new(queue)?;
        if vtable.get_event.is_none() || vtable.finish_event.is_none() {
            return None;
        }
        Some(Self {
            queue,
            vtable,
            waker: Arc::new(Mutex::new(None)),
        })
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.queue.as_ptr()
    }
}

impl PartialEq for FfiInputQueue {
    fn eq(&self, other: &Self) -> bool {
        self.queue == other.queue
    }
}

impl std::fmt::Debug for FfiInputQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FfiInputQueue").field(&self.queue).finish()
    }
}

impl InputQueue for FfiInputQueue {
    type Event = FfiInputEvent;

    fn attach(&self, waker: InputWaker) {
        let mut slot = self.waker.lock();
        let waker = slot.insert(Box::new(ActivityBridgeInputWaker { waker }));
        let waker: *const ActivityBridgeInputWaker = &**waker;
        if let Some(attach) = self.vtable.attach {
            unsafe { attach(self.as_ptr(), waker) };
        }
    }

    fn detach(&self) {
        if let Some(detach) = self.vtable.detach {
            unsafe { detach(self.as_ptr()) };
        }
        self.waker.lock().take();
    }

    fn get_event(&self) -> Option<FfiInputEvent> {
        let get_event = self.vtable.get_event?;
        NonNull::new(unsafe { get_event(self.as_ptr()) }).map(FfiInputEvent)
    }

    fn pre_dispatch(&self, event: &FfiInputEvent) -> bool {
        match self.vtable.pre_dispatch {
            Some(pre_dispatch) => unsafe { pre_dispatch(self.as_ptr(), event.as_ptr()) },
            None => false,
        }
    }

    fn finish_event(&self, event: FfiInputEvent, handled: bool) {
        if let Some(finish_event) = self.vtable.finish_event {
            unsafe { finish_event(self.as_ptr(), event.as_ptr(), handled) };
        }
    }
}

/// ### English
/// Application callbacks backed by `ActivityBridgeCallbacks`.
///
/// ### 中文
/// 基于 `ActivityBridgeCallbacks` 的应用回调。
pub struct FfiHandler {
    callbacks: ActivityBridgeCallbacks,
}

// SAFETY: the host promises the callbacks and `user_data` may be used on the worker thread.
unsafe impl Send for FfiHandler {}

impl FfiHandler {
    pub(crate) fn new(callbacks: ActivityBridgeCallbacks) -> Self {
        Self { callbacks }
    }

    fn call(
        &self,
        callback: Option<super::ActivityBridgeActivityFn>,
        activity: &Activity<FfiPlatform>,
    ) {
        if let Some(callback) = callback {
            unsafe {
                callback(
                    self.callbacks.user_data,
                    ActivityBridgeActivity::from_activity(activity),
                )
            };
        }
    }
}

impl ActivityHandler<FfiPlatform> for FfiHandler {
    fn on_start(&mut self, activity: &Activity<FfiPlatform>) {
        self.call(self.callbacks.on_start, activity);
    }

    fn on_stop(&mut self, activity: &Activity<FfiPlatform>) {
        self.call(self.callbacks.on_stop, activity);
    }

    fn on_redraw(&mut self, activity: &Activity<FfiPlatform>) {
        self.call(self.callbacks.on_redraw, activity);
    }

    fn on_surface_init(&mut self, activity: &Activity<FfiPlatform>, surface: &FfiSurface) {
        if let Some(on_surface_init) = self.callbacks.on_surface_init {
            unsafe {
                on_surface_init(
                    self.callbacks.user_data,
                    ActivityBridgeActivity::from_activity(activity),
                    surface.as_ptr(),
                )
            };
        }
    }

    fn on_surface_term(&mut self, activity: &Activity<FfiPlatform>) {
        self.call(self.callbacks.on_surface_term, activity);
    }

    fn on_input_event(&mut self, activity: &Activity<FfiPlatform>, event: &FfiInputEvent) -> bool {
        match self.callbacks.on_input_event {
            Some(on_input_event) => unsafe {
                on_input_event(
                    self.callbacks.user_data,
                    ActivityBridgeActivity::from_activity(activity),
                    event.as_ptr(),
                )
            },
            None => false,
        }
    }

    fn on_idle(&mut self, activity: &Activity<FfiPlatform>) {
        self.call(self.callbacks.on_idle, activity);
    }
}
