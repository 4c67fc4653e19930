//! Integration tests for the C ABI, driven the way a C host would.

mod common;

use std::collections::VecDeque;
use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};

use activity_bridge::ffi::*;
use activity_bridge::flags;
use common::wait_until;
use parking_lot::Mutex;

#[derive(Default)]
struct HostLog {
    finishes: AtomicUsize,
    idles: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl HostLog {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn push(&self, call: String) {
        self.calls.lock().push(call);
    }
}

unsafe fn log<'a>(user_data: *mut c_void) -> &'a HostLog {
    unsafe { &*user_data.cast::<HostLog>() }
}

unsafe extern "C" fn host_finish(user_data: *mut c_void) {
    unsafe { log(user_data) }.finishes.fetch_add(1, Ordering::SeqCst);
}

unsafe extern "C" fn on_start(user_data: *mut c_void, _activity: *const ActivityBridgeActivity) {
    unsafe { log(user_data) }.push("start".to_string());
}

unsafe extern "C" fn on_surface_init(
    user_data: *mut c_void,
    activity: *const ActivityBridgeActivity,
    surface: *mut c_void,
) {
    let current = unsafe { activity_bridge_activity_current_surface(activity) };
    unsafe { log(user_data) }.push(format!("init {} current={}", surface as usize, current as usize));
}

unsafe extern "C" fn on_surface_term(
    user_data: *mut c_void,
    activity: *const ActivityBridgeActivity,
) {
    let current = unsafe { activity_bridge_activity_current_surface(activity) };
    unsafe { log(user_data) }.push(format!("term current={}", current as usize));
}

unsafe extern "C" fn on_input_event(
    user_data: *mut c_void,
    _activity: *const ActivityBridgeActivity,
    event: *mut c_void,
) -> bool {
    let value = unsafe { *event.cast::<u32>() };
    unsafe { log(user_data) }.push(format!("input {value}"));
    value > 100
}

unsafe extern "C" fn on_idle(user_data: *mut c_void, _activity: *const ActivityBridgeActivity) {
    unsafe { log(user_data) }.idles.fetch_add(1, Ordering::SeqCst);
}

unsafe extern "C" fn on_redraw_quit(
    _user_data: *mut c_void,
    activity: *const ActivityBridgeActivity,
) {
    unsafe { activity_bridge_activity_quit(activity) };
}

fn host(log: &HostLog) -> ActivityBridgeHost {
    ActivityBridgeHost {
        user_data: ptr::from_ref(log).cast_mut().cast(),
        finish: Some(host_finish),
    }
}

fn callbacks(log: &HostLog) -> ActivityBridgeCallbacks {
    ActivityBridgeCallbacks {
        user_data: ptr::from_ref(log).cast_mut().cast(),
        on_start: Some(on_start),
        on_stop: None,
        on_redraw: Some(on_redraw_quit),
        on_surface_init: Some(on_surface_init),
        on_surface_term: Some(on_surface_term),
        on_input_event: Some(on_input_event),
        on_idle: Some(on_idle),
    }
}

/// Host-side input queue. Events are heap `u32`s handed out as raw pointers.
#[derive(Default)]
struct HostQueue {
    events: Mutex<VecDeque<u32>>,
    finished: Mutex<Vec<(u32, bool)>>,
    waker: AtomicPtr<ActivityBridgeInputWaker>,
}

impl HostQueue {
    fn as_ptr(&self) -> *mut c_void {
        ptr::from_ref(self).cast_mut().cast()
    }

    fn push(&self, event: u32) {
        self.events.lock().push_back(event);
        let waker = self.waker.load(Ordering::SeqCst);
        if !waker.is_null() {
            assert!(unsafe { activity_bridge_input_waker_wake(waker) });
        }
    }
}

unsafe fn queue<'a>(queue: *mut c_void) -> &'a HostQueue {
    unsafe { &*queue.cast::<HostQueue>() }
}

unsafe extern "C" fn queue_attach(q: *mut c_void, waker: *const ActivityBridgeInputWaker) {
    unsafe { queue(q) }.waker.store(waker.cast_mut(), Ordering::SeqCst);
}

unsafe extern "C" fn queue_detach(q: *mut c_void) {
    unsafe { queue(q) }.waker.store(ptr::null_mut(), Ordering::SeqCst);
}

unsafe extern "C" fn queue_get_event(q: *mut c_void) -> *mut c_void {
    match unsafe { queue(q) }.events.lock().pop_front() {
        Some(event) => Box::into_raw(Box::new(event)).cast(),
        None => ptr::null_mut(),
    }
}

unsafe extern "C" fn queue_finish_event(q: *mut c_void, event: *mut c_void, handled: bool) {
    let event = unsafe { Box::from_raw(event.cast::<u32>()) };
    unsafe { queue(q) }.finished.lock().push((*event, handled));
}

fn vtable() -> ActivityBridgeInputQueueVTable {
    ActivityBridgeInputQueueVTable {
        attach: Some(queue_attach),
        detach: Some(queue_detach),
        get_event: Some(queue_get_event),
        pre_dispatch: None,
        finish_event: Some(queue_finish_event),
    }
}

#[test]
fn test_abi_constants() {
    assert_eq!(activity_bridge_abi_version(), 1);
    assert_eq!(
        activity_bridge_create_flag_start_idle(),
        flags::ACTIVITY_BRIDGE_CREATE_FLAG_START_IDLE
    );
}

#[test]
fn test_surface_lifecycle_through_c_abi() {
    let log = HostLog::default();
    let bridge = activity_bridge_create(
        host(&log),
        callbacks(&log),
        activity_bridge_create_flag_start_idle(),
    );
    assert!(!bridge.is_null());

    let mut window = 0u8;
    let surface: *mut c_void = ptr::from_mut(&mut window).cast();

    unsafe {
        let activity = activity_bridge_get_activity(bridge);
        assert!(activity_bridge_activity_is_running(activity));
        assert!(activity_bridge_activity_current_surface(activity).is_null());

        assert!(activity_bridge_start(bridge));
        assert!(activity_bridge_surface_created(bridge, surface));
        assert_eq!(activity_bridge_activity_current_surface(activity), surface);

        assert!(activity_bridge_surface_destroyed(bridge));
        assert!(activity_bridge_activity_current_surface(activity).is_null());

        activity_bridge_destroy(bridge);
    }

    let address = surface as usize;
    assert_eq!(
        log.calls(),
        vec![
            "start".to_string(),
            format!("init {address} current={address}"),
            "term current=0".to_string(),
        ]
    );
    assert_eq!(log.finishes.load(Ordering::SeqCst), 0);
}

#[test]
fn test_input_queue_through_c_abi() {
    let log = HostLog::default();
    let host_queue = HostQueue::default();
    let bridge = activity_bridge_create(host(&log), callbacks(&log), 0);
    assert!(!bridge.is_null());

    unsafe {
        assert!(activity_bridge_input_queue_created(
            bridge,
            host_queue.as_ptr(),
            &vtable()
        ));
        assert!(!host_queue.waker.load(Ordering::SeqCst).is_null());

        host_queue.push(7);
        host_queue.push(300);
        assert!(wait_until(|| host_queue.finished.lock().len() == 2));

        assert!(activity_bridge_input_queue_destroyed(bridge));
        assert!(host_queue.waker.load(Ordering::SeqCst).is_null());

        activity_bridge_destroy(bridge);
    }

    assert_eq!(*host_queue.finished.lock(), vec![(7, false), (300, true)]);
    assert_eq!(
        log.calls(),
        vec!["input 7".to_string(), "input 300".to_string()]
    );
}

#[test]
fn test_quit_from_callback_through_c_abi() {
    let log = HostLog::default();
    let bridge = activity_bridge_create(host(&log), callbacks(&log), 0);
    assert!(!bridge.is_null());

    let mut window = 0u8;
    let surface: *mut c_void = ptr::from_mut(&mut window).cast();

    unsafe {
        let activity = activity_bridge_get_activity(bridge);
        assert!(activity_bridge_surface_created(bridge, surface));
        assert!(wait_until(|| log.idles.load(Ordering::SeqCst) > 0));

        assert!(activity_bridge_redraw_needed(bridge));
        assert!(wait_until(|| !activity_bridge_activity_is_running(activity)));
        assert_eq!(log.finishes.load(Ordering::SeqCst), 1);

        activity_bridge_activity_quit(activity);
        assert_eq!(log.finishes.load(Ordering::SeqCst), 1);
        assert!(!activity_bridge_surface_created(bridge, surface));

        activity_bridge_destroy(bridge);
    }
}

#[test]
fn test_invalid_arguments_are_rejected() {
    let log = HostLog::default();
    let host_queue = HostQueue::default();
    let bridge = activity_bridge_create(host(&log), callbacks(&log), 0);
    assert!(!bridge.is_null());

    let mut incomplete = vtable();
    incomplete.get_event = None;

    unsafe {
        assert!(!activity_bridge_surface_created(bridge, ptr::null_mut()));
        assert!(!activity_bridge_input_queue_created(
            bridge,
            host_queue.as_ptr(),
            ptr::null()
        ));
        assert!(!activity_bridge_input_queue_created(
            bridge,
            host_queue.as_ptr(),
            &incomplete
        ));
        assert!(!activity_bridge_input_queue_created(
            bridge,
            ptr::null_mut(),
            &vtable()
        ));
        assert!(host_queue.waker.load(Ordering::SeqCst).is_null());

        activity_bridge_destroy(bridge);
        activity_bridge_destroy(ptr::null_mut());
    }
}

#[cfg(not(debug_assertions))]
#[test]
fn test_null_instance_pointers_are_ignored_in_release() {
    unsafe {
        assert!(!activity_bridge_start(ptr::null_mut()));
        assert!(activity_bridge_get_activity(ptr::null_mut()).is_null());
        assert!(!activity_bridge_activity_is_running(ptr::null()));
        assert!(activity_bridge_activity_current_surface(ptr::null()).is_null());
        assert!(!activity_bridge_input_waker_wake(ptr::null()));
    }
}
