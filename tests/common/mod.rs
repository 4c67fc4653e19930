//! Host fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use activity_bridge::{Activity, ActivityHandler, InputQueue, InputWaker, Platform};
use parking_lot::Mutex;

/// Host activity that counts `finish` requests.
#[derive(Clone, Default)]
pub struct FakePlatform {
    finishes: Arc<AtomicUsize>,
}

impl FakePlatform {
    pub fn finish_count(&self) -> usize {
        self.finishes.load(Ordering::SeqCst)
    }
}

impl Platform for FakePlatform {
    type Surface = &'static str;
    type InputQueue = FakeQueue;

    fn finish(&self) {
        self.finishes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct QueueState {
    events: VecDeque<u32>,
    ime_claims: HashSet<u32>,
    /// `(event, handled)` in finish order, including events the IME finished itself.
    finished: Vec<(u32, bool)>,
    waker: Option<InputWaker>,
    attaches: usize,
    detaches: usize,
}

/// Input queue with an IME stage: claimed events are finished by the platform itself.
#[derive(Clone)]
pub struct FakeQueue {
    name: &'static str,
    state: Arc<Mutex<QueueState>>,
}

impl FakeQueue {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::default(),
        }
    }

    /// Enqueues events and signals readiness the way a host looper would.
    pub fn push(&self, events: &[u32]) {
        let mut state = self.state.lock();
        state.events.extend(events.iter().copied());
        if let Some(waker) = &state.waker {
            waker.wake();
        }
    }

    pub fn ime_claims(&self, event: u32) {
        self.state.lock().ime_claims.insert(event);
    }

    pub fn finished(&self) -> Vec<(u32, bool)> {
        self.state.lock().finished.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.state.lock().waker.is_some()
    }

    pub fn attach_counts(&self) -> (usize, usize) {
        let state = self.state.lock();
        (state.attaches, state.detaches)
    }
}

impl PartialEq for FakeQueue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Debug for FakeQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FakeQueue").field(&self.name).finish()
    }
}

impl InputQueue for FakeQueue {
    type Event = u32;

    fn attach(&self, waker: InputWaker) {
        let mut state = self.state.lock();
        state.attaches += 1;
        state.waker = Some(waker);
    }

    fn detach(&self) {
        let mut state = self.state.lock();
        state.detaches += 1;
        state.waker = None;
    }

    fn get_event(&self) -> Option<u32> {
        self.state.lock().events.pop_front()
    }

    fn pre_dispatch(&self, event: &u32) -> bool {
        let mut state = self.state.lock();
        if state.ime_claims.contains(event) {
            state.finished.push((*event, true));
            return true;
        }
        false
    }

    fn finish_event(&self, event: u32, handled: bool) {
        self.state.lock().finished.push((event, handled));
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Start,
    Stop,
    Redraw,
    SurfaceInit(&'static str),
    /// Surface reported as current when the term callback ran.
    SurfaceTerm(Option<&'static str>),
    Input(u32),
}

/// Application that records every callback.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    idles: Arc<AtomicUsize>,
    /// Idle ticks observed while no surface was ready.
    idles_without_surface: Arc<AtomicUsize>,
    quit_on_redraw: bool,
    panic_on_redraw: bool,
}

impl Recorder {
    pub fn quitting_on_redraw() -> Self {
        Self {
            quit_on_redraw: true,
            ..Self::default()
        }
    }

    pub fn panicking_on_redraw() -> Self {
        Self {
            panic_on_redraw: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn idles(&self) -> usize {
        self.idles.load(Ordering::SeqCst)
    }

    pub fn idles_without_surface(&self) -> usize {
        self.idles_without_surface.load(Ordering::SeqCst)
    }
}

impl ActivityHandler<FakePlatform> for Recorder {
    fn on_start(&mut self, _activity: &Activity<FakePlatform>) {
        self.calls.lock().push(Call::Start);
    }

    fn on_stop(&mut self, _activity: &Activity<FakePlatform>) {
        self.calls.lock().push(Call::Stop);
    }

    fn on_redraw(&mut self, activity: &Activity<FakePlatform>) {
        self.calls.lock().push(Call::Redraw);
        if self.quit_on_redraw {
            activity.quit();
        }
        if self.panic_on_redraw {
            panic!("redraw failed");
        }
    }

    fn on_surface_init(&mut self, _activity: &Activity<FakePlatform>, surface: &&'static str) {
        self.calls.lock().push(Call::SurfaceInit(*surface));
    }

    fn on_surface_term(&mut self, activity: &Activity<FakePlatform>) {
        self.calls
            .lock()
            .push(Call::SurfaceTerm(activity.current_surface()));
    }

    fn on_input_event(&mut self, _activity: &Activity<FakePlatform>, event: &u32) -> bool {
        self.calls.lock().push(Call::Input(*event));
        event % 2 == 0
    }

    fn on_idle(&mut self, activity: &Activity<FakePlatform>) {
        if !activity.is_surface_ready() || activity.current_surface().is_none() {
            self.idles_without_surface.fetch_add(1, Ordering::SeqCst);
        }
        self.idles.fetch_add(1, Ordering::SeqCst);
    }
}

/// Polls `condition` until it holds or five seconds pass.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}
