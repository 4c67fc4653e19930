//! Fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::input::InputWaker;
use super::platform::{InputQueue, Platform};

#[derive(Default)]
pub(crate) struct TestPlatform {
    finishes: AtomicUsize,
}

impl TestPlatform {
    pub(crate) fn finish_count(&self) -> usize {
        self.finishes.load(Ordering::SeqCst)
    }
}

impl Platform for TestPlatform {
    type Surface = u32;
    type InputQueue = TestQueue;

    fn finish(&self) {
        self.finishes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct QueueLog {
    events: VecDeque<u32>,
    claimed: Vec<u32>,
    finished: Vec<(u32, bool)>,
    waker: Option<InputWaker>,
}

/// Input queue identified by `id`; clones share the same event log.
#[derive(Clone)]
pub(crate) struct TestQueue {
    id: u32,
    log: Arc<Mutex<QueueLog>>,
}

impl TestQueue {
    pub(crate) fn new(id: u32) -> Self {
        Self {
            id,
            log: Arc::default(),
        }
    }

    pub(crate) fn push_events(&self, events: &[u32]) {
        let mut log = self.log.lock();
        log.events.extend(events.iter().copied());
        if let Some(waker) = &log.waker {
            waker.wake();
        }
    }

    /// Makes `pre_dispatch` claim `event`.
    pub(crate) fn claim(&self, event: u32) {
        self.log.lock().claimed.push(event);
    }

    pub(crate) fn finished(&self) -> Vec<(u32, bool)> {
        self.log.lock().finished.clone()
    }

    pub(crate) fn pending_events(&self) -> usize {
        self.log.lock().events.len()
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.log.lock().waker.is_some()
    }
}

impl PartialEq for TestQueue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::fmt::Debug for TestQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TestQueue").field(&self.id).finish()
    }
}

impl InputQueue for TestQueue {
    type Event = u32;

    fn attach(&self, waker: InputWaker) {
        self.log.lock().waker = Some(waker);
    }

    fn detach(&self) {
        self.log.lock().waker = None;
    }

    fn get_event(&self) -> Option<u32> {
        self.log.lock().events.pop_front()
    }

    fn pre_dispatch(&self, event: &u32) -> bool {
        self.log.lock().claimed.contains(event)
    }

    fn finish_event(&self, event: u32, handled: bool) {
        self.log.lock().finished.push((event, handled));
    }
}
