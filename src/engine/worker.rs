//! ### English
//! Worker thread: owns the multiplexer, applies commands and drives the application callbacks.
//!
//! ### 中文
//! worker 线程：持有多路复用器，应用命令并驱动应用回调。

use crossbeam_channel as channel;

use super::channel::CommandReceiver;
use super::command::{self, Command};
use super::input::{self, input_waker};
use super::lifecycle::Activity;
use super::looper::{Looper, Wakeup};
use super::platform::{ActivityHandler, InputQueue, Platform};
use super::state::{Shared, WorkerPhase};

/// ### English
/// Worker thread entry function.
/// Returns once the bridge stops running; teardown has completed by then.
///
/// ### 中文
/// worker 线程入口函数。bridge 停止运行后返回，返回时拆除已完成。
pub(crate) fn run_worker<P, H>(
    activity: Activity<P>,
    handler: H,
    commands: CommandReceiver,
    wake: channel::Receiver<()>,
    ready: channel::Sender<()>,
) where
    P: Platform,
    H: ActivityHandler<P>,
{
    let mut worker = Worker {
        looper: Looper::new(commands, wake),
        activity: &activity,
        handler,
        exit: TerminateOnExit {
            shared: activity.shared(),
            attached: None,
        },
    };

    activity.shared().set_phase(WorkerPhase::Running);
    tracing::debug!("worker ready");
    let _ = ready.send(());

    worker.run();
    worker.teardown();
}

/// ### English
/// Owns the attached input queue. On drop it detaches that queue, clears both handshake slots,
/// releases handshake waiters and marks the worker terminated, even if a callback panicked.
///
/// ### 中文
/// 持有已挂接的输入队列。drop 时 detach 该队列、清空两个握手槽位、释放握手等待方，
/// 并将 worker 标记为已终止；即使回调 panic 也会执行。
struct TerminateOnExit<'a, P: Platform> {
    shared: &'a Shared<P>,
    /// ### English
    /// Input queue currently attached to the looper.
    ///
    /// ### 中文
    /// 当前挂接到 looper 的输入队列。
    attached: Option<P::InputQueue>,
}

impl<P: Platform> Drop for TerminateOnExit<'_, P> {
    fn drop(&mut self) {
        if let Some(queue) = self.attached.take() {
            tracing::warn!(?queue, "worker unwinding, detaching input queue");
            queue.detach();
        }
        {
            let mut state = self.shared.state.lock();
            state.surface_ready = false;
            let _ = state.surface.clear();
            let _ = state.input_queue.clear();
        }
        self.shared.stop();
        self.shared.set_phase(WorkerPhase::Terminated);
    }
}

struct Worker<'a, P: Platform, H> {
    looper: Looper,
    activity: &'a Activity<P>,
    handler: H,
    exit: TerminateOnExit<'a, P>,
}

impl<P, H> Worker<'_, P, H>
where
    P: Platform,
    H: ActivityHandler<P>,
{
    fn shared(&self) -> &Shared<P> {
        self.activity.shared()
    }

    fn run(&mut self) {
        while let Some(block) = self.shared().poll_policy() {
            let mut wakeup = self.looper.poll_once(block);
            while wakeup != Wakeup::Timeout {
                self.process(wakeup);
                if !self.activity.is_running() {
                    break;
                }
                wakeup = self.looper.poll_once(false);
            }

            if self.shared().should_idle() {
                self.handler.on_idle(self.activity);
            }
        }
    }

    fn process(&mut self, wakeup: Wakeup) {
        match wakeup {
            Wakeup::Command => self.read_command(),
            Wakeup::Input => self.drain_input(),
            Wakeup::Wake | Wakeup::Timeout => {}
        }
    }

    fn read_command(&mut self) {
        match self.looper.commands().read() {
            Ok(Some(tag)) => {
                if let Some(command) = command::decode(tag) {
                    self.dispatch(command);
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(%err, "failed to read command, quitting");
                self.shared().quit();
            }
        }
    }

    fn dispatch(&mut self, command: Command) {
        tracing::trace!(?command, "dispatch");
        match command {
            Command::SetInputQueue => self.apply_input_queue(),
            Command::SetSurface => self.apply_surface(),
            Command::Start => self.handler.on_start(self.activity),
            Command::Stop => self.handler.on_stop(self.activity),
            Command::Redraw => self.handler.on_redraw(self.activity),
        }
    }

    fn detach_input(&mut self) {
        if let Some(queue) = self.exit.attached.take() {
            queue.detach();
            self.looper.clear_input();
            tracing::debug!(?queue, "input queue detached");
        }
    }

    fn apply_input_queue(&mut self) {
        self.detach_input();

        let (_previous, current) = self.shared().publish_input_queue();
        if let Some(queue) = current {
            let (waker, rx) = input_waker();
            self.looper.set_input(rx);
            // Events queued before the attach are drained on the next iteration.
            waker.wake();
            queue.attach(waker);
            tracing::debug!(?queue, "input queue attached");
            self.exit.attached = Some(queue);
        }

        self.shared().settle_input_queue();
    }

    fn apply_surface(&mut self) {
        let (previous, current) = self.shared().publish_surface();
        tracing::debug!(?previous, ?current, "surface changed");
        drop(previous);

        let ready = match &current {
            Some(surface) => {
                self.handler.on_surface_init(self.activity, surface);
                true
            }
            None => {
                self.handler.on_surface_term(self.activity);
                false
            }
        };
        self.shared().settle_surface(ready);
    }

    fn drain_input(&mut self) {
        let Some(queue) = &self.exit.attached else {
            return;
        };
        let handler = &mut self.handler;
        let activity = self.activity;
        input::drain(queue, |event| handler.on_input_event(activity, event));
    }

    fn teardown(&mut self) {
        tracing::debug!(input_attached = self.looper.has_input(), "worker tearing down");

        let was_ready = {
            let mut state = self.shared().state.lock();
            std::mem::replace(&mut state.surface_ready, false)
        };
        if was_ready {
            self.handler.on_surface_term(self.activity);
        }

        self.detach_input();

        {
            let shared = self.shared();
            let mut state = shared.state.lock();
            let _ = state.surface.clear();
            let _ = state.input_queue.clear();
            shared.applied.notify_all();
        }

        let dropped = self.looper.commands().drain();
        if dropped > 0 {
            tracing::debug!(dropped, "discarded unread commands");
        }
    }
}
