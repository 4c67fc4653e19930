//! ### English
//! Bridge runtime that spawns and owns the dedicated worker thread.
//!
//! ### 中文
//! 创建并持有独立 worker 线程的 bridge 运行时。

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{self as channel, RecvTimeoutError};

use super::channel::{CommandSender, command_channel};
use super::command::Command;
use super::config::BridgeConfig;
use super::error::BridgeError;
use super::lifecycle::Activity;
use super::platform::{ActivityHandler, Platform};
use super::state::{Shared, SharedState, WorkerPhase};
use super::worker;

/// ### English
/// Lifecycle notifications a host delivers on its control thread.
///
/// ### 中文
/// 宿主在控制线程上投递的生命周期通知。
pub enum HostEvent<P: Platform> {
    InputQueueCreated(P::InputQueue),
    InputQueueDestroyed(P::InputQueue),
    SurfaceCreated(P::Surface),
    SurfaceDestroyed(P::Surface),
    RedrawNeeded,
    Start,
    Stop,
    Pause,
    Resume,
    FocusChanged(bool),
    ConfigurationChanged,
    LowMemory,
    SurfaceResized,
    ContentRectChanged,
}

impl<P: Platform> HostEvent<P> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InputQueueCreated(_) => "InputQueueCreated",
            Self::InputQueueDestroyed(_) => "InputQueueDestroyed",
            Self::SurfaceCreated(_) => "SurfaceCreated",
            Self::SurfaceDestroyed(_) => "SurfaceDestroyed",
            Self::RedrawNeeded => "RedrawNeeded",
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::Pause => "Pause",
            Self::Resume => "Resume",
            Self::FocusChanged(_) => "FocusChanged",
            Self::ConfigurationChanged => "ConfigurationChanged",
            Self::LowMemory => "LowMemory",
            Self::SurfaceResized => "SurfaceResized",
            Self::ContentRectChanged => "ContentRectChanged",
        }
    }
}

/// ### English
/// Bridge that owns the dedicated worker thread.
///
/// All methods are meant to be called from the host's control thread. Dropping the bridge
/// stops the worker and joins it.
///
/// ### 中文
/// 持有独立 worker 线程的 bridge。
///
/// 所有方法都应在宿主的控制线程调用。drop bridge 时会停止并 join worker。
pub struct ActivityBridge<P: Platform> {
    /// ### English
    /// Context handle shared with the worker.
    ///
    /// ### 中文
    /// 与 worker 共享的上下文句柄。
    activity: Activity<P>,
    /// ### English
    /// Write side of the command channel.
    ///
    /// ### 中文
    /// 命令 channel 的写端。
    commands: CommandSender,
    /// ### English
    /// Join handle for the worker thread (owned by this bridge).
    ///
    /// ### 中文
    /// worker 线程的 join handle（由本 bridge 持有）。
    thread: Option<thread::JoinHandle<()>>,
}

impl<P: Platform> ActivityBridge<P> {
    /// ### English
    /// Spawns the worker thread and blocks until it reports readiness (or times out).
    ///
    /// #### Parameters
    /// - `platform`: Host activity handle.
    /// - `handler`: Application callbacks, moved onto the worker thread.
    /// - `config`: Thread name, initial poll policy and readiness timeout.
    ///
    /// ### 中文
    /// 创建 worker 线程，并阻塞等待其报告就绪（或超时）。
    ///
    /// #### 参数
    /// - `platform`：宿主 activity 句柄。
    /// - `handler`：应用回调，会被移动到 worker 线程。
    /// - `config`：线程名、初始轮询策略以及就绪超时。
    pub fn new<H>(platform: P, handler: H, config: BridgeConfig) -> Result<Self, BridgeError>
    where
        H: ActivityHandler<P>,
    {
        let (wake_tx, wake_rx) = channel::bounded(1);
        let shared = Arc::new(Shared::new(platform, wake_tx, config.animating));
        let activity = Activity::from_shared(shared);
        let activity_for_thread = activity.clone();

        let (commands, commands_for_thread) = command_channel();
        let (ready_tx, ready_rx) = channel::bounded(1);

        let thread = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                worker::run_worker(
                    activity_for_thread,
                    handler,
                    commands_for_thread,
                    wake_rx,
                    ready_tx,
                );
            })?;

        match ready_rx.recv_timeout(config.init_timeout) {
            Ok(()) => {
                tracing::info!(thread = %config.thread_name, "activity bridge started");
                Ok(Self {
                    activity,
                    commands,
                    thread: Some(thread),
                })
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::error!(timeout = ?config.init_timeout, "worker thread did not become ready");
                activity.shared().stop();
                // Detached: a late worker sees `running == false` and tears down without polling.
                drop(thread);
                Err(BridgeError::InitTimeout(config.init_timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                tracing::error!("worker thread exited during initialization");
                let _ = thread.join();
                Err(BridgeError::WorkerExited)
            }
        }
    }

    /// ### English
    /// Context handle for this bridge.
    ///
    /// ### 中文
    /// 本 bridge 的上下文句柄。
    pub fn activity(&self) -> &Activity<P> {
        &self.activity
    }

    /// ### English
    /// Hands a new input queue to the worker (`None` detaches) and waits until it is attached.
    ///
    /// ### 中文
    /// 将新的输入队列交给 worker（`None` 表示 detach），并等待其挂接完成。
    pub fn set_input_queue(&self, queue: Option<P::InputQueue>) -> Result<(), BridgeError> {
        self.activity.shared().request(
            &self.commands,
            Command::SetInputQueue,
            SharedState::input_queue_slot,
            queue,
        )
    }

    /// ### English
    /// Hands a new surface to the worker (`None` removes it) and waits until the worker's
    /// surface callbacks for the change have returned.
    ///
    /// ### 中文
    /// 将新 surface 交给 worker（`None` 表示移除），并等待 worker 针对本次变更的 surface 回调全部返回。
    pub fn set_surface(&self, surface: Option<P::Surface>) -> Result<(), BridgeError> {
        self.activity.shared().request(
            &self.commands,
            Command::SetSurface,
            SharedState::surface_slot,
            surface,
        )
    }

    pub fn start(&self) -> Result<(), BridgeError> {
        self.activity.shared().fire(&self.commands, Command::Start)
    }

    pub fn stop(&self) -> Result<(), BridgeError> {
        self.activity.shared().fire(&self.commands, Command::Stop)
    }

    pub fn redraw(&self) -> Result<(), BridgeError> {
        self.activity.shared().fire(&self.commands, Command::Redraw)
    }

    /// ### English
    /// Routes one host notification.
    ///
    /// Destroy notifications ignore the handle they carry: the bridge detaches whatever is
    /// current and the host's reference is released when the event is dropped.
    ///
    /// ### 中文
    /// 路由一条宿主通知。
    ///
    /// destroy 类通知会忽略其携带的句柄：bridge 会移除当前值，宿主的引用在事件 drop 时释放。
    pub fn dispatch(&self, event: HostEvent<P>) -> Result<(), BridgeError> {
        match event {
            HostEvent::InputQueueCreated(queue) => self.set_input_queue(Some(queue)),
            HostEvent::InputQueueDestroyed(_queue) => self.set_input_queue(None),
            HostEvent::SurfaceCreated(surface) => self.set_surface(Some(surface)),
            HostEvent::SurfaceDestroyed(_surface) => self.set_surface(None),
            HostEvent::RedrawNeeded => self.redraw(),
            HostEvent::Start => self.start(),
            HostEvent::Stop => self.stop(),
            HostEvent::FocusChanged(focused) => {
                tracing::debug!(focused, "focus changed");
                Ok(())
            }
            other => {
                tracing::debug!(event = other.name(), "host event ignored");
                Ok(())
            }
        }
    }

    /// ### English
    /// Stops the worker and requests host-level termination. Idempotent.
    ///
    /// ### 中文
    /// 停止 worker 并请求宿主结束 activity。幂等。
    pub fn quit(&self) {
        self.activity.quit();
    }

    pub fn set_animating(&self, animating: bool) {
        self.activity.set_animating(animating);
    }

    pub fn current_surface(&self) -> Option<P::Surface> {
        self.activity.current_surface()
    }

    pub fn is_running(&self) -> bool {
        self.activity.is_running()
    }

    pub fn phase(&self) -> WorkerPhase {
        self.activity.phase()
    }

    /// ### English
    /// Stops the worker thread and joins it. The worker's teardown runs the pending surface
    /// term callback and detaches the input queue before this returns.
    ///
    /// ### 中文
    /// 停止 worker 线程并 join。返回前 worker 的拆除流程会执行待处理的 surface term 回调并 detach 输入队列。
    pub fn shutdown(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.activity.shared().stop();
            if thread.join().is_err() {
                tracing::error!("worker thread panicked");
            }
            tracing::info!("activity bridge shut down");
        }
    }
}

impl<P: Platform> Drop for ActivityBridge<P> {
    /// ### English
    /// Ensures the worker thread is shut down when the bridge is dropped.
    ///
    /// ### 中文
    /// 确保在 bridge drop 时关闭 worker 线程。
    fn drop(&mut self) {
        self.shutdown();
    }
}
