/// ### English
/// Bridge internal modules (command channel, handshakes, worker loop, input pump, lifecycle).
///
/// ### 中文
/// bridge 内部模块（命令 channel、握手、worker 循环、输入泵、生命周期）。
pub mod bridge;
pub(crate) mod channel;
pub mod command;
pub mod config;
pub mod error;
pub mod flags;
pub(crate) mod handshake;
pub mod input;
pub mod lifecycle;
pub(crate) mod looper;
pub mod platform;
pub(crate) mod state;
pub(crate) mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use bridge::{ActivityBridge, HostEvent};
pub use command::{Command, UnknownCommand};
pub use config::{BridgeConfig, DEFAULT_INIT_TIMEOUT, DEFAULT_THREAD_NAME};
pub use error::BridgeError;
pub use input::{DrainStats, InputWaker};
pub use lifecycle::Activity;
pub use platform::{ActivityHandler, InputEvent, InputQueue, Platform};
pub use state::WorkerPhase;
