/// ### English
/// `activity_bridge` crate root.
/// The Rust API is re-exported from `engine`; `ffi` exposes the same bridge through a C ABI.
///
/// ### 中文
/// `activity_bridge` 的 crate 根。
/// Rust API 从 `engine` 重新导出；`ffi` 通过 C ABI 暴露同一个 bridge。
mod engine;
pub mod ffi;

pub use engine::flags;
pub use engine::{
    Activity, ActivityBridge, ActivityHandler, BridgeConfig, BridgeError, Command,
    DEFAULT_INIT_TIMEOUT, DEFAULT_THREAD_NAME, DrainStats, HostEvent, InputEvent, InputQueue,
    InputWaker, Platform, UnknownCommand, WorkerPhase,
};
pub use engine::input::drain as drain_input;
