//! ### English
//! `create_flags` bits accepted by `activity_bridge_create`.
//!
//! Only the initial poll policy is selectable today; unknown bits are ignored.
//!
//! ### 中文
//! `activity_bridge_create` 接受的 `create_flags` 位。
//!
//! 目前只能选择初始轮询策略；未知位会被忽略。

/// ### English
/// Start with a blocking poll policy (`animating = false`): the worker sleeps until a command
/// or input event arrives instead of ticking idle continuously.
///
/// The application can switch policies later with `set_animating`.
///
/// ### 中文
/// 以阻塞轮询策略启动（`animating = false`）：worker 会休眠直到有命令或输入事件到达，
/// 而不是持续执行 idle tick。
///
/// 应用之后可通过 `set_animating` 切换策略。
pub const ACTIVITY_BRIDGE_CREATE_FLAG_START_IDLE: u32 = 1 << 0;
