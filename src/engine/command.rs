//! ### English
//! Internal command protocol between the control thread and the dedicated worker thread.
//! Each command travels as a single `u8` tag; operands travel through the pending slots in
//! shared state, never through the channel.
//!
//! ### 中文
//! 控制线程与独立 worker 线程之间的内部命令协议。
//! 每条命令以单个 `u8` 标签传输；操作数通过共享状态中的 pending 槽位传递，而不是走 channel。

use thiserror::Error;

/// ### English
/// Commands sent from the control thread to the worker thread.
///
/// ### 中文
/// 从控制线程发送到 worker 线程的命令。
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// ### English
    /// Swap the attached input queue for the pending one (blocking handshake).
    ///
    /// ### 中文
    /// 用 pending 输入队列替换当前已挂接的输入队列（阻塞握手）。
    SetInputQueue = 1,
    /// ### English
    /// Swap the current surface for the pending one (blocking handshake).
    ///
    /// ### 中文
    /// 用 pending surface 替换当前 surface（阻塞握手）。
    SetSurface = 2,
    /// ### English
    /// Lifecycle start notification.
    ///
    /// ### 中文
    /// 生命周期 start 通知。
    Start = 3,
    /// ### English
    /// Lifecycle stop notification.
    ///
    /// ### 中文
    /// 生命周期 stop 通知。
    Stop = 4,
    /// ### English
    /// The host asked for the surface to be redrawn.
    ///
    /// ### 中文
    /// 宿主请求重绘 surface。
    Redraw = 5,
}

/// ### English
/// A tag read from the channel that does not name any [`Command`].
///
/// ### 中文
/// 从 channel 读到的、不对应任何 [`Command`] 的标签。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown command tag {0}")]
pub struct UnknownCommand(pub u8);

impl Command {
    /// ### English
    /// Wire encoding of this command.
    ///
    /// ### 中文
    /// 该命令的传输编码。
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// ### English
    /// Whether the sender of this command blocks until the worker applied it.
    ///
    /// ### 中文
    /// 发送该命令的一方是否需要阻塞等待 worker 应用完成。
    #[inline]
    pub const fn is_handshake(self) -> bool {
        matches!(self, Self::SetInputQueue | Self::SetSurface)
    }
}

impl TryFrom<u8> for Command {
    type Error = UnknownCommand;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::SetInputQueue),
            2 => Ok(Self::SetSurface),
            3 => Ok(Self::Start),
            4 => Ok(Self::Stop),
            5 => Ok(Self::Redraw),
            other => Err(UnknownCommand(other)),
        }
    }
}

/// ### English
/// Decodes a tag on the worker thread.
///
/// An unknown tag is a protocol violation: it is fatal in debug builds and logged then
/// ignored in release builds.
///
/// ### 中文
/// 在 worker 线程解码一个标签。
///
/// 未知标签属于协议违规：debug 构建下直接断言失败；release 构建下记录日志后忽略。
pub(crate) fn decode(tag: u8) -> Option<Command> {
    match Command::try_from(tag) {
        Ok(command) => Some(command),
        Err(err) => {
            tracing::error!(tag, "protocol violation: {err}");
            debug_assert!(false, "unknown command tag {tag}");
            None
        }
    }
}
