//! ### English
//! Command channel between the control thread and the worker thread.
//!
//! Commands are fixed-size records (one `u8` tag). The receiving side is readable exactly
//! when an unread command exists, which is all the worker's multiplexer needs.
//!
//! ### 中文
//! 控制线程与 worker 线程之间的命令 channel。
//!
//! 命令是定长记录（单个 `u8` 标签）。接收端仅在存在未读命令时可读，这正是 worker 多路复用器所需的全部性质。

use crossbeam_channel::{self as channel, TryRecvError};

use super::command::Command;
use super::error::BridgeError;

/// ### English
/// Creates a connected sender/receiver pair.
///
/// ### 中文
/// 创建一对相连的发送端/接收端。
pub(crate) fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = channel::unbounded();
    (CommandSender { tx }, CommandReceiver { rx })
}

/// ### English
/// Write side, owned by the control thread.
///
/// ### 中文
/// 写端，由控制线程持有。
pub(crate) struct CommandSender {
    tx: channel::Sender<u8>,
}

impl CommandSender {
    /// ### English
    /// Writes one command. Returns `false` only if the receiving side is gone.
    ///
    /// ### 中文
    /// 写入一条命令。仅当接收端已不存在时返回 `false`。
    pub(crate) fn write(&self, command: Command) -> bool {
        self.write_tag(command.tag())
    }

    /// ### English
    /// Writes a raw tag.
    ///
    /// ### 中文
    /// 写入原始标签。
    pub(crate) fn write_tag(&self, tag: u8) -> bool {
        self.tx.send(tag).is_ok()
    }
}

/// ### English
/// Read side, owned by the worker thread.
///
/// ### 中文
/// 读端，由 worker 线程持有。
pub(crate) struct CommandReceiver {
    rx: channel::Receiver<u8>,
}

impl CommandReceiver {
    /// ### English
    /// Reads the next tag in write order.
    ///
    /// Returns `Ok(None)` when nothing is pending, and `Err(ChannelClosed)` once every sender
    /// has been dropped and the channel is empty.
    ///
    /// ### 中文
    /// 按写入顺序读取下一个标签。
    ///
    /// 没有待处理命令时返回 `Ok(None)`；所有发送端都已 drop 且 channel 为空时返回 `Err(ChannelClosed)`。
    pub(crate) fn read(&self) -> Result<Option<u8>, BridgeError> {
        match self.rx.try_recv() {
            Ok(tag) => Ok(Some(tag)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(BridgeError::ChannelClosed),
        }
    }

    /// ### English
    /// Discards every unread tag and returns how many were dropped.
    ///
    /// ### 中文
    /// 丢弃所有未读标签，返回丢弃的数量。
    pub(crate) fn drain(&self) -> usize {
        self.rx.try_iter().count()
    }

    /// ### English
    /// Underlying receiver, registered with the worker's multiplexer.
    ///
    /// ### 中文
    /// 底层接收端，用于注册到 worker 的多路复用器。
    pub(super) fn receiver(&self) -> &channel::Receiver<u8> {
        &self.rx
    }
}
