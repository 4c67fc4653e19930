//! ### English
//! Worker multiplexer over the command channel, the wake signal and the attached input queue.
//!
//! ### 中文
//! worker 的多路复用器：同时监听命令 channel、唤醒信号以及已挂接的输入队列。

use crossbeam_channel::{self as channel, Select, TryRecvError};

use super::channel::CommandReceiver;

/// ### English
/// Source that became ready.
///
/// ### 中文
/// 变为就绪的来源。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Wakeup {
    /// An unread command (or a closed channel) is waiting.
    Command,
    /// The attached input queue has events.
    Input,
    /// Lifecycle state changed.
    Wake,
    /// Nothing was ready for a non-blocking poll.
    Timeout,
}

pub(crate) struct Looper {
    commands: CommandReceiver,
    wake: channel::Receiver<()>,
    input: Option<channel::Receiver<()>>,
}

impl Looper {
    pub(crate) fn new(commands: CommandReceiver, wake: channel::Receiver<()>) -> Self {
        Self {
            commands,
            wake,
            input: None,
        }
    }

    pub(crate) fn commands(&self) -> &CommandReceiver {
        &self.commands
    }

    /// ### English
    /// Registers the readiness receiver of a newly attached input queue.
    ///
    /// ### 中文
    /// 注册新挂接输入队列的就绪接收端。
    pub(crate) fn set_input(&mut self, input: channel::Receiver<()>) {
        self.input = Some(input);
    }

    /// ### English
    /// Unregisters the input source. Dropping the receiver disarms every outstanding waker.
    ///
    /// ### 中文
    /// 注销输入来源。drop 接收端后，所有尚未失效的 waker 都会失效。
    pub(crate) fn clear_input(&mut self) {
        self.input = None;
    }

    pub(crate) fn has_input(&self) -> bool {
        self.input.is_some()
    }

    /// ### English
    /// Waits for one ready source.
    ///
    /// With `block == false` this returns [`Wakeup::Timeout`] immediately when nothing is ready.
    /// Wake and input signals are consumed here; commands are left for the caller to read.
    ///
    /// ### 中文
    /// 等待一个就绪来源。
    ///
    /// `block == false` 时若没有任何来源就绪，立即返回 [`Wakeup::Timeout`]。
    /// 唤醒信号与输入信号在此处被消费；命令留给调用方读取。
    pub(crate) fn poll_once(&mut self, block: bool) -> Wakeup {
        let (index, command_op, wake_op) = {
            let mut select = Select::new();
            let command_op = select.recv(self.commands.receiver());
            let wake_op = select.recv(&self.wake);
            if let Some(input) = &self.input {
                select.recv(input);
            }

            let index = if block {
                select.ready()
            } else {
                match select.try_ready() {
                    Ok(index) => index,
                    Err(_) => return Wakeup::Timeout,
                }
            };
            (index, command_op, wake_op)
        };

        if index == command_op {
            Wakeup::Command
        } else if index == wake_op {
            let _ = self.wake.try_recv();
            Wakeup::Wake
        } else {
            self.take_input_signal()
        }
    }

    fn take_input_signal(&mut self) -> Wakeup {
        let Some(input) = &self.input else {
            return Wakeup::Wake;
        };
        match input.try_recv() {
            Ok(()) => Wakeup::Input,
            Err(TryRecvError::Empty) => Wakeup::Wake,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("input waker dropped while the queue is attached, ignoring input");
                self.clear_input();
                Wakeup::Wake
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::engine::channel::command_channel;
    use crate::engine::command::Command;
    use crate::engine::input::input_waker;

    #[test]
    fn test_non_blocking_poll_times_out() {
        let (_tx, rx) = command_channel();
        let (_wake_tx, wake_rx) = channel::bounded(1);
        let mut looper = Looper::new(rx, wake_rx);
        assert_eq!(looper.poll_once(false), Wakeup::Timeout);
    }

    #[test]
    fn test_command_is_left_for_the_reader() {
        let (tx, rx) = command_channel();
        let (_wake_tx, wake_rx) = channel::bounded(1);
        let mut looper = Looper::new(rx, wake_rx);

        assert!(tx.write(Command::Redraw));
        assert_eq!(looper.poll_once(false), Wakeup::Command);
        assert_eq!(looper.poll_once(true), Wakeup::Command);
        assert_eq!(looper.commands().read().ok(), Some(Some(Command::Redraw.tag())));
        assert_eq!(looper.poll_once(false), Wakeup::Timeout);
    }

    #[test]
    fn test_wake_signal_is_consumed() {
        let (_tx, rx) = command_channel();
        let (wake_tx, wake_rx) = channel::bounded(1);
        let mut looper = Looper::new(rx, wake_rx);

        wake_tx.try_send(()).unwrap();
        assert_eq!(looper.poll_once(true), Wakeup::Wake);
        assert_eq!(looper.poll_once(false), Wakeup::Timeout);
    }

    #[test]
    fn test_input_wakes_blocking_poll() {
        let (_tx, rx) = command_channel();
        let (_wake_tx, wake_rx) = channel::bounded(1);
        let mut looper = Looper::new(rx, wake_rx);
        let (waker, input) = input_waker();
        looper.set_input(input);

        let host = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            waker.wake();
            waker.wake();
        });

        assert_eq!(looper.poll_once(true), Wakeup::Input);
        host.join().unwrap();
        assert_eq!(looper.poll_once(false), Wakeup::Timeout);
    }

    #[test]
    fn test_clearing_input_disarms_waker() {
        let (_tx, rx) = command_channel();
        let (_wake_tx, wake_rx) = channel::bounded(1);
        let mut looper = Looper::new(rx, wake_rx);
        let (waker, input) = input_waker();
        looper.set_input(input);
        assert!(looper.has_input());

        looper.clear_input();
        assert!(!waker.wake());
        assert_eq!(looper.poll_once(false), Wakeup::Timeout);
    }

    #[test]
    fn test_dropped_waker_unregisters_input() {
        let (_tx, rx) = command_channel();
        let (_wake_tx, wake_rx) = channel::bounded(1);
        let mut looper = Looper::new(rx, wake_rx);
        let (waker, input) = input_waker();
        looper.set_input(input);
        drop(waker);

        assert_eq!(looper.poll_once(false), Wakeup::Wake);
        assert!(!looper.has_input());
        assert_eq!(looper.poll_once(false), Wakeup::Timeout);
    }
}
