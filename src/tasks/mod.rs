//! Asynchronous tasks for the rover runtime (`firmware` feature).
//!
//! - [`net_task`]: Wi-Fi station, network stack runner, TCP command server and
//!   the HTTP control page.
//! - [`control_task`]: owns the actuators and executes command lines.
//!
//! Tasks are spawned from `bin/main.rs` and communicate through one Embassy
//! channel of [`CommandLine`](crate::robot::commands::CommandLine)s.
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::CMD_CHANNEL_SIZE;
use crate::robot::commands::CommandLine;

pub mod control_task;
pub mod net_task;

pub type CommandChannel = Channel<CriticalSectionRawMutex, CommandLine, CMD_CHANNEL_SIZE>;
pub type CommandSender = Sender<'static, CriticalSectionRawMutex, CommandLine, CMD_CHANNEL_SIZE>;
pub type CommandReceiver =
    Receiver<'static, CriticalSectionRawMutex, CommandLine, CMD_CHANNEL_SIZE>;
