//! Library root for the pan/tilt rover firmware.
//!
//! Re-exports the main modules: [`robot`] (command interpreter and actuator
//! drivers), [`status`] (status sinks), [`http`] (control page helpers), [`framing`] (TCP line framing) and,
//! with the `firmware` feature, [`tasks`].
//! Everything outside [`tasks`] is hardware independent and tested on the host.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod framing;
pub mod http;
pub mod robot;
pub mod status;
#[cfg(feature = "firmware")]
pub mod tasks;
