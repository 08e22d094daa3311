//! Command interpreter and actuator drivers.
//!
//! - [`commands`]: command vocabulary and the text to [`commands::Command`] parse step.
//! - [`state`]: [`state::ActuatorState`], the single owned actuation state.
//! - [`motor`] / [`gimbal`]: the two controllers mutating that state.
//! - [`router`]: [`router::CommandRouter`], classifies and dispatches command lines.
//! - [`hbridge`] / [`servo`]: `embedded-hal` drivers for motor channels and servos.
pub mod commands;
pub mod gimbal;
pub mod hbridge;
pub mod motor;
pub mod router;
pub mod servo;
pub mod state;
