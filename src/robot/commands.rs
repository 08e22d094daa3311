//! Command vocabulary and the parse step from raw text to [`Command`].
//!
//! Parsing is total: every line maps to some command. Lines starting with
//! `pan` or `tilt` always belong to the gimbal, even when the rest of the word
//! is unknown; everything else is a drive command and unknown words stop the
//! motors.
use core::fmt::{self, Display, Formatter};

use heapless::String;

use super::state::Direction;
use crate::config::{ANGLE_STEP, CMDLINE_CAPACITY};

/// One raw command as delivered by the transport.
pub type CommandLine = String<CMDLINE_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Drive(DriveCommand),
    Gimbal(GimbalCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveCommand {
    Forward,
    Backward,
    Left,
    Right,
    /// `stop` and any unrecognised word.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GimbalCommand {
    PanLeft,
    PanRight,
    TiltUp,
    TiltDown,
    /// Starts with `pan`/`tilt` but is not one of the four moves.
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Pan,
    Tilt,
}

impl From<&str> for Command {
    fn from(value: &str) -> Self {
        if value.starts_with("pan") || value.starts_with("tilt") {
            Command::Gimbal(GimbalCommand::from(value))
        } else {
            Command::Drive(DriveCommand::from(value))
        }
    }
}

impl From<&str> for DriveCommand {
    fn from(value: &str) -> Self {
        match value {
            "forward" => DriveCommand::Forward,
            "backward" => DriveCommand::Backward,
            "left" => DriveCommand::Left,
            "right" => DriveCommand::Right,
            _ => DriveCommand::Stop,
        }
    }
}

impl From<&str> for GimbalCommand {
    fn from(value: &str) -> Self {
        match value {
            "pan_left" => GimbalCommand::PanLeft,
            "pan_right" => GimbalCommand::PanRight,
            "tilt_up" => GimbalCommand::TiltUp,
            "tilt_down" => GimbalCommand::TiltDown,
            _ => GimbalCommand::Unrecognized,
        }
    }
}

impl DriveCommand {
    /// Direction the motors end up in after the command.
    pub fn direction(self) -> Direction {
        match self {
            DriveCommand::Forward => Direction::Forward,
            DriveCommand::Backward => Direction::Backward,
            DriveCommand::Left => Direction::Left,
            DriveCommand::Right => Direction::Right,
            DriveCommand::Stop => Direction::Stopped,
        }
    }
}

impl GimbalCommand {
    /// Axis and signed step in degrees, `None` for [`GimbalCommand::Unrecognized`].
    pub fn movement(self) -> Option<(Axis, i16)> {
        let step = ANGLE_STEP as i16;
        match self {
            GimbalCommand::PanLeft => Some((Axis::Pan, step)),
            GimbalCommand::PanRight => Some((Axis::Pan, -step)),
            GimbalCommand::TiltUp => Some((Axis::Tilt, -step)),
            GimbalCommand::TiltDown => Some((Axis::Tilt, step)),
            GimbalCommand::Unrecognized => None,
        }
    }
}

impl Display for GimbalCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GimbalCommand::PanLeft => f.write_str("Pan Left"),
            GimbalCommand::PanRight => f.write_str("Pan Right"),
            GimbalCommand::TiltUp => f.write_str("Tilt Up"),
            GimbalCommand::TiltDown => f.write_str("Tilt Down"),
            GimbalCommand::Unrecognized => f.write_str("Unrecognized"),
        }
    }
}
