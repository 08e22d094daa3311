//! Actuation state owned by the command router.
use core::fmt::{self, Display, Formatter};

use crate::config::{ANGLE_DEFAULT, ANGLE_MAX, ANGLE_MIN, FULL_SPEED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Stopped,
    Forward,
    Backward,
    Left,
    Right,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Stopped => f.write_str("Stopped"),
            Direction::Forward => f.write_str("Moving Forward"),
            Direction::Backward => f.write_str("Moving Backward"),
            Direction::Left => f.write_str("Turning Left"),
            Direction::Right => f.write_str("Turning Right"),
        }
    }
}

/// Current pan/tilt angles and drive state.
///
/// Angles stay in `ANGLE_MIN..=ANGLE_MAX` and the motor speed is zero exactly
/// when the direction is [`Direction::Stopped`]. Both are enforced by the
/// setters, the fields are never written directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorState {
    pan_angle: u8,
    tilt_angle: u8,
    motor_direction: Direction,
    motor_speed: u8,
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self {
            pan_angle: ANGLE_DEFAULT,
            tilt_angle: ANGLE_DEFAULT,
            motor_direction: Direction::Stopped,
            motor_speed: 0,
        }
    }
}

impl ActuatorState {
    pub fn pan_angle(&self) -> u8 {
        self.pan_angle
    }

    pub fn tilt_angle(&self) -> u8 {
        self.tilt_angle
    }

    pub fn motor_direction(&self) -> Direction {
        self.motor_direction
    }

    pub fn motor_speed(&self) -> u8 {
        self.motor_speed
    }

    pub(crate) fn set_pan_angle(&mut self, angle: u8) {
        self.pan_angle = angle.clamp(ANGLE_MIN, ANGLE_MAX);
    }

    pub(crate) fn set_tilt_angle(&mut self, angle: u8) {
        self.tilt_angle = angle.clamp(ANGLE_MIN, ANGLE_MAX);
    }

    pub(crate) fn set_motion(&mut self, direction: Direction) {
        self.motor_direction = direction;
        self.motor_speed = match direction {
            Direction::Stopped => 0,
            _ => FULL_SPEED,
        };
    }
}

/// Moves `angle` by `delta` degrees, saturating at the gimbal limits.
pub fn step_angle(angle: u8, delta: i16) -> u8 {
    (angle as i16 + delta).clamp(ANGLE_MIN as i16, ANGLE_MAX as i16) as u8
}
