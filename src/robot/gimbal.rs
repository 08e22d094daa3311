//! Pan/tilt gimbal: two independent axes stepped by [`ANGLE_STEP`] degrees.
//!
//! [`ANGLE_STEP`]: crate::config::ANGLE_STEP
use core::fmt::Write;

use heapless::String;

use super::commands::{Axis, GimbalCommand};
use super::servo::ServoAxis;
use super::state::{step_angle, ActuatorState};
use crate::status::StatusSink;

pub struct GimbalController<P, T> {
    pan: P,
    tilt: T,
}

impl<P, T> GimbalController<P, T>
where
    P: ServoAxis,
    T: ServoAxis,
{
    pub fn new(pan: P, tilt: T) -> Self {
        Self { pan, tilt }
    }

    /// Unrecognised commands change nothing and report nothing.
    pub fn handle(
        &mut self,
        state: &mut ActuatorState,
        cmd: GimbalCommand,
        sink: &mut impl StatusSink,
    ) {
        let Some((axis, delta)) = cmd.movement() else {
            return;
        };

        let angle = match axis {
            Axis::Pan => {
                state.set_pan_angle(step_angle(state.pan_angle(), delta));
                self.pan.write_angle(state.pan_angle());
                state.pan_angle()
            }
            Axis::Tilt => {
                state.set_tilt_angle(step_angle(state.tilt_angle(), delta));
                self.tilt.write_angle(state.tilt_angle());
                state.tilt_angle()
            }
        };

        let mut line: String<24> = String::new();
        let _ = write!(line, "{cmd}: {angle}");
        sink.show(&line);
    }

    /// Writes both axes to the angles held in `state`.
    pub fn sync(&mut self, state: &ActuatorState) {
        self.pan.write_angle(state.pan_angle());
        self.tilt.write_angle(state.tilt_angle());
    }
}
