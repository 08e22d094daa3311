//! Entry point for raw command lines.
use log::info;

use super::commands::Command;
use super::gimbal::GimbalController;
use super::hbridge::MotorChannel;
use super::motor::MotorController;
use super::servo::ServoAxis;
use super::state::ActuatorState;
use crate::status::StatusSink;

/// Owns the actuator state and both controllers. Commands are handled one at
/// a time, each to completion, so no locking is involved.
pub struct CommandRouter<A, B, P, T, S> {
    state: ActuatorState,
    motors: MotorController<A, B>,
    gimbal: GimbalController<P, T>,
    sink: S,
}

impl<A, B, P, T, S> CommandRouter<A, B, P, T, S>
where
    A: MotorChannel,
    B: MotorChannel,
    P: ServoAxis,
    T: ServoAxis,
    S: StatusSink,
{
    /// Takes over the hardware and puts it in the start state: motors off,
    /// gimbal centred.
    pub fn new(motors: MotorController<A, B>, gimbal: GimbalController<P, T>, sink: S) -> Self {
        let mut router = Self {
            state: ActuatorState::default(),
            motors,
            gimbal,
            sink,
        };
        router.motors.stop(&mut router.state, &mut router.sink);
        router.gimbal.sync(&router.state);
        router
    }

    pub fn route(&mut self, line: &str) {
        info!("Received: {line}");

        match Command::from(line) {
            Command::Drive(cmd) => self.motors.handle(&mut self.state, cmd, &mut self.sink),
            Command::Gimbal(cmd) => self.gimbal.handle(&mut self.state, cmd, &mut self.sink),
        }
    }

    pub fn state(&self) -> &ActuatorState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::LineFramer;
    use crate::robot::hbridge::mock::{pin, pwm, Event, Journal, MockPin, MockPwm};
    use crate::robot::hbridge::HBridgeChannel;
    use crate::robot::servo::Servo;
    use crate::robot::state::Direction;
    use crate::status::{BoardSink, StatusBoard};
    use fugit::HertzU32;

    type Channel = HBridgeChannel<MockPin, MockPin, MockPwm>;

    fn rover<'a>(
        journal: &Journal,
        board: &'a StatusBoard,
    ) -> CommandRouter<Channel, Channel, Servo<MockPwm>, Servo<MockPwm>, BoardSink<'a>> {
        let motors = MotorController::new(
            HBridgeChannel::new(
                pin("IN1", journal),
                pin("IN2", journal),
                pwm("ENA", 255, journal),
                "A",
            ),
            HBridgeChannel::new(
                pin("IN3", journal),
                pin("IN4", journal),
                pwm("ENB", 255, journal),
                "B",
            ),
        );
        let gimbal = GimbalController::new(
            Servo::new(pwm("PAN", 4096, journal), HertzU32::from_raw(50), "pan"),
            Servo::new(pwm("TILT", 4096, journal), HertzU32::from_raw(50), "tilt"),
        );
        CommandRouter::new(motors, gimbal, board.sink())
    }

    #[test]
    fn test_startup_stops_and_centres() {
        let journal = Journal::default();
        let board = StatusBoard::new();
        let r = rover(&journal, &board);

        assert_eq!(*r.state(), ActuatorState::default());
        assert_eq!(board.current().as_str(), "Stopped");
        let log = journal.borrow();
        assert!(log.contains(&Event::Duty("ENA", 0)));
        assert!(log.contains(&Event::Duty("ENB", 0)));
        assert!(log.contains(&Event::Duty("PAN", 301)));
        assert!(log.contains(&Event::Duty("TILT", 301)));
    }

    #[test]
    fn test_forward_pan_then_unknown() {
        let journal = Journal::default();
        let board = StatusBoard::new();
        let mut r = rover(&journal, &board);
        journal.borrow_mut().clear();

        r.route("forward");
        assert_eq!(r.state().motor_direction(), Direction::Forward);
        assert_eq!(r.state().motor_speed(), 255);
        assert_eq!(board.current().as_str(), "Moving Forward");
        assert_eq!(
            journal.borrow()[6..],
            [
                Event::Pin("IN1", true),
                Event::Pin("IN2", false),
                Event::Duty("ENA", 255),
                Event::Pin("IN3", true),
                Event::Pin("IN4", false),
                Event::Duty("ENB", 255),
            ]
        );

        r.route("pan_left");
        assert_eq!(r.state().pan_angle(), 100);
        assert_eq!(r.state().motor_direction(), Direction::Forward);
        assert_eq!(board.current().as_str(), "Pan Left: 100");

        r.route("halt");
        assert_eq!(r.state().motor_direction(), Direction::Stopped);
        assert_eq!(r.state().motor_speed(), 0);
        assert_eq!(r.state().pan_angle(), 100);
        assert_eq!(board.current().as_str(), "Stopped");
    }

    #[test]
    fn test_unknown_word_leaves_state_unchanged() {
        let journal = Journal::default();
        let board = StatusBoard::new();
        let mut r = rover(&journal, &board);
        let before = *r.state();

        r.route("jump");
        assert_eq!(*r.state(), before);
        assert_eq!(board.current().as_str(), "Stopped");
    }

    #[test]
    fn test_pan_prefix_never_reaches_motors() {
        let journal = Journal::default();
        let board = StatusBoard::new();
        let mut r = rover(&journal, &board);
        r.route("forward");
        journal.borrow_mut().clear();

        r.route("pantograph");
        r.route("tilt");
        assert!(journal.borrow().is_empty());
        assert_eq!(r.state().motor_direction(), Direction::Forward);
        assert_eq!(board.current().as_str(), "Moving Forward");
    }

    #[test]
    fn test_forward_split_over_two_reads_drives() {
        let journal = Journal::default();
        let board = StatusBoard::new();
        let mut r = rover(&journal, &board);
        let mut framer = LineFramer::<64>::new();

        for chunk in [b"forw".as_slice(), b"ard\n".as_slice()] {
            for byte in chunk {
                if let Some(line) = framer.feed(*byte) {
                    r.route(&line);
                }
            }
        }
        assert_eq!(r.state().motor_direction(), Direction::Forward);
        assert_eq!(board.current().as_str(), "Moving Forward");
    }

    #[test]
    fn test_pan_right_at_zero() {
        let journal = Journal::default();
        let board = StatusBoard::new();
        let mut r = rover(&journal, &board);
        for _ in 0..9 {
            r.route("pan_right");
        }
        assert_eq!(r.state().pan_angle(), 0);

        r.route("pan_right");
        assert_eq!(r.state().pan_angle(), 0);
        assert_eq!(board.current().as_str(), "Pan Right: 0");
    }
}
