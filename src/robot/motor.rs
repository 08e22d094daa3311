//! Drive state machine over the two motor channels.
//!
//! Every command first brings both channels to [`ChannelDrive::Off`] and the
//! state to [`Direction::Stopped`], only then the new direction is applied.
//! The driver therefore never sees a polarity reversal at non-zero speed.
use heapless::String;

use super::commands::DriveCommand;
use super::hbridge::{ChannelDrive, MotorChannel};
use super::state::{ActuatorState, Direction};
use crate::config::FULL_SPEED;
use crate::status::StatusSink;

pub struct MotorController<A, B> {
    channel_a: A,
    channel_b: B,
}

impl<A, B> MotorController<A, B>
where
    A: MotorChannel,
    B: MotorChannel,
{
    pub fn new(channel_a: A, channel_b: B) -> Self {
        Self {
            channel_a,
            channel_b,
        }
    }

    pub fn handle(
        &mut self,
        state: &mut ActuatorState,
        cmd: DriveCommand,
        sink: &mut impl StatusSink,
    ) {
        self.stop(state, sink);

        let direction = cmd.direction();
        let Some((a, b)) = channel_drives(direction) else {
            return;
        };
        self.channel_a.set(a);
        self.channel_b.set(b);
        state.set_motion(direction);
        show_direction(direction, sink);
    }

    pub fn stop(&mut self, state: &mut ActuatorState, sink: &mut impl StatusSink) {
        self.channel_a.set(ChannelDrive::Off);
        self.channel_b.set(ChannelDrive::Off);
        state.set_motion(Direction::Stopped);
        show_direction(Direction::Stopped, sink);
    }
}

/// Channel A/B outputs for a moving direction, `None` when stopped.
///
/// Turning is differential: left reverses channel A, right reverses channel B.
fn channel_drives(direction: Direction) -> Option<(ChannelDrive, ChannelDrive)> {
    let fwd = ChannelDrive::Forward(FULL_SPEED);
    let rev = ChannelDrive::Reverse(FULL_SPEED);
    match direction {
        Direction::Stopped => None,
        Direction::Forward => Some((fwd, fwd)),
        Direction::Backward => Some((rev, rev)),
        Direction::Left => Some((rev, fwd)),
        Direction::Right => Some((fwd, rev)),
    }
}

fn show_direction(direction: Direction, sink: &mut impl StatusSink) {
    use core::fmt::Write;

    let mut line: String<16> = String::new();
    let _ = write!(line, "{direction}");
    sink.show(&line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::string::{String, ToString};
    use std::vec::Vec;

    /// Shared record of what both channels were told, in order.
    type Log = Rc<RefCell<Vec<(char, ChannelDrive)>>>;

    struct RecordingChannel {
        id: char,
        log: Log,
    }

    impl MotorChannel for RecordingChannel {
        fn set(&mut self, drive: ChannelDrive) {
            self.log.borrow_mut().push((self.id, drive));
        }
    }

    fn controller(log: &Log) -> MotorController<RecordingChannel, RecordingChannel> {
        MotorController::new(
            RecordingChannel {
                id: 'A',
                log: log.clone(),
            },
            RecordingChannel {
                id: 'B',
                log: log.clone(),
            },
        )
    }

    fn run(cmds: &[DriveCommand]) -> (ActuatorState, Log, Vec<String>) {
        let log = Log::default();
        let mut motors = controller(&log);
        let mut state = ActuatorState::default();
        let mut statuses = Vec::new();
        let mut sink = |s: &str| statuses.push(s.to_string());
        for cmd in cmds {
            motors.handle(&mut state, *cmd, &mut sink);
        }
        (state, log, statuses)
    }

    #[test]
    fn test_forward() {
        let (state, log, statuses) = run(&[DriveCommand::Forward]);
        assert_eq!(state.motor_direction(), Direction::Forward);
        assert_eq!(state.motor_speed(), 255);
        assert_eq!(
            *log.borrow(),
            [
                ('A', ChannelDrive::Off),
                ('B', ChannelDrive::Off),
                ('A', ChannelDrive::Forward(255)),
                ('B', ChannelDrive::Forward(255)),
            ]
        );
        assert_eq!(statuses, ["Stopped", "Moving Forward"]);
    }

    #[test]
    fn test_truth_table() {
        let fwd = ChannelDrive::Forward(255);
        let rev = ChannelDrive::Reverse(255);
        let cases = [
            (DriveCommand::Backward, rev, rev, "Moving Backward"),
            (DriveCommand::Left, rev, fwd, "Turning Left"),
            (DriveCommand::Right, fwd, rev, "Turning Right"),
        ];
        for (cmd, a, b, label) in cases {
            let (state, log, statuses) = run(&[cmd]);
            assert_eq!(state.motor_direction(), cmd.direction());
            assert_eq!(log.borrow()[2..], [('A', a), ('B', b)]);
            assert_eq!(statuses.last().map(String::as_str), Some(label));
        }
    }

    #[test]
    fn test_stop_and_unknown_leave_motors_off() {
        let (state, log, statuses) = run(&[DriveCommand::Forward, DriveCommand::Stop]);
        assert_eq!(state.motor_direction(), Direction::Stopped);
        assert_eq!(state.motor_speed(), 0);
        assert_eq!(
            log.borrow()[4..],
            [('A', ChannelDrive::Off), ('B', ChannelDrive::Off)]
        );
        assert_eq!(statuses, ["Stopped", "Moving Forward", "Stopped"]);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (once, _, _) = run(&[DriveCommand::Stop]);
        let (twice, _, _) = run(&[DriveCommand::Stop, DriveCommand::Stop]);
        assert_eq!(once, twice);
        assert_eq!(once, ActuatorState::default());
    }

    #[test]
    fn test_no_reversal_without_intervening_off() {
        use DriveCommand::*;
        let (_, log, _) = run(&[Forward, Backward, Left, Right, Left, Forward, Backward, Right]);

        // per channel, a driving output is always preceded by Off
        for id in ['A', 'B'] {
            let mut prev = ChannelDrive::Off;
            for (_, drive) in log.borrow().iter().filter(|(c, _)| *c == id) {
                if *drive != ChannelDrive::Off {
                    assert_eq!(
                        prev,
                        ChannelDrive::Off,
                        "channel {id} switched {prev:?} -> {drive:?}"
                    );
                }
                prev = *drive;
            }
        }
    }

    #[test]
    fn test_speed_zero_iff_stopped_after_every_command() {
        use DriveCommand::*;
        let log = Log::default();
        let mut motors = controller(&log);
        let mut state = ActuatorState::default();
        let mut sink = |_: &str| {};
        for cmd in [Forward, Stop, Left, Backward, Stop, Right] {
            motors.handle(&mut state, cmd, &mut sink);
            assert_eq!(
                state.motor_speed() == 0,
                state.motor_direction() == Direction::Stopped
            );
        }
    }
}
