//! One channel of a dual H-bridge motor driver (L298N style): two direction
//! inputs and a PWM enable line.
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::error;

use crate::config::FULL_SPEED;

/// What a single motor channel is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelDrive {
    Off,
    Forward(u8),
    Reverse(u8),
}

pub trait MotorChannel {
    fn set(&mut self, drive: ChannelDrive);
}

#[derive(Debug)]
pub struct HBridgeChannel<IN1, IN2, EN> {
    in1: IN1,
    in2: IN2,
    enable: EN,
    name: &'static str,
}

impl<IN1, IN2, EN> HBridgeChannel<IN1, IN2, EN>
where
    IN1: OutputPin,
    IN2: OutputPin,
    EN: SetDutyCycle,
{
    pub fn new(in1: IN1, in2: IN2, enable: EN, name: &'static str) -> Self {
        Self {
            in1,
            in2,
            enable,
            name,
        }
    }

    fn set_speed(&mut self, speed: u8) {
        if let Err(e) = self
            .enable
            .set_duty_cycle_fraction(speed as u16, FULL_SPEED as u16)
        {
            error!("{} Error writing speed {speed}: {:?}", self.name, e);
        }
    }

    fn set_polarity(&mut self, in1_high: bool, in2_high: bool) {
        let r1 = if in1_high {
            self.in1.set_high()
        } else {
            self.in1.set_low()
        };
        let r2 = if in2_high {
            self.in2.set_high()
        } else {
            self.in2.set_low()
        };
        if let Err(e) = r1 {
            error!("{} Error writing IN1: {:?}", self.name, e);
        }
        if let Err(e) = r2 {
            error!("{} Error writing IN2: {:?}", self.name, e);
        }
    }
}

impl<IN1, IN2, EN> MotorChannel for HBridgeChannel<IN1, IN2, EN>
where
    IN1: OutputPin,
    IN2: OutputPin,
    EN: SetDutyCycle,
{
    /// Cutting the enable line comes before touching the direction pins, and a
    /// new speed is only applied once the polarity is in place.
    fn set(&mut self, drive: ChannelDrive) {
        match drive {
            ChannelDrive::Off => {
                self.set_speed(0);
                self.set_polarity(false, false);
            }
            ChannelDrive::Forward(speed) => {
                self.set_polarity(true, false);
                self.set_speed(speed);
            }
            ChannelDrive::Reverse(speed) => {
                self.set_polarity(false, true);
                self.set_speed(speed);
            }
        }
    }
}
