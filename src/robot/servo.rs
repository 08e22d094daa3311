use embedded_hal::pwm::SetDutyCycle;
use fugit::Hertz;
use log::error;

use crate::config::{ANGLE_MAX, ANGLE_MIN, SERVO_MAX_PULSE_US, SERVO_MIN_PULSE_US};

/// Single axis positioner driven to an absolute angle.
pub trait ServoAxis {
    fn write_angle(&mut self, angle: u8);
}

#[derive(Debug)]
pub struct Servo<PWM> {
    pwm: PWM,
    angle: Option<u8>,
    max_duty: u32,
    frequency: Hertz<u32>,
    name: &'static str,
}

impl<PWM> Servo<PWM>
where
    PWM: SetDutyCycle,
{
    pub fn new(pwm: PWM, frequency: Hertz<u32>, name: &'static str) -> Self {
        let max_duty = pwm.max_duty_cycle() as u32;
        Self {
            pwm,
            angle: None,
            max_duty,
            frequency,
            name,
        }
    }

    /// Last angle written, `None` before the first write.
    pub fn angle(&self) -> Option<u8> {
        self.angle
    }

    /// Duty cycle value producing the pulse for `angle`.
    pub fn duty_for(&self, angle: u8) -> u16 {
        // Linearly interpolate the pulse, e.g. 90° -> 1472 µs
        let pulse = SERVO_MIN_PULSE_US
            + (angle as u32 * (SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US)) / ANGLE_MAX as u32;

        // THE WIDTH OF THE PULSE DRIVES THE ANGLE, NOT FREQ
        let period_us = 1_000_000 / self.frequency.raw();
        ((pulse * self.max_duty) / period_us).min(self.max_duty) as u16
    }
}

impl<PWM> ServoAxis for Servo<PWM>
where
    PWM: SetDutyCycle,
{
    /// Values outside 0..=180 are clamped.
    fn write_angle(&mut self, angle: u8) {
        let angle = angle.clamp(ANGLE_MIN, ANGLE_MAX);

        //Avoid setting the same angle again
        if self.angle == Some(angle) {
            return;
        }
        self.angle = Some(angle);

        let duty = self.duty_for(angle);
        if let Err(e) = self.pwm.set_duty_cycle(duty) {
            error!("{} Error writing angle {angle}: {:?}", self.name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::hbridge::mock::{pwm, Event, Journal};
    use fugit::HertzU32;

    fn servo(journal: &Journal) -> Servo<crate::robot::hbridge::mock::MockPwm> {
        // 12 bit resolution at 50 Hz
        Servo::new(pwm("PAN", 4096, journal), HertzU32::from_raw(50), "pan")
    }

    #[test]
    fn test_pulse_to_duty() {
        let journal = Journal::default();
        let s = servo(&journal);
        // 544 µs of 20 ms
        assert_eq!(s.duty_for(0), 111);
        // 2400 µs of 20 ms
        assert_eq!(s.duty_for(180), 491);
        // 1472 µs
        assert_eq!(s.duty_for(90), 301);
    }

    #[test]
    fn test_first_write_always_goes_out() {
        let journal = Journal::default();
        let mut s = servo(&journal);
        assert_eq!(s.angle(), None);
        s.write_angle(0);
        assert_eq!(s.angle(), Some(0));
        assert_eq!(*journal.borrow(), [Event::Duty("PAN", 111)]);
    }

    #[test]
    fn test_repeated_angle_is_skipped() {
        let journal = Journal::default();
        let mut s = servo(&journal);
        s.write_angle(90);
        s.write_angle(90);
        s.write_angle(100);
        assert_eq!(journal.borrow().len(), 2);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let journal = Journal::default();
        let mut s = servo(&journal);
        s.write_angle(200);
        assert_eq!(s.angle(), Some(180));
        assert_eq!(*journal.borrow(), [Event::Duty("PAN", 491)]);
    }
}
