//! Actuator task: sets up LEDC PWM and GPIO for the H-bridge and the two
//! servos, then feeds every received command line to the [`CommandRouter`].
extern crate alloc;

use alloc::boxed::Box;
use anyhow::anyhow;
use esp_hal::gpio::{AnyPin, Level, Output, OutputConfig};
use esp_hal::ledc::channel::{self, Channel, ChannelIFace, Number};
use esp_hal::ledc::timer::{self, LSClockSource, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::peripherals::LEDC;
use esp_hal::time::Rate;
use fugit::HertzU32;
use log::{error, info};

use super::CommandReceiver;
use crate::config::{MOTOR_PWM_FREQUENCY_HZ, SERVO_FREQUENCY_HZ};
use crate::robot::gimbal::GimbalController;
use crate::robot::hbridge::HBridgeChannel;
use crate::robot::motor::MotorController;
use crate::robot::router::CommandRouter;
use crate::robot::servo::Servo;
use crate::status::{BoardSink, STATUS_BOARD};

/// GPIOs wired to the motor driver and the pan/tilt servos.
pub struct RoverPins {
    pub in1: AnyPin<'static>,
    pub in2: AnyPin<'static>,
    pub in3: AnyPin<'static>,
    pub in4: AnyPin<'static>,
    pub ena: AnyPin<'static>,
    pub enb: AnyPin<'static>,
    pub pan: AnyPin<'static>,
    pub tilt: AnyPin<'static>,
}

type PwmChannel = Channel<'static, LowSpeed>;
type Bridge = HBridgeChannel<Output<'static>, Output<'static>, PwmChannel>;
type GimbalServo = Servo<PwmChannel>;
type Rover = CommandRouter<Bridge, Bridge, GimbalServo, GimbalServo, BoardSink<'static>>;

#[embassy_executor::task]
pub async fn control_task(pins: RoverPins, ledc: LEDC<'static>, receiver: CommandReceiver) {
    info!("[CONTROL_TASK] Starting");
    let mut rover = match build_rover(pins, ledc) {
        Ok(rover) => rover,
        Err(e) => {
            error!("[CONTROL_TASK] hardware setup failed: {e}");
            return;
        }
    };

    loop {
        let line = receiver.receive().await;
        rover.route(&line);
    }
}

fn configure_timer(
    ledc: &Ledc<'static>,
    number: timer::Number,
    duty: timer::config::Duty,
    frequency_hz: u32,
) -> anyhow::Result<&'static timer::Timer<'static, LowSpeed>> {
    let mut timer = ledc.timer::<LowSpeed>(number);
    timer
        .configure(timer::config::Config {
            duty,
            clock_source: LSClockSource::APBClk,
            frequency: Rate::from_hz(frequency_hz),
        })
        .map_err(|e| anyhow!("ledc timer {frequency_hz} Hz: {e:?}"))?;
    // Channels keep a reference to their timer: leak it to get a static lifetime.
    let leaked: &'static timer::Timer<'static, LowSpeed> = Box::leak(Box::new(timer));
    Ok(leaked)
}

fn configure_channel(
    ledc: &Ledc<'static>,
    number: Number,
    pin: AnyPin<'static>,
    timer: &'static timer::Timer<'static, LowSpeed>,
) -> anyhow::Result<PwmChannel> {
    let mut channel = ledc.channel(number, pin);
    channel
        .configure(channel::config::Config {
            timer,
            duty_pct: 0,
            pin_config: channel::config::PinConfig::PushPull,
        })
        .map_err(|e| anyhow!("ledc channel {number:?}: {e:?}"))?;
    Ok(channel)
}

fn build_rover(pins: RoverPins, ledc: LEDC<'static>) -> anyhow::Result<Rover> {
    let mut ledc = Ledc::new(ledc);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    let motor_timer = configure_timer(
        &ledc,
        timer::Number::Timer0,
        timer::config::Duty::Duty8Bit,
        MOTOR_PWM_FREQUENCY_HZ,
    )?;
    let servo_timer = configure_timer(
        &ledc,
        timer::Number::Timer1,
        timer::config::Duty::Duty12Bit,
        SERVO_FREQUENCY_HZ,
    )?;

    let channel_a = HBridgeChannel::new(
        Output::new(pins.in1, Level::Low, OutputConfig::default()),
        Output::new(pins.in2, Level::Low, OutputConfig::default()),
        configure_channel(&ledc, Number::Channel0, pins.ena, motor_timer)?,
        "A",
    );
    let channel_b = HBridgeChannel::new(
        Output::new(pins.in3, Level::Low, OutputConfig::default()),
        Output::new(pins.in4, Level::Low, OutputConfig::default()),
        configure_channel(&ledc, Number::Channel1, pins.enb, motor_timer)?,
        "B",
    );

    let servo_hz = HertzU32::from_raw(SERVO_FREQUENCY_HZ);
    let pan = Servo::new(
        configure_channel(&ledc, Number::Channel2, pins.pan, servo_timer)?,
        servo_hz,
        "pan",
    );
    let tilt = Servo::new(
        configure_channel(&ledc, Number::Channel3, pins.tilt, servo_timer)?,
        servo_hz,
        "tilt",
    );

    let rover = CommandRouter::new(
        MotorController::new(channel_a, channel_b),
        GimbalController::new(pan, tilt),
        STATUS_BOARD.sink(),
    );
    info!("[CONTROL_TASK] Motors stopped, gimbal centred");
    Ok(rover)
}
