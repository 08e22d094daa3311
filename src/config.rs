//! Compile-time configuration: network, buffers and actuation constants.
//!
//! Wi-Fi credentials are not stored here, they are read from the build
//! environment (`WIFI_SSID`, `WIFI_PASS`) by the connection task.

// NETWORK
pub const PORT: u16 = 81;
pub const HTTP_PORT: u16 = 80;
pub const RX_BUF_SIZE: usize = 1024;
pub const TX_BUF_SIZE: usize = 1024;
pub const RECONNECT_DELAY_MS: u64 = 5_000;

// CHANNELS
pub const CMD_CHANNEL_SIZE: usize = 4;
pub const CMDLINE_CAPACITY: usize = 64;
pub const STATUS_CAPACITY: usize = 32;

// DRIVE
pub const FULL_SPEED: u8 = 255;
pub const MOTOR_PWM_FREQUENCY_HZ: u32 = 5_000;

// GIMBAL
pub const ANGLE_MIN: u8 = 0;
pub const ANGLE_MAX: u8 = 180;
pub const ANGLE_DEFAULT: u8 = 90;
/// Degrees moved by a single pan/tilt command.
pub const ANGLE_STEP: u8 = 10;

// SERVO SIGNAL
pub const SERVO_FREQUENCY_HZ: u32 = 50;
pub const SERVO_MIN_PULSE_US: u32 = 544; // 0°
pub const SERVO_MAX_PULSE_US: u32 = 2400; // 180°
