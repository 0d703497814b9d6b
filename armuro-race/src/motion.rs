//! Wheel actuation for the Armuro 1.
//!
//! Each wheel is driven by one PWM channel (duty) and one phase pin
//! (direction). Commands are normalized speeds:
//! - `> 0`: forward
//! - `< 0`: reverse
//! - `0`: brake

use crate::config::{
    FORWARD_GAIN, MAX_DUTY, MAX_SPEED, NORMAL_SPEED_LEFT, NORMAL_SPEED_RIGHT,
};
use crate::indicators::{Indicators, Led, LedToggles};
use crate::sensors::Encoders;

/// Wheel direction, i.e. the level of the phase pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

/// Duty and direction for one wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelOutput {
    /// Duty in `0..=MAX_DUTY`.
    pub duty: u32,
    pub direction: Direction,
}

impl WheelOutput {
    pub const STOPPED: WheelOutput = WheelOutput {
        duty: 0,
        direction: Direction::Forward,
    };

    /// Map a normalized speed onto duty and direction.
    ///
    /// Speeds outside [-1, 1] saturate. On the inverted scale
    /// `MAX_DUTY * (1 - speed)` the 16-bit compare register drops the
    /// carry, which leaves `MAX_DUTY * |speed|`: reverse duty rises to
    /// `MAX_DUTY` as the speed approaches -1. A zero (or NaN) speed brakes
    /// and puts the phase back to forward so a stale reverse flag does not
    /// linger.
    pub fn from_speed(speed: f32) -> Self {
        let speed = speed.clamp(-1.0, 1.0);
        if speed > 0.0 {
            WheelOutput {
                duty: scale_duty(speed),
                direction: Direction::Forward,
            }
        } else if speed < 0.0 {
            WheelOutput {
                duty: scale_duty(-speed),
                direction: Direction::Reverse,
            }
        } else {
            Self::STOPPED
        }
    }
}

fn scale_duty(fraction: f32) -> u32 {
    let duty = MAX_DUTY as f32 * fraction;
    if duty >= MAX_DUTY as f32 {
        MAX_DUTY
    } else {
        duty as u32
    }
}

/// Outputs for both wheels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorCommand {
    pub left: WheelOutput,
    pub right: WheelOutput,
}

impl ActuatorCommand {
    pub const STOP: ActuatorCommand = ActuatorCommand {
        left: WheelOutput::STOPPED,
        right: WheelOutput::STOPPED,
    };

    pub fn from_speeds(left: f32, right: f32) -> Self {
        Self {
            left: WheelOutput::from_speed(left),
            right: WheelOutput::from_speed(right),
        }
    }
}

/// Cruise speed used by the line follower and the straight-driving correction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setpoint {
    pub left: f32,
    pub right: f32,
}

impl Setpoint {
    pub const NORMAL: Setpoint = Setpoint {
        left: NORMAL_SPEED_LEFT,
        right: NORMAL_SPEED_RIGHT,
    };

    pub const MAX: Setpoint = Setpoint {
        left: MAX_SPEED,
        right: MAX_SPEED,
    };
}

impl Default for Setpoint {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Straight-driving P-controller on the encoder difference.
///
/// The wheel that is ahead is slowed and the one behind sped up, each by
/// `error * FORWARD_GAIN` times its own setpoint. Returns `(left, right)`.
pub fn forward_correction(setpoint: Setpoint, left_ticks: u32, right_ticks: u32) -> (f32, f32) {
    let error = left_ticks.wrapping_sub(right_ticks) as i32 as f32;
    let delta_left = error * FORWARD_GAIN * setpoint.left;
    let delta_right = error * FORWARD_GAIN * setpoint.right;

    (setpoint.left - delta_left, setpoint.right + delta_right)
}

/// Holds the speed setpoint and collects what one control cycle asked of the
/// motors and LEDs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionActuator {
    setpoint: Setpoint,
    indicators: Indicators,
    command: Option<ActuatorCommand>,
}

impl Default for MotionActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionActuator {
    /// Actuator at normal speed with nothing commanded yet.
    pub const fn new() -> Self {
        Self {
            setpoint: Setpoint::NORMAL,
            indicators: Indicators::new(),
            command: None,
        }
    }

    pub fn setpoint(&self) -> Setpoint {
        self.setpoint
    }

    pub fn set_normal_speed(&mut self) {
        self.setpoint = Setpoint::NORMAL;
    }

    pub fn set_max_speed(&mut self) {
        self.setpoint = Setpoint::MAX;
    }

    /// Command both wheels.
    ///
    /// Also blinks the LED on the side the robot is turning away from: a
    /// forward left wheel or a reversing right wheel blinks the right LED,
    /// and the other way round. Braking wheels do not blink.
    pub fn drive(&mut self, speed_left: f32, speed_right: f32) -> ActuatorCommand {
        let command = ActuatorCommand::from_speeds(speed_left, speed_right);

        if speed_left > 0.0 {
            self.indicators.blink(Led::Right);
        } else if speed_left < 0.0 {
            self.indicators.blink(Led::Left);
        }
        if speed_right > 0.0 {
            self.indicators.blink(Led::Left);
        } else if speed_right < 0.0 {
            self.indicators.blink(Led::Right);
        }

        self.command = Some(command);
        command
    }

    pub fn stop(&mut self) -> ActuatorCommand {
        self.drive(0.0, 0.0)
    }

    /// Drive at the setpoint, corrected so both encoders advance together.
    pub fn drive_forward(&mut self, encoders: &Encoders) -> ActuatorCommand {
        let (left, right) =
            forward_correction(self.setpoint, encoders.left_ticks(), encoders.right_ticks());
        self.drive(left, right)
    }

    pub fn blink_all(&mut self) {
        self.indicators.blink_all();
    }

    /// Start a control cycle at `now_ms`.
    pub(crate) fn begin_cycle(&mut self, now_ms: u32) {
        self.indicators.set_time(now_ms);
        self.command = None;
    }

    /// Last command written this cycle (the motors keep it) and the LED toggles.
    pub(crate) fn finish_cycle(&mut self) -> (Option<ActuatorCommand>, LedToggles) {
        (self.command.take(), self.indicators.take())
    }
}
