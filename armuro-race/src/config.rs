//! Compiled-in tunables for the Armuro 1 and the course it races.
//!
//! Raw levels are on the 12-bit ADC scale (0-4095). Speeds are normalized
//! wheel commands in [-1, 1].

// Schmitt trigger thresholds for the wheel encoders

/// Left encoder counts a tick when it rises to this level while latched low.
pub const ENCODER_LEFT_HIGH: u32 = 2500;
/// Left encoder counts a tick when it falls to this level while latched high.
pub const ENCODER_LEFT_LOW: u32 = 1000;
/// Right encoder rising threshold. The right disc reflects less, hence higher.
pub const ENCODER_RIGHT_HIGH: u32 = 2750;
/// Right encoder falling threshold.
pub const ENCODER_RIGHT_LOW: u32 = 1000;

/// A line sensor strictly above this level sees black.
pub const BLACK_THRESHOLD: u32 = 2500;

/// Full-scale duty value of the motor PWM (2^16 - 1).
pub const MAX_DUTY: u32 = u16::MAX as u32;

pub const NORMAL_SPEED_LEFT: f32 = 0.5;
pub const NORMAL_SPEED_RIGHT: f32 = 0.5;
pub const MAX_SPEED: f32 = 1.0;

/// Proportional gain of the straight-driving correction (per tick of error).
pub const FORWARD_GAIN: f32 = 0.15;
/// Proportional gain of the line follower (per raw ADC count of error).
pub const LINE_GAIN: f32 = 0.00015;

/// Minimum time between two toggles of the same LED, in milliseconds.
pub const BLINK_INTERVAL_MS: u32 = 100;

/// Encoder ticks per millimetre driven.
pub const TICKS_PER_MM: f64 = 0.19;
/// Encoder ticks per degree turned. Only holds at the turn speed used on the course.
pub const TICKS_PER_DEGREE: f64 = 0.13;

// Yellow trajectory at the start of the course
pub const FIRST_STRAIGHT_MM: u32 = 470;
pub const RIGHT_CURVE_DEG: u32 = 150;
pub const SECOND_STRAIGHT_MM: u32 = 355;
pub const LEFT_CURVE_DEG: u32 = 90;
pub const THIRD_STRAIGHT_MM: u32 = 320;

/// How far the robot pivots to each side while looking for a lost line.
pub const HALF_PERIMETER_DEG: u32 = 100;
/// How far the robot advances before sweeping again (bridges gaps in the line).
pub const NEXT_PERIMETER_MM: u32 = 80;

/// Left encoder ticks past the obstacle after which a white middle sensor means finish.
pub const FINISH_APPROACH_TICKS: u32 = 75;
/// Final spurt over the finish line before the robot stops.
pub const FINISH_SPURT_MM: u32 = 100;

/// Ticks backed up after hitting the obstacle.
pub const AVOID_REVERSE_TICKS: u32 = 5;
/// Ticks pivoted away from the obstacle.
pub const AVOID_TURN_TICKS: u32 = 7;

/// Wheel speed for pivots, sweeps and reversing.
pub const TURN_SPEED: f32 = 0.5;
/// Arc driven around the obstacle (left, right).
pub const CIRCUIT_SPEED: (f32, f32) = (0.3, 0.55);

/// Tick threshold for a distance. Ticks are whole, so the fraction is dropped.
pub const fn distance_ticks(mm: u32) -> u32 {
    (mm as f64 * TICKS_PER_MM) as u32
}

/// Tick threshold for a turn angle.
pub const fn angle_ticks(degrees: u32) -> u32 {
    (degrees as f64 * TICKS_PER_DEGREE) as u32
}
