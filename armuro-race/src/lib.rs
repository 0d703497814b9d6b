//! Course logic for the Armuro 1 robot.
//!
//! Everything that decides how the robot moves lives here, independent of the
//! board: the sensor conditioner turning raw ADC levels into encoder ticks and
//! line colors, the motion actuator turning wheel speeds into duty/direction
//! pairs, and the race controller sequencing the course.
//!
//! The firmware feeds one [`CycleInputs`] per control cycle into
//! [`RaceController::tick`] and applies the returned [`CycleOutput`] to the
//! motors and LEDs. Tests do the same with synthetic samples.
//!
//! ```
//! use armuro_race::{AnalogSample, Channel, CycleInputs, RaceController, RaceState};
//!
//! let mut race = RaceController::new();
//! let sample = AnalogSample::default().with(Channel::Battery, 3100);
//! let output = race.tick(&CycleInputs::new(sample, false, 0));
//!
//! assert_eq!(output.state, RaceState::FollowTrajectory);
//! assert!(output.command.is_some());
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

pub mod config;
pub mod indicators;
pub mod motion;
pub mod race;
pub mod sample;
pub mod sensors;

pub use indicators::LedToggles;
pub use motion::{ActuatorCommand, Direction, WheelOutput};
pub use race::{CycleInputs, CycleOutput, RaceController, RaceState};
pub use sample::{AnalogSample, Channel};
pub use sensors::{LineColor, LineColors, SensorConditioner};
