//! Line search after the line was lost.
//!
//! The robot pivots left by half the perimeter, back to center, right by half
//! the perimeter and back to center again. If none of that found the line it
//! advances a short distance (to bridge a gap in the line) and sweeps again.
//! Whatever the phase, a black reading on any sensor ends the search.

use super::{TaskIo, Transition};
use crate::config::{
    angle_ticks, distance_ticks, HALF_PERIMETER_DEG, NEXT_PERIMETER_MM, TURN_SPEED,
};

const SWEEP_TICKS: u32 = angle_ticks(HALF_PERIMETER_DEG);
const ADVANCE_TICKS: u32 = distance_ticks(NEXT_PERIMETER_MM);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SearchPhase {
    /// Sweep to the left.
    Left,
    /// Sweep to the right.
    Right,
    /// Turn back to the heading the line was lost at.
    Center,
    /// Advance to the next spot.
    DriveForward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSearch {
    phase: SearchPhase,
    /// Both sides of the current spot have been swept.
    perimeter_checked: bool,
}

impl Default for LineSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSearch {
    pub const fn new() -> Self {
        Self {
            phase: SearchPhase::Left,
            perimeter_checked: false,
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn perimeter_checked(&self) -> bool {
        self.perimeter_checked
    }

    /// Back to the first sweep of a fresh spot.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn step(&mut self, io: &mut TaskIo<'_>) -> Option<Transition> {
        match self.phase {
            SearchPhase::Left => {
                io.drive(-TURN_SPEED, TURN_SPEED);
                if io.left_ticks() > SWEEP_TICKS {
                    io.reset_encoders();
                    self.enter(SearchPhase::Center);
                }
            }
            SearchPhase::Right => {
                io.drive(TURN_SPEED, -TURN_SPEED);
                if io.left_ticks() > SWEEP_TICKS {
                    io.reset_encoders();
                    self.perimeter_checked = true;
                    self.enter(SearchPhase::Center);
                }
            }
            SearchPhase::Center if self.perimeter_checked => {
                // back from the right
                io.drive(-TURN_SPEED, TURN_SPEED);
                if io.left_ticks() > SWEEP_TICKS {
                    io.reset_encoders();
                    self.enter(SearchPhase::DriveForward);
                }
            }
            SearchPhase::Center => {
                // back from the left
                io.drive(TURN_SPEED, -TURN_SPEED);
                if io.left_ticks() > SWEEP_TICKS {
                    io.reset_encoders();
                    self.enter(SearchPhase::Right);
                }
            }
            SearchPhase::DriveForward => {
                io.drive(TURN_SPEED, TURN_SPEED);
                if io.left_ticks() > ADVANCE_TICKS {
                    self.perimeter_checked = false;
                    io.reset_encoders();
                    self.enter(SearchPhase::Left);
                }
            }
        }

        if io.colors().any_black() {
            io.stop();
            io.set_normal_speed();
            self.reset();
            return Some(Transition::LineFound);
        }

        None
    }

    fn enter(&mut self, phase: SearchPhase) {
        log_debug!("search: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}
