//! Open-loop run along the yellow trajectory at the start of the course.
//!
//! Legs are driven in order, each until the left encoder passes its tick
//! threshold. Straights use the encoder-balanced forward drive, curves a
//! fixed pivot.

use super::{TaskIo, Transition};
use crate::config::{
    angle_ticks, distance_ticks, FIRST_STRAIGHT_MM, LEFT_CURVE_DEG, RIGHT_CURVE_DEG,
    SECOND_STRAIGHT_MM, THIRD_STRAIGHT_MM, TURN_SPEED,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrajectoryLeg {
    FirstStraight,
    RightCurve,
    SecondStraight,
    LeftCurve,
    ThirdStraight,
    Finished,
}

impl TrajectoryLeg {
    /// Left encoder ticks the leg lasts. `None` once finished.
    pub const fn limit(self) -> Option<u32> {
        match self {
            TrajectoryLeg::FirstStraight => Some(distance_ticks(FIRST_STRAIGHT_MM)),
            TrajectoryLeg::RightCurve => Some(angle_ticks(RIGHT_CURVE_DEG)),
            TrajectoryLeg::SecondStraight => Some(distance_ticks(SECOND_STRAIGHT_MM)),
            TrajectoryLeg::LeftCurve => Some(angle_ticks(LEFT_CURVE_DEG)),
            TrajectoryLeg::ThirdStraight => Some(distance_ticks(THIRD_STRAIGHT_MM)),
            TrajectoryLeg::Finished => None,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            TrajectoryLeg::FirstStraight => TrajectoryLeg::RightCurve,
            TrajectoryLeg::RightCurve => TrajectoryLeg::SecondStraight,
            TrajectoryLeg::SecondStraight => TrajectoryLeg::LeftCurve,
            TrajectoryLeg::LeftCurve => TrajectoryLeg::ThirdStraight,
            TrajectoryLeg::ThirdStraight | TrajectoryLeg::Finished => TrajectoryLeg::Finished,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trajectory {
    leg: TrajectoryLeg,
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::new()
    }
}

impl Trajectory {
    pub const fn new() -> Self {
        Self {
            leg: TrajectoryLeg::FirstStraight,
        }
    }

    pub fn leg(&self) -> TrajectoryLeg {
        self.leg
    }

    pub fn step(&mut self, io: &mut TaskIo<'_>) -> Option<Transition> {
        let Some(limit) = self.leg.limit() else {
            io.reset_encoders();
            return Some(Transition::TrajectoryComplete);
        };

        if io.left_ticks() <= limit {
            self.drive_leg(io);
            return None;
        }

        io.reset_encoders();
        if self.leg == TrajectoryLeg::ThirdStraight {
            io.stop();
        }
        let next = self.leg.next();
        log_debug!("trajectory: {:?} -> {:?}", self.leg, next);
        self.leg = next;
        None
    }

    fn drive_leg(&self, io: &mut TaskIo<'_>) {
        match self.leg {
            TrajectoryLeg::FirstStraight => io.drive_forward(),
            TrajectoryLeg::RightCurve => io.drive(TURN_SPEED, -TURN_SPEED),
            TrajectoryLeg::SecondStraight | TrajectoryLeg::ThirdStraight => {
                io.set_normal_speed();
                io.drive_forward();
            }
            TrajectoryLeg::LeftCurve => io.drive(-TURN_SPEED, TURN_SPEED),
            TrajectoryLeg::Finished => {}
        }
    }
}
