//! Drive around the obstacle blocking the line.

use super::{TaskIo, Transition};
use crate::config::{AVOID_REVERSE_TICKS, AVOID_TURN_TICKS, CIRCUIT_SPEED, TURN_SPEED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AvoidPhase {
    /// Back away from the obstacle.
    Reverse,
    /// Pivot so the obstacle is on the left.
    Turn,
    /// Arc around it until the middle sensor is back on the line.
    Circuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleAvoidance {
    phase: AvoidPhase,
}

impl Default for ObstacleAvoidance {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleAvoidance {
    pub const fn new() -> Self {
        Self {
            phase: AvoidPhase::Reverse,
        }
    }

    #[cfg(test)]
    pub(crate) const fn at(phase: AvoidPhase) -> Self {
        Self { phase }
    }

    pub fn phase(&self) -> AvoidPhase {
        self.phase
    }

    pub fn step(&mut self, io: &mut TaskIo<'_>) -> Option<Transition> {
        match self.phase {
            AvoidPhase::Reverse => {
                io.drive(-TURN_SPEED, -TURN_SPEED);
                if io.left_ticks() > AVOID_REVERSE_TICKS {
                    io.reset_encoders();
                    self.enter(AvoidPhase::Turn);
                }
                None
            }
            AvoidPhase::Turn => {
                io.drive(TURN_SPEED, -TURN_SPEED);
                if io.left_ticks() > AVOID_TURN_TICKS {
                    io.reset_encoders();
                    self.enter(AvoidPhase::Circuit);
                }
                None
            }
            AvoidPhase::Circuit => {
                let (left, right) = CIRCUIT_SPEED;
                io.drive(left, right);
                if io.colors().middle.is_black() {
                    io.reset_encoders();
                    io.set_normal_speed();
                    // ready for another obstacle
                    self.enter(AvoidPhase::Reverse);
                    return Some(Transition::ObstaclePassed);
                }
                None
            }
        }
    }

    fn enter(&mut self, phase: AvoidPhase) {
        log_debug!("avoid: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{ActuatorCommand, Direction, MotionActuator};
    use crate::sample::{AnalogSample, Channel};
    use crate::sensors::{Encoders, LineColor, LineColors};

    fn run(
        avoid: &mut ObstacleAvoidance,
        ticks: u32,
        colors: LineColors,
    ) -> (Option<Transition>, Option<ActuatorCommand>, Encoders) {
        let sample = AnalogSample::default();
        let mut encoders = Encoders::new();
        for i in 0..ticks {
            let level = if i % 2 == 0 { 3000 } else { 500 };
            encoders.condition(&AnalogSample::default().with(Channel::EncoderLeft, level));
        }
        let mut motion = MotionActuator::new();
        motion.begin_cycle(0);
        let transition = {
            let mut io = TaskIo::new(&sample, colors, false, &mut encoders, &mut motion);
            avoid.step(&mut io)
        };
        (transition, motion.finish_cycle().0, encoders)
    }

    #[test]
    fn test_reverse_until_past_limit() {
        let mut avoid = ObstacleAvoidance::new();
        let (_, command, _) = run(&mut avoid, AVOID_REVERSE_TICKS, LineColors::default());
        assert_eq!(avoid.phase(), AvoidPhase::Reverse);
        let command = command.unwrap();
        assert_eq!(command.left.direction, Direction::Reverse);
        assert_eq!(command.right.direction, Direction::Reverse);

        let (_, _, encoders) = run(&mut avoid, AVOID_REVERSE_TICKS + 1, LineColors::default());
        assert_eq!(avoid.phase(), AvoidPhase::Turn);
        assert_eq!(encoders.left_ticks(), 0);
    }

    #[test]
    fn test_turn_then_circuit() {
        let mut avoid = ObstacleAvoidance::at(AvoidPhase::Turn);
        run(&mut avoid, AVOID_TURN_TICKS, LineColors::default());
        assert_eq!(avoid.phase(), AvoidPhase::Turn);
        run(&mut avoid, AVOID_TURN_TICKS + 1, LineColors::default());
        assert_eq!(avoid.phase(), AvoidPhase::Circuit);
    }

    #[test]
    fn test_circuit_arcs_until_middle_black() {
        let mut avoid = ObstacleAvoidance::at(AvoidPhase::Circuit);
        let side_only = LineColors {
            left: LineColor::Black,
            ..LineColors::default()
        };
        let (transition, command, _) = run(&mut avoid, 40, side_only);
        assert_eq!(transition, None);
        assert_eq!(command, Some(ActuatorCommand::from_speeds(0.3, 0.55)));

        let middle = LineColors {
            middle: LineColor::Black,
            ..LineColors::default()
        };
        let (transition, _, encoders) = run(&mut avoid, 40, middle);
        assert_eq!(transition, Some(Transition::ObstaclePassed));
        assert_eq!(avoid.phase(), AvoidPhase::Reverse);
        assert_eq!(encoders.left_ticks(), 0);
    }
}
