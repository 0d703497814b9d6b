//! P-controller along the painted line.

use super::{TaskIo, Transition};
use crate::config::{FINISH_APPROACH_TICKS, LINE_GAIN};
use crate::sample::Channel;

/// Steer toward the line center and watch for the events that end line
/// following.
///
/// Once the obstacle is behind the robot and it has covered
/// [`FINISH_APPROACH_TICKS`], a white middle sensor is the finish line.
/// Before that, an all-white reading is a lost line. The bumper is checked
/// on every cycle and wins over both.
pub fn follow_line(io: &mut TaskIo<'_>, obstacle_passed: bool) -> Option<Transition> {
    let error = i64::from(io.raw(Channel::LineLeft)) - i64::from(io.raw(Channel::LineRight));
    let correction = error as f32 * LINE_GAIN;
    let setpoint = io.setpoint();
    io.drive(setpoint.left - correction, setpoint.right + correction);

    let mut transition = None;

    if obstacle_passed && io.left_ticks() > FINISH_APPROACH_TICKS {
        // the grey/white finish marker after the last black stretch
        if io.colors().middle.is_white() {
            io.reset_encoders();
            io.set_max_speed();
            io.drive_forward();
            transition = Some(Transition::FinishLineReached);
        }
    } else if io.colors().all_white() {
        io.stop();
        io.reset_encoders();
        transition = Some(Transition::LineLost);
    }

    if io.obstacle_detected() {
        io.reset_encoders();
        transition = Some(Transition::ObstacleDetected);
    }

    transition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_DUTY;
    use crate::motion::{ActuatorCommand, Direction, MotionActuator, Setpoint};
    use crate::sample::AnalogSample;
    use crate::sensors::{condition_line_colors, Encoders};

    const BLACK: u32 = 3500;
    const WHITE: u32 = 300;

    struct Rig {
        sample: AnalogSample,
        encoders: Encoders,
        motion: MotionActuator,
        obstacle: bool,
    }

    impl Rig {
        fn new(left: u32, middle: u32, right: u32) -> Self {
            Self {
                sample: AnalogSample::default()
                    .with(Channel::LineLeft, left)
                    .with(Channel::LineMiddle, middle)
                    .with(Channel::LineRight, right),
                encoders: Encoders::new(),
                motion: MotionActuator::new(),
                obstacle: false,
            }
        }

        fn with_left_ticks(mut self, ticks: u32) -> Self {
            for i in 0..ticks {
                let level = if i % 2 == 0 { 3000 } else { 500 };
                self.encoders
                    .condition(&AnalogSample::default().with(Channel::EncoderLeft, level));
            }
            self
        }

        fn run(
            &mut self,
            obstacle_passed: bool,
        ) -> (Option<Transition>, Option<ActuatorCommand>) {
            self.motion.begin_cycle(0);
            let colors = condition_line_colors(&self.sample);
            let transition = {
                let mut io = TaskIo::new(
                    &self.sample,
                    colors,
                    self.obstacle,
                    &mut self.encoders,
                    &mut self.motion,
                );
                follow_line(&mut io, obstacle_passed)
            };
            (transition, self.motion.finish_cycle().0)
        }
    }

    #[test]
    fn test_centered_line_drives_at_setpoint() {
        let mut rig = Rig::new(1800, BLACK, 1800);
        let (transition, command) = rig.run(false);
        assert_eq!(transition, None);
        assert_eq!(command, Some(ActuatorCommand::from_speeds(0.5, 0.5)));
    }

    #[test]
    fn test_steers_toward_darker_side() {
        // left sees more of the line: error 2000 -> correction 0.3
        let mut rig = Rig::new(3000, BLACK, 1000);
        let (_, command) = rig.run(false);
        let command = command.unwrap();
        assert!(command.left.duty < command.right.duty);

        let mut rig = Rig::new(1000, BLACK, 3000);
        let (_, command) = rig.run(false);
        let command = command.unwrap();
        assert!(command.left.duty > command.right.duty);
    }

    #[test]
    fn test_all_white_loses_line() {
        let mut rig = Rig::new(WHITE, WHITE, WHITE).with_left_ticks(12);
        let (transition, command) = rig.run(false);
        assert_eq!(transition, Some(Transition::LineLost));
        assert_eq!(command, Some(ActuatorCommand::STOP));
        assert_eq!(rig.encoders.left_ticks(), 0);
    }

    #[test]
    fn test_bumper_starts_avoidance() {
        let mut rig = Rig::new(WHITE, BLACK, WHITE).with_left_ticks(4);
        rig.obstacle = true;
        let (transition, _) = rig.run(false);
        assert_eq!(transition, Some(Transition::ObstacleDetected));
        assert_eq!(rig.encoders.left_ticks(), 0);
    }

    #[test]
    fn test_finish_needs_obstacle_passed() {
        // white middle on a line segment before the obstacle is not the finish
        let mut rig = Rig::new(BLACK, WHITE, WHITE).with_left_ticks(80);
        let (transition, _) = rig.run(false);
        assert_eq!(transition, None);
    }

    #[test]
    fn test_finish_needs_approach_distance() {
        let mut rig = Rig::new(WHITE, WHITE, WHITE).with_left_ticks(FINISH_APPROACH_TICKS);
        let (transition, _) = rig.run(true);
        assert_eq!(transition, Some(Transition::LineLost));
    }

    #[test]
    fn test_finish_line_spurts_at_max_speed() {
        let mut rig = Rig::new(BLACK, WHITE, BLACK).with_left_ticks(FINISH_APPROACH_TICKS + 1);
        let (transition, command) = rig.run(true);
        assert_eq!(transition, Some(Transition::FinishLineReached));
        assert_eq!(rig.motion.setpoint(), Setpoint::MAX);
        assert_eq!(rig.encoders.left_ticks(), 0);
        assert_eq!(command, Some(ActuatorCommand::from_speeds(1.0, 1.0)));
    }

    #[test]
    fn test_finish_approach_ignores_lost_line() {
        // all white is the finish marker here, never a lost line
        let mut rig = Rig::new(WHITE, WHITE, WHITE).with_left_ticks(FINISH_APPROACH_TICKS + 1);
        let (transition, _) = rig.run(true);
        assert_eq!(transition, Some(Transition::FinishLineReached));

        let mut rig = Rig::new(WHITE, BLACK, WHITE).with_left_ticks(FINISH_APPROACH_TICKS + 1);
        let (transition, _) = rig.run(true);
        assert_eq!(transition, None);
    }

    #[test]
    fn test_bumper_on_last_stretch_starts_avoidance() {
        let mut rig = Rig::new(WHITE, BLACK, WHITE).with_left_ticks(FINISH_APPROACH_TICKS + 5);
        rig.obstacle = true;
        let (transition, _) = rig.run(true);
        assert_eq!(transition, Some(Transition::ObstacleDetected));
        assert_eq!(rig.encoders.left_ticks(), 0);
    }

    #[test]
    fn test_bumper_wins_over_finish_line() {
        let mut rig = Rig::new(WHITE, WHITE, WHITE).with_left_ticks(FINISH_APPROACH_TICKS + 1);
        rig.obstacle = true;
        let (transition, _) = rig.run(true);
        assert_eq!(transition, Some(Transition::ObstacleDetected));
    }

    #[test]
    fn test_extreme_raw_values_steer_without_overflow() {
        let mut rig = Rig::new(0x7FFF_FFFF, BLACK, 0x8000_0000);
        let (transition, command) = rig.run(false);
        assert_eq!(transition, None);
        // error -1: a hair toward the right sensor
        assert!(command.is_some());

        let mut rig = Rig::new(u32::MAX, BLACK, 0);
        let (_, command) = rig.run(false);
        let command = command.unwrap();
        // correction far beyond the setpoint: left reverses, right saturates
        assert_eq!(command.left.direction, Direction::Reverse);
        assert_eq!(command.right.duty, MAX_DUTY);

        let mut rig = Rig::new(0, BLACK, u32::MAX);
        let (_, command) = rig.run(false);
        let command = command.unwrap();
        assert_eq!(command.left.duty, MAX_DUTY);
        assert_eq!(command.right.direction, Direction::Reverse);
    }
}
