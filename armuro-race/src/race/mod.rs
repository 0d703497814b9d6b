//! Race controller: sequences the course.
//!
//! The course is run as five race states. Each cycle exactly one task handler
//! runs for the active state:
//!
//! | State              | Handler                          | Leaves to                      |
//! |--------------------|----------------------------------|--------------------------------|
//! | `FollowTrajectory` | [`Trajectory`]                   | `FollowLine`                   |
//! | `FollowLine`       | [`follow_line`]                  | `SearchLine`, `AvoidObstacle`, `FinishLine` |
//! | `SearchLine`       | [`LineSearch`]                   | `FollowLine`                   |
//! | `AvoidObstacle`    | [`ObstacleAvoidance`]            | `FollowLine`                   |
//! | `FinishLine`       | [`finish_line`]                  | (terminal)                     |
//!
//! Handlers only touch their own sub-state and the [`TaskIo`] view. They
//! report a [`Transition`]; the controller applies it and any effect it has
//! on other tasks.

mod avoid;
mod finish;
mod follow_line;
mod search;
mod trajectory;

pub use avoid::{AvoidPhase, ObstacleAvoidance};
pub use finish::finish_line;
pub use follow_line::follow_line;
pub use search::{LineSearch, SearchPhase};
pub use trajectory::{Trajectory, TrajectoryLeg};

use crate::indicators::LedToggles;
use crate::motion::{ActuatorCommand, MotionActuator, Setpoint};
use crate::sample::{AnalogSample, Channel};
use crate::sensors::{Encoders, LineColors, SensorConditioner};

/// Top-level phase of the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RaceState {
    FollowTrajectory,
    FollowLine,
    SearchLine,
    AvoidObstacle,
    FinishLine,
}

/// Why a task hands over to another race state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Fixed trajectory driven to its end.
    TrajectoryComplete,
    /// All line sensors white while following.
    LineLost,
    /// Bumper pressed while following.
    ObstacleDetected,
    /// Search sweep found the line again.
    LineFound,
    /// Back on the line behind the obstacle.
    ObstaclePassed,
    /// White middle sensor on the last stretch.
    FinishLineReached,
}

impl Transition {
    pub fn target(self) -> RaceState {
        match self {
            Transition::TrajectoryComplete
            | Transition::LineFound
            | Transition::ObstaclePassed => RaceState::FollowLine,
            Transition::LineLost => RaceState::SearchLine,
            Transition::ObstacleDetected => RaceState::AvoidObstacle,
            Transition::FinishLineReached => RaceState::FinishLine,
        }
    }
}

/// What the task handlers may see and do during one cycle.
///
/// Sensor state is read-only apart from zeroing the encoders; motion goes
/// through the actuator.
pub struct TaskIo<'a> {
    sample: &'a AnalogSample,
    colors: LineColors,
    obstacle: bool,
    encoders: &'a mut Encoders,
    motion: &'a mut MotionActuator,
}

impl<'a> TaskIo<'a> {
    pub fn new(
        sample: &'a AnalogSample,
        colors: LineColors,
        obstacle: bool,
        encoders: &'a mut Encoders,
        motion: &'a mut MotionActuator,
    ) -> Self {
        Self {
            sample,
            colors,
            obstacle,
            encoders,
            motion,
        }
    }

    pub fn raw(&self, channel: Channel) -> u32 {
        self.sample.get(channel)
    }

    pub fn colors(&self) -> LineColors {
        self.colors
    }

    pub fn obstacle_detected(&self) -> bool {
        self.obstacle
    }

    pub fn left_ticks(&self) -> u32 {
        self.encoders.left_ticks()
    }

    pub fn reset_encoders(&mut self) {
        self.encoders.reset();
    }

    pub fn setpoint(&self) -> Setpoint {
        self.motion.setpoint()
    }

    pub fn set_normal_speed(&mut self) {
        self.motion.set_normal_speed();
    }

    pub fn set_max_speed(&mut self) {
        self.motion.set_max_speed();
    }

    pub fn drive(&mut self, speed_left: f32, speed_right: f32) {
        self.motion.drive(speed_left, speed_right);
    }

    pub fn stop(&mut self) {
        self.motion.stop();
    }

    pub fn drive_forward(&mut self) {
        self.motion.drive_forward(self.encoders);
    }

    pub fn blink_all(&mut self) {
        self.motion.blink_all();
    }
}

/// Inputs for one control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleInputs {
    pub sample: AnalogSample,
    /// Power switch on. Sensors are conditioned either way; tasks only run when set.
    pub enabled: bool,
    /// Bumper pressed.
    pub obstacle: bool,
    /// Monotonic milliseconds, for blink throttling.
    pub now_ms: u32,
}

impl CycleInputs {
    /// Inputs with the power switch read from the battery channel.
    pub fn new(sample: AnalogSample, obstacle: bool, now_ms: u32) -> Self {
        Self {
            enabled: sample.is_powered(),
            sample,
            obstacle,
            now_ms,
        }
    }
}

/// Result of one control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleOutput {
    /// Motor outputs to write, if any task commanded the motors. Otherwise
    /// the motors keep their previous output.
    pub command: Option<ActuatorCommand>,
    pub leds: LedToggles,
    /// Race state after this cycle.
    pub state: RaceState,
}

/// The whole robot context: conditioned sensors, actuator, race state and
/// every task's sub-state.
///
/// `Copy`, so a cycle can be replayed from any saved context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaceController {
    state: RaceState,
    sensors: SensorConditioner,
    motion: MotionActuator,
    trajectory: Trajectory,
    search: LineSearch,
    avoid: ObstacleAvoidance,
    obstacle_passed: bool,
}

impl Default for RaceController {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceController {
    /// Controller at the start line: encoders zeroed, normal speed, first leg
    /// of the trajectory.
    pub const fn new() -> Self {
        Self::starting_at(RaceState::FollowTrajectory)
    }

    /// Controller that begins in `state` with every task at its first phase.
    ///
    /// Lets a single course segment be run on the bench.
    pub const fn starting_at(state: RaceState) -> Self {
        Self {
            state,
            sensors: SensorConditioner::new(),
            motion: MotionActuator::new(),
            trajectory: Trajectory::new(),
            search: LineSearch::new(),
            avoid: ObstacleAvoidance::new(),
            obstacle_passed: false,
        }
    }

    pub fn state(&self) -> RaceState {
        self.state
    }

    pub fn sensors(&self) -> &SensorConditioner {
        &self.sensors
    }

    pub fn setpoint(&self) -> Setpoint {
        self.motion.setpoint()
    }

    pub fn trajectory_leg(&self) -> TrajectoryLeg {
        self.trajectory.leg()
    }

    pub fn search_phase(&self) -> SearchPhase {
        self.search.phase()
    }

    pub fn perimeter_checked(&self) -> bool {
        self.search.perimeter_checked()
    }

    pub fn avoid_phase(&self) -> AvoidPhase {
        self.avoid.phase()
    }

    pub fn obstacle_passed(&self) -> bool {
        self.obstacle_passed
    }

    /// Run one control cycle.
    pub fn tick(&mut self, inputs: &CycleInputs) -> CycleOutput {
        self.sensors.condition(&inputs.sample);
        self.motion.begin_cycle(inputs.now_ms);

        if inputs.enabled {
            self.dispatch(inputs);
        }

        let (command, leds) = self.motion.finish_cycle();
        CycleOutput {
            command,
            leds,
            state: self.state,
        }
    }

    /// [`tick`](Self::tick) as a function from context to context.
    pub fn step(mut self, inputs: &CycleInputs) -> (Self, CycleOutput) {
        let output = self.tick(inputs);
        (self, output)
    }

    fn dispatch(&mut self, inputs: &CycleInputs) {
        let colors = self.sensors.colors();
        let mut io = TaskIo::new(
            &inputs.sample,
            colors,
            inputs.obstacle,
            self.sensors.encoders_mut(),
            &mut self.motion,
        );

        let transition = match self.state {
            RaceState::FollowTrajectory => self.trajectory.step(&mut io),
            RaceState::FollowLine => follow_line(&mut io, self.obstacle_passed),
            RaceState::SearchLine => self.search.step(&mut io),
            RaceState::AvoidObstacle => self.avoid.step(&mut io),
            RaceState::FinishLine => {
                finish_line(&mut io);
                None
            }
        };

        if let Some(transition) = transition {
            self.apply(transition);
        }
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::LineLost => self.search.reset(),
            Transition::ObstaclePassed => self.obstacle_passed = true,
            _ => {}
        }

        let next = transition.target();
        log_info!("race: {:?} -> {:?} ({:?})", self.state, next, transition);
        self.state = next;
    }
}
