//! Motor output stage of the Armuro 1.
//!
//! Each wheel motor is driven in phase/enable mode:
//! - enable: TIM1 complementary PWM output (duty = speed)
//! - phase: GPIO, high = reverse
//!
//! Uses TIM1 channels:
//! - CH2N (PB0): left motor enable
//! - CH3N (PB1): right motor enable
//!
//! Phase pins:
//! - PA12: left motor
//! - PB7: right motor

use armuro_race::config::MAX_DUTY;
use armuro_race::{ActuatorCommand, Direction, WheelOutput};
use embassy_stm32::gpio::{Level, Output, OutputType, Speed};
use embassy_stm32::peripherals::{PA12, PB0, PB1, PB7, TIM1};
use embassy_stm32::time::hz;
use embassy_stm32::timer::Channel;
use embassy_stm32::timer::complementary_pwm::{ComplementaryPwm, ComplementaryPwmPin};
use embassy_stm32::timer::low_level::CountingMode;

/// PWM frequency for motor control (20kHz - inaudible)
const PWM_FREQUENCY: u32 = 20_000;

/// Two wheel motors behind a phase/enable driver.
pub struct MotorController<'d> {
    pwm: ComplementaryPwm<'d, TIM1>,
    phase_left: Output<'d>,
    phase_right: Output<'d>,
    max_duty: u16,
}

impl<'d> MotorController<'d> {
    /// Create a new motor controller with both motors braked.
    ///
    /// # Arguments
    /// * `tim1` - TIM1 peripheral
    /// * `pb0` - CH2N, left motor enable
    /// * `pb1` - CH3N, right motor enable
    /// * `pa12` - left motor phase
    /// * `pb7` - right motor phase
    pub fn new(tim1: TIM1, pb0: PB0, pb1: PB1, pa12: PA12, pb7: PB7) -> Self {
        let enable_left = ComplementaryPwmPin::new_ch2(pb0, OutputType::PushPull);
        let enable_right = ComplementaryPwmPin::new_ch3(pb1, OutputType::PushPull);

        let mut pwm = ComplementaryPwm::new(
            tim1,
            None,
            None,
            None,
            Some(enable_left),
            None,
            Some(enable_right),
            None,
            None,
            hz(PWM_FREQUENCY),
            CountingMode::EdgeAlignedUp,
        );

        let max_duty = pwm.get_max_duty();

        pwm.set_duty(Channel::Ch2, 0);
        pwm.set_duty(Channel::Ch3, 0);
        pwm.enable(Channel::Ch2);
        pwm.enable(Channel::Ch3);

        Self {
            pwm,
            phase_left: Output::new(pa12, Level::Low, Speed::Low),
            phase_right: Output::new(pb7, Level::Low, Speed::Low),
            max_duty,
        }
    }

    /// Write one actuator command to both wheels.
    pub fn apply(&mut self, command: &ActuatorCommand) {
        let left = self.timer_duty(command.left);
        let right = self.timer_duty(command.right);

        self.pwm.set_duty(Channel::Ch2, left);
        set_phase(&mut self.phase_left, command.left.direction);

        self.pwm.set_duty(Channel::Ch3, right);
        set_phase(&mut self.phase_right, command.right.direction);
    }

    /// Brake both motors.
    pub fn stop_all(&mut self) {
        self.apply(&ActuatorCommand::STOP);
    }

    /// Rescale a duty in `0..=MAX_DUTY` to the timer's period.
    fn timer_duty(&self, wheel: WheelOutput) -> u16 {
        let duty = wheel.duty.min(MAX_DUTY) as u64 * self.max_duty as u64 / MAX_DUTY as u64;
        duty as u16
    }
}

fn set_phase(pin: &mut Output<'_>, direction: Direction) {
    match direction {
        Direction::Forward => pin.set_low(),
        Direction::Reverse => pin.set_high(),
    }
}
