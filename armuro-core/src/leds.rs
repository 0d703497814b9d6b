//! Indicator LEDs of the Armuro 1.
//!
//! Pins:
//! - PB5: left front
//! - PB4: right front
//! - PA10: tail

use armuro_race::LedToggles;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::peripherals::{PA10, PB4, PB5};

pub struct LedPanel<'d> {
    left: Output<'d>,
    right: Output<'d>,
    tail: Output<'d>,
}

impl<'d> LedPanel<'d> {
    /// All LEDs start dark.
    pub fn new(pb5: PB5, pb4: PB4, pa10: PA10) -> Self {
        Self {
            left: Output::new(pb5, Level::Low, Speed::Low),
            right: Output::new(pb4, Level::Low, Speed::Low),
            tail: Output::new(pa10, Level::Low, Speed::Low),
        }
    }

    /// Toggle every LED the controller asked for this cycle.
    pub fn apply(&mut self, toggles: LedToggles) {
        if toggles.left {
            self.left.toggle();
        }
        if toggles.right {
            self.right.toggle();
        }
        if toggles.tail {
            self.tail.toggle();
        }
    }
}
