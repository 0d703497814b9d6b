//! Analog front end of the Armuro 1.
//!
//! One ADC scan covers the three line sensors, both wheel encoders and the
//! battery divider. The acquisition task scans continuously and publishes
//! the newest frame; the control loop picks it up at the top of each cycle.
//!
//! Pin Mapping (ADC1 channels):
//! - Line middle:   PA0 (ADC1_IN5)
//! - Encoder left:  PA1 (ADC1_IN6)
//! - Line right:    PA3 (ADC1_IN8)
//! - Battery:       PA4 (ADC1_IN9)
//! - Encoder right: PA5 (ADC1_IN10)
//! - Line left:     PA7 (ADC1_IN12)

use core::cell::Cell;

use armuro_race::AnalogSample;
use embassy_stm32::adc::Adc;
use embassy_stm32::peripherals::{ADC1, PA0, PA1, PA3, PA4, PA5, PA7};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Newest complete scan. Written by the acquisition task only.
static LATEST: Mutex<CriticalSectionRawMutex, Cell<AnalogSample>> =
    Mutex::new(Cell::new(AnalogSample::new([0; 6])));

/// Publish a finished scan.
pub fn publish(sample: AnalogSample) {
    LATEST.lock(|latest| latest.set(sample));
}

/// Newest scan. All six values always come from the same scan.
pub fn latest() -> AnalogSample {
    LATEST.lock(|latest| latest.get())
}

/// The six analog inputs of the robot.
pub struct AnalogFrontEnd<'d> {
    adc: Adc<'d, ADC1>,
    line_middle: PA0,
    encoder_left: PA1,
    line_right: PA3,
    battery: PA4,
    encoder_right: PA5,
    line_left: PA7,
}

impl<'d> AnalogFrontEnd<'d> {
    pub fn new(
        adc: Adc<'d, ADC1>,
        pa0: PA0,
        pa1: PA1,
        pa3: PA3,
        pa4: PA4,
        pa5: PA5,
        pa7: PA7,
    ) -> Self {
        Self {
            adc,
            line_middle: pa0,
            encoder_left: pa1,
            line_right: pa3,
            battery: pa4,
            encoder_right: pa5,
            line_left: pa7,
        }
    }

    /// Scan all channels in the order of [`armuro_race::Channel`].
    pub fn scan(&mut self) -> AnalogSample {
        AnalogSample::new([
            self.adc.blocking_read(&mut self.line_middle) as u32,
            self.adc.blocking_read(&mut self.encoder_left) as u32,
            self.adc.blocking_read(&mut self.line_right) as u32,
            self.adc.blocking_read(&mut self.battery) as u32,
            self.adc.blocking_read(&mut self.encoder_right) as u32,
            self.adc.blocking_read(&mut self.line_left) as u32,
        ])
    }
}
