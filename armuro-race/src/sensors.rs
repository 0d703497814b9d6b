//! Sensor conditioning for the Armuro 1.
//!
//! Turns one [`AnalogSample`] into discrete state:
//! - wheel encoders: reflective discs read through a Schmitt trigger, every
//!   edge counts as one tick
//! - line sensors: black/white by a single fixed threshold
//!
//! Higher values = less light reflected (black surface)
//! Lower values = more light reflected (white surface)

use crate::config::{
    BLACK_THRESHOLD, ENCODER_LEFT_HIGH, ENCODER_LEFT_LOW, ENCODER_RIGHT_HIGH, ENCODER_RIGHT_LOW,
};
use crate::sample::{AnalogSample, Channel};

/// Which side of the hysteresis band an encoder last crossed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Latch {
    #[default]
    Low,
    High,
}

/// Tick counter for one wheel encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderCounter {
    count: u32,
    latch: Latch,
    high: u32,
    low: u32,
}

impl EncoderCounter {
    /// Counter with the given rising (`high`) and falling (`low`) thresholds.
    pub const fn new(high: u32, low: u32) -> Self {
        Self {
            count: 0,
            latch: Latch::Low,
            high,
            low,
        }
    }

    /// Feed one raw reading. Returns `true` if it produced a tick.
    ///
    /// A single reading can cross at most one threshold, so a cycle adds at
    /// most one tick.
    pub fn update(&mut self, raw: u32) -> bool {
        let next = match self.latch {
            Latch::Low if raw >= self.high => Latch::High,
            Latch::High if raw <= self.low => Latch::Low,
            _ => return false,
        };
        self.latch = next;
        self.count = self.count.saturating_add(1);
        true
    }

    /// Ticks since the last reset.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn latch(&self) -> Latch {
        self.latch
    }

    /// Zero the count. The latch keeps tracking the disc.
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// Both wheel encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoders {
    left: EncoderCounter,
    right: EncoderCounter,
}

impl Default for Encoders {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoders {
    pub const fn new() -> Self {
        Self {
            left: EncoderCounter::new(ENCODER_LEFT_HIGH, ENCODER_LEFT_LOW),
            right: EncoderCounter::new(ENCODER_RIGHT_HIGH, ENCODER_RIGHT_LOW),
        }
    }

    /// Run both Schmitt triggers on the encoder channels of `sample`.
    pub fn condition(&mut self, sample: &AnalogSample) {
        self.left.update(sample.get(Channel::EncoderLeft));
        self.right.update(sample.get(Channel::EncoderRight));
    }

    pub fn left(&self) -> &EncoderCounter {
        &self.left
    }

    pub fn right(&self) -> &EncoderCounter {
        &self.right
    }

    pub fn left_ticks(&self) -> u32 {
        self.left.count
    }

    pub fn right_ticks(&self) -> u32 {
        self.right.count
    }

    /// Zero both counts.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}

/// Color seen by one line sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineColor {
    Black,
    #[default]
    White,
}

impl LineColor {
    pub fn classify(raw: u32) -> Self {
        if raw > BLACK_THRESHOLD {
            LineColor::Black
        } else {
            LineColor::White
        }
    }

    pub fn is_black(self) -> bool {
        self == LineColor::Black
    }

    pub fn is_white(self) -> bool {
        self == LineColor::White
    }
}

/// Colors under the three line sensors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineColors {
    pub left: LineColor,
    pub middle: LineColor,
    pub right: LineColor,
}

impl LineColors {
    /// No sensor sees the line.
    pub fn all_white(&self) -> bool {
        self.left.is_white() && self.middle.is_white() && self.right.is_white()
    }

    /// At least one sensor sees the line.
    pub fn any_black(&self) -> bool {
        !self.all_white()
    }
}

/// Classify the three line sensors of `sample`. Stateless.
pub fn condition_line_colors(sample: &AnalogSample) -> LineColors {
    LineColors {
        left: LineColor::classify(sample.get(Channel::LineLeft)),
        middle: LineColor::classify(sample.get(Channel::LineMiddle)),
        right: LineColor::classify(sample.get(Channel::LineRight)),
    }
}

/// Encoder counters and the latest line colors, updated once per cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorConditioner {
    encoders: Encoders,
    colors: LineColors,
}

impl SensorConditioner {
    pub const fn new() -> Self {
        Self {
            encoders: Encoders::new(),
            colors: LineColors {
                left: LineColor::White,
                middle: LineColor::White,
                right: LineColor::White,
            },
        }
    }

    /// Condition one sample: encoder edges first, then line colors.
    pub fn condition(&mut self, sample: &AnalogSample) {
        self.condition_encoders(sample);
        self.condition_line_colors(sample);
    }

    pub fn condition_encoders(&mut self, sample: &AnalogSample) {
        self.encoders.condition(sample);
    }

    pub fn condition_line_colors(&mut self, sample: &AnalogSample) {
        self.colors = condition_line_colors(sample);
    }

    pub fn encoders(&self) -> &Encoders {
        &self.encoders
    }

    pub fn encoders_mut(&mut self) -> &mut Encoders {
        &mut self.encoders
    }

    pub fn colors(&self) -> LineColors {
        self.colors
    }
}
