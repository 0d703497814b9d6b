//! Raw analog frame as delivered by the ADC scan.

use core::fmt;

/// Number of ADC channels in one scan.
pub const CHANNEL_COUNT: usize = 6;

/// ADC channel, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    LineMiddle = 0,
    EncoderLeft = 1,
    LineRight = 2,
    Battery = 3,
    EncoderRight = 4,
    LineLeft = 5,
}

impl Channel {
    /// All channels in scan order.
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::LineMiddle,
        Channel::EncoderLeft,
        Channel::LineRight,
        Channel::Battery,
        Channel::EncoderRight,
        Channel::LineLeft,
    ];

    /// Position of this channel in the scan.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One scan of all six channels.
///
/// Values are not validated; anything the ADC reports is passed on as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalogSample {
    raw: [u32; CHANNEL_COUNT],
}

impl AnalogSample {
    /// Build a sample from a frame in scan order.
    pub const fn new(raw: [u32; CHANNEL_COUNT]) -> Self {
        Self { raw }
    }

    pub fn get(&self, channel: Channel) -> u32 {
        self.raw[channel.index()]
    }

    pub fn set(&mut self, channel: Channel, value: u32) {
        self.raw[channel.index()] = value;
    }

    /// Copy of this sample with one channel replaced.
    pub fn with(mut self, channel: Channel, value: u32) -> Self {
        self.set(channel, value);
        self
    }

    /// Frame in scan order.
    pub fn raw(&self) -> &[u32; CHANNEL_COUNT] {
        &self.raw
    }

    /// The board reads zero on the battery channel when the power switch is off.
    pub fn is_powered(&self) -> bool {
        self.get(Channel::Battery) != 0
    }
}

/// Telemetry form: comma-separated raw values in scan order, no terminator.
impl fmt::Display for AnalogSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.raw.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}
