//! Rate-limited LED blinking.
//!
//! The control loop asks for blinks far more often than a human can see, so
//! each LED toggles at most once per [`BLINK_INTERVAL_MS`]. The core only
//! records toggle requests; the firmware flips the pins.

use crate::config::BLINK_INTERVAL_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    Left,
    Right,
    /// The two SMD tail lights, switched together.
    Tail,
}

/// LEDs to toggle at the end of a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedToggles {
    pub left: bool,
    pub right: bool,
    pub tail: bool,
}

impl LedToggles {
    pub fn any(&self) -> bool {
        self.left || self.right || self.tail
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Blinker {
    last_switch: u32,
}

impl Blinker {
    fn poll(&mut self, now_ms: u32) -> bool {
        // wrapping: the millisecond tick rolls over after ~49 days
        if now_ms.wrapping_sub(self.last_switch) >= BLINK_INTERVAL_MS {
            self.last_switch = now_ms;
            true
        } else {
            false
        }
    }
}

/// Blink throttles for the left, right and tail LEDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Indicators {
    left: Blinker,
    right: Blinker,
    tail: Blinker,
    now_ms: u32,
    pending: LedToggles,
}

impl Indicators {
    pub const fn new() -> Self {
        Self {
            left: Blinker { last_switch: 0 },
            right: Blinker { last_switch: 0 },
            tail: Blinker { last_switch: 0 },
            now_ms: 0,
            pending: LedToggles {
                left: false,
                right: false,
                tail: false,
            },
        }
    }

    /// Set the time used by blink requests until the next call.
    pub fn set_time(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
    }

    /// Toggle `led` unless it toggled less than the blink interval ago.
    pub fn blink(&mut self, led: Led) {
        let now = self.now_ms;
        match led {
            Led::Left => self.pending.left |= self.left.poll(now),
            Led::Right => self.pending.right |= self.right.poll(now),
            Led::Tail => self.pending.tail |= self.tail.poll(now),
        }
    }

    pub fn blink_all(&mut self) {
        self.blink(Led::Left);
        self.blink(Led::Right);
        self.blink(Led::Tail);
    }

    /// Toggles requested since the last call.
    pub fn take(&mut self) -> LedToggles {
        core::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_is_rate_limited() {
        let mut leds = Indicators::new();

        leds.set_time(50);
        leds.blink(Led::Left);
        assert!(!leds.take().left);

        leds.set_time(100);
        leds.blink(Led::Left);
        assert!(leds.take().left);

        leds.set_time(199);
        leds.blink(Led::Left);
        assert!(!leds.take().any());

        leds.set_time(200);
        leds.blink(Led::Left);
        assert!(leds.take().left);
    }

    #[test]
    fn test_leds_are_throttled_independently() {
        let mut leds = Indicators::new();
        leds.set_time(150);
        leds.blink(Led::Left);
        leds.set_time(180);
        leds.blink(Led::Right);
        leds.blink(Led::Left);
        let toggles = leds.take();
        assert!(toggles.left);
        assert!(toggles.right);
        assert!(!toggles.tail);
    }

    #[test]
    fn test_blink_all() {
        let mut leds = Indicators::new();
        leds.set_time(1000);
        leds.blink_all();
        assert_eq!(
            leds.take(),
            LedToggles {
                left: true,
                right: true,
                tail: true
            }
        );
        // a second request in the same cycle is absorbed
        leds.blink_all();
        assert!(!leds.take().any());
    }

    #[test]
    fn test_tick_rollover() {
        let mut leds = Indicators::new();
        leds.set_time(u32::MAX - 20);
        leds.blink(Led::Tail);
        assert!(leds.take().tail);

        leds.set_time(79);
        leds.blink(Led::Tail);
        assert!(leds.take().tail);
    }
}
