//! Final spurt over the finish line.

use super::TaskIo;
use crate::config::{distance_ticks, FINISH_SPURT_MM};

/// Keep rolling until the spurt distance is covered, then stand still and
/// blink every LED. There is nothing after this.
pub fn finish_line(io: &mut TaskIo<'_>) {
    if io.left_ticks() > distance_ticks(FINISH_SPURT_MM) {
        io.stop();
        io.blink_all();
    }
}
