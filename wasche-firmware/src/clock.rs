//! Embassy-backed millisecond clock

use embassy_time::Instant;
use wasche_core::traits::Clock;

/// Milliseconds since boot, truncated to 32 bits
///
/// Wraps after about 49 days; the control loop compares readings with
/// wrapping arithmetic.
#[derive(Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
