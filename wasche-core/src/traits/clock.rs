//! Monotonic time source

/// Millisecond clock
///
/// The counter may wrap; compare readings with `wrapping_sub`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Milliseconds from `since` to `now`, correct across one wrap
pub fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}
