//! Monotonic millisecond clock

/// Millisecond tick source.
///
/// The value wraps at `u32::MAX`; consumers compare with `wrapping_sub`.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u32;
}

/// Clock backed by the embassy-time driver of the running target.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    #[allow(clippy::cast_possible_truncation)] // wrapping at u32 is part of the contract
    fn now_ms(&self) -> u32 {
        embassy_time::Instant::now().as_millis() as u32
    }
}
