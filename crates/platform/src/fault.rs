//! Hardware access available to the fatal-error path.
//!
//! The fatal path runs with interrupts disabled and the scheduler stopped,
//! so implementations must be plain register accesses: no locks, no
//! allocation, no waiting.

/// Watchdog access for the fatal-error loop
pub trait FaultIo {
    /// Reload the independent watchdog.
    fn refresh_watchdog(&mut self);

    /// Request a full system reset. Never returns on hardware.
    fn system_reset(&mut self);
}
