//! Logging front-end.
//!
//! Forwards to `defmt` or `tracing` depending on the enabled feature. With
//! neither enabled the arguments are still type-checked but nothing is
//! emitted. Format strings must stick to plain `{}` so both back-ends
//! accept them.

macro_rules! gui_log {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::$level!($($arg)*);
        #[cfg(feature = "tracing")]
        tracing::$level!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

macro_rules! gui_trace {
    ($($arg:tt)*) => { gui_log!(trace, $($arg)*) };
}

macro_rules! gui_debug {
    ($($arg:tt)*) => { gui_log!(debug, $($arg)*) };
}

macro_rules! gui_info {
    ($($arg:tt)*) => { gui_log!(info, $($arg)*) };
}

macro_rules! gui_warn {
    ($($arg:tt)*) => { gui_log!(warn, $($arg)*) };
}

macro_rules! gui_error {
    ($($arg:tt)*) => { gui_log!(error, $($arg)*) };
}
