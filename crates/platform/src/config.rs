//! Application configuration and constants
//!
//! This module defines central configuration values used across the
//! application, plus the persisted user-interface preferences seam.

/// The application name
pub const APP_NAME: &str = "Buddy";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// LCD width in pixels
pub const DISPLAY_WIDTH: u32 = 240;

/// LCD height in pixels
pub const DISPLAY_HEIGHT: u32 = 320;

/// Idle time after which a menu screen closes itself
pub const DEFAULT_MENU_TIMEOUT_MS: u32 = 30_000;

/// File browser sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FileSort {
    /// Newest first
    #[default]
    ByTime,
    /// Alphabetical
    ByName,
}

impl FileSort {
    /// The other sort order
    pub fn toggled(self) -> Self {
        match self {
            Self::ByTime => Self::ByName,
            Self::ByName => Self::ByTime,
        }
    }

    /// Short label for menus
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ByTime => "Time",
            Self::ByName => "Name",
        }
    }
}

/// Persisted user-interface preferences.
///
/// Read when a screen is constructed, written when the user changes a
/// value. The storage format belongs to the implementor.
pub trait UiPrefs {
    /// Whether menu screens close themselves after the idle timeout
    fn menu_timeout_enabled(&self) -> bool;

    /// Store the menu timeout flag
    fn set_menu_timeout_enabled(&mut self, enabled: bool);

    /// Idle time in milliseconds before a menu timeout fires
    fn menu_timeout_ms(&self) -> u32 {
        DEFAULT_MENU_TIMEOUT_MS
    }

    /// File browser sort order
    fn file_sort(&self) -> FileSort;

    /// Store the file browser sort order
    fn set_file_sort(&mut self, sort: FileSort);
}
