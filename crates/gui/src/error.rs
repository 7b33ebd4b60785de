//! Error type for the window system.
//!
//! Registration failures caused by a popup colliding with a dialog are
//! expected and recoverable; capacity errors mean the build is configured
//! too small and the firmware escalates them to the fatal screen.

use core::fmt;

use crate::fsm::ClientFsm;

/// Everything the GUI core can refuse to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GuiError {
    /// A popup would cover a visible dialog or strong dialog.
    PopupConflict,
    /// The window pool has no free slot.
    PoolExhausted,
    /// A z-order tier is full.
    TierFull,
    /// The parent frame has no room for another child.
    TooManyChildren,
    /// The id refers to a destroyed window, or to one of the wrong kind.
    UnknownWindow,
    /// Opening another screen would exceed the navigation history.
    StackOverflow,
    /// No dialog or screen is registered for this FSM.
    MissingHandler(ClientFsm),
    /// A blocking wait was requested while another one is running.
    NestedWait,
    /// The display rejected a draw or flush.
    Draw,
}

impl GuiError {
    /// `true` for errors a caller is expected to shrug off.
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::PopupConflict | Self::UnknownWindow)
    }
}

impl fmt::Display for GuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PopupConflict => write!(f, "popup would cover a dialog"),
            Self::PoolExhausted => write!(f, "window pool exhausted"),
            Self::TierFull => write!(f, "window tier full"),
            Self::TooManyChildren => write!(f, "frame has too many children"),
            Self::UnknownWindow => write!(f, "unknown window"),
            Self::StackOverflow => write!(f, "screen stack overflow"),
            Self::MissingHandler(fsm) => write!(f, "no handler for FSM {}", fsm.as_str()),
            Self::NestedWait => write!(f, "nested wait for dialog close"),
            Self::Draw => write!(f, "display error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GuiError {}
