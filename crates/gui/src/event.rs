//! Events delivered to windows, screen bodies and dialogs.

use platform::{Button, InputEvent};

/// Event routed through the window tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GuiEvent {
    /// Knob turned towards the previous item, by this many detents.
    EncUp(u16),
    /// Knob turned towards the next item, by this many detents.
    EncDown(u16),
    /// Knob pressed and released.
    Click,
    /// Knob held down.
    Hold,
    /// Knob turned up while held.
    HeldUp(u16),
    /// Knob turned down while held.
    HeldDown(u16),
    /// Periodic tick for windows with a timer.
    Timer,
    /// Removable media was inserted.
    MediaInserted,
    /// Removable media was removed.
    MediaRemoved,
    /// A print started from the serial line.
    SerialPrintStarted,
}

impl GuiEvent {
    /// Translate a raw input event.
    ///
    /// Clockwise rotation moves down the list. The reset button is not a GUI
    /// input and knob presses are only reported on release.
    pub fn from_input(event: InputEvent) -> Option<Self> {
        match event {
            InputEvent::EncoderTurn(0) | InputEvent::HeldTurn(0) => None,
            InputEvent::EncoderTurn(n) if n > 0 => Some(Self::EncDown(detents(n))),
            InputEvent::EncoderTurn(n) => Some(Self::EncUp(detents(n))),
            InputEvent::HeldTurn(n) if n > 0 => Some(Self::HeldDown(detents(n))),
            InputEvent::HeldTurn(n) => Some(Self::HeldUp(detents(n))),
            InputEvent::ButtonRelease(Button::Knob) => Some(Self::Click),
            InputEvent::ButtonLongPress(Button::Knob) => Some(Self::Hold),
            InputEvent::ButtonPress(_) | InputEvent::ButtonRelease(Button::Reset) | InputEvent::ButtonLongPress(Button::Reset) => None,
        }
    }

    /// `true` for events that come from the user rather than the system.
    pub fn is_user_input(self) -> bool {
        matches!(
            self,
            Self::EncUp(_) | Self::EncDown(_) | Self::Click | Self::Hold | Self::HeldUp(_) | Self::HeldDown(_)
        )
    }

    /// Short name for log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EncUp(_) => "EncUp",
            Self::EncDown(_) => "EncDown",
            Self::Click => "Click",
            Self::Hold => "Hold",
            Self::HeldUp(_) => "HeldUp",
            Self::HeldDown(_) => "HeldDown",
            Self::Timer => "Timer",
            Self::MediaInserted => "MediaInserted",
            Self::MediaRemoved => "MediaRemoved",
            Self::SerialPrintStarted => "SerialPrintStarted",
        }
    }
}

fn detents(n: i32) -> u16 {
    u16::try_from(n.unsigned_abs()).unwrap_or(u16::MAX)
}

/// Whether a handler consumed an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventResult {
    /// Stop here.
    Handled,
    /// Let the default behaviour or the parent have it.
    Unhandled,
}

impl EventResult {
    /// `true` for [`EventResult::Handled`].
    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }
}

impl From<bool> for EventResult {
    fn from(handled: bool) -> Self {
        if handled {
            Self::Handled
        } else {
            Self::Unhandled
        }
    }
}
