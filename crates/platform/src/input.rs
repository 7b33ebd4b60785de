//! Input device abstraction

/// Knob encoder and buttons, drained by the GUI loop once per tick
pub trait InputDevice {
    /// Next queued event, without waiting
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// Input events from the knob and buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Knob rotated while released (positive = clockwise)
    EncoderTurn(i32),
    /// Button pressed
    ButtonPress(Button),
    /// Button released
    ButtonRelease(Button),
    /// Button held for extended period
    ButtonLongPress(Button),
    /// Knob rotated while the knob button is held (positive = clockwise)
    HeldTurn(i32),
}

/// Physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Push button built into the knob
    Knob,
    /// Reset button next to the display
    Reset,
}
