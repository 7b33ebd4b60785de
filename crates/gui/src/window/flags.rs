use bitflags::bitflags;

bitflags! {
    /// Per-window state bits.
    ///
    /// The `USER*` bits are free for screen bodies to tag their own windows.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u16 {
        /// Drawn and hit-testable.
        const VISIBLE = 1 << 0;
        /// Accepts focus and input.
        const ENABLED = 1 << 1;
        /// Needs a redraw.
        const INVALID = 1 << 2;
        /// Toggle state for check-style items.
        const CHECKED = 1 << 3;
        /// Receives [`GuiEvent::Timer`](crate::GuiEvent::Timer) every tick.
        const HAS_TIMER = 1 << 4;
        /// Destroyed by a click nobody handled.
        const CLOSE_ON_CLICK = 1 << 5;
        /// Covered by a dialog or popup; skipped when drawing.
        const HIDDEN_BEHIND_DIALOG = 1 << 6;
        /// Destroyed when the menu timeout expires.
        const CLOSE_ON_TIMEOUT = 1 << 7;
        /// Destroyed when a serial print starts.
        const CLOSE_ON_SERIAL = 1 << 8;
        /// Drawn dimmed, together with its children.
        const SHADOW = 1 << 9;
        /// Free for screen bodies.
        const USER0 = 1 << 13;
        /// Free for screen bodies.
        const USER1 = 1 << 14;
        /// Free for screen bodies.
        const USER2 = 1 << 15;
    }
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ENABLED | Self::INVALID
    }
}
