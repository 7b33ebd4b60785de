//! Buzzer feedback

/// Short sounds the user interface asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoundKind {
    /// Knob click acknowledged
    Click,
    /// Focus navigation hit the first or last item
    EndOfList,
    /// A dialog that needs attention appeared
    Alert,
    /// Menu timeout returned to the previous screen
    Timeout,
}

/// Sound output.
///
/// Implementations must not block: playback is fire-and-forget from the
/// GUI loop's point of view.
pub trait Sound {
    /// Start playing `kind`, replacing whatever is playing.
    fn play(&mut self, kind: SoundKind);
}
