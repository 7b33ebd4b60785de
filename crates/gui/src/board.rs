//! Everything the GUI loop needs from the hardware, in one place.

use platform::{Clock, DisplayDriver, InputDevice, Sound, UiPrefs};

use crate::fsm::FsmCommand;

/// Peripherals and services the GUI loop drives.
///
/// Firmware implements this over the real drivers; tests use a bundle of
/// mocks.
pub trait Board {
    /// Panel driver.
    type Display: DisplayDriver;
    /// Knob and buttons.
    type Input: InputDevice;

    fn display(&mut self) -> &mut Self::Display;

    fn input(&mut self) -> &mut Self::Input;

    fn clock(&self) -> &dyn Clock;

    fn sound(&mut self) -> &mut dyn Sound;

    /// Persistent user settings.
    fn prefs(&mut self) -> &mut dyn UiPrefs;

    /// Next command from the printer side, if one is queued.
    fn poll_fsm(&mut self) -> Option<FsmCommand>;
}

#[cfg(test)]
pub(crate) mod test_board {
    use super::*;
    use crate::fsm::FsmQueue;
    use platform::mocks::{MemoryPrefs, MockClock, MockDisplay, MockInput, MockSound};

    pub(crate) struct TestBoard {
        pub display: MockDisplay,
        pub input: MockInput,
        pub clock: MockClock,
        pub sound: MockSound,
        pub prefs: MemoryPrefs,
        pub fsm: FsmQueue,
    }

    impl TestBoard {
        pub(crate) fn new() -> Self {
            Self {
                display: MockDisplay::new(platform::config::DISPLAY_WIDTH, platform::config::DISPLAY_HEIGHT),
                input: MockInput::new(),
                clock: MockClock::new(0),
                sound: MockSound::new(),
                prefs: MemoryPrefs::new(),
                fsm: FsmQueue::new(),
            }
        }
    }

    impl Board for TestBoard {
        type Display = MockDisplay;
        type Input = MockInput;

        fn display(&mut self) -> &mut MockDisplay {
            &mut self.display
        }

        fn input(&mut self) -> &mut MockInput {
            &mut self.input
        }

        fn clock(&self) -> &dyn Clock {
            &self.clock
        }

        fn sound(&mut self) -> &mut dyn Sound {
            &mut self.sound
        }

        fn prefs(&mut self) -> &mut dyn UiPrefs {
            &mut self.prefs
        }

        fn poll_fsm(&mut self) -> Option<FsmCommand> {
            self.fsm.pop()
        }
    }
}
