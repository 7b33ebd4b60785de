//! Mock board shared by the firmware integration tests.

#![allow(dead_code)]

use gui::{Board, FsmCommand};
use platform::mocks::{MemoryPrefs, MockClock, MockDisplay, MockInput, MockSound};
use platform::{Clock, InputEvent, Sound, UiPrefs};

/// Mock peripherals. FSM commands arrive through the app's bridge, so
/// `poll_fsm` always reports an empty queue.
pub struct TestBoard {
    pub display: MockDisplay,
    pub input: MockInput,
    pub clock: MockClock,
    pub sound: MockSound,
    pub prefs: MemoryPrefs,
}

impl TestBoard {
    pub fn new() -> Self {
        Self {
            display: MockDisplay::new(platform::config::DISPLAY_WIDTH, platform::config::DISPLAY_HEIGHT),
            input: MockInput::new(),
            clock: MockClock::new(0),
            sound: MockSound::new(),
            prefs: MemoryPrefs::new(),
        }
    }

    pub fn press(&mut self, event: InputEvent) {
        self.input.add_event(event).expect("input queue has room");
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
        None
    }
}
