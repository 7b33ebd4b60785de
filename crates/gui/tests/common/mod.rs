//! Shared fixtures for the gui integration tests.

#![allow(dead_code)]

use gui::{Board, CreateScreen, DialogFactory, FsmCommand, FsmHandler, FsmQueue, GuiError, Screen, ScreenBody, ScreenCreator};
use gui::ClientFsm;
use platform::mocks::{MemoryPrefs, MockClock, MockDisplay, MockInput, MockSound};
use platform::{Clock, Sound, UiPrefs};

/// Mock peripherals wired into the GUI loop.
pub struct TestBoard {
    pub display: MockDisplay,
    pub input: MockInput,
    pub clock: MockClock,
    pub sound: MockSound,
    pub prefs: MemoryPrefs,
    pub fsm: FsmQueue,
}

impl TestBoard {
    pub fn new() -> Self {
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

/// Empty bottom screen.
pub struct Home;

impl ScreenBody for Home {}

impl CreateScreen for Home {
    fn create(_: &mut Screen, _: &dyn UiPrefs, _: u32) -> Result<Self, GuiError> {
        Ok(Self)
    }
}

/// Stand-in for the printing screens.
pub struct Printing;

impl ScreenBody for Printing {}

impl CreateScreen for Printing {
    fn create(screen: &mut Screen, _: &dyn UiPrefs, _: u32) -> Result<Self, GuiError> {
        screen.set_menu_timeout(false);
        Ok(Self)
    }
}

/// Standard dialogs with [`Printing`] for the full-screen FSMs.
pub fn factory() -> DialogFactory {
    let full = FsmHandler::FullScreen(ScreenCreator::of::<Printing>());
    DialogFactory::with_standard_dialogs()
        .with(ClientFsm::SerialPrinting, full)
        .with(ClientFsm::Printing, full)
        .with(ClientFsm::FirstLayer, full)
}
