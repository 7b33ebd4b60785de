//! The top-level GUI object: screens plus the FSM dialog handler.

use platform::UiPrefs;

use crate::{
    board::Board,
    dialogs::{DialogFactory, DialogHandler},
    error::GuiError,
    event::GuiEvent,
    fsm::{BaseData, ClientFsm, FsmCommand, PhaseResponse},
    screen_factory::ScreenCreator,
    screens::Screens,
};

/// Screen stack and FSM dialogs driven by one loop.
pub struct Gui {
    screens: Screens,
    dialogs: DialogHandler,
}

impl Gui {
    /// Start on `home`. Fails if `factory` leaves any FSM without a
    /// handler.
    pub fn new(home: ScreenCreator, factory: DialogFactory) -> Result<Self, GuiError> {
        factory.validate()?;
        Ok(Self {
            screens: Screens::new(home),
            dialogs: DialogHandler::new(factory),
        })
    }

    pub fn screens(&self) -> &Screens {
        &self.screens
    }

    pub fn screens_mut(&mut self) -> &mut Screens {
        &mut self.screens
    }

    pub fn dialogs(&self) -> &DialogHandler {
        &self.dialogs
    }

    pub fn fsm_create(&mut self, prefs: &mut dyn UiPrefs, fsm: ClientFsm, data: u8) -> Result<(), GuiError> {
        self.dialogs.open(&mut self.screens, prefs, fsm, data)
    }

    pub fn fsm_change(&mut self, prefs: &mut dyn UiPrefs, fsm: ClientFsm, data: BaseData) {
        self.dialogs.change(&mut self.screens, prefs, fsm, data);
    }

    pub fn fsm_destroy(&mut self, fsm: ClientFsm) {
        self.dialogs.close(&mut self.screens, fsm);
    }

    /// Apply one command from the printer side.
    pub fn handle_fsm(&mut self, command: FsmCommand, prefs: &mut dyn UiPrefs) -> Result<(), GuiError> {
        match command {
            FsmCommand::Create { fsm, data } => self.fsm_create(prefs, fsm, data),
            FsmCommand::Change { fsm, data } => {
                self.fsm_change(prefs, fsm, data);
                Ok(())
            }
            FsmCommand::Destroy { fsm } => {
                self.fsm_destroy(fsm);
                Ok(())
            }
        }
    }

    /// Broadcast a system event to the current screen and the overlay.
    pub fn screen_event(&mut self, event: GuiEvent, prefs: &mut dyn UiPrefs) {
        self.screens.screen_event(event, prefs);
        self.dialogs.screen_event(self.screens.screen_mut(), event);
    }

    /// Oldest answer a dialog or screen gave to the printer side.
    pub fn take_response(&mut self) -> Option<PhaseResponse> {
        self.screens.take_response()
    }

    /// Drain pending FSM commands, then run one screen tick.
    pub fn loop_once<B: Board>(&mut self, board: &mut B) -> Result<(), GuiError> {
        while let Some(command) = board.poll_fsm() {
            self.handle_fsm(command, board.prefs())?;
        }
        self.screens.loop_once(board, &mut self.dialogs)
    }

    /// Open the dialog for `fsm` and keep the GUI running until the
    /// printer destroys it.
    ///
    /// The loop is re-entered from here, so the caller must not rely on
    /// any state the loop could change. Only one wait may be pending.
    pub fn wait_until_closed<B: Board>(&mut self, board: &mut B, fsm: ClientFsm, data: u8) -> Result<(), GuiError> {
        self.wait_until_closed_with(board, fsm, data, |gui, board| gui.loop_once(board))
    }

    /// [`wait_until_closed`](Self::wait_until_closed) with `tick` run in
    /// place of [`loop_once`](Self::loop_once).
    ///
    /// `tick` must deliver the printer's commands to this GUI, or the wait
    /// never ends. Used when commands arrive somewhere other than
    /// [`Board::poll_fsm`].
    pub fn wait_until_closed_with<B, F>(
        &mut self,
        board: &mut B,
        fsm: ClientFsm,
        data: u8,
        mut tick: F,
    ) -> Result<(), GuiError>
    where
        B: Board,
        F: FnMut(&mut Self, &mut B) -> Result<(), GuiError>,
    {
        self.dialogs.begin_wait(fsm)?;
        if let Err(err) = self.fsm_create(board.prefs(), fsm, data) {
            self.dialogs.cancel_wait();
            return Err(err);
        }
        gui_debug!("waiting for FSM {}", fsm.as_str());

        while self.dialogs.waiting() == Some(fsm) {
            if let Err(err) = tick(self, board) {
                self.dialogs.cancel_wait();
                return Err(err);
            }
        }

        self.dialogs.teardown(&mut self.screens, fsm);
        gui_debug!("wait for FSM {} done", fsm.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::test_board::TestBoard,
        dialogs::FsmHandler,
        fsm::{FsmQueue, ProgressData},
        screen::Screen,
        screen_factory::{CreateScreen, ScreenBody},
        WinType,
    };

    struct Home;
    impl ScreenBody for Home {}
    impl CreateScreen for Home {
        fn create(_: &mut Screen, _: &dyn UiPrefs, _: u32) -> Result<Self, GuiError> {
            Ok(Self)
        }
    }

    struct Printing;
    impl ScreenBody for Printing {}
    impl CreateScreen for Printing {
        fn create(_: &mut Screen, _: &dyn UiPrefs, _: u32) -> Result<Self, GuiError> {
            Ok(Self)
        }
    }

    fn complete_factory() -> DialogFactory {
        let full = FsmHandler::FullScreen(ScreenCreator::of::<Printing>());
        DialogFactory::with_standard_dialogs()
            .with(ClientFsm::SerialPrinting, full)
            .with(ClientFsm::Printing, full)
            .with(ClientFsm::FirstLayer, full)
    }

    #[test]
    fn test_incomplete_table_fails_fast() {
        let result = Gui::new(ScreenCreator::of::<Home>(), DialogFactory::with_standard_dialogs());
        assert!(matches!(result, Err(GuiError::MissingHandler(_))));
    }

    #[test]
    fn test_queued_commands_drive_dialog() {
        let mut gui = Gui::new(ScreenCreator::of::<Home>(), complete_factory()).expect("valid table");
        let mut board = TestBoard::new();
        board.fsm.push_create(ClientFsm::Preheat, 0);
        gui.loop_once(&mut board).expect("tick");
        assert_eq!(gui.dialogs().active_fsm(), Some(ClientFsm::Preheat));
        assert_eq!(gui.screens().screen().tier(WinType::Dialog).len(), 1);

        board.fsm.push_destroy(ClientFsm::Preheat);
        gui.loop_once(&mut board).expect("tick");
        assert_eq!(gui.dialogs().active_fsm(), None);
        assert!(gui.screens().screen().tier(WinType::Dialog).is_empty());
    }

    #[test]
    fn test_wait_returns_after_destroy() {
        let mut gui = Gui::new(ScreenCreator::of::<Home>(), complete_factory()).expect("valid table");
        let mut board = TestBoard::new();
        let progress = ProgressData { current: 1, total: 2 };
        board.fsm.push_change(ClientFsm::Preheat, BaseData::new(1, progress.into()));
        board.fsm.push_destroy(ClientFsm::Preheat);

        gui.wait_until_closed(&mut board, ClientFsm::Preheat, 0).expect("wait");
        assert_eq!(gui.dialogs().waiting(), None);
        assert_eq!(gui.dialogs().active_fsm(), None);
        assert_eq!(gui.dialogs().open_close_counts(ClientFsm::Preheat), (1, 1));
    }

    #[test]
    fn test_printing_opens_full_screen() {
        let mut gui = Gui::new(ScreenCreator::of::<Home>(), complete_factory()).expect("valid table");
        let mut board = TestBoard::new();
        board.fsm.push_create(ClientFsm::Printing, 0);
        gui.loop_once(&mut board).expect("tick");
        assert_eq!(gui.screens().built(), Some(ScreenCreator::of::<Printing>()));

        board.fsm.push_destroy(ClientFsm::Printing);
        gui.loop_once(&mut board).expect("tick");
        assert_eq!(gui.screens().built(), Some(ScreenCreator::of::<Home>()));
    }

    #[test]
    fn test_wait_runs_custom_tick() {
        let mut gui = Gui::new(ScreenCreator::of::<Home>(), complete_factory()).expect("valid table");
        let mut board = TestBoard::new();
        let mut outside = FsmQueue::new();
        outside.push_destroy(ClientFsm::Selftest);
        let mut ticks = 0_u32;

        gui.wait_until_closed_with(&mut board, ClientFsm::Selftest, 0, |gui, board| {
            ticks = ticks.saturating_add(1);
            while let Some(command) = outside.pop() {
                gui.handle_fsm(command, board.prefs())?;
            }
            gui.loop_once(board)
        })
        .expect("wait");

        assert_eq!(ticks, 1);
        assert_eq!(gui.dialogs().waiting(), None);
        assert_eq!(gui.dialogs().open_close_counts(ClientFsm::Selftest), (1, 1));
    }

    #[test]
    fn test_nested_wait_refused() {
        let mut gui = Gui::new(ScreenCreator::of::<Home>(), complete_factory()).expect("valid table");
        let mut board = TestBoard::new();
        gui.dialogs.begin_wait(ClientFsm::Preheat).expect("first wait");

        let result = gui.wait_until_closed(&mut board, ClientFsm::Warning, 0);
        assert_eq!(result, Err(GuiError::NestedWait));
        assert_eq!(gui.dialogs().active_fsm(), None, "nothing opened");
        assert_eq!(gui.dialogs().waiting(), Some(ClientFsm::Preheat));
    }
}
