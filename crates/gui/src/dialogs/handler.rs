use platform::UiPrefs;

use super::{DialogCtor, DialogFactory, DialogSlot, FsmHandler};
use crate::{
    error::GuiError,
    event::{EventResult, GuiEvent},
    fsm::{BaseData, ClientFsm, ResponseQueue},
    screen::Screen,
    screens::Screens,
    window::WindowId,
};

/// Opens and closes seen for one FSM. Wrapping is fine: only equality
/// matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counters {
    opened: u8,
    closed: u8,
}

impl Counters {
    fn is_open(self) -> bool {
        self.opened != self.closed
    }
}

/// The overlay currently on screen and what is needed to rebuild it.
#[derive(Debug, Clone, Copy)]
struct Active {
    fsm: ClientFsm,
    ctor: DialogCtor,
    data: u8,
    last: Option<BaseData>,
}

/// Applies create/change/destroy commands to screens and overlays.
///
/// At most one overlay dialog exists at a time. A create for an FSM that
/// is already open, or for a second overlay while one is shown, is logged
/// and dropped without touching the counters, so the matching destroy is
/// dropped too.
pub struct DialogHandler {
    factory: DialogFactory,
    counters: [Counters; ClientFsm::COUNT],
    active: Option<Active>,
    slot: DialogSlot,
    waiting: Option<ClientFsm>,
}

impl DialogHandler {
    pub fn new(factory: DialogFactory) -> Self {
        Self {
            factory,
            counters: [Counters::default(); ClientFsm::COUNT],
            active: None,
            slot: DialogSlot::new(),
            waiting: None,
        }
    }

    pub fn factory(&self) -> &DialogFactory {
        &self.factory
    }

    fn counters(&self, fsm: ClientFsm) -> Counters {
        self.counters.get(fsm.index()).copied().unwrap_or_default()
    }

    fn counters_mut(&mut self, fsm: ClientFsm) -> Option<&mut Counters> {
        self.counters.get_mut(fsm.index())
    }

    /// `true` between an accepted create and its destroy.
    pub fn is_open(&self, fsm: ClientFsm) -> bool {
        self.counters(fsm).is_open()
    }

    /// `(opened, closed)` counts for `fsm`.
    pub fn open_close_counts(&self, fsm: ClientFsm) -> (u8, u8) {
        let c = self.counters(fsm);
        (c.opened, c.closed)
    }

    /// FSM of the overlay on screen, if any.
    pub fn active_fsm(&self) -> Option<ClientFsm> {
        self.active.map(|a| a.fsm)
    }

    /// FSM a blocking wait is pending on.
    pub fn waiting(&self) -> Option<ClientFsm> {
        self.waiting
    }

    /// Handle a create command.
    pub fn open(&mut self, screens: &mut Screens, prefs: &mut dyn UiPrefs, fsm: ClientFsm, data: u8) -> Result<(), GuiError> {
        let handler = self.factory.handler(fsm).ok_or(GuiError::MissingHandler(fsm))?;
        if self.is_open(fsm) {
            gui_warn!("FSM {} already open, create ignored", fsm.as_str());
            return Ok(());
        }

        match handler {
            FsmHandler::FullScreen(creator) => {
                if fsm == ClientFsm::SerialPrinting {
                    screens.screen_event(GuiEvent::SerialPrintStarted, prefs);
                }
                screens.navigator_mut().open(creator)?;
            }
            FsmHandler::Overlay(ctor) => {
                if let Some(active) = self.active {
                    gui_warn!("FSM {} ignored while {} is shown", fsm.as_str(), active.fsm.as_str());
                    return Ok(());
                }
                ctor.build(screens.screen_mut(), fsm, data, &mut self.slot)?;
                self.active = Some(Active {
                    fsm,
                    ctor,
                    data,
                    last: None,
                });
            }
        }

        if let Some(c) = self.counters_mut(fsm) {
            c.opened = c.opened.wrapping_add(1);
        }
        gui_info!("FSM {} opened", fsm.as_str());
        Ok(())
    }

    /// Handle a change command. Changes for closed FSMs are dropped.
    pub fn change(&mut self, screens: &mut Screens, prefs: &mut dyn UiPrefs, fsm: ClientFsm, data: BaseData) {
        if !self.is_open(fsm) {
            gui_trace!("change for closed FSM {} dropped", fsm.as_str());
            return;
        }
        match self.factory.handler(fsm) {
            Some(FsmHandler::FullScreen(_)) => screens.fsm_change(fsm, data, prefs),
            Some(FsmHandler::Overlay(_)) => {
                let Some(active) = self.active.as_mut().filter(|a| a.fsm == fsm) else {
                    return;
                };
                active.last = Some(data);
                if let Some(body) = self.slot.get_mut() {
                    if !body.change(screens.screen_mut(), data) {
                        gui_warn!("FSM {} rejected phase {}", fsm.as_str(), data.phase);
                    }
                }
            }
            None => {}
        }
    }

    /// Handle a destroy command.
    ///
    /// A destroy that ends a blocking wait only clears the wait; the waiter
    /// tears the dialog down itself.
    pub fn close(&mut self, screens: &mut Screens, fsm: ClientFsm) {
        let ends_wait = self.waiting == Some(fsm);
        if ends_wait {
            self.waiting = None;
        }
        if !self.is_open(fsm) {
            gui_debug!("destroy for closed FSM {} dropped", fsm.as_str());
            return;
        }
        if let Some(c) = self.counters_mut(fsm) {
            c.closed = c.closed.wrapping_add(1);
        }
        gui_info!("FSM {} closed", fsm.as_str());
        if !ends_wait {
            self.teardown(screens, fsm);
        }
    }

    /// Start a blocking wait for the destroy of `fsm`.
    pub(crate) fn begin_wait(&mut self, fsm: ClientFsm) -> Result<(), GuiError> {
        if self.waiting.is_some() {
            return Err(GuiError::NestedWait);
        }
        self.waiting = Some(fsm);
        Ok(())
    }

    /// Abandon a wait without tearing anything down.
    pub(crate) fn cancel_wait(&mut self) {
        self.waiting = None;
    }

    /// Remove what was shown for `fsm`.
    pub(crate) fn teardown(&mut self, screens: &mut Screens, fsm: ClientFsm) {
        match self.factory.handler(fsm) {
            Some(FsmHandler::FullScreen(creator)) => {
                if !screens.navigator_mut().remove(creator) {
                    gui_debug!("screen for FSM {} already gone", fsm.as_str());
                }
            }
            Some(FsmHandler::Overlay(_)) => {
                if self.active_fsm() == Some(fsm) {
                    self.drop_overlay(screens.screen_mut());
                }
            }
            None => {}
        }
    }

    fn drop_overlay(&mut self, screen: &mut Screen) {
        if let Some(body) = self.slot.get() {
            screen.destroy_window(body.root());
        }
        self.slot.clear();
        self.active = None;
    }

    /// Rebuild the overlay on a freshly built screen and replay its last
    /// phase.
    pub(crate) fn rebind(&mut self, screen: &mut Screen) -> Result<(), GuiError> {
        let Some(active) = self.active else {
            return Ok(());
        };
        self.slot.clear();
        active.ctor.build(screen, active.fsm, active.data, &mut self.slot)?;
        if let (Some(last), Some(body)) = (active.last, self.slot.get_mut()) {
            body.change(screen, last);
        }
        Ok(())
    }

    /// `true` when `id` belongs to the overlay.
    pub fn owns(&self, screen: &Screen, id: WindowId) -> bool {
        self.slot
            .get()
            .is_some_and(|body| screen.top_level_of(id) == Some(body.root()))
    }

    pub(crate) fn window_event(
        &mut self,
        screen: &mut Screen,
        id: WindowId,
        event: GuiEvent,
        responses: &mut ResponseQueue,
    ) -> EventResult {
        match self.slot.get_mut() {
            Some(body) => body.window_event(screen, id, event, responses),
            None => EventResult::Unhandled,
        }
    }

    pub(crate) fn screen_event(&mut self, screen: &mut Screen, event: GuiEvent) {
        if let Some(body) = self.slot.get_mut() {
            body.screen_event(screen, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fsm::PhaseData,
        screen_factory::{CreateScreen, ScreenBody, ScreenCreator},
        window::WinType,
    };
    use platform::mocks::MemoryPrefs;

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

    fn setup() -> (DialogHandler, Screens, MemoryPrefs) {
        let full = FsmHandler::FullScreen(ScreenCreator::of::<Printing>());
        let factory = DialogFactory::with_standard_dialogs()
            .with(ClientFsm::SerialPrinting, full)
            .with(ClientFsm::Printing, full)
            .with(ClientFsm::FirstLayer, full);
        (DialogHandler::new(factory), Screens::new(ScreenCreator::of::<Home>()), MemoryPrefs::new())
    }

    #[test]
    fn test_duplicate_open_ignored_and_counted_once() {
        let (mut dialogs, mut screens, mut prefs) = setup();
        dialogs.open(&mut screens, &mut prefs, ClientFsm::LoadUnload, 0).expect("open");
        dialogs.open(&mut screens, &mut prefs, ClientFsm::LoadUnload, 0).expect("open");

        assert_eq!(dialogs.open_close_counts(ClientFsm::LoadUnload), (1, 0));
        assert_eq!(screens.screen().tier(WinType::Dialog).len(), 1);

        dialogs.close(&mut screens, ClientFsm::LoadUnload);
        assert!(!dialogs.is_open(ClientFsm::LoadUnload));
        assert_eq!(screens.screen().tier(WinType::Dialog).len(), 0);
        assert_eq!(dialogs.active_fsm(), None);
    }

    #[test]
    fn test_second_overlay_ignored() {
        let (mut dialogs, mut screens, mut prefs) = setup();
        dialogs.open(&mut screens, &mut prefs, ClientFsm::LoadUnload, 0).expect("open");
        dialogs.open(&mut screens, &mut prefs, ClientFsm::Preheat, 0).expect("open");

        assert_eq!(dialogs.active_fsm(), Some(ClientFsm::LoadUnload));
        assert!(!dialogs.is_open(ClientFsm::Preheat));
        // the matching destroy is dropped too
        dialogs.close(&mut screens, ClientFsm::Preheat);
        assert_eq!(dialogs.open_close_counts(ClientFsm::Preheat), (0, 0));
        assert_eq!(dialogs.active_fsm(), Some(ClientFsm::LoadUnload));
    }

    #[test]
    fn test_full_screen_opens_over_overlay() {
        let (mut dialogs, mut screens, mut prefs) = setup();
        dialogs.open(&mut screens, &mut prefs, ClientFsm::LoadUnload, 0).expect("open");
        dialogs.open(&mut screens, &mut prefs, ClientFsm::Printing, 0).expect("open");
        assert!(dialogs.is_open(ClientFsm::Printing));
        assert_eq!(screens.navigator().current(), Some(ScreenCreator::of::<Printing>()));
    }

    #[test]
    fn test_full_screen_close_removes_creator() {
        let (mut dialogs, mut screens, mut prefs) = setup();
        dialogs.open(&mut screens, &mut prefs, ClientFsm::Printing, 0).expect("open");
        dialogs.close(&mut screens, ClientFsm::Printing);
        assert_eq!(screens.navigator().current(), Some(ScreenCreator::of::<Home>()));
    }

    #[test]
    fn test_change_routed_to_active_only() {
        let (mut dialogs, mut screens, mut prefs) = setup();
        let data = BaseData::new(9, PhaseData::default());
        dialogs.change(&mut screens, &mut prefs, ClientFsm::LoadUnload, data);
        dialogs.open(&mut screens, &mut prefs, ClientFsm::LoadUnload, 0).expect("open");
        dialogs.change(&mut screens, &mut prefs, ClientFsm::LoadUnload, data);
        assert_eq!(dialogs.active.and_then(|a| a.last), Some(data));
    }

    #[test]
    fn test_missing_handler_is_an_error() {
        let mut dialogs = DialogHandler::new(DialogFactory::empty());
        let mut screens = Screens::new(ScreenCreator::of::<Home>());
        let result = dialogs.open(&mut screens, &mut MemoryPrefs::new(), ClientFsm::Preheat, 0);
        assert_eq!(result, Err(GuiError::MissingHandler(ClientFsm::Preheat)));
    }

    #[test]
    fn test_stale_close_ignored() {
        let (mut dialogs, mut screens, _) = setup();
        dialogs.close(&mut screens, ClientFsm::Warning);
        assert_eq!(dialogs.open_close_counts(ClientFsm::Warning), (0, 0));
    }

    #[test]
    fn test_close_ending_wait_leaves_overlay() {
        let (mut dialogs, mut screens, mut prefs) = setup();
        dialogs.open(&mut screens, &mut prefs, ClientFsm::Preheat, 0).expect("open");
        dialogs.begin_wait(ClientFsm::Preheat).expect("first wait");
        assert_eq!(dialogs.begin_wait(ClientFsm::Preheat), Err(GuiError::NestedWait));

        dialogs.close(&mut screens, ClientFsm::Preheat);
        assert_eq!(dialogs.waiting(), None);
        assert_eq!(dialogs.active_fsm(), Some(ClientFsm::Preheat));
        dialogs.teardown(&mut screens, ClientFsm::Preheat);
        assert_eq!(dialogs.active_fsm(), None);
    }

    #[test]
    fn test_rebind_replays_last_phase() {
        let (mut dialogs, mut screens, mut prefs) = setup();
        dialogs.open(&mut screens, &mut prefs, ClientFsm::LoadUnload, 0).expect("open");
        dialogs.change(&mut screens, &mut prefs, ClientFsm::LoadUnload, BaseData::new(9, PhaseData::default()));
        screens.screen_mut().reset();

        dialogs.rebind(screens.screen_mut()).expect("rebound");
        let root = screens.screen().tier_last(WinType::Dialog).expect("dialog");
        assert!(dialogs.owns(screens.screen(), root));
        assert!(screens.screen().focused().is_some());
    }

    #[test]
    fn test_counters_wrap() {
        let mut c = Counters { opened: 255, closed: 255 };
        assert!(!c.is_open());
        c.opened = c.opened.wrapping_add(1);
        assert!(c.is_open());
        c.closed = c.closed.wrapping_add(1);
        assert!(!c.is_open());
    }
}
