//! The screen stack manager and its per-tick loop.
//!
//! Only one screen body exists at a time. The [`Navigator`] remembers how
//! to rebuild the previous ones; whenever its current creator differs from
//! the one that built the live body, the live body is dropped, the screen
//! is reset and the new body is built in the same storage.
//!
//! Each call to [`Screens::loop_once`] runs, in order:
//!
//! 1. a pending close request, unless the current body intercepts it;
//! 2. a rebuild if the current creator changed, re-attaching any overlay;
//! 3. input, routed to the captured window;
//! 4. timer events;
//! 5. the menu timeout, which synthesises a close request;
//! 6. the body's `on_loop` hook;
//! 7. drawing and flushing.

use platform::{DisplayDriver, InputDevice, SoundKind, UiPrefs};

use crate::{
    board::Board,
    config::INPUT_EVENTS_PER_TICK,
    dialogs::DialogHandler,
    error::GuiError,
    event::{EventResult, GuiEvent},
    frame::Navigation,
    fsm::{BaseData, ClientFsm, PhaseResponse, ResponseQueue},
    navigation::Navigator,
    screen::Screen,
    screen_factory::{ScreenBody, ScreenCreator, ScreenFactory},
    window::{WindowFlags, WindowId},
};

/// Navigation shortcut bound to a knob gesture.
pub type ScreenAction = fn(&mut Navigator);

/// What a screen body may touch while handling a hook.
pub struct Cx<'a> {
    /// The screen the body's windows live on.
    pub screen: &'a mut Screen,
    /// Open or close screens.
    pub navigator: &'a mut Navigator,
    /// Persistent user settings.
    pub prefs: &'a mut dyn UiPrefs,
    /// Answers for the printer side.
    pub responses: &'a mut ResponseQueue,
    fault: &'a mut Option<GuiError>,
}

impl Cx<'_> {
    /// Open `creator` on top of the current screen.
    ///
    /// A failure is also returned from the loop tick that ran this hook.
    pub fn open(&mut self, creator: ScreenCreator) -> Result<(), GuiError> {
        let result = self.navigator.open(creator);
        if let Err(err) = result {
            *self.fault = Some(err);
        }
        result
    }

    /// Request going back one screen.
    pub fn close(&mut self) {
        self.navigator.close();
    }

    /// Queue an answer for the printer side.
    pub fn respond(&mut self, response: PhaseResponse) {
        self.responses.push(response);
    }
}

/// Screen stack plus the single live screen.
pub struct Screens {
    navigator: Navigator,
    screen: Screen,
    body: ScreenFactory,
    built: Option<ScreenCreator>,
    pending_fsm: Option<(ClientFsm, BaseData)>,
    responses: ResponseQueue,
    fault: Option<GuiError>,
    last_activity_ms: u32,
    held_up: Option<ScreenAction>,
    held_down: Option<ScreenAction>,
    long_press: Option<ScreenAction>,
}

impl Screens {
    /// Stack with `home` at the bottom. Nothing is built until the first
    /// tick.
    pub fn new(home: ScreenCreator) -> Self {
        Self {
            navigator: Navigator::new(home),
            screen: Screen::new(),
            body: ScreenFactory::new(),
            built: None,
            pending_fsm: None,
            responses: ResponseQueue::new(),
            fault: None,
            last_activity_ms: 0,
            held_up: None,
            held_down: None,
            long_press: None,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Creator of the live body.
    pub fn built(&self) -> Option<ScreenCreator> {
        self.built
    }

    pub fn open(&mut self, creator: ScreenCreator) -> Result<(), GuiError> {
        self.navigator.open(creator)
    }

    pub fn push_before_current(&mut self, creator: ScreenCreator) -> Result<(), GuiError> {
        self.navigator.push_before_current(creator)
    }

    pub fn close(&mut self) {
        self.navigator.close();
    }

    pub fn close_all(&mut self) {
        self.navigator.close_all();
    }

    pub fn consume_close(&mut self) -> bool {
        self.navigator.consume_close()
    }

    /// Bind navigation to turning the knob while it is held.
    pub fn set_held_actions(&mut self, up: Option<ScreenAction>, down: Option<ScreenAction>) {
        self.held_up = up;
        self.held_down = down;
    }

    /// Bind navigation to a long knob press.
    pub fn set_long_press_action(&mut self, action: Option<ScreenAction>) {
        self.long_press = action;
    }

    /// Oldest unanswered phase response.
    pub fn take_response(&mut self) -> Option<PhaseResponse> {
        self.responses.pop()
    }

    fn with_body<R>(
        &mut self,
        prefs: &mut dyn UiPrefs,
        f: impl FnOnce(&mut dyn ScreenBody, &mut Cx<'_>) -> R,
    ) -> Option<R> {
        let Self {
            navigator,
            screen,
            body,
            responses,
            fault,
            ..
        } = self;
        let body = body.get_mut()?;
        let mut cx = Cx {
            screen,
            navigator,
            prefs,
            responses,
            fault,
        };
        Some(f(body, &mut cx))
    }

    /// Build the current screen if it is not the live one.
    ///
    /// Returns whether a rebuild happened.
    pub fn sync(&mut self, prefs: &mut dyn UiPrefs, dialogs: &mut DialogHandler, now_ms: u32) -> Result<bool, GuiError> {
        let wanted = self.navigator.current();
        if wanted == self.built {
            return Ok(false);
        }

        self.body.clear();
        self.screen.reset();
        self.built = None;

        if let Some(creator) = wanted {
            gui_info!("opening screen {}", creator.name());
            creator.build(&mut self.screen, prefs, &mut self.body)?;
            self.built = Some(creator);
            if let Some((fsm, data)) = self.pending_fsm.take() {
                self.with_body(prefs, |body, cx| body.fsm_change(cx, fsm, data));
            }
        }

        dialogs.rebind(&mut self.screen)?;
        self.last_activity_ms = now_ms;
        Ok(true)
    }

    /// Forward a phase change to the body opened for `fsm`.
    ///
    /// If that body has not been built yet the change is kept and delivered
    /// right after it is.
    pub fn fsm_change(&mut self, fsm: ClientFsm, data: BaseData, prefs: &mut dyn UiPrefs) {
        if self.navigator.current() != self.built {
            self.pending_fsm = Some((fsm, data));
            return;
        }
        self.with_body(prefs, |body, cx| body.fsm_change(cx, fsm, data));
    }

    /// Broadcast a system event to the live body.
    pub fn screen_event(&mut self, event: GuiEvent, prefs: &mut dyn UiPrefs) {
        if event == GuiEvent::SerialPrintStarted {
            let closed = self.screen.close_flagged(WindowFlags::CLOSE_ON_SERIAL);
            if closed > 0 {
                gui_debug!("serial print closed {} windows", closed);
            }
        }
        self.with_body(prefs, |body, cx| body.screen_event(cx, event));
    }

    fn deliver(&mut self, target: WindowId, event: GuiEvent, prefs: &mut dyn UiPrefs, dialogs: &mut DialogHandler) -> EventResult {
        if dialogs.owns(&self.screen, target) {
            return dialogs.window_event(&mut self.screen, target, event, &mut self.responses);
        }
        self.with_body(prefs, |body, cx| body.window_event(cx, target, event))
            .unwrap_or(EventResult::Unhandled)
    }

    /// Route one event to the captured window.
    ///
    /// Knob turns fall back to focus navigation; clicks bubble up to the
    /// parent frames and close a [`WindowFlags::CLOSE_ON_CLICK`] window
    /// nobody handled. Returns the feedback sound to play, if any.
    pub fn dispatch(&mut self, event: GuiEvent, prefs: &mut dyn UiPrefs, dialogs: &mut DialogHandler) -> Option<SoundKind> {
        let action = match event {
            GuiEvent::Hold => self.long_press,
            GuiEvent::HeldUp(_) => self.held_up,
            GuiEvent::HeldDown(_) => self.held_down,
            _ => None,
        };
        if let Some(action) = action {
            action(&mut self.navigator);
            return None;
        }

        let captured = self.screen.captured_window()?;
        match event {
            GuiEvent::EncUp(steps) | GuiEvent::EncDown(steps) => {
                if self.deliver(captured, event, prefs, dialogs).is_handled() {
                    return None;
                }
                let forward = matches!(event, GuiEvent::EncDown(_));
                match self.screen.step_focus(captured, forward, steps) {
                    Navigation::EndOfList => Some(SoundKind::EndOfList),
                    Navigation::Moved(_) | Navigation::Nothing => None,
                }
            }
            GuiEvent::Click | GuiEvent::Hold => {
                let mut target = self.screen.focus_within(captured).unwrap_or(captured);
                loop {
                    if self.deliver(target, event, prefs, dialogs).is_handled() {
                        return (event == GuiEvent::Click).then_some(SoundKind::Click);
                    }
                    let closes = self
                        .screen
                        .window(target)
                        .is_some_and(|w| w.flags().contains(WindowFlags::CLOSE_ON_CLICK));
                    if event == GuiEvent::Click && closes {
                        self.screen.destroy_window(target);
                        return None;
                    }
                    match self.screen.parent_of(target) {
                        Some(parent) if parent != self.screen.root() => target = parent,
                        _ => return None,
                    }
                }
            }
            _ => {
                self.deliver(captured, event, prefs, dialogs);
                None
            }
        }
    }

    fn check_menu_timeout(&mut self, now_ms: u32, prefs: &mut dyn UiPrefs, dialogs: &DialogHandler) -> Option<SoundKind> {
        let idle = now_ms.wrapping_sub(self.last_activity_ms);
        if idle <= prefs.menu_timeout_ms() {
            return None;
        }
        self.last_activity_ms = now_ms;
        // The user switched timeouts off: nothing closes, popups included.
        if !prefs.menu_timeout_enabled() {
            return None;
        }
        self.screen.close_flagged(WindowFlags::CLOSE_ON_TIMEOUT);

        let may_close = self.screen.menu_timeout_enabled()
            && self.navigator.can_close()
            && self.navigator.pending_close().is_none()
            && dialogs.active_fsm().is_none();
        if !may_close {
            return None;
        }
        if let Some(current) = self.built {
            gui_info!("menu timeout, closing {}", current.name());
        }
        self.navigator.close();
        Some(SoundKind::Timeout)
    }

    /// One pass of the GUI loop.
    pub fn loop_once<B: Board>(&mut self, board: &mut B, dialogs: &mut DialogHandler) -> Result<(), GuiError> {
        let now_ms = board.clock().now_ms();

        if self.navigator.pending_close().is_some() {
            let vetoed = self
                .with_body(board.prefs(), |body, cx| body.intercept_close(cx))
                .unwrap_or(false);
            if vetoed {
                gui_debug!("close request intercepted");
                self.navigator.consume_close();
            } else {
                self.navigator.apply_pending_close();
            }
        }

        self.sync(board.prefs(), dialogs, now_ms)?;

        for _ in 0..INPUT_EVENTS_PER_TICK {
            let Some(raw) = board.input().poll_event() else { break };
            self.last_activity_ms = now_ms;
            let Some(event) = GuiEvent::from_input(raw) else { continue };
            gui_trace!("input {}", event.as_str());
            if let Some(sound) = self.dispatch(event, board.prefs(), dialogs) {
                board.sound().play(sound);
            }
        }

        for id in self.screen.timer_windows() {
            self.deliver(id, GuiEvent::Timer, board.prefs(), dialogs);
        }

        if let Some(sound) = self.check_menu_timeout(now_ms, board.prefs(), dialogs) {
            board.sound().play(sound);
        }

        self.with_body(board.prefs(), |body, cx| body.on_loop(cx));
        if let Some(err) = self.fault.take() {
            return Err(err);
        }

        if self.screen.needs_redraw() {
            self.screen.draw(board.display()).map_err(|_| GuiError::Draw)?;
            board.display().flush().map_err(|_| GuiError::Draw)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::test_board::TestBoard,
        dialogs::DialogFactory,
        geometry::rect,
        screen_factory::CreateScreen,
        window::{Content, Window},
    };
    use platform::{Button, InputEvent};

    struct Menu {
        first: WindowId,
        clicks: u32,
    }

    impl CreateScreen for Menu {
        fn create(screen: &mut Screen, _: &dyn UiPrefs, _: u32) -> Result<Self, GuiError> {
            let frame = screen.insert(None, Window::new(rect(0, 0, 240, 320)))?;
            let first = screen.insert(Some(frame), Window::new(rect(0, 0, 240, 30)).content(Content::Button("A")))?;
            screen.insert(Some(frame), Window::new(rect(0, 30, 240, 30)).content(Content::Button("B")))?;
            Ok(Self { first, clicks: 0 })
        }
    }

    impl ScreenBody for Menu {
        fn window_event(&mut self, cx: &mut Cx<'_>, id: WindowId, event: GuiEvent) -> EventResult {
            if id == self.first && event == GuiEvent::Click {
                self.clicks += 1;
                cx.screen.set_number(id, i32::try_from(self.clicks).unwrap_or(0));
                return EventResult::Handled;
            }
            EventResult::Unhandled
        }
    }

    struct Sticky;

    impl CreateScreen for Sticky {
        fn create(_: &mut Screen, _: &dyn UiPrefs, _: u32) -> Result<Self, GuiError> {
            Ok(Self)
        }
    }

    impl ScreenBody for Sticky {
        fn intercept_close(&mut self, _: &mut Cx<'_>) -> bool {
            true
        }
    }

    struct Runaway;

    impl CreateScreen for Runaway {
        fn create(_: &mut Screen, _: &dyn UiPrefs, _: u32) -> Result<Self, GuiError> {
            Ok(Self)
        }
    }

    impl ScreenBody for Runaway {
        fn on_loop(&mut self, cx: &mut Cx<'_>) {
            for n in 0..=crate::config::SCREEN_STACK_DEPTH as u32 {
                if cx.open(ScreenCreator::with_arg::<Sticky>(n)).is_err() {
                    break;
                }
            }
        }
    }

    fn setup() -> (Screens, DialogHandler, TestBoard) {
        (
            Screens::new(ScreenCreator::of::<Menu>()),
            DialogHandler::new(DialogFactory::with_standard_dialogs()),
            TestBoard::new(),
        )
    }

    fn press(board: &mut TestBoard, event: InputEvent) {
        board.input.add_event(event).expect("room");
    }

    #[test]
    fn test_first_tick_builds_and_draws() {
        let (mut screens, mut dialogs, mut board) = setup();
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        assert_eq!(screens.built(), Some(ScreenCreator::of::<Menu>()));
        assert_eq!(board.display.flush_count(), 1);

        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        assert_eq!(board.display.flush_count(), 1, "nothing changed, nothing drawn");
    }

    #[test]
    fn test_encoder_moves_focus_then_hits_end() {
        let (mut screens, mut dialogs, mut board) = setup();
        screens.loop_once(&mut board, &mut dialogs).expect("tick");

        press(&mut board, InputEvent::EncoderTurn(1));
        press(&mut board, InputEvent::EncoderTurn(1));
        press(&mut board, InputEvent::EncoderTurn(1));
        screens.loop_once(&mut board, &mut dialogs).expect("tick");

        assert_eq!(board.sound.count(SoundKind::EndOfList), 1);
        assert!(screens.screen().focused().is_some());
    }

    #[test]
    fn test_click_reaches_focused_button() {
        let (mut screens, mut dialogs, mut board) = setup();
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        press(&mut board, InputEvent::EncoderTurn(1));
        press(&mut board, InputEvent::ButtonRelease(Button::Knob));
        screens.loop_once(&mut board, &mut dialogs).expect("tick");

        let focused = screens.screen().focused().expect("focus");
        assert_eq!(screens.screen().window(focused).map(|w| w.get_content()), Some(Content::Number(1)));
        assert_eq!(board.sound.count(SoundKind::Click), 1);
    }

    #[test]
    fn test_intercepted_close_is_consumed() {
        let (mut screens, mut dialogs, mut board) = setup();
        screens.open(ScreenCreator::of::<Sticky>()).expect("room");
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        screens.close();
        screens.loop_once(&mut board, &mut dialogs).expect("tick");

        assert_eq!(screens.built(), Some(ScreenCreator::of::<Sticky>()));
        assert_eq!(screens.navigator().pending_close(), None);
    }

    #[test]
    fn test_close_rebuilds_previous() {
        let (mut screens, mut dialogs, mut board) = setup();
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        screens.open(ScreenCreator::with_arg::<Menu>(1)).expect("room");
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        assert_eq!(screens.built(), Some(ScreenCreator::with_arg::<Menu>(1)));

        screens.close();
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        assert_eq!(screens.built(), Some(ScreenCreator::of::<Menu>()));
    }

    #[test]
    fn test_menu_timeout_closes_screen() {
        let (mut screens, mut dialogs, mut board) = setup();
        screens.open(ScreenCreator::with_arg::<Menu>(1)).expect("room");
        screens.loop_once(&mut board, &mut dialogs).expect("tick");

        board.clock.advance(platform::config::DEFAULT_MENU_TIMEOUT_MS + 1);
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        assert_eq!(board.sound.count(SoundKind::Timeout), 1);
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        assert_eq!(screens.built(), Some(ScreenCreator::of::<Menu>()));
    }

    fn timeout_toast(screens: &mut Screens) -> WindowId {
        screens
            .screen_mut()
            .insert(
                None,
                Window::new(rect(0, 280, 240, 40))
                    .kind(crate::WinType::Popup)
                    .with_flags(WindowFlags::CLOSE_ON_TIMEOUT),
            )
            .expect("registered")
    }

    #[test]
    fn test_menu_timeout_closes_toast() {
        let (mut screens, mut dialogs, mut board) = setup();
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        let toast = timeout_toast(&mut screens);

        board.clock.advance(platform::config::DEFAULT_MENU_TIMEOUT_MS + 1);
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        assert!(!screens.screen().contains(toast));
    }

    #[test]
    fn test_menu_timeout_respects_prefs() {
        let (mut screens, mut dialogs, mut board) = setup();
        board.prefs.set_menu_timeout_enabled(false);
        screens.open(ScreenCreator::with_arg::<Menu>(1)).expect("room");
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        let toast = timeout_toast(&mut screens);

        board.clock.advance(platform::config::DEFAULT_MENU_TIMEOUT_MS + 1);
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        assert_eq!(screens.built(), Some(ScreenCreator::with_arg::<Menu>(1)));
        assert!(screens.screen().contains(toast), "toast outlives a disabled timeout");
        assert_eq!(board.sound.count(SoundKind::Timeout), 0);
    }

    #[test]
    fn test_long_press_action() {
        let (mut screens, mut dialogs, mut board) = setup();
        screens.open(ScreenCreator::with_arg::<Menu>(1)).expect("room");
        screens.set_long_press_action(Some(|nav: &mut Navigator| nav.close_all()));
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        press(&mut board, InputEvent::ButtonLongPress(Button::Knob));
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        assert_eq!(screens.built(), Some(ScreenCreator::of::<Menu>()));
    }

    #[test]
    fn test_close_on_click_popup() {
        let (mut screens, mut dialogs, mut board) = setup();
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        let popup = screens
            .screen_mut()
            .insert(
                None,
                Window::new(rect(0, 280, 240, 40))
                    .kind(crate::WinType::Popup)
                    .with_flags(WindowFlags::CLOSE_ON_CLICK),
            )
            .expect("registered");
        screens.screen_mut().set_capture(popup);
        press(&mut board, InputEvent::ButtonRelease(Button::Knob));
        screens.loop_once(&mut board, &mut dialogs).expect("tick");
        assert!(!screens.screen().contains(popup));
    }

    #[test]
    fn test_overflow_in_hook_fails_the_tick() {
        let (_, mut dialogs, mut board) = setup();
        let mut screens = Screens::new(ScreenCreator::of::<Runaway>());
        assert_eq!(screens.loop_once(&mut board, &mut dialogs), Err(GuiError::StackOverflow));
    }
}
