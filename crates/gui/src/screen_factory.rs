//! Screen bodies and the creators that build them.
//!
//! A screen body owns the windows it puts on a [`Screen`] and reacts to
//! their events. Bodies are never stored by value in the navigation history;
//! the history keeps [`ScreenCreator`]s, and the active body lives in a
//! single [`ScreenFactory`] slot that is rebuilt whenever the current
//! creator changes.

use core::any::TypeId;
use core::fmt;

use platform::UiPrefs;

use crate::{
    config::SCREEN_ARENA_SIZE,
    error::GuiError,
    event::{EventResult, GuiEvent},
    fsm::{BaseData, ClientFsm},
    inplace::{Erase, InPlace},
    screen::Screen,
    screens::Cx,
    window::WindowId,
};

/// Behaviour of a full-screen view.
///
/// Every hook has a no-op default so simple screens only implement what
/// they need.
pub trait ScreenBody {
    /// Event delivered to one of this body's windows.
    ///
    /// Returning [`EventResult::Unhandled`] lets the default behaviour run:
    /// focus navigation for knob turns, bubbling to the parent for clicks.
    fn window_event(&mut self, cx: &mut Cx<'_>, id: WindowId, event: GuiEvent) -> EventResult {
        let _ = (cx, id, event);
        EventResult::Unhandled
    }

    /// System event broadcast to the whole screen.
    fn screen_event(&mut self, cx: &mut Cx<'_>, event: GuiEvent) {
        let _ = (cx, event);
    }

    /// Called once per loop tick after input has been handled.
    fn on_loop(&mut self, cx: &mut Cx<'_>) {
        let _ = cx;
    }

    /// Phase change of the FSM this screen was opened for.
    fn fsm_change(&mut self, cx: &mut Cx<'_>, fsm: ClientFsm, data: BaseData) {
        let _ = (cx, fsm, data);
    }

    /// Return `true` to veto a pending close request.
    fn intercept_close(&mut self, cx: &mut Cx<'_>) -> bool {
        let _ = cx;
        false
    }
}

/// Screen bodies that can be built from a [`ScreenCreator`].
pub trait CreateScreen: ScreenBody + Sized + 'static {
    /// Put the windows on `screen` and return the body that owns them.
    ///
    /// `arg` is the value the creator was made with, zero by default.
    fn create(screen: &mut Screen, prefs: &dyn UiPrefs, arg: u32) -> Result<Self, GuiError>;
}

impl<T: ScreenBody + 'static> Erase<dyn ScreenBody> for T {
    fn erase(this: *mut Self) -> *mut dyn ScreenBody {
        this
    }
}

/// Storage for the active screen body.
pub type ScreenFactory = InPlace<dyn ScreenBody, SCREEN_ARENA_SIZE>;

type BuildFn = fn(&mut Screen, &dyn UiPrefs, u32, &mut ScreenFactory) -> Result<(), GuiError>;

fn build<T: CreateScreen>(
    screen: &mut Screen,
    prefs: &dyn UiPrefs,
    arg: u32,
    slot: &mut ScreenFactory,
) -> Result<(), GuiError> {
    let body = T::create(screen, prefs, arg)?;
    slot.emplace(body);
    Ok(())
}

/// Recipe for a screen: which body type, with which argument.
///
/// Two creators are equal when they build the same type with the same
/// argument, which is what the screen loop compares to decide whether the
/// current screen must be rebuilt.
#[derive(Clone, Copy)]
pub struct ScreenCreator {
    type_id: TypeId,
    build: BuildFn,
    arg: u32,
    name: &'static str,
}

impl ScreenCreator {
    /// Creator for `T` with argument zero.
    pub fn of<T: CreateScreen>() -> Self {
        Self::with_arg::<T>(0)
    }

    /// Creator for `T` with `arg`.
    pub fn with_arg<T: CreateScreen>(arg: u32) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            build: build::<T>,
            arg,
            name: short_name(core::any::type_name::<T>()),
        }
    }

    pub fn arg(&self) -> u32 {
        self.arg
    }

    /// Body type name without its module path.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `true` when this creator builds a `T`, whatever the argument.
    pub fn builds<T: CreateScreen>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Build the body on `screen` and store it in `slot`.
    pub fn build(&self, screen: &mut Screen, prefs: &dyn UiPrefs, slot: &mut ScreenFactory) -> Result<(), GuiError> {
        (self.build)(screen, prefs, self.arg, slot)
    }
}

fn short_name(full: &'static str) -> &'static str {
    full.rsplit("::").next().unwrap_or(full)
}

impl PartialEq for ScreenCreator {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.arg == other.arg
    }
}

impl Eq for ScreenCreator {}

impl fmt::Debug for ScreenCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenCreator")
            .field("name", &self.name)
            .field("arg", &self.arg)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::MemoryPrefs;

    struct Alpha;
    impl ScreenBody for Alpha {}
    impl CreateScreen for Alpha {
        fn create(_: &mut Screen, _: &dyn UiPrefs, _: u32) -> Result<Self, GuiError> {
            Ok(Self)
        }
    }

    struct Beta {
        arg: u32,
    }
    impl ScreenBody for Beta {}
    impl CreateScreen for Beta {
        fn create(screen: &mut Screen, _: &dyn UiPrefs, arg: u32) -> Result<Self, GuiError> {
            screen.set_menu_timeout(arg == 0);
            Ok(Self { arg })
        }
    }

    struct Broken;
    impl ScreenBody for Broken {}
    impl CreateScreen for Broken {
        fn create(_: &mut Screen, _: &dyn UiPrefs, _: u32) -> Result<Self, GuiError> {
            Err(GuiError::PoolExhausted)
        }
    }

    #[test]
    fn test_creators_compare_by_type_and_arg() {
        assert_eq!(ScreenCreator::of::<Alpha>(), ScreenCreator::of::<Alpha>());
        assert_ne!(ScreenCreator::of::<Alpha>(), ScreenCreator::of::<Beta>());
        assert_ne!(ScreenCreator::with_arg::<Beta>(1), ScreenCreator::with_arg::<Beta>(2));
        assert!(ScreenCreator::with_arg::<Beta>(9).builds::<Beta>());
    }

    #[test]
    fn test_name_is_short() {
        assert_eq!(ScreenCreator::of::<Alpha>().name(), "Alpha");
    }

    #[test]
    fn test_build_fills_slot() {
        let mut screen = Screen::new();
        let mut slot = ScreenFactory::new();
        ScreenCreator::with_arg::<Beta>(5)
            .build(&mut screen, &MemoryPrefs::new(), &mut slot)
            .expect("built");
        assert!(slot.is_occupied());
        assert!(!screen.menu_timeout_enabled());
    }

    #[test]
    fn test_failed_build_leaves_slot_alone() {
        let mut screen = Screen::new();
        let mut slot = ScreenFactory::new();
        ScreenCreator::of::<Alpha>()
            .build(&mut screen, &MemoryPrefs::new(), &mut slot)
            .expect("built");
        let result = ScreenCreator::of::<Broken>().build(&mut screen, &MemoryPrefs::new(), &mut slot);
        assert_eq!(result, Err(GuiError::PoolExhausted));
        assert!(slot.occupant_name().is_some_and(|n| n.ends_with("Alpha")));
    }

    #[test]
    fn test_beta_keeps_arg() {
        let body = Beta::create(&mut Screen::new(), &MemoryPrefs::new(), 4).expect("built");
        assert_eq!(body.arg, 4);
    }
}
