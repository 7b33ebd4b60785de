use core::fmt;

use super::{CreateDialog, DialogSlot, LoadUnloadDialog, ProgressDialog, WarningDialog};
use crate::{error::GuiError, fsm::ClientFsm, screen::Screen, screen_factory::ScreenCreator};

type BuildFn = fn(&mut Screen, ClientFsm, u8, &mut DialogSlot) -> Result<(), GuiError>;

fn build<T: CreateDialog>(screen: &mut Screen, fsm: ClientFsm, data: u8, slot: &mut DialogSlot) -> Result<(), GuiError> {
    let dialog = T::create(screen, fsm, data)?;
    slot.emplace(dialog);
    Ok(())
}

/// Type-erased constructor for an overlay dialog.
#[derive(Clone, Copy)]
pub struct DialogCtor {
    build: BuildFn,
    name: &'static str,
}

impl DialogCtor {
    pub fn of<T: CreateDialog>() -> Self {
        Self {
            build: build::<T>,
            name: core::any::type_name::<T>().rsplit("::").next().unwrap_or("dialog"),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn build(&self, screen: &mut Screen, fsm: ClientFsm, data: u8, slot: &mut DialogSlot) -> Result<(), GuiError> {
        (self.build)(screen, fsm, data, slot)
    }
}

impl fmt::Debug for DialogCtor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DialogCtor").field(&self.name).finish()
    }
}

/// How one FSM is presented.
#[derive(Debug, Clone, Copy)]
pub enum FsmHandler {
    /// Pushed onto the navigation history like any other screen.
    FullScreen(ScreenCreator),
    /// Drawn on top of the current screen.
    Overlay(DialogCtor),
}

impl FsmHandler {
    pub fn kind(&self) -> HandlerKind {
        match self {
            Self::FullScreen(_) => HandlerKind::FullScreen,
            Self::Overlay(_) => HandlerKind::Overlay,
        }
    }
}

/// Presentation kind without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// See [`FsmHandler::FullScreen`].
    FullScreen,
    /// See [`FsmHandler::Overlay`].
    Overlay,
}

/// Table from FSM to handler.
///
/// Every FSM must have an entry; [`DialogFactory::validate`] is run once at
/// startup so a missing one stops the firmware before any command arrives.
#[derive(Debug, Clone)]
pub struct DialogFactory {
    table: [Option<FsmHandler>; ClientFsm::COUNT],
}

impl DialogFactory {
    /// Table with no entries.
    pub const fn empty() -> Self {
        Self {
            table: [None; ClientFsm::COUNT],
        }
    }

    /// Table with the overlay dialogs this crate provides. Full-screen
    /// FSMs still need [`DialogFactory::with`].
    pub fn with_standard_dialogs() -> Self {
        let load_unload = FsmHandler::Overlay(DialogCtor::of::<LoadUnloadDialog>());
        let warning = FsmHandler::Overlay(DialogCtor::of::<WarningDialog>());
        let progress = FsmHandler::Overlay(DialogCtor::of::<ProgressDialog>());

        Self::empty()
            .with(ClientFsm::LoadUnload, load_unload)
            .with(ClientFsm::Warning, warning)
            .with(ClientFsm::QuickPause, warning)
            .with(ClientFsm::CrashRecovery, warning)
            .with(ClientFsm::Preheat, progress)
            .with(ClientFsm::Selftest, progress)
            .with(ClientFsm::NetworkSetup, progress)
            .with(ClientFsm::PrintPreview, progress)
            .with(ClientFsm::ColdPull, progress)
            .with(ClientFsm::PhaseStepping, progress)
            .with(ClientFsm::InputShaperCalibration, progress)
    }

    /// Set the handler for `fsm`, replacing any earlier one.
    #[must_use]
    pub fn with(mut self, fsm: ClientFsm, handler: FsmHandler) -> Self {
        if let Some(entry) = self.table.get_mut(fsm.index()) {
            *entry = Some(handler);
        }
        self
    }

    pub fn handler(&self, fsm: ClientFsm) -> Option<FsmHandler> {
        self.table.get(fsm.index()).copied().flatten()
    }

    /// Fail with the first FSM that has no handler.
    pub fn validate(&self) -> Result<(), GuiError> {
        match ClientFsm::ALL.into_iter().find(|&fsm| self.handler(fsm).is_none()) {
            Some(fsm) => {
                gui_error!("no handler registered for FSM {}", fsm.as_str());
                Err(GuiError::MissingHandler(fsm))
            }
            None => Ok(()),
        }
    }
}

impl Default for DialogFactory {
    fn default() -> Self {
        Self::empty()
    }
}
