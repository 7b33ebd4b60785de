//! FSM-driven dialogs.
//!
//! The [`DialogFactory`] maps each [`ClientFsm`] to either a full screen or
//! an overlay dialog. The [`DialogHandler`] turns create/change/destroy
//! commands into opening, updating and closing those, keeping per-FSM
//! open/close counters so duplicate or out-of-order commands are harmless.

mod factory;
mod handler;
mod load_unload;
mod progress;
mod warning;

pub use factory::{DialogCtor, DialogFactory, FsmHandler, HandlerKind};
pub use handler::DialogHandler;
pub use load_unload::{LoadUnloadDialog, LoadUnloadMode};
pub use progress::ProgressDialog;
pub use warning::{WarningDialog, WarningType};

use crate::{
    config::DIALOG_ARENA_SIZE,
    error::GuiError,
    event::{EventResult, GuiEvent},
    fsm::{BaseData, ClientFsm, ResponseQueue},
    inplace::{Erase, InPlace},
    screen::Screen,
    window::WindowId,
};

/// Behaviour of an overlay dialog.
pub trait DialogBody {
    /// Top-level window holding everything the dialog drew.
    fn root(&self) -> WindowId;

    /// New phase. Returns `false` if the phase is not one this dialog knows.
    fn change(&mut self, screen: &mut Screen, data: BaseData) -> bool;

    /// Event delivered to one of the dialog's windows.
    fn window_event(
        &mut self,
        screen: &mut Screen,
        id: WindowId,
        event: GuiEvent,
        responses: &mut ResponseQueue,
    ) -> EventResult {
        let _ = (screen, id, event, responses);
        EventResult::Unhandled
    }

    /// System event broadcast while the dialog is open.
    fn screen_event(&mut self, screen: &mut Screen, event: GuiEvent) {
        let _ = (screen, event);
    }
}

/// Dialogs that can be constructed from a create command.
pub trait CreateDialog: DialogBody + Sized + 'static {
    /// Put the dialog's windows on `screen`. `data` is the create payload.
    fn create(screen: &mut Screen, fsm: ClientFsm, data: u8) -> Result<Self, GuiError>;
}

impl<T: DialogBody + 'static> Erase<dyn DialogBody> for T {
    fn erase(this: *mut Self) -> *mut dyn DialogBody {
        this
    }
}

/// Storage for the active overlay dialog.
pub type DialogSlot = InPlace<dyn DialogBody, DIALOG_ARENA_SIZE>;
