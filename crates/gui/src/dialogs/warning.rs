//! Warning, pause and crash-recovery dialogs.
//!
//! A printer warning must stay on top of every other dialog, so the
//! `Warning` FSM registers in the strong-dialog tier. Pause and crash
//! recovery reuse the layout as ordinary dialogs.

use embedded_graphics::{pixelcolor::Rgb565, prelude::RgbColor, primitives::Rectangle};

use super::{CreateDialog, DialogBody};
use crate::{
    config::DIALOG_RECT,
    error::GuiError,
    event::{EventResult, GuiEvent},
    fsm::{BaseData, ClientFsm, PhaseResponse, Response, ResponseQueue},
    geometry::rect,
    screen::Screen,
    window::{Content, WinType, Window, WindowId},
};

/// Known warnings, selected by the create payload and by the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)] // see `text`
pub enum WarningType {
    HotendFanError,
    PrintFanError,
    HeatersTimeout,
    HotendTempDiscrepancy,
    UsbFlashDiskError,
    HeatBreakThermistorFail,
    Unknown,
}

impl WarningType {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::HotendFanError,
            1 => Self::PrintFanError,
            2 => Self::HeatersTimeout,
            3 => Self::HotendTempDiscrepancy,
            4 => Self::UsbFlashDiskError,
            5 => Self::HeatBreakThermistorFail,
            _ => Self::Unknown,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::HotendFanError => "Hotend fan not spinning",
            Self::PrintFanError => "Print fan not spinning",
            Self::HeatersTimeout => "Heaters disabled due to timeout",
            Self::HotendTempDiscrepancy => "Hotend temperature mismatch",
            Self::UsbFlashDiskError => "USB drive error, print paused",
            Self::HeatBreakThermistorFail => "Heatbreak thermistor disconnected",
            Self::Unknown => "Unknown warning",
        }
    }
}

const TITLE_RECT: Rectangle = rect(0, 30, 240, 20);
const TEXT_RECT: Rectangle = rect(10, 110, 220, 40);
const BUTTON_RECT: Rectangle = rect(70, 276, 100, 30);

/// Message with a single acknowledgement button.
pub struct WarningDialog {
    fsm: ClientFsm,
    root: WindowId,
    text: WindowId,
    button: WindowId,
    response: Response,
    phase: u8,
}

impl WarningDialog {
    fn message(fsm: ClientFsm, code: u8) -> &'static str {
        match fsm {
            ClientFsm::Warning => WarningType::from_byte(code).text(),
            ClientFsm::QuickPause => "Print paused",
            ClientFsm::CrashRecovery => "Crash detected",
            other => other.title(),
        }
    }
}

impl CreateDialog for WarningDialog {
    fn create(screen: &mut Screen, fsm: ClientFsm, data: u8) -> Result<Self, GuiError> {
        let (kind, back, response) = match fsm {
            ClientFsm::Warning => (WinType::StrongDialog, Rgb565::new(20, 0, 0), Response::Ok),
            ClientFsm::QuickPause => (WinType::Dialog, Rgb565::BLACK, Response::Resume),
            _ => (WinType::Dialog, Rgb565::BLACK, Response::Retry),
        };
        let root = screen.insert(None, Window::new(DIALOG_RECT).kind(kind).back_color(back))?;
        screen.insert(
            Some(root),
            Window::new(TITLE_RECT).content(Content::Text(fsm.title())).back_color(back),
        )?;
        let text = screen.insert(
            Some(root),
            Window::new(TEXT_RECT)
                .content(Content::Text(Self::message(fsm, data)))
                .back_color(back),
        )?;
        let button = screen.insert(Some(root), Window::new(BUTTON_RECT).content(Content::Button(response.label())))?;
        screen.set_focus(button);

        Ok(Self {
            fsm,
            root,
            text,
            button,
            response,
            phase: 0,
        })
    }
}

impl DialogBody for WarningDialog {
    fn root(&self) -> WindowId {
        self.root
    }

    fn change(&mut self, screen: &mut Screen, data: BaseData) -> bool {
        self.phase = data.phase;
        if self.fsm == ClientFsm::Warning {
            screen.set_text(self.text, WarningType::from_byte(data.phase).text());
        }
        true
    }

    fn window_event(
        &mut self,
        _screen: &mut Screen,
        id: WindowId,
        event: GuiEvent,
        responses: &mut ResponseQueue,
    ) -> EventResult {
        if id != self.button || event != GuiEvent::Click {
            return EventResult::Unhandled;
        }
        responses.push(PhaseResponse {
            fsm: self.fsm,
            phase: self.phase,
            response: self.response,
        });
        EventResult::Handled
    }
}
