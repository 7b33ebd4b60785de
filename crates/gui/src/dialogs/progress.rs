//! Generic phase + progress dialog used by calibrations and preheat.

use embedded_graphics::{pixelcolor::Rgb565, prelude::RgbColor, primitives::Rectangle};

use super::{CreateDialog, DialogBody};
use crate::{
    config::DIALOG_RECT,
    error::GuiError,
    event::{EventResult, GuiEvent},
    fsm::{BaseData, ClientFsm, PhaseResponse, ProgressData, Response, ResponseQueue},
    geometry::rect,
    screen::Screen,
    window::{Content, WinType, Window, WindowId},
};

const TITLE_RECT: Rectangle = rect(0, 30, 240, 20);
const PHASE_RECT: Rectangle = rect(10, 100, 220, 20);
const BAR_RECT: Rectangle = rect(10, 140, 220, 10);
const PERCENT_RECT: Rectangle = rect(100, 160, 40, 20);
const ABORT_RECT: Rectangle = rect(70, 276, 100, 30);

/// Title, phase number, progress bar and an abort button.
pub struct ProgressDialog {
    fsm: ClientFsm,
    root: WindowId,
    phase_number: WindowId,
    bar: WindowId,
    percent: WindowId,
    abort: WindowId,
    phase: u8,
}

impl CreateDialog for ProgressDialog {
    fn create(screen: &mut Screen, fsm: ClientFsm, _data: u8) -> Result<Self, GuiError> {
        let root = screen.insert(None, Window::new(DIALOG_RECT).kind(WinType::Dialog))?;
        screen.insert(Some(root), Window::new(TITLE_RECT).content(Content::Text(fsm.title())))?;
        let phase_number = screen.insert(Some(root), Window::new(PHASE_RECT).content(Content::Number(0)))?;
        let bar = screen.insert(
            Some(root),
            Window::new(BAR_RECT).content(Content::Progress(0)).fore_color(Rgb565::GREEN),
        )?;
        let percent = screen.insert(Some(root), Window::new(PERCENT_RECT).content(Content::Number(0)))?;
        let abort = screen.insert(
            Some(root),
            Window::new(ABORT_RECT).content(Content::Button(Response::Abort.label())),
        )?;
        screen.set_focus(abort);

        Ok(Self {
            fsm,
            root,
            phase_number,
            bar,
            percent,
            abort,
            phase: 0,
        })
    }
}

impl DialogBody for ProgressDialog {
    fn root(&self) -> WindowId {
        self.root
    }

    fn change(&mut self, screen: &mut Screen, data: BaseData) -> bool {
        let percent = ProgressData::from(data.data).percent();
        self.phase = data.phase;
        screen.set_number(self.phase_number, i32::from(data.phase));
        screen.set_progress(self.bar, percent);
        screen.set_number(self.percent, i32::from(percent));
        true
    }

    fn window_event(
        &mut self,
        _screen: &mut Screen,
        id: WindowId,
        event: GuiEvent,
        responses: &mut ResponseQueue,
    ) -> EventResult {
        if id != self.abort || event != GuiEvent::Click {
            return EventResult::Unhandled;
        }
        responses.push(PhaseResponse {
            fsm: self.fsm,
            phase: self.phase,
            response: Response::Abort,
        });
        EventResult::Handled
    }
}
