use gui::fsm::ProgressData;
use gui::{
    BaseData, ClientFsm, Content, CreateScreen, Cx, EventResult, GuiError, GuiEvent, PhaseResponse, Response,
    Screen, ScreenBody, WindowId,
};
use platform::UiPrefs;

use super::{frame_with_header, row};

/// Creator argument selecting the serial-print variant.
pub const SERIAL_PRINTING: u32 = 1;

/// Print progress, opened by the `Printing` and `SerialPrinting` FSMs.
///
/// The screen belongs to its FSM: it ignores the menu timeout and vetoes
/// close requests. Only the FSM's destroy removes it.
pub struct PrintingScreen {
    fsm: ClientFsm,
    phase: u8,
    progress: WindowId,
    percent: WindowId,
    stop: WindowId,
}

impl CreateScreen for PrintingScreen {
    fn create(screen: &mut Screen, _prefs: &dyn UiPrefs, arg: u32) -> Result<Self, GuiError> {
        let fsm = if arg == SERIAL_PRINTING {
            ClientFsm::SerialPrinting
        } else {
            ClientFsm::Printing
        };
        let frame = frame_with_header(screen, fsm.title())?;
        let progress = row(screen, frame, 0, Content::Progress(0))?;
        let percent = row(screen, frame, 1, Content::Number(0))?;
        let stop = row(screen, frame, 5, Content::Button(Response::Stop.label()))?;
        screen.set_focus(stop);
        screen.set_menu_timeout(false);
        Ok(Self {
            fsm,
            phase: 0,
            progress,
            percent,
            stop,
        })
    }
}

impl ScreenBody for PrintingScreen {
    fn window_event(&mut self, cx: &mut Cx<'_>, id: WindowId, event: GuiEvent) -> EventResult {
        if event != GuiEvent::Click || id != self.stop {
            return EventResult::Unhandled;
        }
        cx.respond(PhaseResponse {
            fsm: self.fsm,
            phase: self.phase,
            response: Response::Stop,
        });
        EventResult::Handled
    }

    fn fsm_change(&mut self, cx: &mut Cx<'_>, fsm: ClientFsm, data: BaseData) {
        if fsm != self.fsm {
            return;
        }
        self.phase = data.phase;
        let percent = ProgressData::from(data.data).percent();
        cx.screen.set_progress(self.progress, percent);
        cx.screen.set_number(self.percent, i32::from(percent));
    }

    fn intercept_close(&mut self, _cx: &mut Cx<'_>) -> bool {
        true
    }
}
