use gui::{
    BaseData, ClientFsm, Content, CreateScreen, Cx, EventResult, GuiError, GuiEvent, PhaseResponse, Response,
    Screen, ScreenBody, WindowId,
};
use platform::UiPrefs;

use super::{frame_with_header, row};

/// First layer calibration.
///
/// Phase payload: live Z offset in micrometres as a little-endian `i16`,
/// then the progress in percent.
pub struct FirstLayerScreen {
    phase: u8,
    progress: WindowId,
    live_z: WindowId,
    done: WindowId,
}

impl CreateScreen for FirstLayerScreen {
    fn create(screen: &mut Screen, _prefs: &dyn UiPrefs, _arg: u32) -> Result<Self, GuiError> {
        let frame = frame_with_header(screen, ClientFsm::FirstLayer.title())?;
        row(screen, frame, 0, Content::Text("Live adjust Z (um)"))?;
        let live_z = row(screen, frame, 1, Content::Number(0))?;
        let progress = row(screen, frame, 2, Content::Progress(0))?;
        let done = row(screen, frame, 5, Content::Button(Response::Ok.label()))?;
        screen.set_focus(done);
        screen.set_menu_timeout(false);
        Ok(Self {
            phase: 0,
            progress,
            live_z,
            done,
        })
    }
}

impl ScreenBody for FirstLayerScreen {
    fn window_event(&mut self, cx: &mut Cx<'_>, id: WindowId, event: GuiEvent) -> EventResult {
        if event != GuiEvent::Click || id != self.done {
            return EventResult::Unhandled;
        }
        cx.respond(PhaseResponse {
            fsm: ClientFsm::FirstLayer,
            phase: self.phase,
            response: Response::Ok,
        });
        EventResult::Handled
    }

    fn fsm_change(&mut self, cx: &mut Cx<'_>, fsm: ClientFsm, data: BaseData) {
        if fsm != ClientFsm::FirstLayer {
            return;
        }
        let [z0, z1, percent, _] = data.data.0;
        self.phase = data.phase;
        cx.screen.set_number(self.live_z, i32::from(i16::from_le_bytes([z0, z1])));
        cx.screen.set_progress(self.progress, percent.min(100));
    }

    fn intercept_close(&mut self, _cx: &mut Cx<'_>) -> bool {
        true
    }
}
