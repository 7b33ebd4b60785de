use gui::{Content, CreateScreen, Cx, EventResult, GuiError, GuiEvent, Screen, ScreenBody, WindowId};
use platform::config::{APP_NAME, APP_VERSION};
use platform::UiPrefs;

use super::{frame_with_header, row};

/// Firmware name and version.
pub struct InfoScreen {
    back: WindowId,
}

impl CreateScreen for InfoScreen {
    fn create(screen: &mut Screen, _prefs: &dyn UiPrefs, _arg: u32) -> Result<Self, GuiError> {
        let frame = frame_with_header(screen, "Info")?;
        row(screen, frame, 0, Content::Text(APP_NAME))?;
        row(screen, frame, 1, Content::Text(APP_VERSION))?;
        let back = row(screen, frame, 2, Content::Button("Back"))?;
        screen.set_focus(back);
        Ok(Self { back })
    }
}

impl ScreenBody for InfoScreen {
    fn window_event(&mut self, cx: &mut Cx<'_>, id: WindowId, event: GuiEvent) -> EventResult {
        if event == GuiEvent::Click && id == self.back {
            cx.close();
            return EventResult::Handled;
        }
        EventResult::Unhandled
    }
}
