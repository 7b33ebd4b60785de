use gui::{Content, CreateScreen, Cx, EventResult, GuiError, GuiEvent, Screen, ScreenBody, WindowId};
use platform::{FileSort, UiPrefs};

use super::{frame_with_header, row};

fn timeout_label(enabled: bool) -> &'static str {
    if enabled {
        "Menu timeout: On"
    } else {
        "Menu timeout: Off"
    }
}

fn sort_label(sort: FileSort) -> &'static str {
    match sort {
        FileSort::ByTime => "Sort files: Time",
        FileSort::ByName => "Sort files: Name",
    }
}

/// User preferences, written through [`UiPrefs`] as soon as they change.
pub struct SettingsScreen {
    timeout: WindowId,
    sort: WindowId,
    back: WindowId,
}

impl CreateScreen for SettingsScreen {
    fn create(screen: &mut Screen, prefs: &dyn UiPrefs, _arg: u32) -> Result<Self, GuiError> {
        let frame = frame_with_header(screen, "Settings")?;
        let timeout = row(screen, frame, 0, Content::Button(timeout_label(prefs.menu_timeout_enabled())))?;
        let sort = row(screen, frame, 1, Content::Button(sort_label(prefs.file_sort())))?;
        let back = row(screen, frame, 2, Content::Button("Back"))?;
        screen.set_focus(timeout);
        Ok(Self { timeout, sort, back })
    }
}

impl ScreenBody for SettingsScreen {
    fn window_event(&mut self, cx: &mut Cx<'_>, id: WindowId, event: GuiEvent) -> EventResult {
        if event != GuiEvent::Click {
            return EventResult::Unhandled;
        }
        if id == self.timeout {
            let enabled = !cx.prefs.menu_timeout_enabled();
            cx.prefs.set_menu_timeout_enabled(enabled);
            cx.screen.set_content(id, Content::Button(timeout_label(enabled)));
        } else if id == self.sort {
            let sort = cx.prefs.file_sort().toggled();
            cx.prefs.set_file_sort(sort);
            cx.screen.set_content(id, Content::Button(sort_label(sort)));
        } else if id == self.back {
            cx.close();
        } else {
            return EventResult::Unhandled;
        }
        EventResult::Handled
    }
}
