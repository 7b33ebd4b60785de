use gui::config::POPUP_RECT;
use gui::{
    Content, CreateScreen, Cx, EventResult, GuiError, GuiEvent, Screen, ScreenBody, ScreenCreator, WinType, Window,
    WindowFlags, WindowId,
};
use platform::UiPrefs;

use super::{frame_with_header, row, InfoScreen, SettingsScreen};

/// Bottom of the navigation history.
pub struct HomeScreen {
    settings: WindowId,
    info: WindowId,
    toast: Option<WindowId>,
}

impl CreateScreen for HomeScreen {
    fn create(screen: &mut Screen, _prefs: &dyn UiPrefs, _arg: u32) -> Result<Self, GuiError> {
        let frame = frame_with_header(screen, platform::config::APP_NAME)?;
        let settings = row(screen, frame, 0, Content::Button("Settings"))?;
        let info = row(screen, frame, 1, Content::Button("Info"))?;
        screen.set_focus(settings);
        Ok(Self {
            settings,
            info,
            toast: None,
        })
    }
}

impl HomeScreen {
    fn show_toast(&mut self, cx: &mut Cx<'_>, text: &'static str) {
        self.hide_toast(cx);
        let toast = Window::new(POPUP_RECT)
            .kind(WinType::Popup)
            .content(Content::Text(text))
            .with_flags(WindowFlags::CLOSE_ON_TIMEOUT | WindowFlags::CLOSE_ON_SERIAL);
        // A dialog in the way wins; the toast is simply not shown.
        self.toast = cx.screen.insert(None, toast).ok();
    }

    fn hide_toast(&mut self, cx: &mut Cx<'_>) {
        if let Some(toast) = self.toast.take() {
            cx.screen.destroy_window(toast);
        }
    }
}

impl ScreenBody for HomeScreen {
    fn window_event(&mut self, cx: &mut Cx<'_>, id: WindowId, event: GuiEvent) -> EventResult {
        if event != GuiEvent::Click {
            return EventResult::Unhandled;
        }
        let target = if id == self.settings {
            ScreenCreator::of::<SettingsScreen>()
        } else if id == self.info {
            ScreenCreator::of::<InfoScreen>()
        } else {
            return EventResult::Unhandled;
        };
        // An overflow is reported by the loop tick.
        let _ = cx.open(target);
        EventResult::Handled
    }

    fn screen_event(&mut self, cx: &mut Cx<'_>, event: GuiEvent) {
        match event {
            GuiEvent::MediaInserted => self.show_toast(cx, "USB drive inserted"),
            GuiEvent::MediaRemoved => self.show_toast(cx, "USB drive removed"),
            _ => {}
        }
    }
}
