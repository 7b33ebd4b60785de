//! Filament load / unload / change dialog.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;

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

/// What the create payload asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadUnloadMode {
    /// Load into the extruder.
    Load,
    /// Unload from the extruder.
    Unload,
    /// Unload, then load a new spool.
    Change,
    /// Push filament through the nozzle.
    Purge,
}

impl LoadUnloadMode {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Load,
            1 => Self::Unload,
            3 => Self::Purge,
            _ => Self::Change,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Load => "LOADING FILAMENT",
            Self::Unload => "UNLOADING FILAMENT",
            Self::Change => "CHANGING FILAMENT",
            Self::Purge => "PURGING FILAMENT",
        }
    }
}

struct PhaseInfo {
    text: &'static str,
    buttons: [Option<Response>; 2],
}

const fn phase(text: &'static str, buttons: [Option<Response>; 2]) -> PhaseInfo {
    PhaseInfo { text, buttons }
}

const NONE: [Option<Response>; 2] = [None, None];
const STOP: [Option<Response>; 2] = [Some(Response::Stop), None];
const CONTINUE: [Option<Response>; 2] = [Some(Response::Continue), None];
const YES_NO: [Option<Response>; 2] = [Some(Response::Yes), Some(Response::No)];
const YES_RETRY: [Option<Response>; 2] = [Some(Response::Yes), Some(Response::Retry)];

static PHASES: [PhaseInfo; 17] = [
    phase("Preparing", NONE),
    phase("Parking", STOP),
    phase("Waiting for temperature", STOP),
    phase("Preparing to ram", STOP),
    phase("Ramming", STOP),
    phase("Unloading", STOP),
    phase("Remove filament", CONTINUE),
    phase("Was filament unloaded?", YES_NO),
    phase("Remove filament manually", CONTINUE),
    phase("Insert filament", CONTINUE),
    phase("Make sure filament is inserted", CONTINUE),
    phase("Inserting", STOP),
    phase("Ejecting", NONE),
    phase("Loading to nozzle", STOP),
    phase("Purging", STOP),
    phase("Is color correct?", YES_NO),
    phase("Is color correct?", YES_RETRY),
];

const TITLE_RECT: embedded_graphics::primitives::Rectangle = rect(0, 30, 240, 20);
const LABEL_RECT: embedded_graphics::primitives::Rectangle = rect(10, 120, 220, 20);
const PROGRESS_RECT: embedded_graphics::primitives::Rectangle = rect(10, 160, 220, 8);
const BUTTON_RECTS: [embedded_graphics::primitives::Rectangle; 2] = [rect(10, 276, 105, 30), rect(125, 276, 105, 30)];

/// Shows the current phase text, a progress bar and up to two answers.
pub struct LoadUnloadDialog {
    fsm: ClientFsm,
    root: WindowId,
    label: WindowId,
    progress: WindowId,
    buttons: [WindowId; 2],
    responses: [Option<Response>; 2],
    phase: u8,
}

impl CreateDialog for LoadUnloadDialog {
    fn create(screen: &mut Screen, fsm: ClientFsm, data: u8) -> Result<Self, GuiError> {
        let mode = LoadUnloadMode::from_byte(data);
        let root = screen.insert(
            None,
            Window::new(DIALOG_RECT).kind(WinType::Dialog).back_color(Rgb565::BLACK),
        )?;
        screen.insert(Some(root), Window::new(TITLE_RECT).content(Content::Text(mode.title())))?;
        let label = screen.insert(Some(root), Window::new(LABEL_RECT).content(Content::Text("")))?;
        let progress = screen.insert(
            Some(root),
            Window::new(PROGRESS_RECT)
                .content(Content::Progress(0))
                .fore_color(Rgb565::new(31, 30, 0)),
        )?;
        let [left, right] = BUTTON_RECTS;
        let buttons = [
            screen.insert(Some(root), Window::new(left).content(Content::Button("")).hidden())?,
            screen.insert(Some(root), Window::new(right).content(Content::Button("")).hidden())?,
        ];

        let mut dialog = Self {
            fsm,
            root,
            label,
            progress,
            buttons,
            responses: [None, None],
            phase: 0,
        };
        dialog.change(screen, BaseData::default());
        Ok(dialog)
    }
}

impl DialogBody for LoadUnloadDialog {
    fn root(&self) -> WindowId {
        self.root
    }

    fn change(&mut self, screen: &mut Screen, data: BaseData) -> bool {
        let Some(info) = PHASES.get(usize::from(data.phase)) else {
            gui_warn!("load/unload: unknown phase {}", data.phase);
            return false;
        };
        self.phase = data.phase;
        screen.set_text(self.label, info.text);
        screen.set_progress(self.progress, ProgressData::from(data.data).percent());

        self.responses = info.buttons;
        let mut first = None;
        for (&button, response) in self.buttons.iter().zip(info.buttons) {
            match response {
                Some(response) => {
                    screen.set_content(button, Content::Button(response.label()));
                    screen.show(button);
                    first = first.or(Some(button));
                }
                None => {
                    screen.hide(button);
                }
            }
        }
        match first {
            Some(button) => {
                screen.set_focus(button);
            }
            None => screen.clear_focus(),
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
        if event != GuiEvent::Click {
            return EventResult::Unhandled;
        }
        let pressed = self
            .buttons
            .iter()
            .zip(self.responses)
            .find_map(|(&button, response)| if button == id { response } else { None });
        match pressed {
            Some(response) => {
                gui_debug!("load/unload: {} in phase {}", response.label(), self.phase);
                responses.push(PhaseResponse {
                    fsm: self.fsm,
                    phase: self.phase,
                    response,
                });
                EventResult::Handled
            }
            None => EventResult::Unhandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::PhaseData;

    fn open() -> (Screen, LoadUnloadDialog) {
        let mut screen = Screen::new();
        let dialog = LoadUnloadDialog::create(&mut screen, ClientFsm::LoadUnload, 0).expect("created");
        (screen, dialog)
    }

    #[test]
    fn test_registers_as_dialog() {
        let (screen, dialog) = open();
        assert_eq!(screen.tier(WinType::Dialog), &[dialog.root()]);
        assert_eq!(screen.captured_window(), Some(dialog.root()));
    }

    #[test]
    fn test_phase_with_answer_shows_and_focuses_button() {
        let (mut screen, mut dialog) = open();
        assert!(dialog.change(&mut screen, BaseData::new(9, PhaseData::default())));
        let [continue_button, second] = dialog.buttons;
        assert!(screen.window(continue_button).expect("alive").is_visible());
        assert!(!screen.window(second).expect("alive").is_visible());
        assert_eq!(screen.focused(), Some(continue_button));
    }

    #[test]
    fn test_click_sends_response() {
        let (mut screen, mut dialog) = open();
        dialog.change(&mut screen, BaseData::new(7, PhaseData::default()));
        let mut responses = ResponseQueue::new();
        let [_, no] = dialog.buttons;

        let result = dialog.window_event(&mut screen, no, GuiEvent::Click, &mut responses);
        assert_eq!(result, EventResult::Handled);
        assert_eq!(
            responses.pop(),
            Some(PhaseResponse {
                fsm: ClientFsm::LoadUnload,
                phase: 7,
                response: Response::No
            })
        );
    }

    #[test]
    fn test_click_on_hidden_answer_ignored() {
        let (mut screen, mut dialog) = open();
        let mut responses = ResponseQueue::new();
        let [button, _] = dialog.buttons;
        let result = dialog.window_event(&mut screen, button, GuiEvent::Click, &mut responses);
        assert_eq!(result, EventResult::Unhandled);
        assert!(responses.is_empty());
    }

    #[test]
    fn test_unknown_phase_rejected() {
        let (mut screen, mut dialog) = open();
        assert!(!dialog.change(&mut screen, BaseData::new(200, PhaseData::default())));
    }

    #[test]
    fn test_mode_from_byte() {
        assert_eq!(LoadUnloadMode::from_byte(0), LoadUnloadMode::Load);
        assert_eq!(LoadUnloadMode::from_byte(1), LoadUnloadMode::Unload);
        assert_eq!(LoadUnloadMode::from_byte(3), LoadUnloadMode::Purge);
        assert_eq!(LoadUnloadMode::from_byte(77), LoadUnloadMode::Change);
    }
}
