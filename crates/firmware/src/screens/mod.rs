//! Full-screen views of the printer UI.
//!
//! Each screen puts one frame covering the display on the screen, a header
//! with its title and a column of rows below it.

mod first_layer;
mod home;
mod info;
mod printing;
mod settings;

pub use first_layer::FirstLayerScreen;
pub use home::HomeScreen;
pub use info::InfoScreen;
pub use printing::{PrintingScreen, SERIAL_PRINTING};
pub use settings::SettingsScreen;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;
use embedded_graphics::primitives::Rectangle;
use gui::config::{HEADER_HEIGHT, SCREEN_RECT};
use gui::geometry::rect;
use gui::{Content, GuiError, Screen, Window, WindowId};

const HEADER_RECT: Rectangle = rect(0, 0, 240, HEADER_HEIGHT);

/// Menu rows below the header, top to bottom.
const ROWS: [Rectangle; 6] = [
    rect(10, 40, 220, 30),
    rect(10, 80, 220, 30),
    rect(10, 120, 220, 30),
    rect(10, 160, 220, 30),
    rect(10, 200, 220, 30),
    rect(10, 240, 220, 30),
];

const HEADER_COLOR: Rgb565 = Rgb565::new(4, 8, 4);

/// Frame covering the display with a header showing `title`.
pub(crate) fn frame_with_header(screen: &mut Screen, title: &'static str) -> Result<WindowId, GuiError> {
    let frame = screen.insert(None, Window::new(SCREEN_RECT).back_color(Rgb565::BLACK))?;
    screen.insert(
        Some(frame),
        Window::new(HEADER_RECT)
            .content(Content::Text(title))
            .back_color(HEADER_COLOR)
            .fore_color(Rgb565::WHITE),
    )?;
    Ok(frame)
}

/// Add `content` in menu row `row` of `frame`.
pub(crate) fn row(screen: &mut Screen, frame: WindowId, row: usize, content: Content) -> Result<WindowId, GuiError> {
    let area = ROWS.get(row).copied().ok_or(GuiError::TooManyChildren)?;
    screen.insert(Some(frame), Window::new(area).content(content))
}
