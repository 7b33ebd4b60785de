//! Panel driver abstraction

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

/// The 240x320 RGB565 LCD.
///
/// Drawing goes through [`DrawTarget`]; `flush` pushes whatever the driver
/// buffered to the panel.
pub trait DisplayDriver: DrawTarget<Color = Rgb565> {
    /// Error reported by `flush`
    type DriverError: core::fmt::Debug;

    /// Push buffered drawing to the panel.
    fn flush(&mut self) -> Result<(), Self::DriverError>;

    /// Backlight level, 0 is off
    fn set_backlight(&mut self, level: u8);

    /// Panel size in pixels
    fn dimensions(&self) -> Size {
        self.bounding_box().size
    }
}
