//! Rendering of a single window.
//!
//! Layout is deliberately simple: text is top-left aligned with a small
//! inset, buttons centre their label, progress bars fill from the left.
//! Everything is clipped to the window rectangle.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::window::{Content, Window};

const TEXT_INSET: i32 = 2;
const CHECK_MARK_SIZE: u32 = 6;

/// Halve every channel; used for shadowed windows.
pub fn dim(color: Rgb565) -> Rgb565 {
    Rgb565::new(color.r() / 2, color.g() / 2, color.b() / 2)
}

fn inset(corner: Point) -> Point {
    Point::new(corner.x.saturating_add(TEXT_INSET), corner.y.saturating_add(TEXT_INSET))
}

/// Paint `window` completely. Children are drawn separately.
pub fn draw_window<D>(window: &Window, focused: bool, dimmed: bool, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let area = window.rect();
    let (mut back, mut fore) = (window.get_back_color(), window.get_fore_color());
    if focused {
        core::mem::swap(&mut back, &mut fore);
    }
    if dimmed {
        back = dim(back);
        fore = dim(fore);
    }

    let mut target = target.clipped(&area);
    target.fill_solid(&area, back)?;
    let style = MonoTextStyle::new(&FONT_6X10, fore);

    match window.get_content() {
        Content::Frame => {}
        Content::Text(text) => {
            Text::with_baseline(text, inset(area.top_left), style, Baseline::Top).draw(&mut target)?;
        }
        Content::Number(value) => {
            let mut text: heapless::String<12> = heapless::String::new();
            let _ = write!(text, "{value}");
            Text::with_baseline(&text, inset(area.top_left), style, Baseline::Top).draw(&mut target)?;
        }
        Content::Progress(percent) => {
            let filled = area.size.width.saturating_mul(u32::from(percent.min(100))) / 100;
            target.fill_solid(&Rectangle::new(area.top_left, Size::new(filled, area.size.height)), fore)?;
        }
        Content::Button(label) => {
            area.into_styled(PrimitiveStyle::with_stroke(fore, 1)).draw(&mut target)?;
            let centered = TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Middle)
                .build();
            Text::with_text_style(label, area.center(), style, centered).draw(&mut target)?;
            if window.is_checked() {
                let mark = Rectangle::new(
                    Point::new(
                        area.top_left.x.saturating_add(i32::try_from(area.size.width).unwrap_or(i32::MAX)).saturating_sub(10),
                        area.center().y.saturating_sub(3),
                    ),
                    Size::new(CHECK_MARK_SIZE, CHECK_MARK_SIZE),
                );
                target.fill_solid(&mark, fore)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect;
    use platform::mocks::MockDisplay;

    #[test]
    fn test_frame_fills_background() {
        let mut display = MockDisplay::new(20, 20);
        let window = Window::new(rect(0, 0, 10, 10)).back_color(Rgb565::RED);
        draw_window(&window, false, false, &mut display).expect("infallible");
        assert_eq!(display.pixel(5, 5), Some(Rgb565::RED));
        assert_eq!(display.pixel(15, 15), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_drawing_is_clipped() {
        let mut display = MockDisplay::new(40, 40);
        let window = Window::new(rect(0, 0, 8, 8)).content(Content::Text("a long line of text"));
        draw_window(&window, false, false, &mut display).expect("infallible");
        for x in 8..40 {
            for y in 0..12 {
                assert_eq!(display.pixel(x, y), Some(Rgb565::BLACK));
            }
        }
    }

    #[test]
    fn test_progress_fills_fraction() {
        let mut display = MockDisplay::new(100, 10);
        let window = Window::new(rect(0, 0, 100, 10))
            .content(Content::Progress(50))
            .back_color(Rgb565::BLACK)
            .fore_color(Rgb565::GREEN);
        draw_window(&window, false, false, &mut display).expect("infallible");
        assert_eq!(display.pixel(10, 5), Some(Rgb565::GREEN));
        assert_eq!(display.pixel(49, 5), Some(Rgb565::GREEN));
        assert_eq!(display.pixel(60, 5), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_shadow_dims_background() {
        let mut display = MockDisplay::new(10, 10);
        let window = Window::new(rect(0, 0, 10, 10)).back_color(Rgb565::WHITE);
        draw_window(&window, false, true, &mut display).expect("infallible");
        assert_eq!(display.pixel(1, 1), Some(dim(Rgb565::WHITE)));
    }

    #[test]
    fn test_focus_swaps_colors() {
        let mut display = MockDisplay::new(60, 20);
        let window = Window::new(rect(0, 0, 60, 20))
            .content(Content::Button("OK"))
            .back_color(Rgb565::BLACK)
            .fore_color(Rgb565::WHITE);
        draw_window(&window, true, false, &mut display).expect("infallible");
        assert_eq!(display.pixel(2, 2), Some(Rgb565::WHITE));
    }
}
