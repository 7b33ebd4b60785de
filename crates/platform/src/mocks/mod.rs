//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests.

#![allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // host-only test doubles

use core::cell::Cell;
use std::vec::Vec;

use crate::*;
use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

/// Mock display implementation backed by a full framebuffer
pub struct MockDisplay {
    width: u32,
    height: u32,
    flush_count: usize,
    pixels_drawn: usize,
    framebuffer: Vec<Rgb565>,
    backlight: u8,
}

impl MockDisplay {
    /// Create new mock display, cleared to black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            flush_count: 0,
            pixels_drawn: 0,
            framebuffer: std::vec![Rgb565::BLACK; (width * height) as usize],
            backlight: 0,
        }
    }

    /// Get flush count
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    /// Number of in-bounds pixels written since creation or the last reset
    pub fn pixels_drawn(&self) -> usize {
        self.pixels_drawn
    }

    /// Reset the drawn-pixel counter
    pub fn reset_counter(&mut self) {
        self.pixels_drawn = 0;
    }

    /// Colour at `(x, y)`, or `None` outside the panel
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.framebuffer.get((y * self.width + x) as usize).copied()
    }

    /// Current backlight level
    pub fn backlight(&self) -> u8 {
        self.backlight
    }
}

impl DrawTarget for MockDisplay {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x < self.width && y < self.height {
                self.framebuffer[(y * self.width + x) as usize] = color;
                self.pixels_drawn += 1;
            }
        }
        Ok(())
    }
}

impl OriginDimensions for MockDisplay {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DisplayDriver for MockDisplay {
    type DriverError = core::convert::Infallible;

    fn flush(&mut self) -> Result<(), Self::DriverError> {
        self.flush_count += 1;
        Ok(())
    }

    fn set_backlight(&mut self, level: u8) {
        self.backlight = level;
    }
}

/// Mock input device
pub struct MockInput {
    events: heapless::Deque<InputEvent, 16>,
}

impl MockInput {
    /// Create new mock input
    pub fn new() -> Self {
        Self {
            events: heapless::Deque::new(),
        }
    }

    /// Add event to queue
    pub fn add_event(&mut self, event: InputEvent) -> Result<(), InputEvent> {
        self.events.push_back(event)
    }

    /// Number of events not yet consumed
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for MockInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDevice for MockInput {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}

/// Manually advanced clock
#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<u32>,
}

impl MockClock {
    /// Create a clock at `start_ms`
    pub fn new(start_ms: u32) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward, wrapping like the hardware tick
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    /// Jump to an absolute tick
    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

/// Sound sink that records every request
#[derive(Debug, Default)]
pub struct MockSound {
    played: Vec<SoundKind>,
}

impl MockSound {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything played so far, oldest first
    pub fn played(&self) -> &[SoundKind] {
        &self.played
    }

    /// How many times `kind` was played
    pub fn count(&self, kind: SoundKind) -> usize {
        self.played.iter().filter(|k| **k == kind).count()
    }
}

impl Sound for MockSound {
    fn play(&mut self, kind: SoundKind) {
        self.played.push(kind);
    }
}

/// Preferences held in RAM, with a write counter
#[derive(Debug)]
pub struct MemoryPrefs {
    menu_timeout: bool,
    menu_timeout_ms: u32,
    file_sort: FileSort,
    writes: usize,
}

impl MemoryPrefs {
    /// Defaults: menu timeout enabled, sort by time
    pub fn new() -> Self {
        Self {
            menu_timeout: true,
            menu_timeout_ms: config::DEFAULT_MENU_TIMEOUT_MS,
            file_sort: FileSort::default(),
            writes: 0,
        }
    }

    /// Override the idle threshold
    pub fn with_timeout_ms(mut self, ms: u32) -> Self {
        self.menu_timeout_ms = ms;
        self
    }

    /// Number of setter calls
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Default for MemoryPrefs {
    fn default() -> Self {
        Self::new()
    }
}

impl UiPrefs for MemoryPrefs {
    fn menu_timeout_enabled(&self) -> bool {
        self.menu_timeout
    }

    fn set_menu_timeout_enabled(&mut self, enabled: bool) {
        self.menu_timeout = enabled;
        self.writes += 1;
    }

    fn menu_timeout_ms(&self) -> u32 {
        self.menu_timeout_ms
    }

    fn file_sort(&self) -> FileSort {
        self.file_sort
    }

    fn set_file_sort(&mut self, sort: FileSort) {
        self.file_sort = sort;
        self.writes += 1;
    }
}

/// Fault I/O recorder
#[derive(Debug, Default)]
pub struct MockFaultIo {
    /// Watchdog reloads seen
    pub refreshes: usize,
    /// Reset requests seen
    pub resets: usize,
}

impl FaultIo for MockFaultIo {
    fn refresh_watchdog(&mut self) {
        self.refreshes += 1;
    }

    fn system_reset(&mut self) {
        self.resets += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_display_records_pixels() {
        let mut display = MockDisplay::new(40, 30);
        display
            .fill_solid(
                &embedded_graphics::primitives::Rectangle::new(Point::new(2, 2), Size::new(4, 4)),
                Rgb565::RED,
            )
            .unwrap();
        assert_eq!(display.pixels_drawn(), 16);
        assert_eq!(display.pixel(3, 3), Some(Rgb565::RED));
        assert_eq!(display.pixel(0, 0), Some(Rgb565::BLACK));
        assert_eq!(display.pixel(40, 0), None);

        display.flush().unwrap();
        assert_eq!(display.flush_count(), 1);
    }

    #[test]
    fn test_mock_input() {
        let mut input = MockInput::new();

        input.add_event(InputEvent::ButtonPress(Button::Knob)).unwrap();
        input.add_event(InputEvent::EncoderTurn(2)).unwrap();

        assert_eq!(input.poll_event(), Some(InputEvent::ButtonPress(Button::Knob)));
        assert_eq!(input.poll_event(), Some(InputEvent::EncoderTurn(2)));
        assert_eq!(input.poll_event(), None);
    }

    #[test]
    fn test_mock_clock_wraps() {
        let clock = MockClock::new(u32::MAX - 5);
        clock.advance(10);
        assert_eq!(clock.now_ms(), 4);
    }

    #[test]
    fn test_memory_prefs_counts_writes() {
        let mut prefs = MemoryPrefs::new();
        assert!(prefs.menu_timeout_enabled());
        prefs.set_menu_timeout_enabled(false);
        prefs.set_file_sort(FileSort::ByName);
        assert!(!prefs.menu_timeout_enabled());
        assert_eq!(prefs.file_sort(), FileSort::ByName);
        assert_eq!(prefs.writes(), 2);
    }

    #[test]
    fn test_mock_sound_counts() {
        let mut sound = MockSound::new();
        sound.play(SoundKind::EndOfList);
        sound.play(SoundKind::Click);
        sound.play(SoundKind::EndOfList);
        assert_eq!(sound.count(SoundKind::EndOfList), 2);
        assert_eq!(sound.played().first(), Some(&SoundKind::EndOfList));
    }
}
