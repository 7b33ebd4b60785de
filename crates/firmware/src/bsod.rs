//! Fatal-error screen.
//!
//! Everything here must work with interrupts disabled, the scheduler
//! stopped and the window system in an unknown state. It therefore never
//! touches `gui`: it draws straight to the panel with embedded-graphics and
//! then parks in [`FaultLoop`], which only feeds the watchdog and samples
//! the reset button.
//!
//! Normal code escalates through [`raise`] (or the [`bsod!`] macro), which
//! hands the message to the handler installed with [`set_fatal_handler`].
//! The fault handlers call [`screen_hard_fault`] and
//! [`stack_overflow_hook`] directly.

use core::cell::Cell;
use core::fmt::{self, Write};

use critical_section::Mutex;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::digital::InputPin;
use gui::GuiError;
use heapless::String;
use platform::{DisplayDriver, FaultIo};

/// Longest message kept; the rest is cut off.
pub const FATAL_TEXT_LEN: usize = 128;

const BACKGROUND: Rgb565 = Rgb565::new(0, 0, 20);
const MARGIN: i32 = 8;
const LINE_HEIGHT: i32 = 12;
const LINE_CHARS: usize = 37;
const TEXT_TOP: i32 = 40;
const TEXT_BOTTOM: i32 = 250;
const LOCATION_Y: i32 = 274;
const HINT_Y: i32 = 298;

/// What went wrong and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalMessage {
    text: String<FATAL_TEXT_LEN>,
    file: &'static str,
    line: u32,
}

// Keeps as much of an over-long message as fits.
struct Truncate<'a>(&'a mut String<FATAL_TEXT_LEN>);

impl Write for Truncate<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

impl FatalMessage {
    /// Format a message. Text beyond [`FATAL_TEXT_LEN`] bytes is dropped.
    pub fn new(args: fmt::Arguments<'_>, file: &'static str, line: u32) -> Self {
        let mut text = String::new();
        let _ = Truncate(&mut text).write_fmt(args);
        Self { text, file, line }
    }

    /// Message for an error the GUI core could not recover from.
    pub fn from_error(err: GuiError, file: &'static str, line: u32) -> Self {
        Self::new(format_args!("GUI error: {err}"), file, line)
    }

    /// Message text, possibly truncated.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source file that raised the error.
    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for FatalMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.text, self.file, self.line)
    }
}

/// Raise a fatal error with a formatted message and the caller's location.
///
/// ```rust,ignore
/// bsod!("Error missing dialog Ctor for {}", fsm.as_str());
/// ```
#[macro_export]
macro_rules! bsod {
    ($($arg:tt)*) => {
        $crate::bsod::raise(&$crate::bsod::FatalMessage::new(format_args!($($arg)*), file!(), line!()))
    };
}

// Split `text` into display lines of at most LINE_CHARS characters.
fn lines(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = text;
    core::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let cut = rest.char_indices().nth(LINE_CHARS).map_or(rest.len(), |(i, _)| i);
        let (line, tail) = rest.split_at(cut);
        rest = tail;
        Some(line)
    })
}

/// Draw the fatal screen for `msg`.
pub fn render_fatal<D>(target: &mut D, msg: &FatalMessage) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(BACKGROUND)?;
    let style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
    let draw = |text: &str, y: i32, target: &mut D| {
        Text::with_baseline(text, Point::new(MARGIN, y), style, Baseline::Top)
            .draw(target)
            .map(|_| ())
    };

    draw(platform::config::APP_NAME, MARGIN, target)?;
    draw("A fatal error occurred", MARGIN.saturating_add(LINE_HEIGHT), target)?;

    let mut y = TEXT_TOP;
    for line in lines(msg.text()) {
        if y > TEXT_BOTTOM {
            break;
        }
        draw(line, y, target)?;
        y = y.saturating_add(LINE_HEIGHT);
    }

    let mut location: String<64> = String::new();
    let _ = write!(location, "{}:{}", msg.file(), msg.line());
    draw(&location, LOCATION_Y, target)?;
    draw("Press RESET to restart", HINT_Y, target)
}

/// What [`raise`] hands the message to. Installed once at startup.
pub type FatalHandler = fn(&FatalMessage) -> !;

static HANDLER: Mutex<Cell<Option<FatalHandler>>> = Mutex::new(Cell::new(None));

/// Install the function that shows fatal errors.
pub fn set_fatal_handler(handler: FatalHandler) {
    critical_section::with(|cs| HANDLER.borrow(cs).set(Some(handler)));
}

/// Stop normal operation and show `msg`.
///
/// Without an installed handler this spins until the watchdog resets the
/// board.
pub fn raise(msg: &FatalMessage) -> ! {
    #[cfg(feature = "defmt")]
    defmt::error!("fatal: {} ({}:{})", msg.text(), msg.file(), msg.line());
    #[cfg(feature = "tracing")]
    tracing::error!("fatal: {}", msg);

    match critical_section::with(|cs| HANDLER.borrow(cs).get()) {
        Some(handler) => handler(msg),
        None => loop {
            core::hint::spin_loop();
        },
    }
}

/// The loop a fatal screen ends in.
///
/// Keeps the watchdog fed so the message stays up, and resets the board
/// once the reset button (active low) is pressed.
pub struct FaultLoop<IO, P> {
    io: IO,
    reset: P,
}

impl<IO: FaultIo, P: InputPin> FaultLoop<IO, P> {
    /// `reset` reads low while the button is pressed.
    pub fn new(io: IO, reset: P) -> Self {
        Self { io, reset }
    }

    /// Feed the watchdog, then sample the button. Returns `true` when a
    /// reset was requested. A pin read error counts as not pressed.
    pub fn poll_once(&mut self) -> bool {
        self.io.refresh_watchdog();
        let pressed = self.reset.is_low().unwrap_or(false);
        if pressed {
            self.io.system_reset();
        }
        pressed
    }

    /// Poll until the board resets.
    pub fn run(mut self) -> ! {
        loop {
            self.poll_once();
        }
    }

    pub fn into_parts(self) -> (IO, P) {
        (self.io, self.reset)
    }
}

/// Draw `msg` and park in the fault loop.
pub fn fatal_screen<D, IO, P>(display: &mut D, msg: &FatalMessage, io: IO, reset: P) -> !
where
    D: DisplayDriver,
    IO: FaultIo,
    P: InputPin,
{
    display.set_backlight(u8::MAX);
    // Nothing to fall back to if the panel fails; the loop still runs.
    let _ = render_fatal(display, msg);
    let _ = display.flush();
    FaultLoop::new(io, reset).run()
}

/// Entry point for the hard fault handler. `pc` is the stacked program
/// counter.
pub fn screen_hard_fault<D, IO, P>(display: &mut D, pc: u32, io: IO, reset: P) -> !
where
    D: DisplayDriver,
    IO: FaultIo,
    P: InputPin,
{
    let msg = FatalMessage::new(format_args!("Hard fault at PC 0x{pc:08X}"), file!(), line!());
    fatal_screen(display, &msg, io, reset)
}

/// Entry point for the stack overflow check of task `task`.
pub fn stack_overflow_hook<D, IO, P>(display: &mut D, task: &str, io: IO, reset: P) -> !
where
    D: DisplayDriver,
    IO: FaultIo,
    P: InputPin,
{
    let msg = FatalMessage::new(format_args!("Stack overflow in task {task}"), file!(), line!());
    fatal_screen(display, &msg, io, reset)
}
