//! Compile-time capacities and default layout.
//!
//! Every container in the core is bounded by one of these constants; there
//! is no heap behind the window system.

use embedded_graphics::primitives::Rectangle;

use crate::geometry::rect;

/// Windows alive on one screen, including the screen's own root frame.
pub const MAX_WINDOWS: usize = 64;

/// Direct children of a single frame.
pub const MAX_CHILDREN: usize = 16;

/// Top-level windows per tier (normal, dialog, strong dialog, popup).
pub const TIER_CAPACITY: usize = 32;

/// Previous screens the navigator remembers for back-navigation.
pub const SCREEN_STACK_DEPTH: usize = 32;

/// Bytes reserved for the active screen body.
pub const SCREEN_ARENA_SIZE: usize = 256;

/// Bytes reserved for the active FSM dialog body.
pub const DIALOG_ARENA_SIZE: usize = 128;

/// Alignment of both in-place arenas.
pub const ARENA_ALIGN: usize = 8;

/// Phase responses waiting for the firmware to pick them up.
pub const RESPONSE_QUEUE_DEPTH: usize = 4;

/// Input events consumed per loop tick; the rest wait for the next tick.
pub const INPUT_EVENTS_PER_TICK: usize = 8;

/// Full display area.
pub const SCREEN_RECT: Rectangle = rect(0, 0, platform::config::DISPLAY_WIDTH, platform::config::DISPLAY_HEIGHT);

/// Header strip kept visible above dialogs.
pub const HEADER_HEIGHT: u32 = 22;

/// Area used by FSM dialogs: everything below the header.
pub const DIALOG_RECT: Rectangle = rect(0, 22, 240, 298);

/// Area used by toast-style popups: a strip at the bottom of the display.
pub const POPUP_RECT: Rectangle = rect(0, 280, 240, 40);
