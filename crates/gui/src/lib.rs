//! Window compositing, screen stack and FSM-driven dialog core.
//!
//! # Architecture
//!
//! ```text
//! print-control firmware ── FsmCommand ──▶ DialogHandler ──▶ overlay dialog
//!                                               │                 │
//!                                               ▼                 ▼
//! InputDevice ──▶ Screens::loop_once ──▶ Screen (normal < dialog < strong < popup)
//!                        │                        │
//!                        ▼                        ▼
//!                   Navigator (32)           WindowPool ──▶ DrawTarget
//! ```
//!
//! - [`window`] - window record, flags and the generational [`WindowPool`]
//! - [`frame`] - child lists, focus navigation and invalidation over the pool
//! - [`screen`] - the four-tier registration and z-order policy
//! - [`inplace`] / [`screen_factory`] - allocation-free in-place construction
//! - [`navigation`] / [`screens`] - creator history and the per-tick loop
//! - [`fsm`] / [`dialogs`] - the firmware conversation protocol and its dialogs
//! - [`gui`] - façade tying screens and dialogs together
//!
//! This crate is `no_std` by default; it only uses `core` + `heapless`.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

#[macro_use]
mod log;

pub mod board;
pub mod config;
pub mod dialogs;
pub mod draw;
pub mod error;
pub mod event;
pub mod frame;
pub mod fsm;
pub mod geometry;
pub mod gui;
pub mod inplace;
pub mod navigation;
pub mod screen;
pub mod screen_factory;
pub mod screens;
pub mod window;

pub use board::Board;
pub use dialogs::{DialogFactory, DialogHandler, FsmHandler, HandlerKind};
pub use error::GuiError;
pub use event::{EventResult, GuiEvent};
pub use fsm::{BaseData, ClientFsm, FsmCommand, FsmQueue, PhaseData, PhaseResponse, Response};
pub use gui::Gui;
pub use navigation::Navigator;
pub use screen::Screen;
pub use screen_factory::{CreateScreen, ScreenBody, ScreenCreator};
pub use screens::{Cx, Screens};
pub use window::{Content, WinType, Window, WindowFlags, WindowId, WindowPool};
