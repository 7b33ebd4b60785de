//! Hardware Abstraction Layer (HAL) for the Buddy GUI
//!
//! This crate provides the trait seams between the windowing core and the
//! board it runs on, so the core can be developed and tested without
//! physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Window / screen / dialog core (gui crate)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (LCD driver, encoder, buzzer, config store)
//! ```
//!
//! # Abstractions
//!
//! - [`DisplayDriver`] - LCD surface (an `embedded-graphics` draw target)
//! - [`InputDevice`] - Knob encoder and buttons
//! - [`Sound`] - Buzzer feedback
//! - [`Clock`] - Monotonic millisecond tick
//! - [`UiPrefs`] - Persisted user-interface preferences
//! - [`FaultIo`] - Watchdog access for the fatal-error path
//!
//! # Features
//!
//! - `std`: Enable standard library support and the [`mocks`] module
//! - `defmt`: Enable defmt logging derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod clock;
pub mod config;
pub mod display;
pub mod fault;
pub mod input;
pub mod sound;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export main high-level traits
pub use clock::{Clock, SystemClock};
pub use config::{FileSort, UiPrefs};
pub use display::DisplayDriver;
pub use fault::FaultIo;
pub use input::{Button, InputDevice, InputEvent};
pub use sound::{Sound, SoundKind};
