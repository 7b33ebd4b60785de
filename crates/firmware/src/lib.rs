//! Buddy display firmware
//!
//! Application glue around the `gui` core: the concrete screens, the FSM
//! dispatch table, the bridge the print-control task talks through and the
//! fatal-error path.
//!
//! # Architecture
//!
//! This firmware follows a layered architecture:
//!
//! ```text
//! print-control task ── fsm_create / fsm_change / fsm_destroy ──▶ FsmBridge
//!                                                                   │
//! Application Layer (App, screens, fsm_table)  ◀── poll ────────────┘
//!         ↓
//! Window core (gui crate)
//!         ↓
//! Platform HAL (platform crate)
//!
//! fault handlers ──▶ bsod (embedded-graphics only, never the window core)
//! ```
//!
//! # Features
//!
//! - `hardware` - Cortex-M build: exception hooks, defmt logging
//! - `std` - Host build (simulator, tests)
//! - `tracing` - Log through `tracing` on the host

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod app;
pub mod bsod;
pub mod fsm_bridge;
pub mod fsm_table;
pub mod screens;

#[cfg(feature = "hardware")]
pub mod exception_handlers;

pub use app::App;
pub use bsod::{FatalMessage, FaultLoop};
pub use fsm_bridge::{fsm_change, fsm_create, fsm_destroy, FsmBridge, FSM_BRIDGE};
pub use fsm_table::fsm_table;
