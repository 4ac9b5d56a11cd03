//! # Comping
//!
//! Terminal drill runner for jazz harmony: chord spelling, scales, intervals,
//! guide tones, resolutions and smooth voicings. All music theory lives in
//! `comping-core`; this crate only reads answers and prints results.
//!
//! ## Modules
//!
//! - `answer`: parses typed answers into the shape the current question expects.
//! - `commands`: the REPL command registry (`new`, `hint`, `skip`, `show`, `catalog`).
//! - `display`: text rendering of prompts, hints and verdicts.
//! - `logger`: colored stderr logger behind the `log` facade.
//! - `repl`: the Read-Eval-Print Loop itself.

pub mod answer;
pub mod commands;
pub mod display;
pub mod logger;
pub mod repl;

// Re-export the engine for convenience
pub use comping_core;
