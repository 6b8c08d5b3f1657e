//! HandSwitch library: portable gesture-to-command engine.
//!
//! Turns a stream of 21-point hand landmark frames into smart-home commands.
//! Each frame is classified finger by finger, matched against an ordered
//! gesture table, and debounced so a held gesture is sent once. This crate
//! has no platform dependencies and is testable on any host with
//! `cargo test`. Platform binaries (the ESP-IDF bridge) are thin consumers
//! that supply landmark frames and a [`engine::CommandSink`].
//!
//! Per frame: `landmark` → `finger` → `gesture` → `debounce` → sink, driven
//! by [`engine::GestureEngine`]. `protocol` and `comm` decode detector output
//! from NDJSON byte streams.

#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod comm;
pub mod config;
pub mod debounce;
pub mod defaults;
pub mod engine;
pub mod finger;
pub mod gesture;
pub mod landmark;
pub mod protocol;

pub use command::Command;
pub use engine::{CommandSink, GestureEngine};
pub use landmark::{HandFrame, LandmarkFrame};
