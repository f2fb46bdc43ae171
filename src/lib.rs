//! Reactive Palmer penguins dashboard.
//!
//! The binary in `main.rs` only wires [`app::PenguinsApp`] into eframe; the
//! data layer, the recomputation graph and the session are usable without a
//! window.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod reactive;
pub mod state;
pub mod ui;
