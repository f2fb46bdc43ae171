//! egui rendering. Everything here reads from [`crate::state::Session`] and
//! writes back only through its setters.

pub mod cards;
pub mod panels;
pub mod plot;
pub mod table;
