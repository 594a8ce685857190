//! Undo/redo support for editing sessions.

pub mod undo;
