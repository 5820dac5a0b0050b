//! Command/event bridge between the egui thread and the tokio worker
//! that owns the session controller.

pub mod commands;
pub mod runtime;
