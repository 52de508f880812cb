//! Core types for activity statistics: the cell and table model, the
//! error type, value coercion, console formatting and CLI settings.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{ActivityError, Result};
