//! canno_engine - formula language for the Canno spreadsheet.

pub mod builtins;
pub mod engine;
