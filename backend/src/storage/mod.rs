//! Storage layer: trait contracts plus the JSON document-store backend.

pub mod json;
pub mod traits;

pub use traits::{CategoryStorage, HabitStackStorage, HabitStorage, ProgressStorage};
