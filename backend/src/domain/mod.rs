//! # Domain Module
//!
//! Business logic for the habit stack tracker: the habit catalog, categories,
//! habit stacks, and per-stack progress statistics. Everything here operates
//! through the storage traits and knows nothing about HTTP.
//!
//! The only non-trivial state transition lives in
//! [`stack_service::StackService::toggle_habit_completion`]: flipping one
//! entry's completion flag, deriving stack-level completion, and propagating
//! streak/completion-rate consequences into the stack's progress record.

pub mod category_service;
pub mod commands;
pub mod habit_service;
pub mod models;
pub mod progress_service;
pub mod stack_service;

pub use category_service::CategoryService;
pub use habit_service::HabitService;
pub use progress_service::ProgressService;
pub use stack_service::StackService;
