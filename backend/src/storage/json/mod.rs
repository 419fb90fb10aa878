//! # JSON Document Store
//!
//! File-based document storage: one JSON file per collection under a base
//! directory, each holding an array of documents. This mirrors the
//! collections of the original deployment (`habits`, `habit_categories`,
//! `habit_stacks`, `progress_data`) while keeping the domain layer fully
//! storage-agnostic behind the traits in [`crate::storage::traits`].
//!
//! Writes replace the whole collection file atomically (temp file + rename).
//! There is no cross-document transaction and no locking; see DESIGN.md for
//! the accepted concurrency limitations.

pub mod category_repository;
pub mod connection;
pub mod habit_repository;
pub mod progress_repository;
pub mod stack_repository;

#[cfg(test)]
pub mod test_utils;

pub use category_repository::CategoryRepository;
pub use connection::JsonConnection;
pub use habit_repository::HabitRepository;
pub use progress_repository::ProgressRepository;
pub use stack_repository::StackRepository;
