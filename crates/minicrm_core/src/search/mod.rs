//! Lead query engine.
//!
//! # Responsibility
//! - Expose the pure filter + sort pipeline over lead collections.
//! - Keep query input types closed so every field is checked at compile time.

pub mod query;
