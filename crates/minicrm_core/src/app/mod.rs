//! Application state coordination between UI callers and the core.
//!
//! # Responsibility
//! - Hold the single UI-visible state slice.
//! - Expose async action entry points that call the service and fold results
//!   back into state.

pub mod coordinator;
pub mod state;
