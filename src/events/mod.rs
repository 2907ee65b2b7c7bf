//! The audit trail of a simulation run.
//!
//! - [`EventLog`] - thread-safe, append-only log shared by every actor
//! - [`SimulationEvent`] / [`EventKind`] - the immutable records it holds

pub mod event;
pub mod event_log;

pub use event::*;
pub use event_log::*;
