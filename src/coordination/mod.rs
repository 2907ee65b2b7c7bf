//! Shared resources that actors contend for.
//!
//! Each resource owns its own lock and wake-up mechanism; none of them holds a
//! lock across an `.await` or while waiting on another resource.
//!
//! - [`AdmissionGate`] - bounded seating, FIFO-fair
//! - [`OrderQueue`] - the single FIFO from customers to cooks
//! - [`CompletionRegistry`] - per-order "ready" flags customers block on

pub mod gate;
pub mod queue;
pub mod registry;

pub use gate::*;
pub use queue::*;
pub use registry::*;
