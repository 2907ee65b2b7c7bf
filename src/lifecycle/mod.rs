//! # Simulation Lifecycle & Orchestration
//!
//! Individual actors are simple; wiring them together and shutting them down in
//! the right order is where the care goes. This module is the conductor.
//!
//! **Key Responsibilities:**
//! 1. **Configuration** - [`SimulationConfig`] and its validation
//! 2. **Resource Creation** - one gate, one queue, one registry, one kitchen per run
//! 3. **Context Injection** - every actor receives its resources when it starts
//! 4. **Ordered Shutdown** - customers first, then idle cooks, then stations
//! 5. **Observability Setup** - [`setup_tracing`]
//!
//! ## Shutdown
//!
//! Cooks only stop when told to, and only while idle. The driver tells them after
//! the last customer has left, at which point no order can still be pending:
//!
//! ```rust,ignore
//! for customer in customers { customer.join().await?; }
//! shutdown.cancel();
//! for cook in cooks { cook.join().await?; }
//! kitchen.close().await;
//! ```

pub mod config;
pub mod simulation;
pub mod tracing;

pub use config::*;
pub use simulation::*;
pub use self::tracing::*;
