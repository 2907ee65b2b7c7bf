//! Pure value types shared by every actor and coordination primitive.
//!
//! Nothing in here blocks or locks. Actors and resources exchange these values,
//! and the [`EventLog`](crate::events::EventLog) records them.

pub mod food;
pub mod ids;
pub mod order;

pub use food::*;
pub use ids::*;
pub use order::*;
