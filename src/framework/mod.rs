//! Building blocks shared by every actor in the shop.
//!
//! # Main Components
//!
//! - [`Actor`] - Trait that cooks and customers implement to run as tasks
//! - [`spawn`] / [`ActorHandle`] - Start an actor with its context and join it later
//! - [`ShopError`] - Common error type

pub mod actor;
pub mod error;

pub use actor::*;
pub use error::*;
