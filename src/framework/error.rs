//! # Shop Errors
//!
//! This module defines the common error type used by every coordination
//! primitive, actor and the simulation driver. Cancellation of an idle cook is
//! not an error and never shows up here.

use crate::model::{FoodKind, OrderNumber};

/// Errors that can occur while running the shop.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ShopError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Station {station} prepares {expected}, not {actual}")]
    WrongStation {
        station: String,
        expected: FoodKind,
        actual: FoodKind,
    },
    #[error("Order {0} was already completed")]
    OrderAlreadyCompleted(OrderNumber),
    #[error("Order {0} is not registered")]
    UnknownOrder(OrderNumber),
    #[error("Order {0} is registered twice")]
    DuplicateOrder(OrderNumber),
    #[error("Station {0} closed while preparing")]
    StationClosed(String),
    #[error("Order {0} was abandoned by a failing cook")]
    Abandoned(OrderNumber),
    #[error("Seating closed")]
    SeatingClosed,
    #[error("Actor {actor} failed: {reason}")]
    ActorFailed { actor: String, reason: String },
}
