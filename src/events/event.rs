use crate::model::{CookId, CustomerId, Food, FoodKind, OrderNumber};
use serde::Serialize;
use std::fmt::Display;
use std::time::Duration;

/// Start and end of one order as seen by the cook that prepared it.
///
/// Both instants are offsets from the event log's epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTiming {
    pub order_number: OrderNumber,
    pub started: Duration,
    pub finished: Duration,
}

impl OrderTiming {
    pub fn elapsed(&self) -> Duration {
        self.finished.saturating_sub(self.started)
    }
}

/// What happened, and to whom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventKind {
    SimulationStarting {
        customers: usize,
        cooks: usize,
        tables: usize,
        station_capacity: usize,
    },
    StationStarting {
        station: String,
        food: FoodKind,
        capacity: usize,
    },
    StationEnding {
        station: String,
    },
    SimulationEnding,
    CookStarting {
        cook: CookId,
    },
    CookEnding {
        cook: CookId,
        timings: Vec<OrderTiming>,
    },
    CookReceivedOrder {
        cook: CookId,
        order: Vec<Food>,
        order_number: OrderNumber,
    },
    CookStartedFood {
        cook: CookId,
        food: Food,
        order_number: OrderNumber,
    },
    CookFinishedFood {
        cook: CookId,
        food: Food,
        order_number: OrderNumber,
    },
    CookCompletedOrder {
        cook: CookId,
        order_number: OrderNumber,
    },
    StationStartingFood {
        station: String,
        food: Food,
        order_number: OrderNumber,
    },
    StationDoneFood {
        station: String,
        food: Food,
        order_number: OrderNumber,
    },
    CustomerStarting {
        customer: CustomerId,
    },
    CustomerEnteredShop {
        customer: CustomerId,
    },
    CustomerPlacedOrder {
        customer: CustomerId,
        order: Vec<Food>,
        order_number: OrderNumber,
    },
    CustomerReceivedOrder {
        customer: CustomerId,
        order: Vec<Food>,
        order_number: OrderNumber,
    },
    CustomerLeavingShop {
        customer: CustomerId,
    },
}

/// One immutable entry of the [`EventLog`](crate::events::EventLog).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationEvent {
    /// Position in the total order of the log, starting at zero.
    pub seq: u64,
    /// Offset from the log's epoch at the moment of the append.
    pub at: Duration,
    pub kind: EventKind,
}

impl SimulationEvent {
    pub fn cook(&self) -> Option<CookId> {
        match &self.kind {
            EventKind::CookStarting { cook }
            | EventKind::CookEnding { cook, .. }
            | EventKind::CookReceivedOrder { cook, .. }
            | EventKind::CookStartedFood { cook, .. }
            | EventKind::CookFinishedFood { cook, .. }
            | EventKind::CookCompletedOrder { cook, .. } => Some(*cook),
            _ => None,
        }
    }

    pub fn customer(&self) -> Option<CustomerId> {
        match &self.kind {
            EventKind::CustomerStarting { customer }
            | EventKind::CustomerEnteredShop { customer }
            | EventKind::CustomerPlacedOrder { customer, .. }
            | EventKind::CustomerReceivedOrder { customer, .. }
            | EventKind::CustomerLeavingShop { customer } => Some(*customer),
            _ => None,
        }
    }

    pub fn order_number(&self) -> Option<OrderNumber> {
        match &self.kind {
            EventKind::CookReceivedOrder { order_number, .. }
            | EventKind::CookStartedFood { order_number, .. }
            | EventKind::CookFinishedFood { order_number, .. }
            | EventKind::CookCompletedOrder { order_number, .. }
            | EventKind::StationStartingFood { order_number, .. }
            | EventKind::StationDoneFood { order_number, .. }
            | EventKind::CustomerPlacedOrder { order_number, .. }
            | EventKind::CustomerReceivedOrder { order_number, .. } => Some(*order_number),
            _ => None,
        }
    }

    pub fn food(&self) -> Option<Food> {
        match &self.kind {
            EventKind::CookStartedFood { food, .. }
            | EventKind::CookFinishedFood { food, .. }
            | EventKind::StationStartingFood { food, .. }
            | EventKind::StationDoneFood { food, .. } => Some(*food),
            _ => None,
        }
    }

    pub fn station(&self) -> Option<&str> {
        match &self.kind {
            EventKind::StationStarting { station, .. }
            | EventKind::StationEnding { station }
            | EventKind::StationStartingFood { station, .. }
            | EventKind::StationDoneFood { station, .. } => Some(station.as_str()),
            _ => None,
        }
    }

    /// The full order carried by placement, reception and delivery events.
    pub fn order(&self) -> Option<&[Food]> {
        match &self.kind {
            EventKind::CookReceivedOrder { order, .. }
            | EventKind::CustomerPlacedOrder { order, .. }
            | EventKind::CustomerReceivedOrder { order, .. } => Some(order.as_slice()),
            _ => None,
        }
    }
}

fn fmt_order(order: &[Food]) -> String {
    let items: Vec<String> = order.iter().map(|food| food.to_string()).collect();
    format!("[{}]", items.join(", "))
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::SimulationStarting {
                customers,
                cooks,
                tables,
                station_capacity,
            } => write!(
                f,
                "Starting simulation: {customers} customers, {cooks} cooks, {tables} tables, station capacity {station_capacity}"
            ),
            EventKind::StationStarting {
                station,
                food,
                capacity,
            } => write!(f, "{station} starting up for making {food} (capacity {capacity})"),
            EventKind::StationEnding { station } => write!(f, "{station} shutting down"),
            EventKind::SimulationEnding => f.write_str("Simulation ended"),
            EventKind::CookStarting { cook } => write!(f, "{cook} reporting for work"),
            EventKind::CookEnding { cook, timings } => {
                write!(f, "{cook} going home for the night after {} orders", timings.len())
            }
            EventKind::CookReceivedOrder {
                cook,
                order,
                order_number,
            } => write!(f, "{cook} starting order {order_number} {}", fmt_order(order)),
            EventKind::CookStartedFood {
                cook,
                food,
                order_number,
            } => write!(f, "{cook} preparing {food} for order {order_number}"),
            EventKind::CookFinishedFood {
                cook,
                food,
                order_number,
            } => write!(f, "{cook} finished {food} for order {order_number}"),
            EventKind::CookCompletedOrder { cook, order_number } => {
                write!(f, "{cook} completed order {order_number}")
            }
            EventKind::StationStartingFood {
                station,
                food,
                order_number,
            } => write!(f, "{station} preparing {food} for order {order_number}"),
            EventKind::StationDoneFood {
                station,
                food,
                order_number,
            } => write!(f, "{station} completed {food} for order {order_number}"),
            EventKind::CustomerStarting { customer } => write!(f, "{customer} going to the shop"),
            EventKind::CustomerEnteredShop { customer } => write!(f, "{customer} entered the shop"),
            EventKind::CustomerPlacedOrder {
                customer,
                order,
                order_number,
            } => write!(f, "{customer} placing order {order_number} {}", fmt_order(order)),
            EventKind::CustomerReceivedOrder {
                customer,
                order,
                order_number,
            } => write!(f, "{customer} received order {order_number} {}", fmt_order(order)),
            EventKind::CustomerLeavingShop { customer } => write!(f, "{customer} leaving the shop"),
        }
    }
}

impl Display for SimulationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:>5}] {}", self.seq, self.kind)
    }
}
