//! # Trace Audit
//!
//! Replays a finished event log and reports every ordering or capacity rule it
//! breaks. A correct run produces no violations, whatever the interleaving.
//!
//! The audit only looks at the trace. Because the gate, the queue and the
//! stations record their events while still holding the resource they describe,
//! counting events in sequence order gives the true occupancy at every point.

use crate::events::{EventKind, SimulationEvent};
use crate::model::{CustomerId, FoodKind, OrderNumber};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("event {seq}: {seated} customers seated at {tables} tables")]
    SeatingExceeded { seq: u64, seated: usize, tables: usize },

    #[error("event {seq}: {station} preparing {in_flight} items with capacity {capacity}")]
    StationOverCapacity {
        seq: u64,
        station: String,
        in_flight: usize,
        capacity: usize,
    },

    #[error("event {seq}: {customer} placed an order without entering the shop")]
    PlacedBeforeEntering { seq: u64, customer: CustomerId },

    #[error("event {seq}: order {order_number}: {stage} before {prerequisite}")]
    OutOfOrder {
        seq: u64,
        order_number: OrderNumber,
        stage: &'static str,
        prerequisite: &'static str,
    },

    #[error("event {seq}: a cook finished more {kind} than the stations produced")]
    FinishedBeforeDone { seq: u64, kind: FoodKind },

    #[error("event {seq}: {customer} left without receiving an order")]
    LeftWithoutOrder { seq: u64, customer: CustomerId },

    #[error("event {seq}: order {order_number}: {stage} more than once")]
    Repeated {
        seq: u64,
        order_number: OrderNumber,
        stage: &'static str,
    },

    #[error("{customer} never left the shop")]
    CustomerNeverLeft { customer: CustomerId },
}

/// Per-kind item counters of one order, by stage.
#[derive(Debug, Default, Clone, Copy)]
struct ItemStages {
    started: usize,
    station_starting: usize,
    station_done: usize,
    finished: usize,
}

#[derive(Debug, Default)]
struct OrderProgress {
    size: usize,
    received: bool,
    completed: bool,
    delivered: bool,
    items: HashMap<FoodKind, ItemStages>,
}

impl OrderProgress {
    fn finished_items(&self) -> usize {
        self.items.values().map(|s| s.finished).sum()
    }

    fn has_open_items(&self) -> bool {
        self.items.values().any(|s| s.finished < s.started)
    }
}

/// Checks an event trace against the shop's seating and station limits and the
/// lifecycle every order must follow.
#[derive(Debug, Clone, Copy)]
pub struct TraceAudit {
    tables: usize,
    station_capacity: usize,
}

impl TraceAudit {
    pub fn new(tables: usize, station_capacity: usize) -> Self {
        Self {
            tables,
            station_capacity,
        }
    }

    /// All violations, in trace order. Empty for a correct run.
    pub fn check(&self, events: &[SimulationEvent]) -> Vec<Violation> {
        let mut violations = Vec::new();

        let mut seated = 0usize;
        let mut entered: BTreeSet<CustomerId> = BTreeSet::new();
        let mut started: BTreeSet<CustomerId> = BTreeSet::new();
        let mut left: BTreeSet<CustomerId> = BTreeSet::new();
        let mut order_of: HashMap<CustomerId, OrderNumber> = HashMap::new();
        let mut orders: HashMap<OrderNumber, OrderProgress> = HashMap::new();
        let mut in_flight: HashMap<String, usize> = HashMap::new();
        let mut done_by_kind: HashMap<FoodKind, usize> = HashMap::new();
        let mut finished_by_kind: HashMap<FoodKind, usize> = HashMap::new();

        for event in events {
            let seq = event.seq;
            let out_of_order = |order_number, stage, prerequisite| Violation::OutOfOrder {
                seq,
                order_number,
                stage,
                prerequisite,
            };

            match &event.kind {
                EventKind::CustomerStarting { customer } => {
                    started.insert(*customer);
                }
                EventKind::CustomerEnteredShop { customer } => {
                    entered.insert(*customer);
                    seated += 1;
                    if seated > self.tables {
                        violations.push(Violation::SeatingExceeded {
                            seq,
                            seated,
                            tables: self.tables,
                        });
                    }
                }
                EventKind::CustomerPlacedOrder {
                    customer,
                    order,
                    order_number,
                } => {
                    if !entered.contains(customer) {
                        violations.push(Violation::PlacedBeforeEntering {
                            seq,
                            customer: *customer,
                        });
                    }
                    order_of.insert(*customer, *order_number);
                    orders.entry(*order_number).or_default().size = order.len();
                }
                EventKind::CookReceivedOrder { order_number, .. } => match orders.get_mut(order_number) {
                    Some(progress) if progress.received => violations.push(Violation::Repeated {
                        seq,
                        order_number: *order_number,
                        stage: "cook received order",
                    }),
                    Some(progress) => progress.received = true,
                    None => violations.push(out_of_order(*order_number, "cook received order", "order placed")),
                },
                EventKind::CookStartedFood {
                    food, order_number, ..
                } => {
                    let progress = orders.entry(*order_number).or_default();
                    if !progress.received || progress.completed {
                        violations.push(out_of_order(*order_number, "cook started food", "cook received order"));
                    }
                    progress.items.entry(food.kind).or_default().started += 1;
                }
                EventKind::StationStartingFood {
                    station,
                    food,
                    order_number,
                } => {
                    let stages = orders
                        .entry(*order_number)
                        .or_default()
                        .items
                        .entry(food.kind)
                        .or_default();
                    if stages.station_starting >= stages.started {
                        violations.push(out_of_order(*order_number, "station started food", "cook started food"));
                    }
                    stages.station_starting += 1;

                    let count = in_flight.entry(station.clone()).or_default();
                    *count += 1;
                    if *count > self.station_capacity {
                        violations.push(Violation::StationOverCapacity {
                            seq,
                            station: station.clone(),
                            in_flight: *count,
                            capacity: self.station_capacity,
                        });
                    }
                }
                EventKind::StationDoneFood {
                    station,
                    food,
                    order_number,
                } => {
                    let stages = orders
                        .entry(*order_number)
                        .or_default()
                        .items
                        .entry(food.kind)
                        .or_default();
                    if stages.station_done >= stages.station_starting {
                        violations.push(out_of_order(*order_number, "station finished food", "station started food"));
                    }
                    stages.station_done += 1;

                    let count = in_flight.entry(station.clone()).or_default();
                    *count = count.saturating_sub(1);
                    *done_by_kind.entry(food.kind).or_default() += 1;
                }
                EventKind::CookFinishedFood {
                    food, order_number, ..
                } => {
                    let progress = orders.entry(*order_number).or_default();
                    if progress.completed {
                        violations.push(out_of_order(*order_number, "cook finished food", "order still open"));
                    }
                    let stages = progress.items.entry(food.kind).or_default();
                    if stages.finished >= stages.station_done {
                        violations.push(out_of_order(*order_number, "cook finished food", "station finished food"));
                    }
                    stages.finished += 1;

                    let finished = finished_by_kind.entry(food.kind).or_default();
                    *finished += 1;
                    if *finished > done_by_kind.get(&food.kind).copied().unwrap_or(0) {
                        violations.push(Violation::FinishedBeforeDone { seq, kind: food.kind });
                    }
                }
                EventKind::CookCompletedOrder { order_number, .. } => {
                    let progress = orders.entry(*order_number).or_default();
                    if progress.completed {
                        violations.push(Violation::Repeated {
                            seq,
                            order_number: *order_number,
                            stage: "cook completed order",
                        });
                    }
                    if !progress.received {
                        violations.push(out_of_order(*order_number, "cook completed order", "cook received order"));
                    }
                    if progress.has_open_items() || progress.finished_items() != progress.size {
                        violations.push(out_of_order(*order_number, "cook completed order", "cook finished food"));
                    }
                    progress.completed = true;
                }
                EventKind::CustomerReceivedOrder { order_number, .. } => {
                    let progress = orders.entry(*order_number).or_default();
                    if !progress.completed {
                        violations.push(out_of_order(*order_number, "customer received order", "cook completed order"));
                    }
                    progress.delivered = true;
                }
                EventKind::CustomerLeavingShop { customer } => {
                    let delivered = order_of
                        .get(customer)
                        .and_then(|n| orders.get(n))
                        .is_some_and(|p| p.delivered);
                    if !delivered {
                        violations.push(Violation::LeftWithoutOrder {
                            seq,
                            customer: *customer,
                        });
                    }
                    left.insert(*customer);
                    seated = seated.saturating_sub(1);
                }
                _ => {}
            }
        }

        violations.extend(
            started
                .difference(&left)
                .map(|customer| Violation::CustomerNeverLeft { customer: *customer }),
        );
        violations
    }
}
