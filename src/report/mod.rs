//! # Reporting
//!
//! Read-only statistics over a finished event log. Nothing here touches a live
//! simulation; every function takes the trace returned by
//! [`CoffeeShop::run`](crate::lifecycle::CoffeeShop::run).

use crate::events::{EventKind, SimulationEvent};
use crate::model::{CookId, Food, FoodKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Orders each cook received, in the order it received them.
pub fn orders_by_cook(events: &[SimulationEvent]) -> BTreeMap<CookId, Vec<Vec<Food>>> {
    let mut by_cook: BTreeMap<CookId, Vec<Vec<Food>>> = BTreeMap::new();
    for event in events {
        if let EventKind::CookReceivedOrder { cook, order, .. } = &event.kind {
            by_cook.entry(*cook).or_default().push(order.clone());
        }
    }
    by_cook
}

pub fn orders_for_cook(events: &[SimulationEvent], cook: CookId) -> Vec<Vec<Food>> {
    orders_by_cook(events).remove(&cook).unwrap_or_default()
}

/// Items of each kind across every order a cook received.
pub fn food_count_by_kind(events: &[SimulationEvent]) -> BTreeMap<FoodKind, u64> {
    let mut counts = BTreeMap::new();
    for event in events {
        if let EventKind::CookReceivedOrder { order, .. } = &event.kind {
            for food in order {
                *counts.entry(food.kind).or_insert(0) += 1;
            }
        }
    }
    counts
}

pub fn count_of_kind(events: &[SimulationEvent], kind: FoodKind) -> u64 {
    food_count_by_kind(events).get(&kind).copied().unwrap_or(0)
}

pub fn completed_orders_by_cook(events: &[SimulationEvent]) -> BTreeMap<CookId, u64> {
    let mut counts = BTreeMap::new();
    for event in events {
        if let EventKind::CookCompletedOrder { cook, .. } = &event.kind {
            *counts.entry(*cook).or_insert(0) += 1;
        }
    }
    counts
}

/// Each cook's share of all completed orders, in percent.
///
/// Empty when no order was completed.
pub fn percentage_orders_by_cook(events: &[SimulationEvent]) -> BTreeMap<CookId, f64> {
    let completed = completed_orders_by_cook(events);
    let total: u64 = completed.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }
    completed
        .into_iter()
        .map(|(cook, count)| (cook, count as f64 * 100.0 / total as f64))
        .collect()
}

/// Mean time from reception to completion over each cook's orders.
///
/// Built from the timings cooks publish when they go home. A cook that never
/// completed an order maps to `None`.
pub fn average_cooking_time_by_cook(events: &[SimulationEvent]) -> BTreeMap<CookId, Option<Duration>> {
    let mut averages = BTreeMap::new();
    for event in events {
        if let EventKind::CookEnding { cook, timings } = &event.kind {
            let average = if timings.is_empty() {
                None
            } else {
                let total: Duration = timings.iter().map(|t| t.elapsed()).sum();
                Some(total / timings.len() as u32)
            };
            averages.insert(*cook, average);
        }
    }
    averages
}

/// Everything above, computed once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopReport {
    pub orders_received: BTreeMap<CookId, usize>,
    pub food_counts: BTreeMap<FoodKind, u64>,
    pub completed_orders: BTreeMap<CookId, u64>,
    pub completed_percentage: BTreeMap<CookId, f64>,
    pub average_cooking_time: BTreeMap<CookId, Option<Duration>>,
}

impl ShopReport {
    pub fn from_events(events: &[SimulationEvent]) -> Self {
        Self {
            orders_received: orders_by_cook(events)
                .into_iter()
                .map(|(cook, orders)| (cook, orders.len()))
                .collect(),
            food_counts: food_count_by_kind(events),
            completed_orders: completed_orders_by_cook(events),
            completed_percentage: percentage_orders_by_cook(events),
            average_cooking_time: average_cooking_time_by_cook(events),
        }
    }

    pub fn total_items(&self) -> u64 {
        self.food_counts.values().sum()
    }

    pub fn total_completed(&self) -> u64 {
        self.completed_orders.values().sum()
    }
}
