//! # Preparation Stations
//!
//! A station prepares one kind of food, at most `capacity` items at a time.
//!
//! ## Protocol
//!
//! 1. A cook calls [`PreparationStation::prepare`]. If every slot is busy the cook
//!    waits (FIFO) for one to free up.
//! 2. Once a slot is reserved the cook's CookStartedFood event is recorded and a
//!    preparation task is spawned. `prepare` returns right away, so the cook can
//!    hand the next item of the same order to another station.
//! 3. The task records StationStartingFood, waits the food's fixed preparation
//!    time, records StationDoneFood and CookFinishedFood, frees the slot and
//!    sends the food on the cook's completion channel.
//!
//! Preparation tasks are never cancelled. [`Kitchen::close`] waits for all of
//! them before the stations report shutting down.

use crate::events::{EventKind, EventLog};
use crate::framework::ShopError;
use crate::model::{CookId, Food, FoodKind, Menu, OrderNumber};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio_util::task::TaskTracker;
use tracing::{debug, info, info_span, warn, Instrument};

/// A bounded-concurrency preparation resource for one food kind.
///
/// Cheap to clone; clones share slots, counters and the task tracker.
#[derive(Clone)]
pub struct PreparationStation {
    inner: Arc<StationInner>,
}

struct StationInner {
    name: String,
    food: Food,
    capacity: usize,
    slots: Arc<Semaphore>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    tasks: TaskTracker,
    log: EventLog,
}

impl PreparationStation {
    pub fn new(name: impl Into<String>, food: Food, capacity: usize, log: EventLog) -> Self {
        Self {
            inner: Arc::new(StationInner {
                name: name.into(),
                food,
                capacity,
                slots: Arc::new(Semaphore::new(capacity)),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                tasks: TaskTracker::new(),
                log,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn food(&self) -> Food {
        self.inner.food
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Items being prepared right now.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Most items ever prepared at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }

    /// Reserves a slot for `food` on behalf of `cook` and starts preparing it.
    ///
    /// Waits only for the slot. When the item is ready it is sent on `done`,
    /// which the cook drains while it waits for its order to finish.
    pub async fn prepare(
        &self,
        food: Food,
        cook: CookId,
        order_number: OrderNumber,
        done: mpsc::UnboundedSender<Food>,
    ) -> Result<(), ShopError> {
        let inner = &self.inner;
        if food.kind != inner.food.kind {
            return Err(ShopError::WrongStation {
                station: inner.name.clone(),
                expected: inner.food.kind,
                actual: food.kind,
            });
        }

        let permit = inner
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ShopError::StationClosed(inner.name.clone()))?;

        inner.log.record(EventKind::CookStartedFood {
            cook,
            food: inner.food,
            order_number,
        });
        let in_flight = inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        inner.peak.fetch_max(in_flight, Ordering::SeqCst);
        debug!(station = %inner.name, %cook, order = %order_number, in_flight, "Slot reserved");

        let span = info_span!("station", name = %inner.name, order = %order_number);
        let task = inner.clone();
        inner
            .tasks
            .spawn(async move { task.prepare_item(permit, cook, order_number, done).await }.instrument(span));
        Ok(())
    }

    /// Records the station coming online.
    pub fn open(&self) {
        let inner = &self.inner;
        inner.log.record(EventKind::StationStarting {
            station: inner.name.clone(),
            food: inner.food.kind,
            capacity: inner.capacity,
        });
        info!(station = %inner.name, capacity = inner.capacity, "Station open");
    }

    /// Waits for every preparation task, then records the station shutting down.
    pub async fn close(&self) {
        let inner = &self.inner;
        inner.tasks.close();
        inner.tasks.wait().await;
        inner.log.record(EventKind::StationEnding {
            station: inner.name.clone(),
        });
        info!(station = %inner.name, peak = self.peak_in_flight(), "Station closed");
    }
}

impl StationInner {
    async fn prepare_item(
        &self,
        permit: OwnedSemaphorePermit,
        cook: CookId,
        order_number: OrderNumber,
        done: mpsc::UnboundedSender<Food>,
    ) {
        let food = self.food;
        self.log.record(EventKind::StationStartingFood {
            station: self.name.clone(),
            food,
            order_number,
        });

        tokio::time::sleep(food.prep_time).await;

        self.log.record(EventKind::StationDoneFood {
            station: self.name.clone(),
            food,
            order_number,
        });
        self.log.record(EventKind::CookFinishedFood {
            cook,
            food,
            order_number,
        });

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        drop(permit);

        if done.send(food).is_err() {
            warn!(%cook, order = %order_number, "Cook stopped listening before its food was ready");
        }
    }
}

/// The three stations of the shop, one per food kind.
pub struct Kitchen {
    grill: PreparationStation,
    fryer: PreparationStation,
    coffee_maker: PreparationStation,
}

impl Kitchen {
    pub fn new(menu: &Menu, capacity: usize, log: EventLog) -> Self {
        Self {
            grill: PreparationStation::new("Grill", menu.food(FoodKind::Burger), capacity, log.clone()),
            fryer: PreparationStation::new("Fryer", menu.food(FoodKind::Fries), capacity, log.clone()),
            coffee_maker: PreparationStation::new(
                "CoffeeMaker2000",
                menu.food(FoodKind::Coffee),
                capacity,
                log,
            ),
        }
    }

    /// The station that prepares `kind`.
    pub fn station_for(&self, kind: FoodKind) -> &PreparationStation {
        match kind {
            FoodKind::Burger => &self.grill,
            FoodKind::Fries => &self.fryer,
            FoodKind::Coffee => &self.coffee_maker,
        }
    }

    pub fn stations(&self) -> [&PreparationStation; 3] {
        [&self.grill, &self.fryer, &self.coffee_maker]
    }

    pub fn open(&self) {
        for station in self.stations() {
            station.open();
        }
    }

    pub async fn close(&self) {
        for station in self.stations() {
            station.close().await;
        }
    }
}
