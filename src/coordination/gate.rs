use crate::events::{EventKind, EventLog};
use crate::framework::ShopError;
use crate::model::CustomerId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// Bounded seating. At most `capacity` customers hold a [`Seat`] at once.
///
/// # Fairness
/// Seats are handed out by a Tokio [`Semaphore`], which serves waiters in FIFO
/// order. A customer waiting for a seat is admitted as soon as every customer
/// that queued before it has been seated, so nobody starves while seats free up.
///
/// # Trace Consistency
/// The "entered" event is appended while the seat is held and the "leaving"
/// event before it is released. Counting entered minus leaving over any prefix
/// of the log therefore never exceeds `capacity`.
pub struct AdmissionGate {
    seats: Arc<Semaphore>,
    capacity: usize,
    peak: AtomicUsize,
    log: EventLog,
}

impl AdmissionGate {
    pub fn new(capacity: usize, log: EventLog) -> Self {
        Self {
            seats: Arc::new(Semaphore::new(capacity)),
            capacity,
            peak: AtomicUsize::new(0),
            log,
        }
    }

    /// Waits for a free seat, takes it and records the customer's entry.
    pub async fn enter(&self, customer: CustomerId) -> Result<Seat, ShopError> {
        let permit = self
            .seats
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ShopError::SeatingClosed)?;

        let occupancy = self.occupancy();
        self.peak.fetch_max(occupancy, Ordering::SeqCst);
        self.log.record(EventKind::CustomerEnteredShop { customer });
        debug!(%customer, occupancy, "Seated");

        Ok(Seat {
            customer,
            permit,
            log: self.log.clone(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Seats currently taken.
    pub fn occupancy(&self) -> usize {
        self.capacity - self.seats.available_permits()
    }

    /// Highest occupancy observed by any entrant so far.
    pub fn peak_occupancy(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Proof that a customer is inside the shop. Give it back with [`Seat::leave`].
pub struct Seat {
    customer: CustomerId,
    permit: OwnedSemaphorePermit,
    log: EventLog,
}

impl Seat {
    pub fn customer(&self) -> CustomerId {
        self.customer
    }

    /// Records the departure, then frees the seat and wakes the next entrant.
    pub fn leave(self) {
        let Seat {
            customer,
            permit,
            log,
        } = self;
        log.record(EventKind::CustomerLeavingShop { customer });
        drop(permit);
        debug!(%customer, "Left seat");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn test_enter_blocks_when_full_until_someone_leaves() {
        let gate = Arc::new(AdmissionGate::new(2, EventLog::new()));

        let first = gate.enter(CustomerId(0)).await.unwrap();
        let _second = gate.enter(CustomerId(1)).await.unwrap();
        assert_eq!(gate.occupancy(), 2);

        let blocked = timeout(Duration::from_millis(50), gate.enter(CustomerId(2))).await;
        assert!(blocked.is_err(), "third customer must wait for a seat");

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.enter(CustomerId(2)).await })
        };
        tokio::task::yield_now().await;
        first.leave();

        let third = waiter.await.unwrap().unwrap();
        assert_eq!(third.customer(), CustomerId(2));
        assert_eq!(gate.occupancy(), 2);
        assert_eq!(gate.peak_occupancy(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_trace_occupancy_never_exceeds_capacity() {
        let log = EventLog::new();
        let gate = Arc::new(AdmissionGate::new(3, log.clone()));

        let mut handles = Vec::new();
        for id in 0..40 {
            let gate = gate.clone();
            handles.push(tokio::spawn(async move {
                let seat = gate.enter(CustomerId(id)).await.unwrap();
                tokio::time::sleep(Duration::from_millis(1)).await;
                seat.leave();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut inside: i64 = 0;
        for event in log.snapshot() {
            match event.kind {
                EventKind::CustomerEnteredShop { .. } => inside += 1,
                EventKind::CustomerLeavingShop { .. } => inside -= 1,
                _ => {}
            }
            assert!((0..=3).contains(&inside), "occupancy {inside} out of bounds");
        }
        assert_eq!(inside, 0);
        assert!(gate.peak_occupancy() <= 3);
        assert_eq!(gate.occupancy(), 0);
    }
}
