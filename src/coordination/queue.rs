use crate::events::{EventKind, EventLog};
use crate::model::{CookId, CustomerId, Order};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::debug;

/// A customer's order waiting in the shared queue.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTicket {
    pub customer: CustomerId,
    pub order: Order,
}

/// A ticket as handed to a cook, with the time the cook picked it up.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedOrder {
    pub ticket: OrderTicket,
    pub received_at: Duration,
}

/// Single shared FIFO between customers (producers) and cooks (consumers).
///
/// Placement and removal record their events under the queue lock, so the order
/// of CustomerPlacedOrder events is the queue order and CookReceivedOrder events
/// follow the same sequence.
pub struct OrderQueue {
    pending: Mutex<VecDeque<OrderTicket>>,
    available: Notify,
    log: EventLog,
}

impl OrderQueue {
    pub fn new(log: EventLog) -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            available: Notify::new(),
            log,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<OrderTicket>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `ticket` at the tail and wakes one waiting cook.
    pub fn place(&self, ticket: OrderTicket) {
        let mut pending = self.lock();
        self.log.record(EventKind::CustomerPlacedOrder {
            customer: ticket.customer,
            order: ticket.order.items.clone(),
            order_number: ticket.order.number,
        });
        debug!(customer = %ticket.customer, order = %ticket.order.number, depth = pending.len() + 1, "Order queued");
        pending.push_back(ticket);
        drop(pending);
        self.available.notify_one();
    }

    /// Waits until an order is queued, then removes and returns the head.
    ///
    /// Cancel safe: if the returned future is dropped before completing, no
    /// ticket has been removed.
    pub async fn take(&self, cook: CookId) -> ReceivedOrder {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            // Register before looking so a placement between the check and the
            // await still wakes us.
            notified.as_mut().enable();

            if let Some(received) = self.try_take(cook) {
                return received;
            }
            notified.await;
        }
    }

    /// Removes the head without waiting, if there is one.
    pub fn try_take(&self, cook: CookId) -> Option<ReceivedOrder> {
        let mut pending = self.lock();
        let ticket = pending.pop_front()?;
        let received_at = self.log.record(EventKind::CookReceivedOrder {
            cook,
            order: ticket.order.items.clone(),
            order_number: ticket.order.number,
        });
        Some(ReceivedOrder {
            ticket,
            received_at,
        })
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
