//! # Customer
//!
//! ```text
//! Created ──enter()──▶ Entering ──place()──▶ OrderPlaced ──wait()──▶ AwaitingOrder
//!                                                                       │
//!                                        Left ◀──leave()── Served ◀─────┘
//! AwaitingOrder ──abandoned──▶ Left
//! ```

use crate::coordination::{AdmissionGate, CompletionRegistry, OrderQueue, OrderTicket};
use crate::events::{EventKind, EventLog};
use crate::framework::{Actor, ShopError};
use crate::model::{CustomerId, Order};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Shared resources a customer works against.
#[derive(Clone)]
pub struct CustomerContext {
    pub gate: Arc<AdmissionGate>,
    pub queue: Arc<OrderQueue>,
    pub registry: Arc<CompletionRegistry>,
    pub log: EventLog,
    /// Cancelled when a cook fails, so nobody waits for an order that will never come.
    pub abandon: CancellationToken,
}

/// A customer and the order it came for. Immutable once built.
#[derive(Debug, Clone)]
pub struct Customer {
    id: CustomerId,
    order: Order,
}

impl Customer {
    pub fn new(id: CustomerId, order: Order) -> Self {
        Self { id, order }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn order(&self) -> &Order {
        &self.order
    }
}

#[async_trait]
impl Actor for Customer {
    type Context = CustomerContext;

    fn name(&self) -> String {
        self.id.to_string()
    }

    async fn run(self, ctx: CustomerContext) -> Result<(), ShopError> {
        let Customer { id, order } = self;
        let number = order.number;
        ctx.log.record(EventKind::CustomerStarting { customer: id });

        let seat = ctx.gate.enter(id).await?;

        // Whatever happens once seated, the seat is given back through `leave`.
        match place_and_wait(id, &order, &ctx).await {
            Ok(()) => {
                ctx.log.record(EventKind::CustomerReceivedOrder {
                    customer: id,
                    order: order.items,
                    order_number: number,
                });
                seat.leave();
                info!(customer = %id, order = %number, "Served and left");
                Ok(())
            }
            Err(e) => {
                seat.leave();
                warn!(customer = %id, order = %number, error = %e, "Left without the order");
                Err(e)
            }
        }
    }
}

async fn place_and_wait(id: CustomerId, order: &Order, ctx: &CustomerContext) -> Result<(), ShopError> {
    // The flag must exist before any cook can see the order.
    ctx.registry.register(order.number)?;
    ctx.queue.place(OrderTicket {
        customer: id,
        order: order.clone(),
    });
    info!(customer = %id, order = %order, "Order placed");

    tokio::select! {
        biased;
        served = ctx.registry.wait(order.number) => served,
        _ = ctx.abandon.cancelled() => Err(ShopError::Abandoned(order.number)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::spawn;
    use crate::model::{Menu, OrderNumber};
    use std::time::Duration;
    use tokio::time::timeout;

    fn context(log: &EventLog, tables: usize) -> CustomerContext {
        CustomerContext {
            gate: Arc::new(AdmissionGate::new(tables, log.clone())),
            queue: Arc::new(OrderQueue::new(log.clone())),
            registry: Arc::new(CompletionRegistry::new()),
            log: log.clone(),
            abandon: CancellationToken::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_customer_waits_for_its_order_before_leaving() {
        let log = EventLog::new();
        let ctx = context(&log, 1);
        let customer = Customer::new(CustomerId(4), Order::fixed(OrderNumber(4), &Menu::default()));
        let handle = spawn(customer, ctx.clone());

        // Play the cook by hand.
        let received = ctx.queue.take(crate::model::CookId(0)).await;
        assert_eq!(received.ticket.customer, CustomerId(4));
        assert_eq!(ctx.gate.occupancy(), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ctx.gate.occupancy(), 1, "customer must stay until served");

        ctx.registry.complete(OrderNumber(4)).unwrap();
        handle.join().await.unwrap();
        assert_eq!(ctx.gate.occupancy(), 0);

        let last: Vec<String> = log
            .snapshot()
            .iter()
            .rev()
            .take(2)
            .map(|e| e.kind.to_string())
            .collect();
        assert_eq!(last[0], "Customer 4 leaving the shop");
        assert!(last[1].starts_with("Customer 4 received order #4"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_customer_waits_outside_when_seats_are_taken() {
        let log = EventLog::new();
        let ctx = context(&log, 1);
        let seat = ctx.gate.enter(CustomerId(99)).await.unwrap();

        let customer = Customer::new(CustomerId(0), Order::fixed(OrderNumber(0), &Menu::default()));
        let handle = spawn(customer, ctx.clone());

        let nothing = timeout(Duration::from_millis(30), ctx.queue.take(crate::model::CookId(0))).await;
        assert!(nothing.is_err(), "no order can be placed before the customer is seated");

        seat.leave();
        let received = ctx.queue.take(crate::model::CookId(0)).await;
        ctx.registry.complete(received.ticket.order.number).unwrap();
        handle.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_customer_gives_seat_back_when_registration_fails() {
        let log = EventLog::new();
        let ctx = context(&log, 1);
        ctx.registry.register(OrderNumber(4)).unwrap();

        let customer = Customer::new(CustomerId(4), Order::fixed(OrderNumber(4), &Menu::default()));
        let err = spawn(customer, ctx.clone()).join().await.unwrap_err();

        assert_eq!(err, ShopError::DuplicateOrder(OrderNumber(4)));
        assert_eq!(ctx.gate.occupancy(), 0);
        assert!(ctx.queue.is_empty());
        let last = log.snapshot().last().map(|e| e.kind.clone());
        assert_eq!(last, Some(EventKind::CustomerLeavingShop { customer: CustomerId(4) }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_customer_leaves_without_the_order() {
        let log = EventLog::new();
        let ctx = context(&log, 1);
        let customer = Customer::new(CustomerId(1), Order::fixed(OrderNumber(1), &Menu::default()));
        let handle = spawn(customer, ctx.clone());

        ctx.queue.take(crate::model::CookId(0)).await;
        ctx.abandon.cancel();
        let err = handle.join().await.unwrap_err();

        assert_eq!(err, ShopError::Abandoned(OrderNumber(1)));
        assert_eq!(ctx.gate.occupancy(), 0);
        let events = log.snapshot();
        assert!(events
            .iter()
            .any(|e| e.kind == EventKind::CustomerLeavingShop { customer: CustomerId(1) }));
        assert!(!events
            .iter()
            .any(|e| matches!(e.kind, EventKind::CustomerReceivedOrder { .. })));
    }
}
