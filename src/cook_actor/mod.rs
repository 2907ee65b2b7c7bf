//! # Cook
//!
//! A cook takes one order at a time from the [`OrderQueue`], fans its items out
//! to the [`Kitchen`], waits for all of them and then tells the customer.
//!
//! ```text
//! Idle ──take()──▶ OrderReceived ──▶ ItemsDispatching ──▶ AwaitingCompletion
//!  ▲                                                            │
//!  └──────────────────────── OrderComplete ◀────────────────────┘
//! Idle ──cancelled──▶ Cancelled
//! ```
//!
//! Cancellation is only observed while idle. Once an order has been taken it is
//! always carried through to completion.

use crate::coordination::{CompletionRegistry, OrderQueue, ReceivedOrder};
use crate::events::{EventKind, EventLog, OrderTiming};
use crate::framework::{Actor, ShopError};
use crate::model::CookId;
use crate::station::Kitchen;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Shared resources a cook works against.
#[derive(Clone)]
pub struct CookContext {
    pub queue: Arc<OrderQueue>,
    pub kitchen: Arc<Kitchen>,
    pub registry: Arc<CompletionRegistry>,
    pub log: EventLog,
    pub shutdown: CancellationToken,
    /// Cancelled by a cook that cannot finish an order it took.
    pub abandon: CancellationToken,
}

pub struct Cook {
    id: CookId,
    timings: Vec<OrderTiming>,
}

impl Cook {
    pub fn new(id: CookId) -> Self {
        Self {
            id,
            timings: Vec::new(),
        }
    }

    pub fn id(&self) -> CookId {
        self.id
    }

    /// Start and end of every order this cook has completed, in completion order.
    pub fn timings(&self) -> &[OrderTiming] {
        &self.timings
    }

    /// Idle: wait for an order unless the shop is closing.
    async fn next_order(&self, ctx: &CookContext) -> Option<ReceivedOrder> {
        tokio::select! {
            biased;
            _ = ctx.shutdown.cancelled() => None,
            received = ctx.queue.take(self.id) => Some(received),
        }
    }

    /// Carries one order from reception to the customer's completion flag.
    async fn serve(&mut self, received: ReceivedOrder, ctx: &CookContext) -> Result<(), ShopError> {
        let ReceivedOrder {
            ticket,
            received_at,
        } = received;
        let order = ticket.order;
        info!(cook = %self.id, order = %order.number, items = order.len(), "Order received");

        // The tally lives only as long as this order.
        let (done, mut finished) = mpsc::unbounded_channel();
        for food in &order.items {
            ctx.kitchen
                .station_for(food.kind)
                .prepare(*food, self.id, order.number, done.clone())
                .await?;
        }
        drop(done);

        let mut ready = 0;
        while ready < order.len() {
            let food = finished
                .recv()
                .await
                .ok_or_else(|| ShopError::StationClosed(format!("station for order {}", order.number)))?;
            ready += 1;
            debug!(cook = %self.id, order = %order.number, %food, ready, "Item ready");
        }

        let finished_at = ctx.log.record(EventKind::CookCompletedOrder {
            cook: self.id,
            order_number: order.number,
        });
        self.timings.push(OrderTiming {
            order_number: order.number,
            started: received_at,
            finished: finished_at,
        });
        ctx.registry.complete(order.number)?;
        info!(cook = %self.id, order = %order.number, customer = %ticket.customer, "Order complete");
        Ok(())
    }
}

#[async_trait]
impl Actor for Cook {
    type Context = CookContext;

    fn name(&self) -> String {
        self.id.to_string()
    }

    async fn run(mut self, ctx: CookContext) -> Result<(), ShopError> {
        ctx.log.record(EventKind::CookStarting { cook: self.id });
        info!(cook = %self.id, "Reporting for work");

        while let Some(received) = self.next_order(&ctx).await {
            if let Err(e) = self.serve(received, &ctx).await {
                error!(cook = %self.id, error = %e, "Order failed, abandoning waiting customers");
                ctx.abandon.cancel();
                return Err(e);
            }
        }

        info!(cook = %self.id, orders = self.timings.len(), "Going home");
        ctx.log.record(EventKind::CookEnding {
            cook: self.id,
            timings: self.timings,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordination::OrderTicket;
    use crate::framework::spawn;
    use crate::model::{CustomerId, Menu, Order, OrderNumber};
    use std::time::Duration;

    fn context(log: &EventLog) -> CookContext {
        let menu = Menu::new(
            Duration::from_millis(30),
            Duration::from_millis(20),
            Duration::from_millis(10),
        );
        CookContext {
            queue: Arc::new(OrderQueue::new(log.clone())),
            kitchen: Arc::new(Kitchen::new(&menu, 1, log.clone())),
            registry: Arc::new(CompletionRegistry::new()),
            log: log.clone(),
            shutdown: CancellationToken::new(),
            abandon: CancellationToken::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cook_serves_order_then_stops_when_idle() {
        let log = EventLog::new();
        let ctx = context(&log);
        let menu = Menu::new(
            Duration::from_millis(30),
            Duration::from_millis(20),
            Duration::from_millis(10),
        );

        ctx.registry.register(OrderNumber(0)).unwrap();
        ctx.queue.place(OrderTicket {
            customer: CustomerId(0),
            order: Order::fixed(OrderNumber(0), &menu),
        });

        let cook = spawn(Cook::new(CookId(7)), ctx.clone());
        ctx.registry.wait(OrderNumber(0)).await.unwrap();

        ctx.shutdown.cancel();
        cook.join().await.unwrap();

        let events = log.snapshot();
        let finished = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::CookFinishedFood { .. }))
            .count();
        assert_eq!(finished, 4);

        let timings = events
            .iter()
            .find_map(|e| match &e.kind {
                EventKind::CookEnding { cook, timings } if *cook == CookId(7) => Some(timings.clone()),
                _ => None,
            })
            .expect("cook must report going home");
        assert_eq!(timings.len(), 1);
        assert_eq!(timings[0].order_number, OrderNumber(0));
        // Fryer capacity is 1, so the two fries run back to back.
        assert!(timings[0].elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_cook_exits_on_cancellation_without_orders() {
        let log = EventLog::new();
        let ctx = context(&log);
        let cook = spawn(Cook::new(CookId(1)), ctx.clone());

        tokio::time::sleep(Duration::from_millis(5)).await;
        ctx.shutdown.cancel();
        cook.join().await.unwrap();

        let kinds: Vec<String> = log.snapshot().iter().map(|e| e.kind.to_string()).collect();
        assert_eq!(
            kinds,
            vec![
                "Cook 1 reporting for work".to_string(),
                "Cook 1 going home for the night after 0 orders".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_order_completes_immediately() {
        let log = EventLog::new();
        let ctx = context(&log);
        ctx.registry.register(OrderNumber(3)).unwrap();
        ctx.queue.place(OrderTicket {
            customer: CustomerId(3),
            order: Order::new(OrderNumber(3), Vec::new()),
        });

        let cook = spawn(Cook::new(CookId(0)), ctx.clone());
        ctx.registry.wait(OrderNumber(3)).await.unwrap();
        ctx.shutdown.cancel();
        cook.join().await.unwrap();

        assert_eq!(ctx.registry.is_complete(OrderNumber(3)), Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_mid_order_still_completes_it() {
        let log = EventLog::new();
        let ctx = context(&log);
        ctx.registry.register(OrderNumber(2)).unwrap();
        ctx.queue.place(OrderTicket {
            customer: CustomerId(2),
            order: Order::fixed(OrderNumber(2), &Menu::default()),
        });

        let cook = spawn(Cook::new(CookId(3)), ctx.clone());
        // Both fries share the one fryer slot, so the order needs 40ms.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(ctx.registry.is_complete(OrderNumber(2)), Some(false));

        ctx.shutdown.cancel();
        cook.join().await.unwrap();
        assert_eq!(ctx.registry.is_complete(OrderNumber(2)), Some(true));

        let events = log.snapshot();
        let completed = events
            .iter()
            .position(|e| matches!(e.kind, EventKind::CookCompletedOrder { .. }))
            .expect("order must be completed");
        let ending = events
            .iter()
            .position(|e| matches!(e.kind, EventKind::CookEnding { .. }))
            .expect("cook must go home");
        assert!(completed < ending);
        match &events[ending].kind {
            EventKind::CookEnding { timings, .. } => assert_eq!(timings.len(), 1),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_order_abandons_waiting_customers() {
        let log = EventLog::new();
        let ctx = context(&log);
        ctx.queue.place(OrderTicket {
            customer: CustomerId(5),
            order: Order::new(OrderNumber(5), Vec::new()),
        });

        let cook = spawn(Cook::new(CookId(0)), ctx.clone());
        let err = cook.join().await.unwrap_err();

        assert_eq!(err, ShopError::UnknownOrder(OrderNumber(5)));
        assert!(ctx.abandon.is_cancelled());
        assert!(!ctx.shutdown.is_cancelled());
    }
}
