use crate::framework::ShopError;
use crate::model::OrderNumber;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::debug;

/// Per-order completion flags that customers can block on.
///
/// Each order gets its own `watch` channel, so completing one order wakes only
/// the customer waiting for that order. A flag goes from `false` to `true`
/// exactly once; completing it again is reported as an error.
#[derive(Default)]
pub struct CompletionRegistry {
    flags: Mutex<HashMap<OrderNumber, watch::Sender<bool>>>,
}

impl CompletionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<OrderNumber, watch::Sender<bool>>> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates the entry for `order`, not yet complete.
    pub fn register(&self, order: OrderNumber) -> Result<(), ShopError> {
        let mut flags = self.lock();
        if flags.contains_key(&order) {
            return Err(ShopError::DuplicateOrder(order));
        }
        let (sender, _) = watch::channel(false);
        flags.insert(order, sender);
        Ok(())
    }

    /// Marks `order` complete and wakes its waiter.
    pub fn complete(&self, order: OrderNumber) -> Result<(), ShopError> {
        let flags = self.lock();
        let flag = flags.get(&order).ok_or(ShopError::UnknownOrder(order))?;
        if *flag.borrow() {
            return Err(ShopError::OrderAlreadyCompleted(order));
        }
        flag.send_replace(true);
        debug!(%order, "Order marked complete");
        Ok(())
    }

    /// Waits until `order` is complete. Returns immediately if it already is.
    pub async fn wait(&self, order: OrderNumber) -> Result<(), ShopError> {
        let mut receiver = {
            let flags = self.lock();
            flags
                .get(&order)
                .ok_or(ShopError::UnknownOrder(order))?
                .subscribe()
        };
        // `wait_for` re-checks the flag on every change, so a wake-up is never
        // taken as completion on its own.
        receiver
            .wait_for(|done| *done)
            .await
            .map_err(|_| ShopError::UnknownOrder(order))?;
        Ok(())
    }

    pub fn is_complete(&self, order: OrderNumber) -> Option<bool> {
        self.lock().get(&order).map(|flag| *flag.borrow())
    }
}
