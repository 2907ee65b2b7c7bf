//! # Actor Seam
//!
//! Cooks and customers are long-running tasks with the same shape: they are
//! built from plain data, receive their shared resources late (when they start
//! running), and report how they ended. This module captures that shape once.

use crate::framework::ShopError;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{info_span, Instrument};

/// A simulation participant that runs in its own Tokio task.
///
/// # Context Injection
/// Shared resources (queue, gate, stations, event log) are passed to
/// [`Actor::run`] rather than stored at construction time. The same actor value
/// can therefore be built before the resources it will contend for exist.
#[async_trait]
pub trait Actor: Send + Sized + 'static {
    /// The shared resources this actor needs while running.
    type Context: Send + 'static;

    /// Human-readable identity used for the task span and in errors.
    fn name(&self) -> String;

    /// Drive the actor to its terminal state.
    async fn run(self, ctx: Self::Context) -> Result<(), ShopError>;
}

/// A running actor. Await [`ActorHandle::join`] to learn how it ended.
pub struct ActorHandle {
    name: String,
    handle: JoinHandle<Result<(), ShopError>>,
}

impl ActorHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits for the actor's task; a panic becomes [`ShopError::ActorFailed`].
    pub async fn join(self) -> Result<(), ShopError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(ShopError::ActorFailed {
                actor: self.name,
                reason: e.to_string(),
            }),
        }
    }
}

/// Spawns `actor` on the current runtime with `ctx` injected.
///
/// Every log line emitted by the actor is nested under an `actor` span carrying
/// its name.
pub fn spawn<A: Actor>(actor: A, ctx: A::Context) -> ActorHandle {
    let name = actor.name();
    let span = info_span!("actor", name = %name);
    let handle = tokio::spawn(actor.run(ctx).instrument(span));
    ActorHandle { name, handle }
}
