use crate::coordination::{AdmissionGate, CompletionRegistry, OrderQueue};
use crate::cook_actor::{Cook, CookContext};
use crate::customer_actor::{Customer, CustomerContext};
use crate::events::{EventKind, EventLog, SimulationEvent};
use crate::framework::{spawn, ActorHandle, ShopError};
use crate::lifecycle::SimulationConfig;
use crate::model::{CookId, CustomerId, OrderNumberAllocator};
use crate::station::Kitchen;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// The simulation driver.
///
/// `CoffeeShop` is responsible for:
/// - **Lifecycle Management**: Opening the stations, starting cooks and customers,
///   and shutting everything down in order
/// - **Dependency Wiring**: Creating the shared resources and injecting them into
///   each actor when it starts
/// - **Order Numbering**: A fresh [`OrderNumberAllocator`] per run, so repeated or
///   concurrent runs number their orders identically
///
/// # Example
///
/// ```ignore
/// let shop = CoffeeShop::new(SimulationConfig::new(10, 5, 5, 2, false))?;
/// let events = shop.run().await?;
/// ```
pub struct CoffeeShop {
    config: SimulationConfig,
}

impl CoffeeShop {
    pub fn new(config: SimulationConfig) -> Result<Self, ShopError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs the whole simulation and returns its event log.
    ///
    /// # Shutdown Process
    ///
    /// 1. Wait for every customer to leave.
    /// 2. Cancel the cooks. They are all idle by now, so each one records its
    ///    ending and exits.
    /// 3. Wait for any preparation task still winding down, then close stations.
    pub async fn run(&self) -> Result<Vec<SimulationEvent>, ShopError> {
        let config = &self.config;
        let log = EventLog::new();
        log.record(EventKind::SimulationStarting {
            customers: config.customers,
            cooks: config.cooks,
            tables: config.tables,
            station_capacity: config.station_capacity,
        });
        info!(
            customers = config.customers,
            cooks = config.cooks,
            tables = config.tables,
            station_capacity = config.station_capacity,
            "Simulation starting"
        );

        // =====================================================================
        // 1. Shared resources
        // =====================================================================

        let kitchen = Arc::new(Kitchen::new(&config.menu, config.station_capacity, log.clone()));
        kitchen.open();
        let queue = Arc::new(OrderQueue::new(log.clone()));
        let registry = Arc::new(CompletionRegistry::new());
        let gate = Arc::new(AdmissionGate::new(config.tables, log.clone()));
        let shutdown = CancellationToken::new();
        let abandon = CancellationToken::new();

        // =====================================================================
        // 2. Cooks
        // =====================================================================

        let cook_ctx = CookContext {
            queue: queue.clone(),
            kitchen: kitchen.clone(),
            registry: registry.clone(),
            log: log.clone(),
            shutdown: shutdown.clone(),
            abandon: abandon.clone(),
        };
        let cooks: Vec<ActorHandle> = (0..config.cooks)
            .map(|index| spawn(Cook::new(CookId(index as u32)), cook_ctx.clone()))
            .collect();

        // =====================================================================
        // 3. Customers
        // =====================================================================

        let allocator = OrderNumberAllocator::starting_at(config.first_order_number);
        let customer_ctx = CustomerContext {
            gate: gate.clone(),
            queue,
            registry,
            log: log.clone(),
            abandon,
        };
        let customers: Vec<ActorHandle> = config
            .build_orders(&allocator)
            .into_iter()
            .enumerate()
            .map(|(index, order)| {
                let customer = Customer::new(CustomerId(index as u32), order);
                spawn(customer, customer_ctx.clone())
            })
            .collect();

        // =====================================================================
        // 4. Shutdown
        // =====================================================================

        let mut first_error = None;
        for handle in customers {
            let name = handle.name().to_string();
            if let Err(e) = handle.join().await {
                error!(actor = %name, error = %e, "Customer failed");
                first_error.get_or_insert(e);
            }
        }

        shutdown.cancel();
        for handle in cooks {
            let name = handle.name().to_string();
            if let Err(e) = handle.join().await {
                error!(actor = %name, error = %e, "Cook failed");
                first_error.get_or_insert(e);
            }
        }

        kitchen.close().await;
        log.record(EventKind::SimulationEnding);
        info!(events = log.len(), peak_occupancy = gate.peak_occupancy(), "Simulation ended");

        match first_error {
            Some(e) => Err(e),
            None => Ok(log.snapshot()),
        }
    }
}

/// Runs one simulation with the default menu.
///
/// `random_orders` draws each customer's order at random; otherwise everyone
/// orders a burger, two fries and a coffee.
pub async fn run_simulation(
    customers: usize,
    cooks: usize,
    tables: usize,
    station_capacity: usize,
    random_orders: bool,
) -> Result<Vec<SimulationEvent>, ShopError> {
    let config = SimulationConfig::new(customers, cooks, tables, station_capacity, random_orders);
    CoffeeShop::new(config)?.run().await
}
