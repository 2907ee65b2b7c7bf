//! Command-line entry point: runs one simulation and logs its report.

use clap::Parser;
use coffee_shop::audit::TraceAudit;
use coffee_shop::lifecycle::{setup_tracing, CoffeeShop, OrderMode, SimulationConfig};
use coffee_shop::report::ShopReport;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "coffee-shop", about = "Simulate customers, cooks and stations in a coffee shop")]
struct Args {
    /// Number of customers
    #[arg(long, default_value_t = 100)]
    customers: usize,

    /// Number of cooks
    #[arg(long, default_value_t = 20)]
    cooks: usize,

    /// Seating capacity of the shop
    #[arg(long, default_value_t = 50)]
    tables: usize,

    /// Concurrent items per preparation station
    #[arg(long, default_value_t = 4)]
    capacity: usize,

    /// Every customer orders a burger, two fries and a coffee
    #[arg(long, conflicts_with = "seed")]
    fixed_orders: bool,

    /// Seed for reproducible random orders
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn config(&self) -> SimulationConfig {
        let orders = if self.fixed_orders {
            OrderMode::Fixed
        } else {
            OrderMode::Random { seed: self.seed }
        };
        SimulationConfig::new(self.customers, self.cooks, self.tables, self.capacity, false)
            .with_orders(orders)
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let args = Args::parse();
    let config = args.config();

    let shop = CoffeeShop::new(config).map_err(|e| e.to_string())?;
    let events = shop.run().await.map_err(|e| {
        error!(error = %e, "Simulation failed");
        e.to_string()
    })?;

    let violations = TraceAudit::new(shop.config().tables, shop.config().station_capacity).check(&events);
    for violation in &violations {
        warn!(%violation, "Trace violation");
    }

    let report = ShopReport::from_events(&events);
    info!(
        events = events.len(),
        orders = report.total_completed(),
        items = report.total_items(),
        violations = violations.len(),
        "Simulation complete"
    );
    for (kind, count) in &report.food_counts {
        info!(food = %kind, count, "Food prepared");
    }
    for (cook, completed) in &report.completed_orders {
        let share = report.completed_percentage.get(cook).copied().unwrap_or(0.0);
        info!(%cook, completed, share_pct = share, "Orders completed");
    }
    for (cook, average) in &report.average_cooking_time {
        match average {
            Some(average) => info!(%cook, average_ms = average.as_millis() as u64, "Average cooking time"),
            None => info!(%cook, "No orders cooked"),
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(format!("{} trace violations", violations.len()))
    }
}
