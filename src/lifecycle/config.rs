use crate::framework::ShopError;
use crate::model::{Menu, Order, OrderNumberAllocator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// How each customer's order is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderMode {
    /// Everyone orders a burger, two fries and a coffee.
    Fixed,
    /// 0 to 2 of each kind per customer. With a seed the draw is reproducible.
    Random { seed: Option<u64> },
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub customers: usize,
    pub cooks: usize,
    /// Seating capacity of the shop.
    pub tables: usize,
    /// Concurrent items per station, shared by all three stations.
    pub station_capacity: usize,
    pub orders: OrderMode,
    pub menu: Menu,
    pub first_order_number: u32,
}

impl SimulationConfig {
    pub fn new(
        customers: usize,
        cooks: usize,
        tables: usize,
        station_capacity: usize,
        random_orders: bool,
    ) -> Self {
        let orders = if random_orders {
            OrderMode::Random { seed: None }
        } else {
            OrderMode::Fixed
        };
        Self {
            customers,
            cooks,
            tables,
            station_capacity,
            orders,
            ..Self::default()
        }
    }

    pub fn with_menu(mut self, menu: Menu) -> Self {
        self.menu = menu;
        self
    }

    pub fn with_orders(mut self, orders: OrderMode) -> Self {
        self.orders = orders;
        self
    }

    /// Random orders drawn from a fixed seed.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_orders(OrderMode::Random { seed: Some(seed) })
    }

    pub fn with_first_order_number(mut self, first: u32) -> Self {
        self.first_order_number = first;
        self
    }

    /// Rejects configurations that could never finish.
    pub fn validate(&self) -> Result<(), ShopError> {
        if self.tables == 0 {
            return Err(ShopError::InvalidConfig("the shop needs at least one table".into()));
        }
        if self.station_capacity == 0 {
            return Err(ShopError::InvalidConfig(
                "station capacity must be at least one".into(),
            ));
        }
        if self.customers > 0 && self.cooks == 0 {
            return Err(ShopError::InvalidConfig(
                "customers cannot be served without cooks".into(),
            ));
        }
        Ok(())
    }

    /// One order per customer, numbered by `allocator`.
    pub fn build_orders(&self, allocator: &OrderNumberAllocator) -> Vec<Order> {
        match self.orders {
            OrderMode::Fixed => (0..self.customers)
                .map(|_| Order::fixed(allocator.next(), &self.menu))
                .collect(),
            OrderMode::Random { seed } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                (0..self.customers)
                    .map(|_| Order::random(allocator.next(), &self.menu, &mut rng))
                    .collect()
            }
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            customers: 100,
            cooks: 20,
            tables: 50,
            station_capacity: 4,
            orders: OrderMode::Random { seed: None },
            menu: Menu::default(),
            first_order_number: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderNumber;

    #[test]
    fn validate_rejects_configurations_that_cannot_finish() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(SimulationConfig::new(0, 0, 1, 1, false).validate().is_ok());

        let no_tables = SimulationConfig::new(1, 1, 0, 1, false);
        assert!(matches!(no_tables.validate(), Err(ShopError::InvalidConfig(_))));

        let no_capacity = SimulationConfig::new(1, 1, 1, 0, false);
        assert!(matches!(no_capacity.validate(), Err(ShopError::InvalidConfig(_))));

        let no_cooks = SimulationConfig::new(1, 0, 1, 1, true);
        assert!(matches!(no_cooks.validate(), Err(ShopError::InvalidConfig(_))));
    }

    #[test]
    fn build_orders_numbers_sequentially_from_the_allocator() {
        let config = SimulationConfig::new(3, 1, 1, 1, false);
        let allocator = OrderNumberAllocator::starting_at(10);
        let orders = config.build_orders(&allocator);
        let numbers: Vec<OrderNumber> = orders.iter().map(|o| o.number).collect();
        assert_eq!(numbers, vec![OrderNumber(10), OrderNumber(11), OrderNumber(12)]);
        assert!(orders.iter().all(|o| o.len() == 4));
    }

    #[test]
    fn seeded_configs_build_identical_orders() {
        let config = SimulationConfig::new(20, 2, 2, 2, true).with_seed(1234);
        let first = config.build_orders(&OrderNumberAllocator::default());
        let second = config.build_orders(&OrderNumberAllocator::default());
        assert_eq!(first, second);
    }
}
