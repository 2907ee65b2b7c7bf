use crate::model::{Food, FoodKind, Menu};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::atomic::{AtomicU32, Ordering};

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderNumber(pub u32);

impl From<u32> for OrderNumber {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Represents a customer order: an ordered list of food tagged with a unique number.
///
/// Items are dispatched to stations in list order, so the list is never sorted or
/// grouped by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub number: OrderNumber,
    pub items: Vec<Food>,
}

impl Order {
    pub fn new(number: OrderNumber, items: Vec<Food>) -> Self {
        Self { number, items }
    }

    /// The standard order: one burger, two fries, one coffee.
    pub fn fixed(number: OrderNumber, menu: &Menu) -> Self {
        let items = [
            FoodKind::Burger,
            FoodKind::Fries,
            FoodKind::Fries,
            FoodKind::Coffee,
        ]
        .into_iter()
        .map(|kind| menu.food(kind))
        .collect();
        Self::new(number, items)
    }

    /// Draws an independent count in `0..=2` for each kind and lists them
    /// burgers first, then fries, then coffee. May be empty.
    pub fn random<R: Rng + ?Sized>(number: OrderNumber, menu: &Menu, rng: &mut R) -> Self {
        let mut items = Vec::new();
        for kind in FoodKind::ALL {
            let count = rng.gen_range(0..3);
            items.extend(std::iter::repeat(menu.food(kind)).take(count));
        }
        Self::new(number, items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count_of(&self, kind: FoodKind) -> usize {
        self.items.iter().filter(|food| food.kind == kind).count()
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [", self.number)?;
        for (index, food) in self.items.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{food}")?;
        }
        f.write_str("]")
    }
}

/// Hands out monotonically increasing order numbers.
///
/// Each simulation run creates its own allocator and passes it to whoever builds
/// the customers, so runs never share a counter. [`reset`](Self::reset) rewinds
/// an allocator that is reused by hand.
#[derive(Debug, Default)]
pub struct OrderNumberAllocator {
    next: AtomicU32,
}

impl OrderNumberAllocator {
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }

    pub fn next(&self) -> OrderNumber {
        OrderNumber(self.next.fetch_add(1, Ordering::SeqCst))
    }

    pub fn reset(&self, first: u32) {
        self.next.store(first, Ordering::SeqCst);
    }

    /// The number the next call to [`next`](Self::next) will return.
    pub fn peek(&self) -> OrderNumber {
        OrderNumber(self.next.load(Ordering::SeqCst))
    }
}
