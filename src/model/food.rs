use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// The kinds of food the shop can prepare. Each kind has exactly one
/// [`PreparationStation`](crate::station::PreparationStation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Burger,
    Fries,
    Coffee,
}

impl FoodKind {
    /// All kinds, in menu order.
    pub const ALL: [FoodKind; 3] = [FoodKind::Burger, FoodKind::Fries, FoodKind::Coffee];
}

impl Display for FoodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FoodKind::Burger => "burger",
            FoodKind::Fries => "fries",
            FoodKind::Coffee => "coffee",
        };
        f.write_str(name)
    }
}

/// A food item together with the time its station needs to prepare it.
///
/// Two `Food` values are equal when their kinds are equal; the preparation
/// time is a property of the menu, not of the item's identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Food {
    pub kind: FoodKind,
    pub prep_time: Duration,
}

impl Food {
    pub fn new(kind: FoodKind, prep_time: Duration) -> Self {
        Self { kind, prep_time }
    }
}

impl PartialEq for Food {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Food {}

impl Hash for Food {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl Display for Food {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

/// Fixed preparation time per food kind.
///
/// Durations are deterministic so that ordering properties of a run are
/// reproducible. Tests shrink them with [`Menu::uniform`] or [`Menu::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub burger: Duration,
    pub fries: Duration,
    pub coffee: Duration,
}

impl Menu {
    pub fn new(burger: Duration, fries: Duration, coffee: Duration) -> Self {
        Self {
            burger,
            fries,
            coffee,
        }
    }

    /// Every kind takes the same time.
    pub fn uniform(prep_time: Duration) -> Self {
        Self::new(prep_time, prep_time, prep_time)
    }

    pub fn prep_time(&self, kind: FoodKind) -> Duration {
        match kind {
            FoodKind::Burger => self.burger,
            FoodKind::Fries => self.fries,
            FoodKind::Coffee => self.coffee,
        }
    }

    /// Looks up the full [`Food`] value for a kind.
    pub fn food(&self, kind: FoodKind) -> Food {
        Food::new(kind, self.prep_time(kind))
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(600),
            Duration::from_millis(350),
            Duration::from_millis(100),
        )
    }
}
