use coffee_shop::audit::TraceAudit;
use coffee_shop::events::{EventKind, SimulationEvent};
use coffee_shop::lifecycle::{run_simulation, CoffeeShop, SimulationConfig};
use coffee_shop::model::{CustomerId, FoodKind, Menu};
use coffee_shop::report::{self, ShopReport};
use std::collections::BTreeSet;
use std::time::Duration;

fn fast_menu() -> Menu {
    Menu::new(
        Duration::from_millis(6),
        Duration::from_millis(4),
        Duration::from_millis(1),
    )
}

fn count(events: &[SimulationEvent], pred: impl Fn(&EventKind) -> bool) -> usize {
    events.iter().filter(|e| pred(&e.kind)).count()
}

/// Ten customers with the fixed order on a real multi-threaded runtime.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fixed_orders_are_all_served() {
    let config = SimulationConfig::new(10, 5, 5, 2, false).with_menu(fast_menu());
    let events = CoffeeShop::new(config)
        .expect("valid config")
        .run()
        .await
        .expect("simulation failed");

    assert_eq!(count(&events, |k| matches!(k, EventKind::CookReceivedOrder { .. })), 10);
    assert_eq!(count(&events, |k| matches!(k, EventKind::CookCompletedOrder { .. })), 10);
    assert_eq!(count(&events, |k| matches!(k, EventKind::CookFinishedFood { .. })), 40);
    assert_eq!(count(&events, |k| matches!(k, EventKind::StationDoneFood { .. })), 40);

    assert_eq!(report::count_of_kind(&events, FoodKind::Burger), 10);
    assert_eq!(report::count_of_kind(&events, FoodKind::Fries), 20);
    assert_eq!(report::count_of_kind(&events, FoodKind::Coffee), 10);

    let violations = TraceAudit::new(5, 2).check(&events);
    assert!(violations.is_empty(), "violations: {violations:?}");
}

#[tokio::test(start_paused = true)]
async fn test_seeded_random_run_passes_audit() {
    let config = SimulationConfig::new(40, 3, 7, 1, true)
        .with_menu(fast_menu())
        .with_seed(7);
    let events = CoffeeShop::new(config).unwrap().run().await.unwrap();

    let violations = TraceAudit::new(7, 1).check(&events);
    assert!(violations.is_empty(), "violations: {violations:?}");

    let placed: usize = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::CustomerPlacedOrder { .. }))
        .filter_map(|e| e.order())
        .map(|items| items.len())
        .sum();
    let report = ShopReport::from_events(&events);
    assert_eq!(report.total_items(), placed as u64);
    assert_eq!(report.total_completed(), 40);
}

#[tokio::test(start_paused = true)]
async fn test_same_seed_orders_the_same_food() {
    let run = || async {
        let config = SimulationConfig::new(25, 4, 10, 2, true)
            .with_menu(fast_menu())
            .with_seed(99);
        let events = CoffeeShop::new(config).unwrap().run().await.unwrap();
        report::food_count_by_kind(&events)
    };
    assert_eq!(run().await, run().await);
}

#[tokio::test(start_paused = true)]
async fn test_every_customer_leaves() {
    let events = run_simulation(30, 2, 3, 2, true).await.unwrap();

    let started: BTreeSet<CustomerId> = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::CustomerStarting { .. }))
        .filter_map(|e| e.customer())
        .collect();
    let left: BTreeSet<CustomerId> = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::CustomerLeavingShop { .. }))
        .filter_map(|e| e.customer())
        .collect();
    assert_eq!(started.len(), 30);
    assert_eq!(started, left);
}

#[tokio::test(start_paused = true)]
async fn test_report_is_consistent_with_the_trace() {
    let config = SimulationConfig::new(20, 4, 20, 3, false).with_menu(fast_menu());
    let events = CoffeeShop::new(config).unwrap().run().await.unwrap();
    let report = ShopReport::from_events(&events);

    let share: f64 = report.completed_percentage.values().sum();
    assert!((share - 100.0).abs() < 0.01);

    for kind in FoodKind::ALL {
        let direct = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::CookReceivedOrder { .. }))
            .filter_map(|e| e.order())
            .flatten()
            .filter(|food| food.kind == kind)
            .count() as u64;
        assert_eq!(report.food_counts.get(&kind).copied().unwrap_or(0), direct);
    }

    // Every cook reports an average exactly when it completed something.
    assert_eq!(report.average_cooking_time.len(), 4);
    for (cook, average) in &report.average_cooking_time {
        let completed = report.completed_orders.get(cook).copied().unwrap_or(0);
        assert_eq!(average.is_some(), completed > 0);
        if let Some(average) = average {
            assert!(*average >= Duration::from_millis(6));
        }
    }
}

#[tokio::test]
async fn test_no_customers_still_opens_and_closes_the_shop() {
    let events = run_simulation(0, 2, 1, 1, false).await.unwrap();
    assert_eq!(count(&events, |k| matches!(k, EventKind::CookStarting { .. })), 2);
    assert_eq!(count(&events, |k| matches!(k, EventKind::CookEnding { .. })), 2);
    assert_eq!(count(&events, |k| matches!(k, EventKind::StationEnding { .. })), 3);
    assert!(TraceAudit::new(1, 1).check(&events).is_empty());
}
