//! # Coffee Shop
//!
//! > **A concurrent coffee-shop simulation built from small Tokio actors.**
//!
//! Customers enter a shop with a limited number of tables, place an order and
//! wait for it. Cooks take orders from a shared queue, hand every item to the
//! station that prepares its kind of food, and announce the order complete once
//! all items are back. Every interesting step is appended to one event log, and
//! the log is the only output of a run.
//!
//! ## 🏗️ Design Philosophy
//!
//! - **Actors own their loop.** Cooks and customers are plain structs implementing
//!   [`Actor`](framework::Actor). They receive their shared resources when they
//!   start, not when they are built.
//! - **Resources own their invariants.** The [`AdmissionGate`](coordination::AdmissionGate)
//!   bounds seating, each [`PreparationStation`](station::PreparationStation) bounds
//!   its concurrent items, the [`OrderQueue`](coordination::OrderQueue) hands each
//!   order to exactly one cook. Actors cannot bypass them.
//! - **The trace is the truth.** Every resource records its event while still
//!   holding what the event describes, so the order of the log is a faithful
//!   history. [`audit`] replays it and [`report`] summarizes it.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The [`Actor`](framework::Actor) trait, [`spawn`](framework::spawn) and the
//! crate-wide [`ShopError`](framework::ShopError).
//!
//! ### 2. The Shared Resources ([`coordination`], [`station`], [`events`])
//! Gate, queue, completion registry, the three stations and the event log.
//!
//! ### 3. The Actors ([`cook_actor`], [`customer_actor`])
//! What cooks and customers do, step by step.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! [`CoffeeShop`](lifecycle::CoffeeShop) wires a run together and shuts it
//! down in order.
//!
//! ### 5. After the Run ([`report`], [`audit`])
//! Statistics and consistency checks over a finished trace.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # 10 customers, 5 cooks, 5 tables, 2 items per station, fixed orders
//! RUST_LOG=info cargo run -- --customers 10 --cooks 5 --tables 5 --capacity 2 --fixed-orders
//!
//! # Reproducible random orders, full event trace
//! RUST_LOG=debug cargo run -- --seed 42
//! ```

pub mod audit;
pub mod coordination;
pub mod cook_actor;
pub mod customer_actor;
pub mod events;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod report;
pub mod station;
