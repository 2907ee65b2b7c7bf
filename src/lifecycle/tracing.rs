//! # Observability & Tracing
//!
//! Every appended event is also emitted as a `DEBUG` line, and actors log their
//! lifecycle transitions at `INFO`. Each cook, customer and preparation task
//! runs inside its own span, so lines carry the actor's name inline.
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info cargo run
//!
//! # The full event trace as it is recorded
//! RUST_LOG=debug cargo run
//!
//! # Only the coordination primitives
//! RUST_LOG=coffee_shop::coordination=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a single order looks like:
//!
//! ```text
//! DEBUG actor{name=Customer 3}: seq=41 at_ms=12 Customer 3 placing order #3 [burger, fries, fries, coffee]
//! DEBUG actor{name=Cook 1}: seq=42 at_ms=12 Cook 1 starting order #3 [burger, fries, fries, coffee]
//! DEBUG actor{name=Cook 1}: seq=43 at_ms=12 Cook 1 preparing burger for order #3
//! DEBUG actor{name=Cook 1}:station{name=Grill order=#3}: seq=44 at_ms=12 Grill preparing burger for order #3
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Actor spans already say who is talking
        .compact()
        .init();
}
