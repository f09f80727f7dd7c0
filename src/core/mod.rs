//! Core business logic - framework-agnostic inventory, checkout and reporting operations.
//!
//! Every operation takes a database connection and returns a [`crate::errors::Result`];
//! nothing in here knows about HTTP.

/// Atomic multi-line checkout and transaction history
pub mod checkout;
/// Dashboard aggregates
pub mod dashboard;
/// Feedback submission
pub mod feedback;
/// Linear-regression sales forecast
pub mod forecast;
/// Product catalog management
pub mod product;
/// Catalog seeding from configuration
pub mod seed;
/// Registration, login and password hashing
pub mod user;
