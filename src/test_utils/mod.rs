//! Test utilities shared by the unit and HTTP tests.
//!
//! This module provides:
//! - Factories for subscribers and plan catalogs
//! - In-memory implementations of the billing provider and subscriber repository
//! - `TestAppStateBuilder` for exercising routes without Postgres or Stripe

mod app_state_builder;
mod billing_mocks;
mod factories;
mod subscriber_mocks;

pub use app_state_builder::*;
pub use billing_mocks::*;
pub use factories::*;
pub use subscriber_mocks::*;
