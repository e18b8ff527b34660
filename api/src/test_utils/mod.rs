//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - The repository traits are async and take borrowed ids, which mockall
//!   handles poorly
//! - Manual mocks keep real state, so a service's writes can be read back
//! - We control exactly what they return without macro magic

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
