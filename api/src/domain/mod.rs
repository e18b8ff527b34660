//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models representing core business concepts
//! - `lifecycle`: Project state machine and operation guards
//! - `ports`: Trait definitions for external dependencies

pub mod entities;
pub mod lifecycle;
pub mod ports;
