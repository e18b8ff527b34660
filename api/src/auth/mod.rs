//! Request authentication
//!
//! Users sign in through an upstream proxy, which forwards the authenticated
//! identity in headers. This module turns those headers into an [`Actor`].

pub mod actor;

pub use actor::{actor_middleware, optional_actor_middleware};
