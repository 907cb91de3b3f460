//! # Dispatcher Module
//!
//! The front controller: every inbound request passes through
//! [`Dispatcher::dispatch`] exactly once. It resolves the request path
//! against the route table, picks the verb-appropriate operation on the
//! resolved handler, invokes it, and translates each possible miss into a
//! well-defined failure signal.
//!
//! ## Failure semantics
//!
//! | Condition | Signal | Status |
//! |---|---|---|
//! | No registry entry matches path | [`DispatchError::RouteNotFound`] | 404 |
//! | Verb not GET/POST | [`DispatchError::MethodNotAllowed`] | 405 |
//! | Handler missing verb operation | [`DispatchError::MissingOperation`] | 500 |
//! | Handler operation raises or panics | [`DispatchError::HandlerFailed`] | 500 |
//!
//! Nothing is retried, and no failure is fatal to the serving process. The
//! two 500-class variants are logged as system faults with enough detail to
//! fix at deploy time; the 404/405 variants are ordinary client traffic.

mod core;

pub use core::{DispatchError, Dispatcher};
