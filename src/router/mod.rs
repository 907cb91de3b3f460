//! # Router Module
//!
//! Route resolution for the front controller. The route table maps string
//! patterns to handlers and is queried on every inbound request.
//!
//! ## Overview
//!
//! The table supports two pattern shapes:
//!
//! - exact paths (`/board`, `/upload`)
//! - one-level wildcards (`/board/*`), claiming the prefix plus everything
//!   one segment below it
//!
//! ## Lifecycle
//!
//! 1. **Initialization**: start-up code builds the complete pattern→handler
//!    mapping and installs it with [`RouteTable::initialize`] before the
//!    server accepts routed traffic.
//! 2. **Resolution**: each request asks [`RouteTable::resolve`] for the
//!    handler owning its path - exact match first, then one level of
//!    wildcard fallback.
//!
//! After initialization the table is shared read-only across all request
//! workers; there is no supported route hot-swap while traffic is live.

mod core;

pub use core::RouteTable;
