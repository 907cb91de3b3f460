//! HTTP hosting boundary built on `may_minihttp`.
//!
//! Supplies the opaque request/response abstraction the routing core relies
//! on: [`request::parse_request`] extracts method, path, headers, cookies,
//! query and form parameters; [`AppService`] runs each request through the
//! dispatcher; [`response`] writes the outcome (or a status signal with a
//! generic JSON body) back onto the wire.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::parse_request;
pub use service::AppService;
