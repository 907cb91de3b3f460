//! # portico
//!
//! A front-controller routing and dispatch core for a coroutine-based HTTP
//! server. Every inbound request passes through a single entry point that
//! resolves the request path against a registry of URL patterns and invokes
//! the verb-appropriate operation on the matched handler.
//!
//! ## Architecture
//!
//! - **[`router`]** - the route table: exact paths and one-level `/*`
//!   wildcards mapped to handlers, populated once at start-up and read
//!   concurrently by every request worker
//! - **[`dispatcher`]** - the front controller: path resolution, verb-based
//!   dispatch and mapping of every miss onto a 404/405/500 signal
//! - **[`handler`]** - the registration contract: a named handler with an
//!   optional operation per routable verb (GET, POST)
//! - **[`server`]** - the `may_minihttp` hosting boundary: request parsing,
//!   response writing, and the service entry point
//!
//! ## Usage
//!
//! ```rust,no_run
//! use portico::{AppService, Dispatcher, Handler, HttpServer, RouteTable};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! # fn main() -> std::io::Result<()> {
//! let board = Arc::new(
//!     Handler::new("board")
//!         .on_get(|_req, res| {
//!             res.html("<h1>board</h1>");
//!             Ok(())
//!         })
//!         .on_post(|_req, res| {
//!             res.redirect("/board");
//!             Ok(())
//!         }),
//! );
//!
//! let mut mappings: HashMap<String, Arc<Handler>> = HashMap::new();
//! mappings.insert("/board".to_string(), Arc::clone(&board));
//! mappings.insert("/board/*".to_string(), board);
//!
//! let mut routes = RouteTable::new();
//! routes.initialize(mappings);
//!
//! let dispatcher = Arc::new(Dispatcher::new(Arc::new(routes)));
//! let handle = HttpServer(AppService::new(dispatcher)).start("0.0.0.0:8080")?;
//! handle.join().ok();
//! # Ok(())
//! # }
//! ```
//!
//! Handlers are heterogeneous: nothing forces one to implement both verbs.
//! A verb it was mapped for but does not implement is reported per-request
//! as a configuration error (HTTP 500) with the handler's identity in the
//! logs - never a process failure.

pub mod dispatcher;
pub mod handler;
pub mod router;
pub mod server;

pub use dispatcher::{DispatchError, Dispatcher};
pub use handler::{Handler, HandlerFn, HandlerRequest, HandlerResponse, HeaderVec, Verb};
pub use router::RouteTable;
pub use server::{AppService, HttpServer, ServerHandle};
