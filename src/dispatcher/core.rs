//! Front controller core - resolution, verb dispatch and error mapping.

use crate::handler::{HandlerRequest, HandlerResponse, Verb};
use crate::router::RouteTable;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Dispatch failure taxonomy.
///
/// `RouteNotFound` and `MethodNotAllowed` are client-shaped: the request was
/// unroutable and nothing on the server is wrong. `MissingOperation` is a
/// registration defect (a handler mapped for a verb it does not implement)
/// and `HandlerFailed` wraps whatever the handler itself raised; both are
/// server-side faults and are logged as such. All four terminate at the
/// serving boundary as a status signal - none escape to crash the process.
#[derive(Debug)]
pub enum DispatchError {
    /// No registry entry matches the request path (404)
    RouteNotFound {
        /// The unroutable request path
        path: String,
    },
    /// The request method is not a routable verb (405)
    MethodNotAllowed {
        /// The rejected method
        method: String,
        /// The request path, for diagnostics
        path: String,
    },
    /// The resolved handler has no operation for the request verb (500)
    ///
    /// A configuration defect: the handler was registered on a pattern it
    /// does not fully serve. Fixable at deploy time from the logged handler
    /// identity and verb.
    MissingOperation {
        /// Name of the misregistered handler
        handler: String,
        /// The verb the handler lacks
        verb: Verb,
    },
    /// The handler operation returned an error or panicked (500)
    HandlerFailed {
        /// Name of the failing handler
        handler: String,
        /// The verb that was being served
        verb: Verb,
        /// The underlying failure, preserved for diagnostics
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// The HTTP status this failure maps to at the serving boundary.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::RouteNotFound { .. } => 404,
            DispatchError::MethodNotAllowed { .. } => 405,
            DispatchError::MissingOperation { .. } | DispatchError::HandlerFailed { .. } => 500,
        }
    }

    /// Generic client-facing message. Internal detail stays in the logs.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            DispatchError::RouteNotFound { .. } => "Not Found",
            DispatchError::MethodNotAllowed { .. } => "Method Not Allowed",
            DispatchError::MissingOperation { .. } | DispatchError::HandlerFailed { .. } => {
                "Internal Server Error"
            }
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::RouteNotFound { path } => {
                write!(f, "no route matches path '{path}'")
            }
            DispatchError::MethodNotAllowed { method, path } => {
                write!(f, "method '{method}' is not routable (path '{path}')")
            }
            DispatchError::MissingOperation { handler, verb } => {
                write!(
                    f,
                    "handler '{handler}' is registered for {verb} but implements no {verb} operation"
                )
            }
            DispatchError::HandlerFailed {
                handler,
                verb,
                source,
            } => {
                write!(f, "handler '{handler}' failed serving {verb}: {source}")
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::HandlerFailed { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

/// Front controller: the single entry point turning (path, method) into a
/// handler invocation or a well-defined failure.
///
/// Owns a shared reference to the route table and the fixed application-root
/// prefix stripped from request paths before resolution. Stateless per call;
/// safe to share across request workers.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    base_path: String,
}

impl Dispatcher {
    /// Create a dispatcher serving from the application root (`""`).
    #[must_use]
    pub fn new(routes: Arc<RouteTable>) -> Self {
        Self {
            routes,
            base_path: String::new(),
        }
    }

    /// Create a dispatcher mounted under a fixed root prefix (e.g. `/app`).
    ///
    /// The prefix is stripped from request paths to form the routing key,
    /// mirroring a servlet context path.
    #[must_use]
    pub fn with_base_path(routes: Arc<RouteTable>, base_path: impl Into<String>) -> Self {
        Self {
            routes,
            base_path: base_path.into(),
        }
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    fn routing_key<'a>(&self, path: &'a str) -> &'a str {
        if self.base_path.is_empty() {
            path
        } else {
            path.strip_prefix(&self.base_path).unwrap_or(path)
        }
    }

    /// Dispatch one request.
    ///
    /// Resolution order: routing key (root prefix stripped) → route table →
    /// verb recognition → operation lookup → invocation. An unrecognized
    /// verb is rejected before the handler is touched. The invocation is
    /// wrapped in `catch_unwind` so a panicking handler degrades to a
    /// [`DispatchError::HandlerFailed`] instead of killing the worker.
    ///
    /// # Errors
    ///
    /// See [`DispatchError`]; the caller maps each variant to its status.
    pub fn dispatch(
        &self,
        req: &HandlerRequest,
        res: &mut HandlerResponse,
    ) -> Result<(), DispatchError> {
        let key = self.routing_key(&req.path);
        debug!(method = %req.method, path = %req.path, routing_key = %key, "Dispatch begin");

        let handler = self
            .routes
            .resolve(key)
            .ok_or_else(|| DispatchError::RouteNotFound {
                path: req.path.clone(),
            })?;

        let verb = match Verb::from_method(&req.method) {
            Some(verb) => verb,
            None => {
                debug!(
                    method = %req.method,
                    path = %req.path,
                    "Method not routable"
                );
                return Err(DispatchError::MethodNotAllowed {
                    method: req.method.to_string(),
                    path: req.path.clone(),
                });
            }
        };

        let op = handler.operation(verb).ok_or_else(|| {
            error!(
                handler = %handler.name(),
                verb = %verb,
                "Handler registered without an operation for this verb"
            );
            DispatchError::MissingOperation {
                handler: handler.name().to_string(),
                verb,
            }
        })?;

        match catch_unwind(AssertUnwindSafe(|| (**op)(req, res))) {
            Ok(Ok(())) => {
                info!(
                    handler = %handler.name(),
                    verb = %verb,
                    status = res.status,
                    "Request handled"
                );
                Ok(())
            }
            Ok(Err(source)) => {
                error!(
                    handler = %handler.name(),
                    verb = %verb,
                    error = %source,
                    "Handler operation failed"
                );
                Err(DispatchError::HandlerFailed {
                    handler: handler.name().to_string(),
                    verb,
                    source,
                })
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(
                    handler = %handler.name(),
                    verb = %verb,
                    panic_message = %message,
                    "Handler panicked"
                );
                Err(DispatchError::HandlerFailed {
                    handler: handler.name().to_string(),
                    verb,
                    source: anyhow::anyhow!("handler panicked: {message}"),
                })
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
