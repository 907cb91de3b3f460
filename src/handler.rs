//! Handler registration contract.
//!
//! A [`Handler`] is the unit registered against one or more route patterns.
//! It carries an explicit optional operation per routable verb instead of a
//! single required interface, so a handler that only answers GET simply
//! leaves its POST slot empty. The dispatcher reports an empty slot as a
//! per-request configuration error rather than tearing anything down.
//!
//! Operations receive a [`HandlerRequest`] and mutate a [`HandlerResponse`]
//! in place. The routing core never interprets the request beyond its method
//! and path; everything else is passed through for the handler's benefit.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::Method;
use serde::Serialize;
use smallvec::SmallVec;

/// Maximum inline response headers before heap allocation.
/// Typical responses carry a handful of headers at most.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the response under construction.
///
/// Header names use `Arc<str>` because they are almost always well-known
/// constants (`Content-Type`, `Location`); values are per-request data.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// A verb-named operation on a handler.
///
/// Mutates the response in place on success; failures are opaque to the
/// dispatch core and surface as a handler invocation error.
pub type HandlerFn =
    Arc<dyn Fn(&HandlerRequest, &mut HandlerResponse) -> anyhow::Result<()> + Send + Sync>;

/// The routable HTTP verbs.
///
/// Only GET and POST reach handlers; any other method is answered with
/// 405 before a handler is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    /// Map an HTTP method onto a routable verb, or `None` for everything else.
    #[must_use]
    pub fn from_method(method: &Method) -> Option<Self> {
        if method == Method::GET {
            Some(Verb::Get)
        } else if method == Method::POST {
            Some(Verb::Post)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed view of an inbound request handed to handler operations.
///
/// Built by the server layer from the raw HTTP request. Header and cookie
/// keys are lowercased at parse time. `form_params` is populated only for
/// `application/x-www-form-urlencoded` bodies.
#[derive(Debug, Clone, Default)]
pub struct HandlerRequest {
    /// HTTP method as received (not restricted to routable verbs)
    pub method: Method,
    /// Request path with any query string already split off
    pub path: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Cookies parsed from the Cookie header
    pub cookies: HashMap<String, String>,
    /// Query string parameters
    pub query_params: HashMap<String, String>,
    /// Form fields from a urlencoded request body
    pub form_params: HashMap<String, String>,
}

impl HandlerRequest {
    /// Get a header by name (case-insensitive; keys are stored lowercase)
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn get_cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn get_form_param(&self, name: &str) -> Option<&str> {
        self.form_params.get(name).map(String::as_str)
    }
}

/// Response under construction, mutated in place by a handler operation.
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    /// HTTP status code (200 until a handler or the dispatcher says otherwise)
    pub status: u16,
    /// Response headers (stack-allocated for ≤16 entries)
    pub headers: HeaderVec,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl Default for HandlerResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerResponse {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: HeaderVec::new(),
            body: Vec::new(),
        }
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Add or replace a header (name match is case-insensitive).
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serialize `body` as the JSON response body.
    pub fn json<T: Serialize>(&mut self, body: &T) -> anyhow::Result<()> {
        self.set_header("Content-Type", "application/json".to_string());
        self.body = serde_json::to_vec(body)?;
        Ok(())
    }

    /// Set an HTML response body.
    pub fn html(&mut self, body: impl Into<String>) {
        self.set_header("Content-Type", "text/html; charset=utf-8".to_string());
        self.body = body.into().into_bytes();
    }

    /// Redirect-after-post: 302 with a Location header and empty body.
    pub fn redirect(&mut self, location: &str) {
        self.status = 302;
        self.set_header("Location", location.to_string());
        self.body.clear();
    }
}

/// A named handler exposing an optional operation per routable verb.
///
/// Built with [`Handler::new`] plus `on_get`/`on_post`, then registered in
/// the route table behind an `Arc`. The name is carried for diagnostics: a
/// verb hitting an empty slot is logged with the handler's identity.
#[derive(Clone)]
pub struct Handler {
    name: Arc<str>,
    get: Option<HandlerFn>,
    post: Option<HandlerFn>,
}

impl Handler {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            get: None,
            post: None,
        }
    }

    /// Install the GET operation.
    #[must_use]
    pub fn on_get<F>(mut self, f: F) -> Self
    where
        F: Fn(&HandlerRequest, &mut HandlerResponse) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.get = Some(Arc::new(f));
        self
    }

    /// Install the POST operation.
    #[must_use]
    pub fn on_post<F>(mut self, f: F) -> Self
    where
        F: Fn(&HandlerRequest, &mut HandlerResponse) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.post = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up the operation for a verb, if this handler implements it.
    #[must_use]
    pub fn operation(&self, verb: Verb) -> Option<&HandlerFn> {
        match verb {
            Verb::Get => self.get.as_ref(),
            Verb::Post => self.post.as_ref(),
        }
    }

    #[must_use]
    pub fn supports(&self, verb: Verb) -> bool {
        self.operation(verb).is_some()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("get", &self.get.is_some())
            .field("post", &self.post.is_some())
            .finish()
    }
}
