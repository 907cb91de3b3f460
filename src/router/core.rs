//! Route table core - hot path for request resolution.

use crate::handler::Handler;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Mapping from route pattern to handler.
///
/// A pattern is either an exact path (`/board`) or a one-level wildcard
/// (`/board/*`) claiming the prefix and everything one segment below it.
/// Patterns are unique keys; insertion order is irrelevant.
///
/// The table is populated exactly once at start-up via [`initialize`] while
/// still exclusively owned, then moved behind an `Arc` and read concurrently
/// by every request worker. There is no hot-swap protocol: readers never
/// mutate, and the single writer finishes before traffic starts.
///
/// [`initialize`]: RouteTable::initialize
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    mappings: HashMap<String, Arc<Handler>>,
}

impl RouteTable {
    /// Create an empty table. Every resolution fails until `initialize` runs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    /// Replace the entire mapping with `mappings`.
    ///
    /// An empty mapping is legal and causes universal resolution failure.
    /// Duplicate patterns cannot exist; the map type already enforces
    /// last-write-wins on construction.
    pub fn initialize(&mut self, mappings: HashMap<String, Arc<Handler>>) {
        let routes_summary: Vec<String> = {
            let mut patterns: Vec<&String> = mappings.keys().collect();
            patterns.sort();
            patterns
                .iter()
                .take(10)
                .map(|p| format!("{} -> {}", p, mappings[*p].name()))
                .collect()
        };

        info!(
            route_count = mappings.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        self.mappings = mappings;
    }

    /// Resolve a request path to its handler.
    ///
    /// Two-phase lookup: exact match first, then a single level of wildcard
    /// fallback. The fallback truncates the path at its *last* `/` and looks
    /// up `base/*`; it never ascends further. `/board/view/extra` therefore
    /// only consults `/board/view/*`, not `/board/*`, which matches the
    /// granularity the application registers at. A path whose only `/` is at
    /// position 0 has no parent to fall back to.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<Arc<Handler>> {
        debug!(path = %path, "Route match attempt");

        if let Some(handler) = self.mappings.get(path) {
            info!(path = %path, handler = %handler.name(), "Route matched exactly");
            return Some(Arc::clone(handler));
        }

        if let Some(last_slash) = path.rfind('/') {
            if last_slash > 0 {
                let wildcard = format!("{}/*", &path[..last_slash]);
                if let Some(handler) = self.mappings.get(&wildcard) {
                    info!(
                        path = %path,
                        pattern = %wildcard,
                        handler = %handler.name(),
                        "Route matched on wildcard"
                    );
                    return Some(Arc::clone(handler));
                }
            }
        }

        warn!(path = %path, "No route matched");
        None
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// All registered patterns, sorted. Useful at start-up for sanity logs.
    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = self.mappings.keys().cloned().collect();
        patterns.sort();
        patterns
    }

    /// Print the routing table to stdout for debugging.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.mappings.len());
        for pattern in self.patterns() {
            if let Some(handler) = self.mappings.get(&pattern) {
                println!("[route] {pattern} -> {}", handler.name());
            }
        }
    }
}
