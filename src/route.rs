//! Route table and translation path resolution.
//!
//! A route is an ordered language pair backed by exactly one direct model.
//! Pairs without a route are served by chaining two routes through the
//! bridge language. Routes that fail to load are poisoned: a one-way
//! transition that makes the pair unavailable until the process restarts.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::warn;

use crate::config::{RouteEntry, RoutingConfig};

/// Ordered (source, target) language pair. Directional: a route for
/// (a, b) says nothing about (b, a).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePair {
    pub source: String,
    pub target: String,
}

impl RoutePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for RoutePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.source, self.target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    /// Route exists and its model may be loaded
    Active,
    /// Route's model failed to load; pair is unavailable until restart
    Poisoned,
    /// No route for this pair
    Unknown,
}

#[derive(Debug, Clone)]
struct Route {
    model: String,
    status: RouteStatus,
}

/// Mapping of route pairs to model identifiers, with per-pair status.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<RoutePair, Route>,
}

impl RouteTable {
    pub fn from_entries(entries: &[RouteEntry]) -> Self {
        let routes = entries
            .iter()
            .map(|e| {
                (
                    RoutePair::new(e.source.clone(), e.target.clone()),
                    Route {
                        model: e.model.clone(),
                        status: RouteStatus::Active,
                    },
                )
            })
            .collect();

        Self { routes }
    }

    /// Model identifier for an active route. Poisoned routes behave as
    /// absent.
    pub fn model_id(&self, pair: &RoutePair) -> Option<&str> {
        self.routes
            .get(pair)
            .filter(|r| r.status == RouteStatus::Active)
            .map(|r| r.model.as_str())
    }

    pub fn has_active(&self, pair: &RoutePair) -> bool {
        self.model_id(pair).is_some()
    }

    pub fn status(&self, pair: &RoutePair) -> RouteStatus {
        self.routes
            .get(pair)
            .map(|r| r.status)
            .unwrap_or(RouteStatus::Unknown)
    }

    /// Mark a route as poisoned after an unrecoverable model load failure.
    /// One-way: a poisoned route is never reactivated in-process. Returns
    /// false if the pair had no route or was already poisoned.
    pub fn poison(&mut self, pair: &RoutePair) -> bool {
        match self.routes.get_mut(pair) {
            Some(route) if route.status == RouteStatus::Active => {
                warn!("Poisoning route {} (model: {})", pair, route.model);
                route.status = RouteStatus::Poisoned;
                true
            }
            _ => false,
        }
    }

    /// All pairs with an active route
    pub fn active_pairs(&self) -> Vec<RoutePair> {
        self.routes
            .iter()
            .filter(|(_, r)| r.status == RouteStatus::Active)
            .map(|(pair, _)| pair.clone())
            .collect()
    }

    /// All routes with their model and status, for status reporting
    pub fn entries(&self) -> Vec<(RoutePair, String, RouteStatus)> {
        self.routes
            .iter()
            .map(|(pair, r)| (pair.clone(), r.model.clone(), r.status))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    Direct,
    Pivot,
    Unsupported,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKind::Direct => write!(f, "direct"),
            PathKind::Pivot => write!(f, "pivot"),
            PathKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Resolved translation path for a language pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationPath {
    /// Single model invocation over the requested pair
    Direct(RoutePair),
    /// Two sequential invocations through the bridge language
    Pivot { first: RoutePair, second: RoutePair },
    Unsupported,
}

impl TranslationPath {
    pub fn kind(&self) -> PathKind {
        match self {
            TranslationPath::Direct(_) => PathKind::Direct,
            TranslationPath::Pivot { .. } => PathKind::Pivot,
            TranslationPath::Unsupported => PathKind::Unsupported,
        }
    }

    /// Model invocation legs, in execution order
    pub fn hops(&self) -> Vec<&RoutePair> {
        match self {
            TranslationPath::Direct(pair) => vec![pair],
            TranslationPath::Pivot { first, second } => vec![first, second],
            TranslationPath::Unsupported => vec![],
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, TranslationPath::Unsupported)
    }
}

impl fmt::Display for TranslationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationPath::Direct(pair) => write!(f, "{} → {}", pair.source, pair.target),
            TranslationPath::Pivot { first, second } => {
                write!(f, "{} → {} → {}", first.source, first.target, second.target)
            }
            TranslationPath::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Decides direct / pivot / unsupported for a language pair against the
/// shared route table.
#[derive(Debug, Clone)]
pub struct PathResolver {
    routes: Arc<RwLock<RouteTable>>,
    bridge: String,
    no_direct: HashSet<String>,
}

impl PathResolver {
    pub fn new(routes: Arc<RwLock<RouteTable>>, routing: &RoutingConfig) -> Self {
        Self {
            routes,
            bridge: routing.bridge.clone(),
            no_direct: routing.no_direct.iter().cloned().collect(),
        }
    }

    pub fn bridge(&self) -> &str {
        &self.bridge
    }

    /// Resolve the translation path for (source, target).
    ///
    /// Callers must reject source == target before resolving. When source
    /// or target equals the bridge, the pivot would degenerate to a single
    /// leg; those pairs are decided by the direct rule alone, so a
    /// bridge→bridge leg can never be produced.
    pub fn resolve(&self, source: &str, target: &str) -> TranslationPath {
        let table = self.routes.read().expect("route table lock poisoned");

        if self.direct_ok(&table, source, target) {
            return TranslationPath::Direct(RoutePair::new(source, target));
        }

        if source != self.bridge
            && target != self.bridge
            && self.direct_ok(&table, source, &self.bridge)
            && self.direct_ok(&table, &self.bridge, target)
        {
            return TranslationPath::Pivot {
                first: RoutePair::new(source, self.bridge.clone()),
                second: RoutePair::new(self.bridge.clone(), target),
            };
        }

        TranslationPath::Unsupported
    }

    /// A leg qualifies as direct when an active route exists and neither
    /// endpoint is on the no-direct denylist.
    fn direct_ok(&self, table: &RouteTable, source: &str, target: &str) -> bool {
        if self.no_direct.contains(source) || self.no_direct.contains(target) {
            return false;
        }
        table.has_active(&RoutePair::new(source, target))
    }
}
