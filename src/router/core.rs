//! Route registry core - the copy-on-write active table.
//!
//! Reads are lock-free: `resolve` dereferences the latest published
//! snapshot through an `ArcSwap` and scans it, so a request-handling
//! task never coordinates with writers and always observes a complete
//! table. Mutations (`bind`/`unbind`) serialize behind a writer lock,
//! build a fresh table and atomically publish it.

use crate::conflict::ConflictDetector;
use crate::ids::OwnerId;
use crate::pattern::{MalformedTemplateError, PathParams, PathPattern};
use crate::route::{Route, RouteSet, SUPPORTED_METHODS};
use arc_swap::ArcSwap;
use http::Method;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Result of successfully resolving a request to a route.
///
/// Carries the matched route and the parameters extracted from the
/// request path. The caller injects the decoded values into the
/// eventual handler invocation; the registry itself never executes
/// anything.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route (Arc, shared with the active table)
    pub route: Arc<Route>,
    /// Path parameters captured from the URL, raw until decoded on read
    pub params: PathParams,
}

/// One immutable snapshot of the active table.
///
/// Per-method vectors keep declaration order, which is what
/// first-match-wins resolution scans.
#[derive(Debug, Default)]
struct RouteTable {
    by_method: HashMap<Method, Vec<Arc<Route>>>,
}

impl RouteTable {
    fn build(routes: Vec<Arc<Route>>) -> Self {
        let mut by_method: HashMap<Method, Vec<Arc<Route>>> = HashMap::new();
        for route in routes {
            by_method
                .entry(route.method().clone())
                .or_default()
                .push(route);
        }
        Self { by_method }
    }

    fn routes(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.by_method.values().flatten()
    }

    fn len(&self) -> usize {
        self.by_method.values().map(Vec::len).sum()
    }
}

/// The router proper: owns the table of active routes across all bound
/// owners.
///
/// Shared-resource discipline: many concurrent `resolve` readers, rare
/// bind/unbind writers. A `resolve` call observes either the
/// pre-mutation table or the post-mutation table in full, never a
/// partially merged state.
pub struct RouteRegistry {
    table: ArcSwap<RouteTable>,
    /// Serializes mutations against each other, never against readers.
    write_lock: Mutex<()>,
}

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: ArcSwap::from_pointee(RouteTable::default()),
            write_lock: Mutex::new(()),
        }
    }

    /// Merge `set` into the active table as `owner`'s contribution.
    ///
    /// Binding again for the same owner without an intervening
    /// [`unbind`](Self::unbind) replaces that owner's previous
    /// contribution. Each declaration is compiled here; a malformed
    /// template rejects that single route and is returned, while its
    /// siblings still proceed. Declarations outside
    /// [`SUPPORTED_METHODS`] are filtered.
    ///
    /// Conflicts never surface to the caller: every excised group is
    /// reported through the diagnostic channel and enforced by table
    /// mutation alone. A conflicted bind contributes nothing - the
    /// whole incoming set is voided and any pre-existing participant
    /// of a conflict group is excised with it, old and new alike.
    pub fn bind(&self, owner: OwnerId, set: RouteSet) -> Vec<MalformedTemplateError> {
        let _guard = self.lock_writer();

        let mut malformed = Vec::new();
        let mut candidates: Vec<Arc<Route>> = Vec::with_capacity(set.len());
        for decl in set.iter() {
            if !SUPPORTED_METHODS.contains(&decl.method) {
                debug!(
                    method = %decl.method,
                    path = %decl.path,
                    "Dropping declaration with unsupported method"
                );
                continue;
            }
            match PathPattern::compile(&decl.path) {
                Ok(pattern) => {
                    candidates.push(Arc::new(Route::new(
                        decl.method.clone(),
                        pattern,
                        owner,
                        decl.action.clone(),
                    )));
                }
                Err(err) => {
                    warn!(
                        owner = %owner,
                        path = %decl.path,
                        error = %err,
                        "Rejecting malformed route template"
                    );
                    malformed.push(err);
                }
            }
        }

        let current = self.table.load();
        // Rebind replaces this owner's previous contribution before
        // conflicts are evaluated.
        let mut active: Vec<Arc<Route>> = current
            .routes()
            .filter(|r| r.owner() != owner)
            .cloned()
            .collect();

        let conflicts = ConflictDetector::detect(&candidates, &active);
        let bound = if conflicts.is_empty() {
            let n = candidates.len();
            active.extend(candidates);
            n
        } else {
            for group in &conflicts {
                warn!(
                    method = %group.method,
                    path = %group.template,
                    owners = ?group.owners,
                    declarations = group.len(),
                    "Conflicting route declarations, removing every participant"
                );
            }
            active.retain(|r| !ConflictDetector::is_participant(r, &conflicts));
            0
        };

        let table = RouteTable::build(active);
        info!(
            owner = %owner,
            bound,
            excised_groups = conflicts.len(),
            routes_count = table.len(),
            "Routing table updated"
        );
        self.table.store(Arc::new(table));
        malformed
    }

    /// Remove every active route contributed by `owner`.
    ///
    /// Routes of other owners are untouched, including any excised
    /// earlier by a conflict with this owner: an excised route is
    /// destroyed, not suspended, and unbinding does not resurrect it.
    pub fn unbind(&self, owner: OwnerId) {
        let _guard = self.lock_writer();

        let current = self.table.load();
        let remaining: Vec<Arc<Route>> = current
            .routes()
            .filter(|r| r.owner() != owner)
            .cloned()
            .collect();
        let removed = current.len() - remaining.len();
        let table = RouteTable::build(remaining);
        info!(owner = %owner, removed, routes_count = table.len(), "Owner unbound");
        self.table.store(Arc::new(table));
    }

    /// Resolve `(method, path)` to the first matching active route.
    ///
    /// Scans the declaration order for `method`; the first full match
    /// wins. `None` is a normal control-flow outcome - the caller turns
    /// it into a 404 - and is indistinguishable from "never registered",
    /// whether the path was never bound or its routes were excised.
    #[must_use]
    pub fn resolve(&self, method: Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        let table = self.table.load();
        let routes = table.by_method.get(&method)?;
        for route in routes {
            if let Some(params) = route.pattern().match_path(path) {
                debug!(
                    method = %method,
                    path = %path,
                    template = %route.template(),
                    action = %route.action(),
                    "Route matched"
                );
                return Some(RouteMatch {
                    route: Arc::clone(route),
                    params,
                });
            }
        }

        debug!(method = %method, path = %path, "No route matched");
        None
    }

    /// Re-run the pattern match for a route already known (from
    /// [`resolve`](Self::resolve)) to match `path`, yielding the
    /// percent-decoded parameter map.
    #[must_use]
    pub fn decoded_parameters(&self, route: &Route, path: &str) -> HashMap<String, String> {
        route
            .pattern()
            .match_path(path)
            .map(|params| params.decoded_map())
            .unwrap_or_default()
    }

    /// Active routes for `method`, in declaration order.
    #[must_use]
    pub fn routes_for(&self, method: &Method) -> Vec<Arc<Route>> {
        self.table
            .load()
            .by_method
            .get(method)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of active routes across all methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tear the table down to the empty state (process shutdown).
    pub fn clear(&self) {
        let _guard = self.lock_writer();
        self.table.store(Arc::new(RouteTable::default()));
        info!("Routing table cleared");
    }

    /// The table itself lives in the `ArcSwap`, so a panicked writer
    /// cannot have left it inconsistent; recover the guard rather than
    /// propagate the poison.
    fn lock_writer(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
