//! Bind-time conflict detection.
//!
//! Two distinct route declarations conflict iff they share an HTTP
//! method and a raw path template string, regardless of owner. Routes
//! with different methods never conflict on the same path. A conflict
//! never picks a winner: every participant of the group is excised from
//! the active table, so a lookup on that key yields not-found instead
//! of silently dispatching to whichever declaration happened to land
//! first.

use crate::ids::OwnerId;
use crate::route::Route;
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;

/// The declarations colliding on one `(method, template)` key.
///
/// Consumed by logging; control flow only needs the key.
#[derive(Debug, Clone)]
pub struct ConflictGroup {
    pub method: Method,
    pub template: String,
    /// Identity of every registration involved, duplicates preserved.
    pub owners: Vec<OwnerId>,
    /// Action identifiers involved, in declaration order.
    pub actions: Vec<String>,
}

impl ConflictGroup {
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Whether `route` is a participant of this group.
    #[must_use]
    pub fn contains(&self, route: &Route) -> bool {
        self.method == *route.method() && self.template == route.template()
    }
}

/// Scans a candidate set together with the active table for colliding
/// declarations.
pub struct ConflictDetector;

impl ConflictDetector {
    /// Group the union of `candidates` and `active` by
    /// `(method, raw template)`; every key claimed by two or more
    /// declarations is a conflict group.
    ///
    /// The active table is conflict-free by construction, so each group
    /// necessarily involves at least one candidate. Groups come back
    /// sorted by template for deterministic diagnostics.
    #[must_use]
    pub fn detect(candidates: &[Arc<Route>], active: &[Arc<Route>]) -> Vec<ConflictGroup> {
        let mut by_key: HashMap<(&Method, &str), Vec<&Arc<Route>>> = HashMap::new();
        for route in candidates.iter().chain(active.iter()) {
            by_key
                .entry((route.method(), route.template()))
                .or_default()
                .push(route);
        }

        let mut groups: Vec<ConflictGroup> = by_key
            .into_iter()
            .filter(|(_, members)| members.len() > 1)
            .map(|((method, template), members)| ConflictGroup {
                method: method.clone(),
                template: template.to_string(),
                owners: members.iter().map(|r| r.owner()).collect(),
                actions: members.iter().map(|r| r.action().to_string()).collect(),
            })
            .collect();
        groups.sort_by(|a, b| (a.template.as_str(), a.method.as_str()).cmp(&(b.template.as_str(), b.method.as_str())));
        groups
    }

    /// Whether `route` participates in any of `groups`.
    #[must_use]
    pub fn is_participant(route: &Route, groups: &[ConflictGroup]) -> bool {
        groups.iter().any(|g| g.contains(route))
    }
}
