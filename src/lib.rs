//! # bindrouter
//!
//! A bind-time conflict-checked HTTP route registry with lock-free
//! request resolution.
//!
//! ## Overview
//!
//! `bindrouter` maps an incoming `(method, path)` pair to exactly one
//! registered handler reference, extracting any named path parameters
//! along the way. Ambiguous registrations are detected when routes are
//! bound, not when requests arrive: two declarations sharing a method
//! and a raw path template are a conflict, and the whole conflicting
//! group is excised from the table rather than letting one silently
//! shadow the other. Ambiguous routing is worse than missing routing.
//!
//! The crate is purely an in-process registry. The HTTP transport,
//! handler execution, content negotiation and session machinery are
//! external collaborators: they feed `(method, raw path)` in and take a
//! resolved route plus decoded parameters (or a not-found signal) out.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - URI template compilation, matching and
//!   percent-decoding of captured parameters
//! - **[`route`]** - immutable route values, the per-owner `RouteSet`
//!   and the fluent declaration builder
//! - **[`decl`]** - the uniform route-declaration record emitted by an
//!   external scanner, with YAML/JSON file loading
//! - **[`conflict`]** - bind-time collision analysis over the union of
//!   new and active routes
//! - **[`router`]** - the registry proper: copy-on-write active table,
//!   bind/unbind lifecycle and first-match-wins resolution
//! - **[`ids`]** - opaque owner tokens scoping bind and unbind
//!
//! ## Quick Start
//!
//! ```
//! use bindrouter::{OwnerId, RouteRegistry, RouteSet};
//! use http::Method;
//!
//! let registry = RouteRegistry::new();
//! let owner = OwnerId::new();
//!
//! let routes = RouteSet::new()
//!     .declare(Method::GET).on("/users/{id}").to("get_user")
//!     .declare(Method::POST).on("/users").to("create_user");
//! let errors = registry.bind(owner, routes);
//! assert!(errors.is_empty());
//!
//! let m = registry.resolve(Method::GET, "/users/42").expect("route");
//! assert_eq!(m.route.action(), "get_user");
//! assert_eq!(m.params.decoded_value("id").unwrap(), "42");
//! ```
//!
//! ## Concurrency
//!
//! The active table is an immutable snapshot published through an
//! `ArcSwap`. Resolution is lock-free and always observes either the
//! pre-mutation or the post-mutation table in full; bind and unbind
//! serialize only against each other. All operations are synchronous
//! and bounded by the number of active routes.

pub mod conflict;
pub mod decl;
pub mod ids;
pub mod pattern;
pub mod route;
pub mod router;

pub use conflict::{ConflictDetector, ConflictGroup};
pub use decl::{load_decls, RouteDecl};
pub use ids::OwnerId;
pub use pattern::{percent_decode, MalformedTemplateError, PathParams, PathPattern};
pub use route::{Route, RouteBuilder, RouteSet, SUPPORTED_METHODS};
pub use router::{RouteMatch, RouteRegistry};

use once_cell::sync::Lazy;

static GLOBAL: Lazy<RouteRegistry> = Lazy::new(RouteRegistry::new);

/// The process-wide registry.
///
/// Initialized empty on first use and mutated only through
/// [`RouteRegistry::bind`] and [`RouteRegistry::unbind`];
/// [`RouteRegistry::clear`] tears it down at shutdown.
#[must_use]
pub fn global() -> &'static RouteRegistry {
    &GLOBAL
}
