//! # Router Module
//!
//! The router module owns the active route table and resolves incoming
//! `(method, path)` pairs against it.
//!
//! ## Overview
//!
//! The registry is responsible for:
//! - Merging each owner's [`RouteSet`](crate::route::RouteSet) into the
//!   active table at bind time
//! - Detecting and excising conflicting declarations before they can
//!   shadow each other at request time
//! - Matching incoming requests in declaration order, first full match
//!   wins
//! - Recovering decoded path parameters for a matched route
//!
//! ## Architecture
//!
//! Two phases:
//!
//! 1. **Bind**: templates are compiled into matchers, the candidate set
//!    is checked for conflicts against the surviving table, and a fresh
//!    immutable snapshot is published atomically.
//!
//! 2. **Resolve**: request paths are tested against the snapshot's
//!    per-method pattern list without any read-side locking.

mod core;

pub use core::{RouteMatch, RouteRegistry};
