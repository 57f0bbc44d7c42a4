#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Registry lifecycle, resolution and snapshot behavior.

use bindrouter::{OwnerId, RouteRegistry, RouteSet};
use http::Method;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

#[test]
fn resolve_extracts_decoded_and_raw_parameters() {
    init_tracing();
    let registry = RouteRegistry::new();
    registry.bind(
        OwnerId::new(),
        RouteSet::new()
            .declare(Method::GET)
            .on("/{name}/rest/of/url")
            .to("show"),
    );

    let m = registry
        .resolve(Method::GET, "/blue%2Fred%3Fand+green/rest/of/url")
        .expect("route");
    assert_eq!(m.params.raw_value("name"), Some("blue%2Fred%3Fand+green"));
    assert_eq!(m.params.decoded_value("name").unwrap(), "blue/red?and+green");

    let decoded = registry.decoded_parameters(&m.route, "/blue%2Fred%3Fand+green/rest/of/url");
    assert_eq!(
        decoded.get("name").map(String::as_str),
        Some("blue/red?and+green")
    );
}

#[test]
fn resolve_is_method_scoped() {
    let registry = RouteRegistry::new();
    registry.bind(
        OwnerId::new(),
        RouteSet::new().declare(Method::POST).on("/things").to("create"),
    );

    assert!(registry.resolve(Method::POST, "/things").is_some());
    assert!(registry.resolve(Method::GET, "/things").is_none());
}

#[test]
fn resolve_requires_full_segment_match() {
    let registry = RouteRegistry::new();
    registry.bind(
        OwnerId::new(),
        RouteSet::new()
            .declare(Method::GET)
            .on("/users/{id}/posts")
            .to("posts"),
    );

    assert!(registry.resolve(Method::GET, "/users/1/posts").is_some());
    assert!(registry.resolve(Method::GET, "/users/1").is_none());
    assert!(registry.resolve(Method::GET, "/users/1/posts/extra").is_none());
    assert!(registry.resolve(Method::GET, "/users/1/posts/").is_none());
}

#[test]
fn resolution_order_spans_owners_in_bind_order() {
    let registry = RouteRegistry::new();
    registry.bind(
        OwnerId::new(),
        RouteSet::new().declare(Method::GET).on("/v/{a}").to("first"),
    );
    registry.bind(
        OwnerId::new(),
        RouteSet::new().declare(Method::GET).on("/v/{b}").to("second"),
    );

    // Distinct raw templates: both active, earliest bound wins.
    let m = registry.resolve(Method::GET, "/v/x").expect("route");
    assert_eq!(m.route.action(), "first");
}

#[test]
fn global_registry_is_shared_and_clearable() {
    let owner = OwnerId::new();
    bindrouter::global().bind(
        owner,
        RouteSet::new()
            .declare(Method::GET)
            .on("/global/health")
            .to("health"),
    );
    assert!(bindrouter::global()
        .resolve(Method::GET, "/global/health")
        .is_some());

    bindrouter::global().unbind(owner);
    assert!(bindrouter::global()
        .resolve(Method::GET, "/global/health")
        .is_none());
}

#[test]
fn readers_never_observe_a_partially_applied_bind() {
    init_tracing();
    let registry = Arc::new(RouteRegistry::new());
    let stop = Arc::new(AtomicBool::new(false));

    let writer = {
        let registry = Arc::clone(&registry);
        let stop = Arc::clone(&stop);
        std::thread::spawn(move || {
            for _ in 0..200 {
                let owner = OwnerId::new();
                registry.bind(
                    owner,
                    RouteSet::new()
                        .declare(Method::GET)
                        .on("/pair/one")
                        .to("one")
                        .declare(Method::GET)
                        .on("/pair/two")
                        .to("two"),
                );
                registry.unbind(owner);
            }
            stop.store(true, Ordering::Release);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    // One snapshot: the pair is installed and removed
                    // together, so a reader sees both routes or neither.
                    let count = registry.routes_for(&Method::GET).len();
                    assert!(count == 0 || count == 2, "torn snapshot: {count} routes");
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
