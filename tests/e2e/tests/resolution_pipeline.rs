//! Full Resolution Pipeline Tests
//!
//! Drives the resolver the way a request filter would in production: a
//! cluster snapshot arrives as JSON, requests come in over the wire, get
//! their targets rewritten in place, and the audit set feeds the access log.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;
use strata_authz::{
    AliasAction, AuthzError, IndicesResolver, Principal, ResolvableRequest, ResolveOptions,
    RoleGrants, NO_INDEX_PLACEHOLDER, SECURITY_INDEX,
};
use strata_core::{ClusterMetadata, FixedClock};

/// Cluster snapshot as it would arrive from the metadata service.
fn cluster_from_json() -> ClusterMetadata {
    serde_json::from_value(json!({
        "indices": {
            "events-2026.07": "open",
            "events-2026.08": "open",
            "events-archive": "closed",
            "billing": "open",
            "billing-cold": "closed",
            "metrics": "open",
            ".security": "open"
        },
        "aliases": {
            "events": ["events-2026.07", "events-2026.08"],
            "billing-all": ["billing", "billing-cold"]
        }
    }))
    .expect("snapshot should deserialize")
}

/// Resolver pinned to a fixed wall clock so date math is reproducible.
fn fixed_resolver() -> IndicesResolver {
    let now = Utc.with_ymd_and_hms(2026, 8, 26, 8, 0, 0).unwrap();
    IndicesResolver::with_clock(Arc::new(FixedClock(now)))
}

/// The ordinary caller every test runs as unless it says otherwise.
fn analyst() -> (Principal, RoleGrants) {
    (
        Principal::new("analyst"),
        RoleGrants::new(["events*", "billing*"]),
    )
}

#[test]
fn test_search_request_rewrite_and_audit_log() {
    // Initialize tracing for test visibility
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let metadata = cluster_from_json();
    assert_eq!(metadata.index_count(), 7);
    assert_eq!(metadata.alias_count(), 2);

    let resolver = fixed_resolver();
    let (principal, grants) = analyst();

    let mut request = ResolvableRequest::search(["events-*"]);
    let audit = resolver
        .resolve(&principal, &grants, &mut request, &metadata)
        .expect("search should resolve");

    // Open monthly indices only; the archive is closed and stays out.
    assert_eq!(request.indices(), ["events-2026.07", "events-2026.08"]);

    // The audit set is what the access log records.
    let entry = json!({
        "principal": principal.name(),
        "granted": audit,
    });
    tracing::info!("access log entry: {}", entry);
    assert_eq!(entry["granted"].as_array().map(Vec::len), Some(2));

    // The rewritten request survives the trip back over the wire.
    let wire = serde_json::to_string(&request).expect("serialize");
    let back: ResolvableRequest = serde_json::from_str(&wire).expect("deserialize");
    assert_eq!(back, request);
}

#[test]
fn test_date_math_resolves_against_the_pinned_clock() {
    let metadata = cluster_from_json();
    let resolver = fixed_resolver();
    let (principal, grants) = analyst();

    let mut request = ResolvableRequest::search(["<events-{now/M{yyyy.MM}}>"]);
    let audit = resolver
        .resolve(&principal, &grants, &mut request, &metadata)
        .expect("dated name should resolve");

    assert_eq!(request.indices(), ["events-2026.08"]);
    assert!(audit.contains("events-2026.08"));
}

#[test]
fn test_alias_listing_resolves_both_sides() {
    let metadata = cluster_from_json();
    let resolver = fixed_resolver();
    let (principal, grants) = analyst();

    let mut request = ResolvableRequest::get_aliases(["billing*"], ["events"]);
    let audit = resolver
        .resolve(&principal, &grants, &mut request, &metadata)
        .expect("alias listing should resolve");

    assert_eq!(request.indices(), ["events"]);
    assert_eq!(request.aliases(), ["billing-all"]);
    assert!(audit.contains("events"));
    assert!(audit.contains("billing-all"));
}

#[test]
fn test_alias_swap_batch_rewrites_every_action() {
    let metadata = cluster_from_json();
    let resolver = fixed_resolver();
    let (principal, grants) = analyst();

    let mut request = ResolvableRequest::alias_actions([
        AliasAction::add().index("events-2026.08").alias("current"),
        AliasAction::remove().index("billing-cold").alias("billing*"),
    ]);
    let audit = resolver
        .resolve(&principal, &grants, &mut request, &metadata)
        .expect("alias swap should resolve");

    let actions = match &request {
        ResolvableRequest::AliasActions { actions } => actions,
        other => panic!("request changed shape: {other:?}"),
    };
    // An add names its alias literally; a remove expands alias wildcards.
    assert_eq!(actions[0].aliases(), ["current"]);
    assert_eq!(actions[1].aliases(), ["billing-all"]);

    assert!(audit.contains("events-2026.08"));
    assert!(audit.contains("current"));
    assert!(audit.contains("billing-cold"));
    assert!(audit.contains("billing-all"));
}

#[test]
fn test_composite_request_resolves_each_child_in_isolation() {
    let metadata = cluster_from_json();
    let resolver = fixed_resolver();
    let (principal, grants) = analyst();

    let mut request = ResolvableRequest::composite([
        ResolvableRequest::search(["events-*"]),
        ResolvableRequest::get_aliases(["billing*"], ["billing"]),
        ResolvableRequest::fixed(["metrics", "whatever"]),
    ]);
    let audit = resolver
        .resolve(&principal, &grants, &mut request, &metadata)
        .expect("composite should resolve");

    let requests = match &request {
        ResolvableRequest::Composite { requests } => requests,
        other => panic!("request changed shape: {other:?}"),
    };
    assert_eq!(requests[0].indices(), ["events-2026.07", "events-2026.08"]);
    assert_eq!(requests[1].aliases(), ["billing-all"]);
    // Fixed children are audited verbatim and never rewritten.
    assert_eq!(requests[2].indices(), ["metrics", "whatever"]);

    let names: Vec<&str> = audit.iter().map(String::as_str).collect();
    assert_eq!(
        names,
        [
            "billing",
            "billing-all",
            "events-2026.07",
            "events-2026.08",
            "metrics",
            "whatever",
        ]
    );
}

#[test]
fn test_composite_failure_leaves_every_child_untouched() {
    let metadata = cluster_from_json();
    let resolver = fixed_resolver();
    let (principal, grants) = analyst();

    let strict = ResolveOptions::from_flags(false, false, true, false);
    let mut request = ResolvableRequest::composite([
        ResolvableRequest::search(["events-*"]),
        ResolvableRequest::indices_with_options(["absent*"], strict),
    ]);
    let before = request.clone();

    let err = resolver
        .resolve(&principal, &grants, &mut request, &metadata)
        .unwrap_err();
    assert!(matches!(err, AuthzError::NoSuchIndex));
    assert_eq!(request, before);
}

#[test]
fn test_reserved_index_is_invisible_to_ordinary_callers() {
    let metadata = cluster_from_json();
    let resolver = fixed_resolver();

    let sweeper = Principal::internal("_lifecycle");
    let mut request = ResolvableRequest::search([".sec*"]);
    let audit = resolver
        .resolve(&sweeper, &RoleGrants::all(), &mut request, &metadata)
        .expect("internal caller should resolve");
    assert_eq!(request.indices(), [SECURITY_INDEX]);
    assert!(audit.contains(SECURITY_INDEX));

    // Same expression, same grants, ordinary caller: nothing to see.
    let (principal, _) = analyst();
    let mut request = ResolvableRequest::search([".sec*"]);
    let audit = resolver
        .resolve(&principal, &RoleGrants::all(), &mut request, &metadata)
        .expect("placeholder instead of a leak");
    assert_eq!(request.indices(), [NO_INDEX_PLACEHOLDER]);
    assert_eq!(audit.len(), 1);
}
