//! Shared fixtures for resolver integration tests.
//!
//! One cluster layout is used throughout: a logging stack (open and closed
//! generations behind the `logsearch` alias), a sales stack, a dated
//! reports index, and the protected `.security` index. The member under
//! test holds a mix of concrete grants including one name with no metadata
//! entry ("absent").

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use strata_authz::{
    IndicesResolver, Principal, ResolvableRequest, RoleGrants, NO_INDEX_PLACEHOLDER,
};
use strata_core::{ClusterMetadata, FixedClock, IndexState, MetadataBuilder};

/// Frozen resolution instant: 2026-08-26T10:15:30Z.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 26, 10, 15, 30).unwrap()
}

/// A resolver with the clock pinned to [`fixed_now`], so `<reports-{now/M}>`
/// always lands on the fixture's dated index.
pub fn resolver() -> IndicesResolver {
    IndicesResolver::with_clock(Arc::new(FixedClock(fixed_now())))
}

pub fn cluster_metadata() -> ClusterMetadata {
    MetadataBuilder::default()
        .index("logs", IndexState::Open)
        .index("logstash", IndexState::Open)
        .index("frozen", IndexState::Closed)
        .index("logsearch-data", IndexState::Open)
        .index("logsearch-data-cold", IndexState::Closed)
        .index("logstash-cold", IndexState::Closed)
        .index("sales", IndexState::Open)
        .index("sales-cold", IndexState::Closed)
        .index("sales2", IndexState::Open)
        .index("reports-2026.08.01", IndexState::Open)
        .index(".security", IndexState::Open)
        .alias("logsearch", ["logs", "logstash", "frozen"])
        .alias("sales-view", ["logsearch-data"])
        .build()
        .expect("fixture metadata must build")
}

/// The ordinary member every scenario resolves for unless stated otherwise.
pub fn member() -> Principal {
    Principal::new("member")
}

/// Concrete grants only; "absent" has no metadata entry on purpose.
pub fn member_grants() -> RoleGrants {
    RoleGrants::new([
        "sales",
        "sales-cold",
        "logsearch",
        "logsearch-data",
        "absent",
        "logsearch-data-cold",
    ])
}

/// Member grants extended with the dated reports index, for date-math
/// scenarios that need the resolved name authorized.
pub fn member_grants_with_reports() -> RoleGrants {
    RoleGrants::new([
        "sales",
        "sales-cold",
        "logsearch",
        "logsearch-data",
        "absent",
        "logsearch-data-cold",
        "reports-2026.08.01",
    ])
}

/// A principal holding no index grants at all.
pub fn outsider() -> Principal {
    Principal::new("outsider")
}

pub fn no_grants() -> RoleGrants {
    RoleGrants::none()
}

/// Resolve a request for the fixture member, rewriting it in place.
pub fn resolve_for_member(
    request: &mut ResolvableRequest,
) -> strata_authz::Result<BTreeSet<String>> {
    resolver().resolve(&member(), &member_grants(), request, &cluster_metadata())
}

pub fn names(expected: &[&str]) -> BTreeSet<String> {
    expected.iter().map(|name| (*name).to_string()).collect()
}

/// Assert a request was resolved to the no-index placeholder: the audit set
/// holds exactly the placeholder and the request now targets it.
pub fn assert_no_indices(request: &ResolvableRequest, audit: &BTreeSet<String>) {
    assert_eq!(audit.len(), 1, "audit set should hold only the placeholder");
    assert!(audit.contains(NO_INDEX_PLACEHOLDER));
    assert_eq!(request.indices(), [NO_INDEX_PLACEHOLDER]);
}
