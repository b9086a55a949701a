//! Authorized name computation.
//!
//! Before any expression is rewritten, the resolver derives the full set of
//! concrete names the principal may address for the action at hand. Wildcard
//! and `_all` replacement never look at cluster metadata directly; they only
//! ever pick from this set, so an expansion can never leak a name the
//! principal was not granted.

use strata_core::ClusterMetadata;
use tracing::debug;

use crate::pattern;
use crate::types::{Principal, RoleGrants};

/// Index holding security configuration. Stripped from the authorized set of
/// every ordinary principal regardless of grants, and implicitly granted to
/// internal ones.
pub const SECURITY_INDEX: &str = ".security";

const PROTECTED_INDICES: &[&str] = &[SECURITY_INDEX];

/// The concrete names a principal may address, in deterministic order.
///
/// Metadata names (indices and aliases) that match a grant pattern come
/// first, lexicographically; non-wildcard grant literals with no metadata
/// entry follow in grant order. Those trailing literals keep requests for a
/// granted-but-missing name flowing to the availability checks instead of
/// being rejected as unauthorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedNames {
    names: Vec<String>,
}

impl AuthorizedNames {
    pub fn compute(principal: &Principal, grants: &RoleGrants, metadata: &ClusterMetadata) -> Self {
        let granted = |name: &str| {
            pattern::matches_any(grants.patterns().iter().map(String::as_str), name)
        };

        let mut names: Vec<String> = metadata
            .all_names()
            .filter(|name| granted(name))
            .map(str::to_string)
            .collect();

        for literal in grants.patterns() {
            if !pattern::is_wildcard(literal)
                && !metadata.contains(literal)
                && !names.iter().any(|n| n == literal)
            {
                names.push(literal.clone());
            }
        }

        if principal.is_internal() {
            for protected in PROTECTED_INDICES {
                if metadata.contains(protected) && !names.iter().any(|n| n == protected) {
                    names.push((*protected).to_string());
                }
            }
        } else {
            names.retain(|name| !PROTECTED_INDICES.contains(&name.as_str()));
        }

        debug!(
            "Authorized names for principal={}: {} entries",
            principal.name(),
            names.len()
        );
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Authorized names that are aliases in the given metadata, in order.
    pub fn aliases<'a>(&'a self, metadata: &ClusterMetadata) -> Vec<&'a str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|name| metadata.is_alias(name))
            .collect()
    }
}
