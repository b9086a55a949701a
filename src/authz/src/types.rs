//! Identity and grant types consumed by resolution.

use serde::{Deserialize, Serialize};

/// The identity a request runs as.
///
/// # Examples
///
/// ```
/// use strata_authz::Principal;
///
/// let user = Principal::new("alice");
/// assert!(!user.is_internal());
///
/// let system = Principal::internal("_maintenance");
/// assert!(system.is_internal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    name: String,
    is_internal: bool,
}

impl Principal {
    /// An ordinary caller.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_internal: false,
        }
    }

    /// A platform-internal identity. Internal identities are allowed to see
    /// reserved indices that are hidden from everyone else; the flag is only
    /// ever consulted while the authorized universe is computed.
    pub fn internal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_internal: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_internal(&self) -> bool {
        self.is_internal
    }
}

/// The index patterns a role grants an identity for one action.
///
/// Patterns may be concrete names or `*` wildcards; `*` alone grants every
/// regular name in the cluster. The resolver treats the set as immutable for
/// the duration of a call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrants {
    patterns: Vec<String>,
}

impl RoleGrants {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// A grant over every regular name.
    pub fn all() -> Self {
        Self::new(["*"])
    }

    /// No grants at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
