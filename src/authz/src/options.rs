//! Per-request expansion and leniency flags.

use serde::{Deserialize, Serialize};

use strata_core::IndexState;

/// Controls how index expressions are expanded and how missing names are
/// treated during resolution.
///
/// Every resolvable request carries one of these. The presets mirror the
/// defaults of the request shapes that use them; arbitrary combinations can
/// be built with [`ResolveOptions::from_flags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Drop names that are missing or unauthorized instead of failing.
    pub ignore_unavailable: bool,
    /// Permit a wildcard expression to expand to nothing.
    pub allow_no_indices: bool,
    /// Wildcards and `_all` cover open indices.
    pub expand_open: bool,
    /// Wildcards and `_all` cover closed indices.
    pub expand_closed: bool,
}

impl ResolveOptions {
    pub const fn from_flags(
        ignore_unavailable: bool,
        allow_no_indices: bool,
        expand_open: bool,
        expand_closed: bool,
    ) -> Self {
        Self {
            ignore_unavailable,
            allow_no_indices,
            expand_open,
            expand_closed,
        }
    }

    /// Fail on missing names, expand wildcards over open indices only.
    pub const fn strict_expand_open() -> Self {
        Self::from_flags(false, true, true, false)
    }

    /// Fail on missing names, expand wildcards over open and closed indices.
    pub const fn strict_expand_open_closed() -> Self {
        Self::from_flags(false, true, true, true)
    }

    /// Drop missing names, expand wildcards over open indices only.
    pub const fn lenient_expand_open() -> Self {
        Self::from_flags(true, true, true, false)
    }

    /// Whether wildcards and `_all` are replaced at all.
    pub const fn wildcard_expansion(&self) -> bool {
        self.expand_open || self.expand_closed
    }

    /// Whether an index in `state` is covered by wildcard expansion.
    pub const fn expands_state(&self, state: IndexState) -> bool {
        match state {
            IndexState::Open => self.expand_open,
            IndexState::Closed => self.expand_closed,
        }
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::strict_expand_open()
    }
}
