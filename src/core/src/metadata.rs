//! Immutable cluster metadata snapshot.
//!
//! [`ClusterMetadata`] is the read-only view of index existence, open/closed
//! state, and alias membership that target resolution runs against. A
//! snapshot is built once per cluster-state read and shared across concurrent
//! resolutions; nothing here mutates after [`MetadataBuilder::build`].

use std::collections::btree_map::Keys;
use std::collections::{BTreeMap, BTreeSet};
use std::iter::Peekable;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Characters that can never appear in an index or alias name.
const FORBIDDEN_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#'];

/// Lifecycle state of a concrete index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexState {
    Open,
    Closed,
}

/// Check a candidate index or alias name against the cluster naming rules.
///
/// # Errors
///
/// Returns [`CoreError::InvalidName`] naming the rule that was violated.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CoreError::invalid_name(name, "must not be empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(CoreError::invalid_name(name, "must not contain whitespace"));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(CoreError::invalid_name(
            name,
            format!("must not contain '{c}'"),
        ));
    }
    if name.starts_with('_') {
        return Err(CoreError::invalid_name(name, "must not start with '_'"));
    }
    Ok(())
}

/// Point-in-time view of the cluster's indices and aliases.
///
/// Index and alias namespaces are disjoint; lookups by name answer for
/// either. Iteration order is deterministic (sorted) everywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetadata {
    indices: BTreeMap<String, IndexState>,
    aliases: BTreeMap<String, BTreeSet<String>>,
}

impl ClusterMetadata {
    /// Start building a snapshot.
    pub fn builder() -> MetadataBuilder {
        MetadataBuilder::default()
    }

    /// Whether `name` exists as an index or an alias.
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Whether `name` is a concrete index.
    pub fn has_index(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Whether `name` is an alias.
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// State of the index called `name`, if one exists.
    pub fn index_state(&self, name: &str) -> Option<IndexState> {
        self.indices.get(name).copied()
    }

    /// The indices an alias points at, if the alias exists.
    pub fn alias_members(&self, alias: &str) -> Option<&BTreeSet<String>> {
        self.aliases.get(alias)
    }

    /// Every name in the snapshot, indices and aliases together, sorted.
    pub fn all_names(&self) -> AllNames<'_> {
        AllNames {
            indices: self.indices.keys().peekable(),
            aliases: self.aliases.keys().peekable(),
        }
    }

    /// Iterate over concrete indices and their states, sorted by name.
    pub fn indices(&self) -> impl Iterator<Item = (&str, IndexState)> {
        self.indices.iter().map(|(name, state)| (name.as_str(), *state))
    }

    /// Iterate over alias names, sorted.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.aliases.is_empty()
    }
}

/// Sorted merge over the index and alias name spaces.
pub struct AllNames<'a> {
    indices: Peekable<Keys<'a, String, IndexState>>,
    aliases: Peekable<Keys<'a, String, BTreeSet<String>>>,
}

impl<'a> Iterator for AllNames<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        match (self.indices.peek(), self.aliases.peek()) {
            (Some(index), Some(alias)) => {
                if index.as_str() <= alias.as_str() {
                    self.indices.next().map(String::as_str)
                } else {
                    self.aliases.next().map(String::as_str)
                }
            }
            (Some(_), None) => self.indices.next().map(String::as_str),
            (None, _) => self.aliases.next().map(String::as_str),
        }
    }
}

/// Builder for [`ClusterMetadata`]. Collects declarations, then validates
/// everything at once in [`build`](MetadataBuilder::build).
#[derive(Debug, Default)]
pub struct MetadataBuilder {
    indices: BTreeMap<String, IndexState>,
    aliases: BTreeMap<String, BTreeSet<String>>,
}

impl MetadataBuilder {
    /// Declare a concrete index.
    pub fn index(mut self, name: impl Into<String>, state: IndexState) -> Self {
        self.indices.insert(name.into(), state);
        self
    }

    /// Declare an alias over one or more indices. Repeated calls for the
    /// same alias merge their targets.
    pub fn alias<I, S>(mut self, alias: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases
            .entry(alias.into())
            .or_default()
            .extend(targets.into_iter().map(Into::into));
        self
    }

    /// Validate and freeze the snapshot.
    ///
    /// # Errors
    ///
    /// Fails when a name violates the naming rules, an alias shares its name
    /// with an index, or an alias targets an index that was never declared.
    pub fn build(self) -> Result<ClusterMetadata> {
        for name in self.indices.keys() {
            validate_name(name)?;
        }
        for (alias, targets) in &self.aliases {
            validate_name(alias)?;
            if self.indices.contains_key(alias) {
                return Err(CoreError::NameCollision(alias.clone()));
            }
            for target in targets {
                if !self.indices.contains_key(target) {
                    return Err(CoreError::unknown_alias_target(alias, target));
                }
            }
        }
        Ok(ClusterMetadata {
            indices: self.indices,
            aliases: self.aliases,
        })
    }
}
