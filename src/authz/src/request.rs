//! Resolvable request shapes.
//!
//! Resolution only ever sees the closed set of shapes below, so every
//! request kind has an explicit, auditable strategy. Shapes that carry
//! wildcard-replaceable index expressions embed their own
//! [`ResolveOptions`]; shapes that address names verbatim do not.

use serde::{Deserialize, Serialize};

use crate::options::ResolveOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasActionKind {
    Add,
    Remove,
}

/// One add or remove entry of an alias maintenance request.
///
/// Index expressions expand like any replaceable expression. Alias
/// expressions expand only for removals; an `add` must name the alias it
/// creates literally, so wildcards on its alias side stay untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasAction {
    kind: AliasActionKind,
    indices: Vec<String>,
    aliases: Vec<String>,
    options: ResolveOptions,
}

impl AliasAction {
    fn new(kind: AliasActionKind) -> Self {
        Self {
            kind,
            indices: Vec::new(),
            aliases: Vec::new(),
            // Alias maintenance refuses to target nothing at all.
            options: ResolveOptions::from_flags(false, false, true, false),
        }
    }

    pub fn add() -> Self {
        Self::new(AliasActionKind::Add)
    }

    pub fn remove() -> Self {
        Self::new(AliasActionKind::Remove)
    }

    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.indices.push(name.into());
        self
    }

    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(name.into());
        self
    }

    pub fn kind(&self) -> AliasActionKind {
        self.kind
    }

    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    pub(crate) fn expands_alias_wildcards(&self) -> bool {
        matches!(self.kind, AliasActionKind::Remove)
    }

    pub(crate) fn replace(&mut self, indices: Vec<String>, aliases: Vec<String>) {
        self.indices = indices;
        self.aliases = aliases;
    }
}

/// A request whose index targets the resolver can rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolvableRequest {
    /// A plain index expression list, e.g. a search or delete.
    Indices {
        indices: Vec<String>,
        options: ResolveOptions,
    },
    /// An alias read carrying both an index and an alias expression list.
    GetAliases {
        indices: Vec<String>,
        aliases: Vec<String>,
        options: ResolveOptions,
    },
    /// A batch of alias add/remove actions, resolved independently.
    AliasActions { actions: Vec<AliasAction> },
    /// A container of sub-requests, resolved independently.
    Composite { requests: Vec<ResolvableRequest> },
    /// Names addressed verbatim, audited but never rewritten.
    Fixed { indices: Vec<String> },
}

impl ResolvableRequest {
    /// A search-style request: wildcards cover open indices, missing names
    /// fail.
    pub fn search<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::indices_with_options(indices, ResolveOptions::strict_expand_open())
    }

    /// A destructive index request: wildcards cover open and closed indices.
    pub fn delete_index<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::indices_with_options(indices, ResolveOptions::strict_expand_open_closed())
    }

    pub fn indices_with_options<I, S>(indices: I, options: ResolveOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Indices {
            indices: indices.into_iter().map(Into::into).collect(),
            options,
        }
    }

    pub fn get_aliases<I, S, J, T>(aliases: I, indices: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::get_aliases_with_options(aliases, indices, ResolveOptions::strict_expand_open_closed())
    }

    pub fn get_aliases_with_options<I, S, J, T>(aliases: I, indices: J, options: ResolveOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::GetAliases {
            indices: indices.into_iter().map(Into::into).collect(),
            aliases: aliases.into_iter().map(Into::into).collect(),
            options,
        }
    }

    pub fn alias_actions<I>(actions: I) -> Self
    where
        I: IntoIterator<Item = AliasAction>,
    {
        Self::AliasActions {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn composite<I>(requests: I) -> Self
    where
        I: IntoIterator<Item = ResolvableRequest>,
    {
        Self::Composite {
            requests: requests.into_iter().collect(),
        }
    }

    pub fn fixed<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fixed {
            indices: indices.into_iter().map(Into::into).collect(),
        }
    }

    /// The request's own index expression list; empty for containers.
    pub fn indices(&self) -> &[String] {
        match self {
            Self::Indices { indices, .. }
            | Self::GetAliases { indices, .. }
            | Self::Fixed { indices } => indices,
            Self::AliasActions { .. } | Self::Composite { .. } => &[],
        }
    }

    /// The request's own alias expression list; empty for other shapes.
    pub fn aliases(&self) -> &[String] {
        match self {
            Self::GetAliases { aliases, .. } => aliases,
            _ => &[],
        }
    }

    pub fn options(&self) -> Option<ResolveOptions> {
        match self {
            Self::Indices { options, .. } | Self::GetAliases { options, .. } => Some(*options),
            Self::AliasActions { .. } | Self::Composite { .. } | Self::Fixed { .. } => None,
        }
    }
}
