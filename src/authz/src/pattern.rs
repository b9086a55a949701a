//! Wildcard matching over index and alias names.
//!
//! Patterns use a single metacharacter, `*`, matching any run of characters
//! including the empty one. Matching is case-sensitive and spans the whole
//! name; there is no path-separator anchoring. Beyond matching, this module
//! classifies expression tokens: sign prefixes (`+`/`-`), the `_all`
//! sentinel, and whether a token is a wildcard at all.

/// The expression that selects every visible name.
pub const ALL_PATTERN: &str = "_all";

/// Inclusion or exclusion role of an expression token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Include,
    Exclude,
}

/// Whether a token contains a wildcard.
pub fn is_wildcard(token: &str) -> bool {
    token.contains('*')
}

/// Whether an expression list means "everything visible".
///
/// An empty list and the single `_all` token are equivalent; a lone `"*"`
/// reaches the same result through ordinary wildcard expansion instead.
pub fn is_all(expressions: &[String]) -> bool {
    expressions.is_empty() || (expressions.len() == 1 && expressions[0] == ALL_PATTERN)
}

/// Split a leading `+` or `-` off a token.
///
/// The prefix only counts as a sign when something follows it; a bare `"-"`
/// or `"+"` is an ordinary literal.
pub fn split_sign(token: &str) -> (Sign, &str) {
    match token.as_bytes().first() {
        Some(b'+') if token.len() > 1 => (Sign::Include, &token[1..]),
        Some(b'-') if token.len() > 1 => (Sign::Exclude, &token[1..]),
        _ => (Sign::Include, token),
    }
}

/// Match a `*`-wildcard pattern against a candidate name.
///
/// A pattern without `*` matches only the identical candidate. With
/// wildcards, the literal segments between them must appear in the candidate
/// in order; the first segment anchors the start and the last anchors the
/// end.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    if !is_wildcard(pattern) {
        return pattern == candidate;
    }
    let segments: Vec<&str> = pattern.split('*').collect();
    if segments.len() < 2 {
        return pattern == candidate;
    }
    let first = segments[0].as_bytes();
    let last = segments[segments.len() - 1].as_bytes();
    let middle = &segments[1..segments.len() - 1];

    // Matching walks raw bytes. UTF-8 equality is byte equality, and the
    // anchor offsets may fall inside a multi-byte character, where a str
    // slice is not allowed.
    let name = candidate.as_bytes();
    if name.len() < first.len() + last.len() {
        return false;
    }
    if !name.starts_with(first) || !name.ends_with(last) {
        return false;
    }
    let mut pos = first.len();
    // the tail anchor owns the final bytes; middle segments must land before it
    let end = name.len() - last.len();
    for segment in middle {
        match find_bytes(&name[pos..end], segment.as_bytes()) {
            Some(offset) => pos = pos + offset + segment.len(),
            None => return false,
        }
    }
    true
}

/// First position of `needle` in `haystack`. An empty needle matches at the
/// front; `windows` rejects a zero length.
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Whether any pattern in a set matches the candidate.
pub fn matches_any<'a, I>(patterns: I, candidate: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    patterns.into_iter().any(|pattern| matches(pattern, candidate))
}
