//! The rule catalog: an immutable mapping from token kind to matcher.
//!
//! Raw pattern strings are compiled eagerly, at construction. Every entry
//! carries the pattern as `search`, used to find the next match *ahead* of
//! the cursor during error recovery. Source patterns also get an `anchored`
//! twin, the pattern wrapped as `\A(?:...)`, used for the match *at* the
//! cursor. `\A` anchors to the start of the haystack slice handed to it,
//! which the scanner always starts at the cursor.
//!
//! A caller-supplied [`Regex`] is used as-is, flags set through
//! `RegexBuilder` included. It has no anchored twin: the match at the cursor
//! is its leftmost-first search result when that starts at the cursor. This
//! costs a scan of the window whenever the rule does not match there.

use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashSet;

use crate::error::CatalogError;
use crate::token::TokenKind;

/// A rule's pattern, either source text or an already-compiled regex.
#[derive(Clone, Debug)]
pub enum Pattern {
    Source(String),
    Compiled(Regex),
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern::Source(source.to_owned())
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Pattern::Source(source)
    }
}

impl From<&String> for Pattern {
    fn from(source: &String) -> Self {
        Pattern::Source(source.clone())
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern::Compiled(regex)
    }
}

impl From<&Regex> for Pattern {
    fn from(regex: &Regex) -> Self {
        Pattern::Compiled(regex.clone())
    }
}

/// Flags applied when compiling [`Pattern::Source`] entries.
///
/// Unicode mode is on by default: character classes such as `\w`, `\d` and
/// `\s` and case folding follow Unicode rather than ASCII.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogOptions {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
    pub unicode: bool,
    /// Approximate per-pattern compiled size limit in bytes. `None` keeps the
    /// regex crate's default.
    pub size_limit: Option<usize>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        CatalogOptions {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            ignore_whitespace: false,
            unicode: true,
            size_limit: None,
        }
    }
}

impl CatalogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    #[must_use]
    pub fn multi_line(mut self, yes: bool) -> Self {
        self.multi_line = yes;
        self
    }

    #[must_use]
    pub fn dot_matches_new_line(mut self, yes: bool) -> Self {
        self.dot_matches_new_line = yes;
        self
    }

    #[must_use]
    pub fn ignore_whitespace(mut self, yes: bool) -> Self {
        self.ignore_whitespace = yes;
        self
    }

    #[must_use]
    pub fn unicode(mut self, yes: bool) -> Self {
        self.unicode = yes;
        self
    }

    #[must_use]
    pub fn size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = Some(bytes);
        self
    }

    fn compile(&self, source: &str) -> Result<Regex, regex::Error> {
        let mut builder = RegexBuilder::new(source);
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .unicode(self.unicode);
        if let Some(limit) = self.size_limit {
            builder.size_limit(limit);
        }
        builder.build()
    }
}

/// One compiled catalog entry.
#[derive(Clone, Debug)]
pub(crate) struct Rule<K> {
    pub(crate) kind: K,
    pub(crate) search: Regex,
    /// `None` for caller-compiled regexes.
    pub(crate) anchored: Option<Regex>,
}

impl<K: TokenKind> Rule<K> {
    /// Length of the non-empty match starting exactly at `hay[0]`.
    #[inline]
    pub(crate) fn match_len(&self, hay: &str) -> Option<usize> {
        let m = match &self.anchored {
            Some(anchored) => anchored.find(hay)?,
            // Leftmost-first: a match starting at 0, if any, is the one found.
            None => self.search.find(hay).filter(|m| m.start() == 0)?,
        };
        Some(m.end()).filter(|&len| len > 0)
    }

    /// Start of the first non-empty match at or after `from`.
    ///
    /// `hay` is the whole visible window so look-around assertions such as
    /// `\b` see the text before `from`.
    pub(crate) fn next_match_start(&self, hay: &str, from: usize) -> Option<usize> {
        let mut at = from;
        while at <= hay.len() {
            let m = self.search.find_at(hay, at)?;
            if !m.is_empty() {
                return Some(m.start());
            }
            // Skip past the empty match by one character.
            at = m.end() + hay[m.end()..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

/// Immutable mapping from token kind to compiled matcher.
///
/// Entries keep the order they were supplied in, but order never decides
/// between two matches: equal-length matches are reported as ambiguous.
#[derive(Clone, Debug)]
pub struct Catalog<K> {
    rules: Vec<Rule<K>>,
}

impl<K> Default for Catalog<K> {
    /// The empty catalog, which matches nothing.
    fn default() -> Self {
        Catalog { rules: Vec::new() }
    }
}

impl<K: TokenKind> Catalog<K> {
    /// Build a catalog from `(kind, pattern)` pairs with default options.
    pub fn new<I, P>(entries: I) -> Result<Self, CatalogError<K>>
    where
        I: IntoIterator<Item = (K, P)>,
        P: Into<Pattern>,
    {
        Self::with_options(entries, CatalogOptions::default())
    }

    /// Build a catalog, compiling raw patterns with `options`.
    ///
    /// Fails on the first invalid pattern or repeated kind.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn with_options<I, P>(entries: I, options: CatalogOptions) -> Result<Self, CatalogError<K>>
    where
        I: IntoIterator<Item = (K, P)>,
        P: Into<Pattern>,
    {
        let entries = entries.into_iter();
        let mut rules = Vec::with_capacity(entries.size_hint().0);
        let mut seen = FxHashSet::default();

        for (kind, pattern) in entries {
            if !seen.insert(kind) {
                return Err(CatalogError::DuplicateKind { kind });
            }
            rules.push(compile_rule(kind, pattern.into(), &options)?);
        }

        tracing::debug!(rules = rules.len(), "catalog compiled");
        Ok(Catalog { rules })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Kinds in construction order.
    pub fn kinds(&self) -> impl Iterator<Item = K> + '_ {
        self.rules.iter().map(|rule| rule.kind)
    }

    pub fn contains(&self, kind: K) -> bool {
        self.rules.iter().any(|rule| rule.kind == kind)
    }

    /// The pattern text registered for `kind`.
    pub fn pattern(&self, kind: K) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.kind == kind)
            .map(|rule| rule.search.as_str())
    }

    #[inline]
    pub(crate) fn rules(&self) -> &[Rule<K>] {
        &self.rules
    }
}

fn compile_rule<K: TokenKind>(
    kind: K,
    pattern: Pattern,
    options: &CatalogOptions,
) -> Result<Rule<K>, CatalogError<K>> {
    let invalid = |pattern: &str, source| CatalogError::PatternCompilation {
        kind,
        pattern: pattern.to_owned(),
        source,
    };

    let (search, anchored) = match pattern {
        Pattern::Source(source) => {
            let search = options.compile(&source).map_err(|e| invalid(&source, e))?;
            let anchored = options
                .compile(&anchor(&source, options.ignore_whitespace))
                .map_err(|e| invalid(&source, e))?;
            (search, Some(anchored))
        }
        Pattern::Compiled(search) => (search, None),
    };

    Ok(Rule {
        kind,
        search,
        anchored,
    })
}

/// Wrap a pattern so it only matches at the start of the haystack.
///
/// `\A` rather than `^`, which matches after every newline in multi-line
/// mode. In whitespace-insensitive mode a trailing `# comment` would swallow
/// the closing parenthesis, so the group is closed on a fresh line.
fn anchor(pattern: &str, ignore_whitespace: bool) -> String {
    if ignore_whitespace {
        format!("\\A(?:{pattern}\n)")
    } else {
        format!(r"\A(?:{pattern})")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
