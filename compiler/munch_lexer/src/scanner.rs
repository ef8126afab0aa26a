//! The scanning engine.
//!
//! # Algorithm
//!
//! Repeatedly, at the cursor:
//!
//! 1. Top the window up so it holds more than `lookahead` bytes (or all
//!    remaining input).
//! 2. Try every rule anchored at the cursor; keep the longest non-empty
//!    match.
//! 3. If two rules share the greatest length, fail with
//!    [`TokenizeError::Ambiguous`]. Rule order never breaks a tie.
//! 4. Emit the winner and advance past it.
//! 5. With no match: fail ([`Mode::Strict`]), or emit one error token up to
//!    the nearest later position where some rule matches ([`Mode::Tolerant`]).
//!
//! Match lengths are compared in bytes. All candidates are prefixes of the
//! same text, so the longer byte prefix is also the longer character prefix.

use std::io::Read;

use crate::catalog::{Catalog, CatalogOptions, Pattern};
use crate::error::{CatalogError, FillError, TokenizeError};
use crate::source::{ChunkedSource, Source, StrSource, StreamConfig};
use crate::token::{Token, TokenKind, TokenList};

/// What to do when no rule matches at the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode<K> {
    /// Fail with [`TokenizeError::Unmatched`].
    Strict,
    /// Emit a token of this kind covering the unmatched span.
    Tolerant(K),
}

/// Longest-match tokenizer over an immutable [`Catalog`].
///
/// Holds no per-call state, so one instance can serve any number of
/// concurrent `tokenize` calls.
#[derive(Clone, Debug)]
pub struct Tokenizer<K> {
    catalog: Catalog<K>,
}

impl<K> Default for Tokenizer<K> {
    /// A tokenizer over the empty catalog: every non-empty input is unmatched.
    fn default() -> Self {
        Tokenizer {
            catalog: Catalog::default(),
        }
    }
}

impl<K: TokenKind> From<Catalog<K>> for Tokenizer<K> {
    fn from(catalog: Catalog<K>) -> Self {
        Tokenizer { catalog }
    }
}

impl<K: TokenKind> Tokenizer<K> {
    /// Compile `(kind, pattern)` pairs into a tokenizer.
    pub fn new<I, P>(entries: I) -> Result<Self, CatalogError<K>>
    where
        I: IntoIterator<Item = (K, P)>,
        P: Into<Pattern>,
    {
        Catalog::new(entries).map(Self::from)
    }

    pub fn with_options<I, P>(entries: I, options: CatalogOptions) -> Result<Self, CatalogError<K>>
    where
        I: IntoIterator<Item = (K, P)>,
        P: Into<Pattern>,
    {
        Catalog::with_options(entries, options).map(Self::from)
    }

    pub fn from_catalog(catalog: Catalog<K>) -> Self {
        Self::from(catalog)
    }

    pub fn catalog(&self) -> &Catalog<K> {
        &self.catalog
    }

    /// Tokenize `input`, failing on the first unmatched position.
    pub fn tokenize(&self, input: &str) -> Result<TokenList<K>, TokenizeError<K>> {
        self.tokenize_source(&mut StrSource::new(input), Mode::Strict)
    }

    /// Tokenize `input`, turning unmatched spans into `error_kind` tokens.
    ///
    /// Only fails on ambiguity.
    pub fn tokenize_tolerant(
        &self,
        input: &str,
        error_kind: K,
    ) -> Result<TokenList<K>, TokenizeError<K>> {
        self.tokenize_source(&mut StrSource::new(input), Mode::Tolerant(error_kind))
    }

    /// Tokenize a stream read in [`DEFAULT_CHUNK_SIZE`](crate::DEFAULT_CHUNK_SIZE)
    /// chunks, failing on the first unmatched position.
    pub fn tokenize_reader<R: Read>(&self, reader: R) -> Result<TokenList<K>, TokenizeError<K>> {
        self.tokenize_reader_with(reader, StreamConfig::default(), Mode::Strict)
    }

    pub fn tokenize_reader_tolerant<R: Read>(
        &self,
        reader: R,
        error_kind: K,
    ) -> Result<TokenList<K>, TokenizeError<K>> {
        self.tokenize_reader_with(reader, StreamConfig::default(), Mode::Tolerant(error_kind))
    }

    /// Tokenize a stream with explicit chunk sizing.
    ///
    /// Tokens of up to [`StreamConfig::max_token_len`] bytes match exactly as
    /// in memory; longer ones may be split into several tokens.
    pub fn tokenize_reader_with<R: Read>(
        &self,
        reader: R,
        config: StreamConfig,
        mode: Mode<K>,
    ) -> Result<TokenList<K>, TokenizeError<K>> {
        self.tokenize_source(&mut ChunkedSource::with_config(reader, config), mode)
    }

    /// Tokenize whatever `source` yields until it is exhausted.
    #[tracing::instrument(level = "debug", skip_all, fields(rules = self.catalog.len()))]
    pub fn tokenize_source<S: Source + ?Sized>(
        &self,
        source: &mut S,
        mode: Mode<K>,
    ) -> Result<TokenList<K>, TokenizeError<K>> {
        let mut tokens = TokenList::new();

        loop {
            top_up(source)?;
            let window = source.window();
            if window.is_empty() {
                break;
            }

            if let Some((kind, len)) = self.longest_match(window, source.offset())? {
                tracing::trace!(?kind, len, offset = source.offset(), "token");
                tokens.push_back(Token::new(kind, &window[..len]));
                source.consume(len);
                continue;
            }

            match mode {
                Mode::Strict => return Err(unmatched(source)),
                Mode::Tolerant(error_kind) => {
                    let offset = source.offset();
                    let skipped = self.recover(source)?;
                    tracing::debug!(offset, len = skipped.len(), "unmatched input");
                    tokens.push_back(Token::new(error_kind, skipped));
                }
            }
        }

        tracing::debug!(tokens = tokens.len(), "tokenized");
        Ok(tokens)
    }

    /// The unique longest anchored match at the start of `hay`.
    fn longest_match(
        &self,
        hay: &str,
        offset: usize,
    ) -> Result<Option<(K, usize)>, TokenizeError<K>> {
        let mut best: Option<(K, usize)> = None;
        // A second kind matching the current best length.
        let mut rival: Option<K> = None;

        for rule in self.catalog.rules() {
            let Some(len) = rule.match_len(hay) else {
                continue;
            };
            match best {
                Some((_, best_len)) if len < best_len => {}
                Some((_, best_len)) if len == best_len => {
                    rival.get_or_insert(rule.kind);
                }
                _ => {
                    best = Some((rule.kind, len));
                    rival = None;
                }
            }
        }

        match (best, rival) {
            (Some((first, len)), Some(second)) => Err(TokenizeError::Ambiguous {
                first,
                second,
                text: hay[..len].to_owned(),
                offset,
            }),
            (best, _) => Ok(best),
        }
    }

    /// Consume input from the (unmatched) cursor up to the nearest position
    /// where some rule matches, or to the end of input. Returns the skipped
    /// text.
    fn recover<S: Source + ?Sized>(&self, source: &mut S) -> Result<String, FillError> {
        let mut skipped = String::new();
        let mut exhausted = source.is_exhausted();

        loop {
            let window = source.window();
            if window.is_empty() {
                break;
            }

            // Positions before `decided` have a full lookahead after them.
            let decided = if exhausted {
                window.len()
            } else {
                floor_char_boundary(window, window.len().saturating_sub(source.lookahead()))
            };
            // The cursor itself is already known not to match.
            let from = if skipped.is_empty() {
                next_char(window, 0)
            } else {
                0
            };

            if let Some(at) = self.next_anchor(window, from, decided) {
                skipped.push_str(&window[..at]);
                source.consume(at);
                break;
            }

            skipped.push_str(&window[..decided]);
            source.consume(decided);
            if exhausted {
                break;
            }
            exhausted = !source.fill()? || source.is_exhausted();
        }

        Ok(skipped)
    }

    /// Nearest position in `from..limit` where some rule has a non-empty
    /// anchored match.
    fn next_anchor(&self, hay: &str, mut from: usize, limit: usize) -> Option<usize> {
        let rules = self.catalog.rules();
        while from < limit {
            let at = rules
                .iter()
                .filter_map(|rule| rule.next_match_start(hay, from))
                .min()?;
            if at >= limit {
                return None;
            }
            // The forward search sees context before `at` that the anchored
            // match does not, so confirm before stopping here.
            if rules.iter().any(|rule| rule.match_len(&hay[at..]).is_some()) {
                return Some(at);
            }
            from = next_char(hay, at);
        }
        None
    }
}

/// Fill until more than `lookahead` bytes are buffered or input runs out.
fn top_up<S: Source + ?Sized>(source: &mut S) -> Result<(), FillError> {
    while !source.is_exhausted() && source.window().len() <= source.lookahead() {
        if !source.fill()? {
            break;
        }
    }
    Ok(())
}

/// Build the strict-mode failure, reading the rest of the input into it.
#[cold]
fn unmatched<K: TokenKind, S: Source + ?Sized>(source: &mut S) -> TokenizeError<K> {
    let offset = source.offset();
    loop {
        match source.fill() {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => return err.into(),
        }
    }
    TokenizeError::Unmatched {
        remaining: source.window().to_owned(),
        offset,
    }
}

/// Byte index just past the character starting at `at`.
#[inline]
fn next_char(s: &str, at: usize) -> usize {
    at + s[at..].chars().next().map_or(0, char::len_utf8)
}

/// Largest character boundary `<= at`.
#[inline]
fn floor_char_boundary(s: &str, mut at: usize) -> usize {
    while !s.is_char_boundary(at) {
        at -= 1;
    }
    at
}
