//! Catalog construction and tokenization errors.
//!
//! Construction errors ([`CatalogError`]) are raised once, when the catalog
//! is compiled. Tokenization errors ([`TokenizeError`]) are fatal to the
//! `tokenize` call that produced them; nothing is retried internally.

use std::io;

use crate::token::TokenKind;

/// A rule catalog could not be built.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError<K: TokenKind> {
    /// A raw pattern string is not a valid regular expression.
    #[error("invalid pattern for token kind `{kind:?}`: {pattern:?}")]
    PatternCompilation {
        kind: K,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The same kind was supplied more than once.
    #[error("token kind `{kind:?}` appears more than once in the catalog")]
    DuplicateKind { kind: K },
}

/// A `tokenize` call failed.
#[derive(Debug, thiserror::Error)]
pub enum TokenizeError<K: TokenKind> {
    /// Two rules produced anchored matches of the same, greatest length.
    ///
    /// This is a defect of the catalog, not of the input, so it is reported
    /// in both strict and tolerant mode.
    #[error(
        "ambiguous token kinds `{first:?}` and `{second:?}` for the series of characters {text:?} at byte {offset}"
    )]
    Ambiguous {
        first: K,
        second: K,
        /// The text both rules matched.
        text: String,
        /// Absolute byte offset of the match.
        offset: usize,
    },

    /// No rule matched at the cursor (strict mode only).
    #[error("unknown token kind for the series of characters {remaining:?} at byte {offset}")]
    Unmatched {
        /// The whole unconsumed remainder of the input.
        remaining: String,
        offset: usize,
    },

    /// A streamed source produced bytes that are not UTF-8.
    #[error("input is not valid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// A [`Source`](crate::Source) could not extend its window.
#[derive(Debug, thiserror::Error)]
pub enum FillError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    /// Absolute byte offset of the first byte that is not valid UTF-8.
    #[error("input is not valid UTF-8 at byte {0}")]
    InvalidUtf8(usize),
}

impl<K: TokenKind> From<FillError> for TokenizeError<K> {
    fn from(err: FillError) -> Self {
        match err {
            FillError::Io(e) => TokenizeError::Io(e),
            FillError::InvalidUtf8(offset) => TokenizeError::InvalidUtf8 { offset },
        }
    }
}

impl<K: TokenKind> TokenizeError<K> {
    /// Absolute byte offset the error refers to, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            TokenizeError::Ambiguous { offset, .. }
            | TokenizeError::Unmatched { offset, .. }
            | TokenizeError::InvalidUtf8 { offset } => Some(*offset),
            TokenizeError::Io(_) => None,
        }
    }
}
