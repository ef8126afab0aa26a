//! Catalog-driven longest-match tokenizer.
//!
//! The caller supplies a catalog of `(kind, pattern)` rules; the tokenizer
//! partitions input into a flat, ordered sequence of `(kind, text)` tokens.
//!
//! # Matching Rules
//!
//! - Every rule is tried **anchored** at the cursor. Matches further ahead
//!   only matter for error recovery.
//! - The longest anchored match wins (maximal munch).
//! - Two rules tying for the longest match is an error, never resolved by
//!   rule order.
//! - Empty matches never count.
//!
//! # Modes
//!
//! [`Mode::Strict`] fails with [`TokenizeError::Unmatched`] when no rule
//! matches at the cursor. [`Mode::Tolerant`] instead emits a single token of
//! the designated error kind covering the unmatched span and resumes at the
//! next position where some rule matches.
//!
//! # Input
//!
//! Input is either an in-memory `&str` ([`StrSource`]) or any
//! [`std::io::Read`] consumed in fixed-size chunks ([`ChunkedSource`]). Both
//! produce the same tokens as long as no token exceeds
//! [`StreamConfig::max_token_len`].
//!
//! ```
//! use munch_lexer::{Token, Tokenizer};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Kind {
//!     Word,
//!     Space,
//! }
//!
//! let tokenizer = Tokenizer::new([(Kind::Word, r"\w+"), (Kind::Space, r"\s+")])?;
//! let tokens = tokenizer.tokenize("hello world")?;
//!
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens.front(), Some(&Token::new(Kind::Word, "hello")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod catalog;
mod error;
mod scanner;
mod source;
mod token;

pub use catalog::{Catalog, CatalogOptions, Pattern};
pub use error::{CatalogError, FillError, TokenizeError};
pub use scanner::{Mode, Tokenizer};
pub use source::{ChunkedSource, Source, StrSource, StreamConfig, DEFAULT_CHUNK_SIZE};
pub use token::{Token, TokenKind, TokenList};
