//! Tokens and the ordered token queue.

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

/// Capability required of a token category.
///
/// Any fieldless `enum` deriving `Clone, Copy, Debug, PartialEq, Eq, Hash`
/// qualifies through the blanket impl, which is the intended way to model a
/// closed set of kinds.
pub trait TokenKind: Copy + Eq + Hash + fmt::Debug {}

impl<T: Copy + Eq + Hash + fmt::Debug> TokenKind for T {}

/// A classified substring of the input.
///
/// `text` is exactly the consumed input and is never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token<K> {
    pub kind: K,
    pub text: String,
}

impl<K: TokenKind> Token<K> {
    #[inline]
    pub fn new(kind: K, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    #[inline]
    pub fn kind(&self) -> K {
        self.kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the token text in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl<K: fmt::Debug> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.kind, self.text)
    }
}

/// Tokens in input order, consumed front-to-back.
///
/// The tokenizer keeps no reference to a list once it is returned.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenList<K> {
    tokens: VecDeque<Token<K>>,
}

impl<K> Default for TokenList<K> {
    fn default() -> Self {
        TokenList {
            tokens: VecDeque::new(),
        }
    }
}

impl<K: TokenKind> TokenList<K> {
    /// Create a new empty token list.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push_back(&mut self, token: Token<K>) {
        self.tokens.push_back(token);
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<Token<K>> {
        self.tokens.pop_front()
    }

    #[inline]
    pub fn front(&self) -> Option<&Token<K>> {
        self.tokens.front()
    }

    #[inline]
    pub fn back(&self) -> Option<&Token<K>> {
        self.tokens.back()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Token<K>> {
        self.tokens.iter()
    }

    /// Kinds in order, mostly useful in assertions.
    pub fn kinds(&self) -> Vec<K> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    /// Concatenate every token's text.
    ///
    /// For any successful tokenization this reproduces the input exactly.
    pub fn concat(&self) -> String {
        let len = self.tokens.iter().map(Token::len).sum();
        let mut out = String::with_capacity(len);
        for token in &self.tokens {
            out.push_str(&token.text);
        }
        out
    }
}

impl<K> IntoIterator for TokenList<K> {
    type Item = Token<K>;
    type IntoIter = std::collections::vec_deque::IntoIter<Token<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a TokenList<K> {
    type Item = &'a Token<K>;
    type IntoIter = std::collections::vec_deque::Iter<'a, Token<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl<K> FromIterator<Token<K>> for TokenList<K> {
    fn from_iter<I: IntoIterator<Item = Token<K>>>(iter: I) -> Self {
        TokenList {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl<K> Extend<Token<K>> for TokenList<K> {
    fn extend<I: IntoIterator<Item = Token<K>>>(&mut self, iter: I) {
        self.tokens.extend(iter);
    }
}
