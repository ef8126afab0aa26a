//! End-to-end tokenization through the public API.
//!
//! Each catalog here is a small, self-contained language: a single rule, a
//! pair of competing rules, or a prose grammar. Tests check the exact token
//! queue produced, both from a string and from a reader.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::collections::BTreeMap;
use std::io::Cursor;

use munch_lexer::{Mode, StreamConfig, Token, TokenList, TokenizeError, Tokenizer};
use pretty_assertions::assert_eq;
use regex::Regex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Prose {
    FirstWord,
    Word,
    Integer,
    Real,
    Punctuation,
    Whitespace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Digits {
    Digit,
    NonDigit,
    Error,
}

fn queue<K: munch_lexer::TokenKind>(pairs: &[(K, &str)]) -> TokenList<K> {
    pairs.iter().map(|&(kind, text)| Token::new(kind, text)).collect()
}

fn prose() -> Tokenizer<Prose> {
    let rules = BTreeMap::from([
        (Prose::FirstWord, "[A-Z][a-z]*"),
        (Prose::Word, "[a-z][a-z]*"),
        (Prose::Integer, "-?[1-9][0-9]*"),
        (Prose::Real, r"-?([1-9][0-9]*|0)\.[0-9]*"),
        (
            Prose::Punctuation,
            r#"\.\.\.|[.,;:/\\()\[\]{}<>!@#$%^&*\-=_+`~'"]"#,
        ),
        (Prose::Whitespace, r"\s"),
    ]);
    Tokenizer::new(rules).unwrap()
}

// === Degenerate Catalogs ===

#[test]
fn empty_map_on_empty_input() {
    let tokenizer = Tokenizer::<Digits>::new(BTreeMap::<Digits, &str>::new()).unwrap();
    assert_eq!(tokenizer.tokenize("").unwrap(), TokenList::new());
}

#[test]
fn empty_map_on_control_characters() {
    let tokenizer = Tokenizer::<Digits>::new(BTreeMap::<Digits, &str>::new()).unwrap();
    let err = tokenizer.tokenize("\n\t").unwrap_err();
    assert!(matches!(err, TokenizeError::Unmatched { ref remaining, .. } if remaining == "\n\t"));
    assert_eq!(
        err.to_string(),
        r#"unknown token kind for the series of characters "\n\t" at byte 0"#
    );
}

#[test]
fn single_dot_rule_takes_any_character() {
    let tokenizer = Tokenizer::new([(Digits::NonDigit, Regex::new(".").unwrap())]).unwrap();
    for input in ["\t", "a", "1", "."] {
        assert_eq!(
            tokenizer.tokenize(input).unwrap(),
            queue(&[(Digits::NonDigit, input)])
        );
    }
}

// === Complementary Rules ===

#[test]
fn digit_and_non_digit_alternate() {
    let tokenizer =
        Tokenizer::new([(Digits::Digit, r"\d"), (Digits::NonDigit, r"\D")]).unwrap();
    let actual = tokenizer.tokenize("a1b2").unwrap();
    assert_eq!(
        actual,
        queue(&[
            (Digits::NonDigit, "a"),
            (Digits::Digit, "1"),
            (Digits::NonDigit, "b"),
            (Digits::Digit, "2"),
        ])
    );
}

#[test]
fn overlapping_rules_are_ambiguous() {
    let tokenizer = Tokenizer::new([(Digits::NonDigit, "."), (Digits::Digit, r"\d")]).unwrap();
    let err = tokenizer.tokenize("1").unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"ambiguous token kinds `NonDigit` and `Digit` for the series of characters "1" at byte 0"#
    );
}

#[test]
fn repeated_rule_loses_to_longer_rule() {
    let tokenizer =
        Tokenizer::new([(Digits::Digit, "a"), (Digits::NonDigit, "aaaaaaaaaa")]).unwrap();
    assert_eq!(
        tokenizer.tokenize("aaaaaaaaaa").unwrap(),
        queue(&[(Digits::NonDigit, "aaaaaaaaaa")])
    );
}

// === Prose ===

fn lorem_expected() -> TokenList<Prose> {
    use Prose::{FirstWord, Punctuation, Whitespace, Word};
    queue(&[
        (FirstWord, "Lorem"),
        (Whitespace, " "),
        (Word, "ipsum"),
        (Whitespace, " "),
        (Word, "dolor"),
        (Whitespace, " "),
        (Word, "sit"),
        (Whitespace, " "),
        (Word, "amet"),
        (Punctuation, ","),
        (Whitespace, " "),
        (Word, "consectetur"),
        (Whitespace, " "),
        (Word, "adipiscing"),
        (Whitespace, " "),
        (Word, "elit"),
        (Punctuation, "."),
    ])
}

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";

#[test]
fn lorem_ipsum_from_string() {
    assert_eq!(prose().tokenize(LOREM).unwrap(), lorem_expected());
}

#[test]
fn lorem_ipsum_from_reader() {
    assert_eq!(prose().tokenize_reader(Cursor::new(LOREM)).unwrap(), lorem_expected());
}

#[test]
fn lorem_ipsum_from_tiny_chunks() {
    let config = StreamConfig::new().chunk_size(1).max_token_len(32);
    let actual = prose()
        .tokenize_reader_with(Cursor::new(LOREM), config, Mode::Strict)
        .unwrap();
    assert_eq!(actual, lorem_expected());
}

#[test]
fn numbers_prefer_the_longer_reading() {
    use Prose::{Integer, Real, Whitespace};
    let actual = prose().tokenize("42 -3.25 0.5").unwrap();
    assert_eq!(
        actual,
        queue(&[
            (Integer, "42"),
            (Whitespace, " "),
            (Real, "-3.25"),
            (Whitespace, " "),
            (Real, "0.5"),
        ])
    );
}

// === Error Tokens ===

#[test]
fn digit_with_error_token() {
    let tokenizer = Tokenizer::new([(Digits::Digit, r"\d")]).unwrap();
    let actual = tokenizer.tokenize_tolerant("4b", Digits::Error).unwrap();
    assert_eq!(actual, queue(&[(Digits::Digit, "4"), (Digits::Error, "b")]));
}

#[test]
fn error_tokens_from_reader() {
    let tokenizer = Tokenizer::new([(Digits::Digit, r"\d+")]).unwrap();
    let actual = tokenizer
        .tokenize_reader_tolerant(Cursor::new("ab12cd"), Digits::Error)
        .unwrap();
    assert_eq!(
        actual,
        queue(&[
            (Digits::Error, "ab"),
            (Digits::Digit, "12"),
            (Digits::Error, "cd"),
        ])
    );
}
