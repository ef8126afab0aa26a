use std::collections::{BTreeMap, HashMap};

use pretty_assertions::assert_eq;

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Kind {
    Word,
    Number,
    Space,
}

// === Construction ===

#[test]
fn empty_catalog() {
    let catalog = Catalog::<Kind>::new(Vec::<(Kind, &str)>::new()).unwrap();
    assert!(catalog.is_empty());
    assert_eq!(catalog.len(), 0);
    assert_eq!(catalog.kinds().count(), 0);

    let default = Catalog::<Kind>::default();
    assert!(default.is_empty());
}

#[test]
fn from_array_of_str() {
    let catalog = Catalog::new([(Kind::Word, "[a-z]+"), (Kind::Space, r"\s+")]).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.kinds().collect::<Vec<_>>(), vec![Kind::Word, Kind::Space]);
    assert!(catalog.contains(Kind::Word));
    assert!(!catalog.contains(Kind::Number));
    assert_eq!(catalog.pattern(Kind::Space), Some(r"\s+"));
}

#[test]
fn from_maps() {
    let mut btree = BTreeMap::new();
    btree.insert(Kind::Number, String::from("[0-9]+"));
    btree.insert(Kind::Word, String::from("[a-z]+"));
    assert_eq!(Catalog::new(btree).unwrap().len(), 2);

    let mut hash = HashMap::new();
    hash.insert(Kind::Number, "[0-9]+");
    assert_eq!(Catalog::new(hash).unwrap().len(), 1);
}

#[test]
fn precompiled_regex_is_kept_as_is() {
    let regex = Regex::new(r"(?i)abc").unwrap();
    let catalog = Catalog::new([(Kind::Word, regex)]).unwrap();
    assert_eq!(catalog.pattern(Kind::Word), Some("(?i)abc"));
    assert_eq!(catalog.rules()[0].match_len("ABCdef"), Some(3));
}

#[test]
fn precompiled_regex_keeps_builder_flags() {
    let regex = RegexBuilder::new("[a-z]+")
        .case_insensitive(true)
        .build()
        .unwrap();
    let catalog = Catalog::new([(Kind::Word, regex)]).unwrap();
    let rule = &catalog.rules()[0];
    assert_eq!(rule.match_len("ABC def"), Some(3));
    assert_eq!(rule.match_len(" ABC"), None);
    assert_eq!(rule.next_match_start("12 ABC", 0), Some(3));
}

#[test]
fn precompiled_regex_ignores_empty_matches() {
    let regex = RegexBuilder::new("x*").build().unwrap();
    let catalog = Catalog::new([(Kind::Word, regex)]).unwrap();
    assert_eq!(catalog.rules()[0].match_len("abc"), None);
    assert_eq!(catalog.rules()[0].match_len("xxa"), Some(2));
}

#[test]
fn mixed_sources_and_regexes() {
    let catalog = Catalog::new([
        (Kind::Word, Pattern::from("[a-z]+")),
        (Kind::Number, Pattern::from(Regex::new("[0-9]+").unwrap())),
    ])
    .unwrap();
    assert_eq!(catalog.len(), 2);
}

// === Errors ===

#[test]
fn invalid_pattern_is_rejected() {
    let err = Catalog::new([(Kind::Word, "[a-z]+"), (Kind::Number, "([0-9]")]).unwrap_err();
    match err {
        CatalogError::PatternCompilation { kind, pattern, .. } => {
            assert_eq!(kind, Kind::Number);
            assert_eq!(pattern, "([0-9]");
        }
        other @ CatalogError::DuplicateKind { .. } => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_kind_is_rejected() {
    let err = Catalog::new([(Kind::Word, "[a-z]+"), (Kind::Word, "[A-Z]+")]).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateKind { kind: Kind::Word }));
}

#[test]
fn size_limit_is_applied() {
    let options = CatalogOptions::new().size_limit(16);
    let err = Catalog::with_options([(Kind::Word, r"\w{100}")], options).unwrap_err();
    assert!(matches!(err, CatalogError::PatternCompilation { kind: Kind::Word, .. }));
}

// === Options ===

#[test]
fn default_options() {
    let options = CatalogOptions::default();
    assert!(options.unicode);
    assert!(!options.case_insensitive);
    assert!(!options.multi_line);
    assert!(!options.dot_matches_new_line);
    assert!(!options.ignore_whitespace);
    assert_eq!(options.size_limit, None);
}

#[test]
fn case_insensitive_option() {
    let options = CatalogOptions::new().case_insensitive(true);
    let catalog = Catalog::with_options([(Kind::Word, "abc")], options).unwrap();
    assert_eq!(catalog.rules()[0].match_len("AbC"), Some(3));
}

#[test]
fn dot_matches_new_line_option() {
    let plain = Catalog::new([(Kind::Word, ".+")]).unwrap();
    assert_eq!(plain.rules()[0].match_len("a\nb"), Some(1));

    let options = CatalogOptions::new().dot_matches_new_line(true);
    let catalog = Catalog::with_options([(Kind::Word, ".+")], options).unwrap();
    assert_eq!(catalog.rules()[0].match_len("a\nb"), Some(3));
}

#[test]
fn ignore_whitespace_option() {
    let options = CatalogOptions::new().ignore_whitespace(true);
    let catalog = Catalog::with_options([(Kind::Number, "[0-9] +  # digits")], options).unwrap();
    assert_eq!(catalog.rules()[0].match_len("123 "), Some(3));
}

#[test]
fn unicode_classes_by_default() {
    let catalog = Catalog::new([(Kind::Word, r"\w+")]).unwrap();
    assert_eq!(catalog.rules()[0].match_len("héllo!"), Some("héllo".len()));

    let ascii = CatalogOptions::new().unicode(false);
    let catalog = Catalog::with_options([(Kind::Word, r"\w+")], ascii).unwrap();
    assert_eq!(catalog.rules()[0].match_len("héllo!"), Some(1));
}

// === Anchored matching ===

#[test]
fn match_len_is_anchored() {
    let catalog = Catalog::new([(Kind::Word, "[a-z]+")]).unwrap();
    let rule = &catalog.rules()[0];
    assert_eq!(rule.match_len("abc1"), Some(3));
    assert_eq!(rule.match_len("1abc"), None);
}

#[test]
fn match_len_is_anchored_in_multi_line_mode() {
    let options = CatalogOptions::new().multi_line(true);
    let catalog = Catalog::with_options([(Kind::Word, "^[a-z]+")], options).unwrap();
    let rule = &catalog.rules()[0];
    assert_eq!(rule.match_len("\nabc"), None);
}

#[test]
fn match_len_ignores_empty_matches() {
    let catalog = Catalog::new([(Kind::Space, r"\s*")]).unwrap();
    let rule = &catalog.rules()[0];
    assert_eq!(rule.match_len("abc"), None);
    assert_eq!(rule.match_len("  abc"), Some(2));
}

#[test]
fn alternation_prefers_first_branch() {
    // Leftmost-first semantics: `a|ab` matches just "a".
    let catalog = Catalog::new([(Kind::Word, "a|ab")]).unwrap();
    assert_eq!(catalog.rules()[0].match_len("ab"), Some(1));
}

// === Forward search ===

#[test]
fn next_match_start_skips_to_first_match() {
    let catalog = Catalog::new([(Kind::Number, "[0-9]+")]).unwrap();
    let rule = &catalog.rules()[0];
    assert_eq!(rule.next_match_start("ab12", 0), Some(2));
    assert_eq!(rule.next_match_start("ab12", 3), Some(3));
    assert_eq!(rule.next_match_start("ab", 0), None);
}

#[test]
fn next_match_start_skips_empty_matches() {
    let catalog = Catalog::new([(Kind::Number, "[0-9]*")]).unwrap();
    let rule = &catalog.rules()[0];
    assert_eq!(rule.next_match_start("éa7", 0), Some(3));
    assert_eq!(rule.next_match_start("éa", 0), None);
}

#[test]
fn next_match_start_sees_preceding_context() {
    let catalog = Catalog::new([(Kind::Word, r"\bcat")]).unwrap();
    let rule = &catalog.rules()[0];
    // "cat" at 1 is preceded by a word character, so it is not at a boundary.
    assert_eq!(rule.next_match_start("xcat cat", 1), Some(5));
}
