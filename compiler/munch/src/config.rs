//! Catalog files.
//!
//! A catalog file is TOML:
//!
//! ```toml
//! error_kind = "ERROR"      # optional; turns on tolerant mode
//!
//! [options]                 # optional
//! case_insensitive = true
//! chunk_size = 8192
//! max_token_len = 8192
//!
//! [[rule]]
//! kind = "WORD"
//! pattern = "[a-z]+"
//! ```
//!
//! Rule names are interned into [`RuleId`]s in file order. The error kind
//! may name an existing rule or a name of its own.

use munch_lexer::{Catalog, CatalogError, CatalogOptions, Mode, StreamConfig, Tokenizer};
use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Index of a kind name in [`RuleNames`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(usize);

/// Interned kind names.
#[derive(Clone, Debug, Default)]
pub struct RuleNames {
    names: Vec<String>,
    ids: FxHashMap<String, RuleId>,
}

impl RuleNames {
    pub fn intern(&mut self, name: &str) -> RuleId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = RuleId(self.names.len());
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        id
    }

    pub fn name(&self, id: RuleId) -> &str {
        self.names.get(id.0).map_or("?", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid catalog file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("rule `{name}` has an invalid pattern {pattern:?}: {message}")]
    InvalidPattern {
        name: String,
        pattern: String,
        message: String,
    },

    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(String),
}

/// The raw contents of a catalog file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub error_kind: Option<String>,
    #[serde(default)]
    pub options: FileOptions,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleEntry>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub kind: String,
    pub pattern: String,
}

/// `[options]`: regex flags plus stream sizing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileOptions {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
    /// Defaults to `true`.
    pub unicode: Option<bool>,
    pub size_limit: Option<usize>,
    pub chunk_size: Option<usize>,
    pub max_token_len: Option<usize>,
}

impl FileOptions {
    fn catalog_options(&self) -> CatalogOptions {
        let options = CatalogOptions::new()
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .unicode(self.unicode.unwrap_or(true));
        match self.size_limit {
            Some(limit) => options.size_limit(limit),
            None => options,
        }
    }

    fn stream_config(&self) -> StreamConfig {
        let mut config = StreamConfig::new();
        if let Some(bytes) = self.chunk_size {
            config = config.chunk_size(bytes);
        }
        if let Some(bytes) = self.max_token_len {
            config = config.max_token_len(bytes);
        }
        config
    }
}

/// A compiled catalog file, ready to tokenize.
#[derive(Debug)]
pub struct Loaded {
    pub tokenizer: Tokenizer<RuleId>,
    pub names: RuleNames,
    pub mode: Mode<RuleId>,
    pub stream: StreamConfig,
}

impl CatalogFile {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Intern names and compile every rule.
    #[tracing::instrument(level = "debug", skip_all, fields(rules = self.rules.len()))]
    pub fn build(&self) -> Result<Loaded, ConfigError> {
        let mut names = RuleNames::default();
        let entries: Vec<_> = self
            .rules
            .iter()
            .map(|rule| (names.intern(&rule.kind), rule.pattern.as_str()))
            .collect();

        let catalog = Catalog::with_options(entries, self.options.catalog_options()).map_err(
            |err| match err {
                CatalogError::PatternCompilation {
                    kind,
                    pattern,
                    source,
                } => ConfigError::InvalidPattern {
                    name: names.name(kind).to_owned(),
                    pattern,
                    message: source.to_string(),
                },
                CatalogError::DuplicateKind { kind } => {
                    ConfigError::DuplicateRule(names.name(kind).to_owned())
                }
            },
        )?;

        let mode = match &self.error_kind {
            Some(name) => Mode::Tolerant(names.intern(name)),
            None => Mode::Strict,
        };

        tracing::debug!(kinds = names.len(), tolerant = self.error_kind.is_some(), "catalog loaded");
        Ok(Loaded {
            tokenizer: Tokenizer::from_catalog(catalog),
            names,
            mode,
            stream: self.options.stream_config(),
        })
    }
}
