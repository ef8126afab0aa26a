//! munch CLI
//!
//! Tokenizes a file or standard input with a catalog loaded from TOML and
//! prints one `KIND<TAB>"text"` line per token.

mod cli;
mod config;

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::sync::Once;

use munch_lexer::{TokenList, TokenizeError};

use cli::{parse_args, print_usage, Args, Command};
use config::{CatalogFile, Loaded, RuleId, RuleNames};

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber, once, if `RUST_LOG` is set.
///
/// `MUNCH_LOG_TREE` switches the flat formatter for indented span output.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        let tree = std::env::var_os("MUNCH_LOG_TREE")
            .map(|_| HierarchicalLayer::new(2).with_targets(true));
        let flat = tree.is_none().then(|| {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(io::stderr)
        });

        tracing_subscriber::registry()
            .with(tree)
            .with(flat)
            .with(EnvFilter::from_default_env())
            .init();
    });
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(Command::Tokenize(args)) => args,
        Ok(Command::Help) => {
            print_usage();
            return;
        }
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("Usage: munch <catalog.toml> [input] [options] (see --help)");
            std::process::exit(1);
        }
    };

    let loaded = load_catalog(&args);
    let tokens = match &args.input {
        Some(path) => tokenize(&loaded, open_file(path)),
        None => tokenize(&loaded, io::stdin().lock()),
    };

    let tokens = match tokens {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("error: {}", render_error(&err, &loaded.names));
            std::process::exit(1);
        }
    };

    if let Err(e) = print_tokens(&tokens, &loaded.names, args.count) {
        // A closed pipe (`munch ... | head`) is not a failure.
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("error writing output: {e}");
            std::process::exit(1);
        }
    }
}

/// Read and compile the catalog, applying command-line overrides.
fn load_catalog(args: &Args) -> Loaded {
    let text = read_file(&args.catalog);
    let mut file = match CatalogFile::parse(&text) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("error: '{}': {e}", args.catalog);
            std::process::exit(1);
        }
    };

    if args.error_kind.is_some() {
        file.error_kind.clone_from(&args.error_kind);
    }
    if args.chunk_size.is_some() {
        file.options.chunk_size = args.chunk_size;
    }
    if args.max_token_len.is_some() {
        file.options.max_token_len = args.max_token_len;
    }

    match file.build() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: '{}': {e}", args.catalog);
            std::process::exit(1);
        }
    }
}

fn tokenize<R: Read>(loaded: &Loaded, reader: R) -> Result<TokenList<RuleId>, TokenizeError<RuleId>> {
    loaded
        .tokenizer
        .tokenize_reader_with(reader, loaded.stream, loaded.mode)
}

fn print_tokens(tokens: &TokenList<RuleId>, names: &RuleNames, count: bool) -> io::Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    if count {
        writeln!(out, "{}", tokens.len())?;
    } else {
        for token in tokens {
            writeln!(out, "{}\t{:?}", names.name(token.kind()), token.text())?;
        }
    }
    out.flush()
}

/// Display a tokenize error with kind names in place of rule ids.
fn render_error(err: &TokenizeError<RuleId>, names: &RuleNames) -> String {
    match err {
        TokenizeError::Ambiguous {
            first,
            second,
            text,
            offset,
        } => format!(
            "ambiguous token kinds `{}` and `{}` for the series of characters {text:?} at byte {offset}",
            names.name(*first),
            names.name(*second),
        ),
        other => other.to_string(),
    }
}

/// Read a file from disk, exiting with a user-friendly error message on failure.
fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("error: {}", describe_io_error(path, &e));
            std::process::exit(1);
        }
    }
}

/// Open an input file for streaming, exiting on failure.
fn open_file(path: &str) -> File {
    match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("error: {}", describe_io_error(path, &e));
            std::process::exit(1);
        }
    }
}

fn describe_io_error(path: &str, e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
        io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
        io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
        _ => format!("error reading '{path}': {e}"),
    }
}
