//! Command-line arguments.

/// Parsed invocation of `munch`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub catalog: String,
    /// `None` reads standard input.
    pub input: Option<String>,
    pub error_kind: Option<String>,
    pub chunk_size: Option<usize>,
    pub max_token_len: Option<usize>,
    pub count: bool,
}

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Tokenize(Args),
    Help,
}

/// Parse everything after the program name.
pub fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut parsed = Args::default();
    let mut positional = Vec::new();

    for arg in args {
        if arg == "-h" || arg == "--help" {
            return Ok(Command::Help);
        } else if arg == "--count" || arg == "-c" {
            parsed.count = true;
        } else if let Some(name) = arg.strip_prefix("--error-kind=") {
            if name.is_empty() {
                return Err("--error-kind needs a kind name".to_owned());
            }
            parsed.error_kind = Some(name.to_owned());
        } else if let Some(bytes) = arg.strip_prefix("--chunk-size=") {
            parsed.chunk_size = Some(parse_size("--chunk-size", bytes)?);
        } else if let Some(bytes) = arg.strip_prefix("--max-token-len=") {
            parsed.max_token_len = Some(parse_size("--max-token-len", bytes)?);
        } else if arg.starts_with('-') && arg != "-" {
            return Err(format!("unknown option '{arg}'"));
        } else {
            positional.push(arg.as_str());
        }
    }

    match positional.as_slice() {
        [] => Err("missing catalog file".to_owned()),
        [catalog] => {
            parsed.catalog = (*catalog).to_owned();
            Ok(Command::Tokenize(parsed))
        }
        [catalog, input] => {
            parsed.catalog = (*catalog).to_owned();
            // `-` is standard input, same as leaving it out.
            parsed.input = (*input != "-").then(|| (*input).to_owned());
            Ok(Command::Tokenize(parsed))
        }
        [_, _, extra, ..] => Err(format!("unexpected argument '{extra}'")),
    }
}

fn parse_size(option: &str, value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("{option} expects a positive byte count, got '{value}'")),
        Ok(bytes) => Ok(bytes),
    }
}

pub fn print_usage() {
    println!("munch: longest-match tokenizer driven by a TOML rule catalog");
    println!();
    println!("Usage: munch <catalog.toml> [input] [options]");
    println!();
    println!("Reads standard input when no input file (or '-') is given.");
    println!();
    println!("Options:");
    println!("  --error-kind=<name>     Emit unmatched text as <name> tokens instead of failing");
    println!("  --chunk-size=<bytes>    Bytes read per chunk (default: 8192)");
    println!("  --max-token-len=<bytes> Longest token matched whole across chunks (default: 8192)");
    println!("  -c, --count             Print the number of tokens only");
    println!("  -h, --help              Show this message");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=munch_lexer=debug) to enable logging,");
    println!("and MUNCH_LOG_TREE=1 for indented span output.");
}
