//! Command-line parsing.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Usage text printed for `--help` and usage errors.
pub const USAGE: &str = "\
Usage: pushsign [--json] <METHOD> <URL-OR-PATH> [BODY | @FILE | -]

Signs a message push API request and prints the headers to send.

Arguments:
  METHOD        HTTP method (case-insensitive)
  URL-OR-PATH   Request URL or path; only the path is signed
  BODY          Raw request body, @FILE to read it from a file, - for stdin

Options:
  --json        Print the full signature result as JSON
  -h, --help    Print this help

Environment:
  APP_ID, APP_SECRET   Application credentials (required)
  LOG_LEVEL            Log filter when RUST_LOG is unset (default: info)";

/// Where the request body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    /// No body.
    None,
    /// Body given literally on the command line.
    Inline(String),
    /// Body read from a file.
    File(PathBuf),
    /// Body read from standard input.
    Stdin,
}

impl BodySource {
    /// Read the body text.
    pub fn read(&self) -> Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Inline(body) => Ok(Some(body.clone())),
            Self::File(path) => std::fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("cannot read body from {}", path.display())),
            Self::Stdin => {
                let mut body = String::new();
                std::io::stdin()
                    .read_to_string(&mut body)
                    .context("cannot read body from stdin")?;
                Ok(Some(body))
            }
        }
    }
}

/// A parsed signing invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Print JSON instead of header lines.
    pub json: bool,
    /// HTTP method as given.
    pub method: String,
    /// URL or path as given.
    pub target: String,
    /// Body source.
    pub body: BodySource,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print usage.
    Help,
    /// Sign a request.
    Sign(Invocation),
}

/// Parse command-line arguments, excluding the program name.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut json = false;
    let mut positional = Vec::new();

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--json" => json = true,
            "-" => positional.push(arg),
            flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let (Some(method), Some(target)) = (positional.next(), positional.next()) else {
        bail!("expected <METHOD> and <URL-OR-PATH>");
    };

    let body = match positional.next() {
        None => BodySource::None,
        Some(arg) if arg == "-" => BodySource::Stdin,
        Some(arg) => match arg.strip_prefix('@') {
            Some(path) => BodySource::File(PathBuf::from(path)),
            None => BodySource::Inline(arg),
        },
    };

    if let Some(extra) = positional.next() {
        bail!("unexpected argument: {extra}");
    }

    Ok(Command::Sign(Invocation {
        json,
        method,
        target,
        body,
    }))
}
