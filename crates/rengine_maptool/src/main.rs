//! REngine map tool
//!
//! Checks, reformats and dumps `.rem` scene files.
//!
//! ```text
//! remtool [check] [file]          load and report rejected lines
//! remtool fmt <in> [out]          rewrite in canonical form
//! remtool dump [file] [--json]    print the loaded document
//! ```
//!
//! Exit codes: 0 on success, 1 on a fatal error, 2 when strict mode is on and
//! lines were skipped.

mod commands;
mod config;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use rengine_map::MapError;
use thiserror::Error;

use crate::commands::Outcome;
use crate::config::ToolConfig;

/// Scene loaded when no file is named
pub const DEFAULT_SCENE: &str = "scene.rem";

/// Errors that end a tool invocation
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("usage: {0}")]
    Usage(String),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Check { path: PathBuf },
    Fmt { input: PathBuf, output: Option<PathBuf> },
    Dump { path: PathBuf, json: bool },
    Help,
}

const USAGE: &str = "remtool [check] [file] | fmt <in> [out] | dump [file] [--json]";

impl Command {
    /// Parse arguments, program name excluded
    pub fn parse(args: &[String]) -> Result<Self, ToolError> {
        let (flags, positional): (Vec<&str>, Vec<&str>) = args
            .iter()
            .map(String::as_str)
            .partition(|arg| arg.starts_with("--"));

        if flags.iter().any(|f| *f == "--help") {
            return Ok(Self::Help);
        }
        let json = flags.iter().any(|f| *f == "--json");
        if let Some(unknown) = flags.iter().find(|f| **f != "--json") {
            return Err(ToolError::Usage(format!("unknown option {}", unknown)));
        }

        let path_at = |i: usize| PathBuf::from(positional.get(i).copied().unwrap_or(DEFAULT_SCENE));

        let command = match positional.first().copied() {
            Some("help") => Self::Help,
            Some("check") => Self::Check { path: path_at(1) },
            Some("dump") => Self::Dump { path: path_at(1), json },
            Some("fmt") => {
                let input = positional
                    .get(1)
                    .map(PathBuf::from)
                    .ok_or_else(|| ToolError::Usage("fmt needs an input file".to_string()))?;
                Self::Fmt {
                    input,
                    output: positional.get(2).map(PathBuf::from),
                }
            }
            // A bare path checks that file
            Some(_) if positional.len() == 1 => Self::Check { path: path_at(0) },
            Some(other) => return Err(ToolError::Usage(format!("unknown command {}", other))),
            None => Self::Check { path: path_at(0) },
        };

        if json && !matches!(command, Self::Dump { .. }) {
            return Err(ToolError::Usage("--json only applies to dump".to_string()));
        }

        let expected = match command {
            Self::Fmt { .. } => 3,
            Self::Help => 1,
            _ => 2,
        };
        if positional.len() > expected {
            return Err(ToolError::Usage(format!("unexpected argument {}", positional[expected])));
        }

        Ok(command)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            log::error!("{}", e);
            if matches!(e, ToolError::Usage(_)) {
                eprintln!("{}", USAGE);
            }
            Outcome::Failed.exit_code()
        }
    }
}

fn run(args: &[String]) -> Result<Outcome, ToolError> {
    let command = Command::parse(args)?;
    let config = ToolConfig::load()?;
    if let Some(path) = &config.config_path {
        log::debug!("Using config file {}", path.display());
    }
    log::debug!("Running {:?}", command);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Check { path } => commands::check(&path, &config, &mut out),
        Command::Fmt { input, output } => commands::fmt(&input, output.as_deref(), &config, &mut out),
        Command::Dump { path, json } => commands::dump(&path, json, &config, &mut out),
        Command::Help => {
            writeln!(out, "{}", USAGE)?;
            Ok(Outcome::Clean)
        }
    }
}
