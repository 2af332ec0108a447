//! tbas-drv - Command-line driver for the tbas interpreter.
//!
//! Owns everything the engine does not: argument handling, source loading
//! with the program size bound, logging setup, and exit codes. Exit status
//! is 0 after a clean run and after a reported program error; usage and
//! load failures exit 1.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tbas_interp::Interpreter;
use tbas_util::limits::MAX_PROGRAM_BYTES;

/// Driver configuration: the one source file to run.
#[derive(Debug, Clone)]
pub struct Config {
    pub source_path: PathBuf,
}

impl Config {
    /// Builds a config from raw arguments. `Err` carries the usage line,
    /// which the caller prints verbatim.
    pub fn from_args<I>(mut args: I) -> std::result::Result<Config, String>
    where
        I: Iterator<Item = String>,
    {
        let prog = args.next().unwrap_or_else(|| "tbas".to_string());
        match (args.next(), args.next()) {
            (Some(path), None) => Ok(Config {
                source_path: PathBuf::from(path),
            }),
            _ => Err(format!("Usage: {prog} filename.bas")),
        }
    }
}

/// Reads the program text, enforcing the source size bound.
pub fn load_source(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    if source.len() > MAX_PROGRAM_BYTES {
        bail!(
            "{} exceeds the {} byte program limit",
            path.display(),
            MAX_PROGRAM_BYTES
        );
    }
    Ok(source)
}

/// Full driver: parse arguments, load the program, run it against the
/// process's stdin and stdout.
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = match Config::from_args(std::env::args()) {
        Ok(config) => config,
        Err(usage) => {
            println!("{usage}");
            std::process::exit(1);
        }
    };

    debug!(path = %config.source_path.display(), "loading program");
    let source = load_source(&config.source_path)?;

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    Interpreter::new(&source, stdin, stdout)
        .run()
        .context("program i/o failed")?;
    Ok(())
}
