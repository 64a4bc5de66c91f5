//! # Command Line Arguments
//!
//! ```text
//! chunkgen [--config <path>] [--seed <number>] [--radius <chunks>] [--workers <n>]
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Default world seed when `--seed` is omitted.
pub const DEFAULT_SEED: f64 = 1337.0;

/// Default half-width of the generated square, in chunks.
pub const DEFAULT_RADIUS: i32 = 1;

/// Usage line printed on errors and `--help`.
pub const USAGE: &str =
    "usage: chunkgen [--config <path>] [--seed <number>] [--radius <chunks>] [--workers <n>]";

/// Argument errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// A flag was given without its value.
    #[error("missing value for {0}")]
    MissingValue(String),

    /// A value could not be parsed.
    #[error("invalid value for {flag}: {value}")]
    InvalidValue {
        /// Flag being parsed.
        flag: String,
        /// Offending text.
        value: String,
    },

    /// Unrecognized argument.
    #[error("unknown argument: {0}")]
    Unknown(String),

    /// `--help` was requested.
    #[error("help requested")]
    Help,
}

/// Parsed `chunkgen` arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct CliArgs {
    /// TOML config path; built-in defaults when absent.
    pub config: Option<PathBuf>,
    /// World seed.
    pub seed: f64,
    /// Chunks from `(0, 0)` to the edge of the square.
    pub radius: i32,
    /// Worker threads; `None` uses the available parallelism.
    pub workers: Option<usize>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            config: None,
            seed: DEFAULT_SEED,
            radius: DEFAULT_RADIUS,
            workers: None,
        }
    }
}

impl CliArgs {
    /// Parses arguments, excluding the program name.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] for unknown flags, missing or malformed values,
    /// and `--help`.
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--help" | "-h" => return Err(CliError::Help),
                "--config" | "-c" => {
                    parsed.config = Some(PathBuf::from(value_of(&flag, args.next())?));
                }
                "--seed" | "-s" => {
                    parsed.seed = parse_value(&flag, args.next())?;
                }
                "--radius" | "-r" => {
                    let radius: i32 = parse_value(&flag, args.next())?;
                    if radius < 0 {
                        return Err(CliError::InvalidValue {
                            flag,
                            value: radius.to_string(),
                        });
                    }
                    parsed.radius = radius;
                }
                "--workers" | "-w" => {
                    parsed.workers = Some(parse_value(&flag, args.next())?);
                }
                _ => return Err(CliError::Unknown(flag)),
            }
        }

        Ok(parsed)
    }

    /// Worker count to use, resolving the default.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        })
    }
}

fn value_of(flag: &str, value: Option<String>) -> Result<String, CliError> {
    value.ok_or_else(|| CliError::MissingValue(flag.to_string()))
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, CliError> {
    let text = value_of(flag, value)?;
    text.parse().map_err(|_| CliError::InvalidValue {
        flag: flag.to_string(),
        value: text,
    })
}
