//! Command-line surface and the run configuration resolved from it.
//!
//! Configuration mistakes are corrected here and never reach the engine:
//! a missing, unparsable, or non-positive worker count falls back to
//! [`DEFAULT_THREADS`], and a count above the dimension is clamped.
//! Like C's `atoi`, only the optional sign and leading digits of the
//! worker count are read, so `8abc` means 8.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, warn};

pub const DEFAULT_THREADS: usize = 4;
pub const DEFAULT_DIM: usize = 1000;

#[derive(Parser, Debug)]
#[command(name = "matmul-sync")]
#[command(version, about = "Multiply two square integer matrices on a barrier-synchronized thread pool")]
pub struct Cli {
    /// Worker threads (default 4 if absent or not a positive integer)
    #[arg(allow_negative_numbers = true)]
    pub threads: Option<String>,

    /// Matrix dimension N (matrices are N×N)
    #[arg(short = 'n', long, env = "MATMUL_DIM", default_value = "1000")]
    pub dim: NonZeroUsize,

    /// Where to write the result matrix, one value per line
    #[arg(short, long, default_value = "serial.txt")]
    pub output: PathBuf,

    /// Where to write the key/value timing report
    #[arg(short, long, default_value = "profile_results.txt")]
    pub profile: PathBuf,

    /// Check the result against a single-threaded reference product
    #[arg(long)]
    pub verify: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub dim: usize,
    /// Already clamped to `dim`; always at least 1.
    pub threads: usize,
    pub output: PathBuf,
    pub profile: PathBuf,
    pub verify: bool,
}

/// Lenient worker-count parsing. Never fails.
pub fn parse_threads(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_THREADS;
    };
    match leading_count(raw) {
        Some(t) if t > 0 => t,
        _ => {
            warn!(value = raw, default = DEFAULT_THREADS, "ignoring invalid worker count");
            DEFAULT_THREADS
        }
    }
}

/// Optional sign plus leading decimal digits; anything after is ignored.
/// `None` when there are no digits or the value is negative.
fn leading_count(raw: &str) -> Option<usize> {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let digits = &s[..end];
    if digits.is_empty() {
        return None;
    }
    // more digits than fit in usize is still "as many as possible"
    let value = digits.parse::<usize>().unwrap_or(usize::MAX);
    if negative && value != 0 { None } else { Some(value) }
}

impl Cli {
    pub fn into_config(self) -> EngineConfig {
        let dim = self.dim.get();
        let requested = parse_threads(self.threads.as_deref());
        let threads = requested.min(dim);
        if threads < requested {
            debug!(requested, dim, "clamping worker count to matrix dimension");
        }
        EngineConfig {
            dim,
            threads,
            output: self.output,
            profile: self.profile,
            verify: self.verify,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};

    // Same parser, minus the MATMUL_DIM fallback, so the caller's shell
    // cannot change what the tests see.
    fn isolated_command() -> clap::Command {
        Cli::command().mut_arg("dim", |a| a.env(None::<&'static str>))
    }

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let argv = std::iter::once("matmul-sync").chain(args.iter().copied());
        let matches = isolated_command().try_get_matches_from(argv)?;
        Cli::from_arg_matches(&matches)
    }

    fn config(args: &[&str]) -> EngineConfig {
        parse(args).unwrap().into_config()
    }

    fn dim_env(cmd: &clap::Command) -> Option<String> {
        cmd.get_arguments()
            .find(|a| a.get_id() == "dim")
            .and_then(|a| a.get_env())
            .map(|e| e.to_string_lossy().into_owned())
    }

    #[test]
    fn test_dim_env_only_on_real_command() {
        assert_eq!(dim_env(&Cli::command()).as_deref(), Some("MATMUL_DIM"));
        assert_eq!(dim_env(&isolated_command()), None);
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.threads, DEFAULT_THREADS);
        assert_eq!(cfg.dim, DEFAULT_DIM);
        assert_eq!(cfg.output, PathBuf::from("serial.txt"));
        assert_eq!(cfg.profile, PathBuf::from("profile_results.txt"));
        assert!(!cfg.verify);
    }

    #[test]
    fn test_invalid_thread_counts_fall_back() {
        assert_eq!(config(&["0"]).threads, DEFAULT_THREADS);
        assert_eq!(config(&["-3"]).threads, DEFAULT_THREADS);
        assert_eq!(config(&["lots"]).threads, DEFAULT_THREADS);
        assert_eq!(config(&["8"]).threads, 8);
    }

    #[test]
    fn test_threads_clamped_to_dim() {
        let cfg = config(&["4", "--dim", "1"]);
        assert_eq!(cfg.dim, 1);
        assert_eq!(cfg.threads, 1);
        assert_eq!(config(&["5000"]).threads, DEFAULT_DIM);
    }

    #[test]
    fn test_zero_dim_rejected() {
        assert!(parse(&["--dim", "0"]).is_err());
    }

    #[test]
    fn test_parse_threads() {
        assert_eq!(parse_threads(None), DEFAULT_THREADS);
        assert_eq!(parse_threads(Some(" 12 ")), 12);
        assert_eq!(parse_threads(Some("+3")), 3);
        assert_eq!(parse_threads(Some("-0")), DEFAULT_THREADS);
        assert_eq!(parse_threads(Some("")), DEFAULT_THREADS);
    }

    #[test]
    fn test_parse_threads_reads_leading_digits() {
        assert_eq!(parse_threads(Some("8abc")), 8);
        assert_eq!(parse_threads(Some("12x")), 12);
        assert_eq!(parse_threads(Some("2.5")), 2);
        assert_eq!(parse_threads(Some("  6 workers")), 6);
        assert_eq!(parse_threads(Some("x12")), DEFAULT_THREADS);
        assert_eq!(parse_threads(Some("-8abc")), DEFAULT_THREADS);
        assert_eq!(parse_threads(Some("99999999999999999999999")), usize::MAX);
        assert_eq!(config(&["8abc", "--dim", "16"]).threads, 8);
    }
}
