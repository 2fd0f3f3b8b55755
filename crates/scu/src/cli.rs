//! Command-line surface: `--list` or `--run I1 I2 ... Ik`.
//!
//! Mirrors the original runner's `argp`-based parser, which accepted
//! exactly those two shapes and rejected everything else (no arguments,
//! `--run` with none, trailing positionals without `--run`, or an index
//! outside the registry) with a usage message and a non-zero exit.

use clap::Parser;
use thiserror::Error;

/// Raw, unvalidated command line as clap sees it.
#[derive(Parser)]
#[command(
    name = "scu",
    about = "Self-contained unit test module runner",
    override_usage = "scu --list | scu --run <index>..."
)]
struct RawCli {
    /// List registered test cases and exit.
    #[arg(long)]
    list: bool,

    /// Run the test cases identified by the supplied indices.
    #[arg(long)]
    run: bool,

    /// Indices to run, in the order given, when `--run` is passed.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    indices: Vec<String>,
}

/// The parsed, validated mode of operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// `--list`.
    List,
    /// `--run I1 I2 ... Ik`, validated against the registry size.
    Run(Vec<usize>),
}

/// A malformed invocation. Carries a ready-to-print usage/error message.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct UsageError(pub String);

/// Parses and validates `args` (excluding argv[0]) against a registry of
/// `num_tests` test cases.
///
/// # Errors
///
/// Returns [`UsageError`] for any shape other than `--list` (no trailing
/// indices) or `--run` followed by one or more valid indices.
pub fn parse<I, S>(args: I, num_tests: usize) -> Result<Mode, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<std::ffi::OsString> + Clone,
{
    let raw = RawCli::try_parse_from(std::iter::once("scu".into()).chain(args.into_iter().map(Into::into)))
        .map_err(|e| UsageError(e.to_string()))?;

    match (raw.list, raw.run) {
        (true, true) => Err(UsageError("--list and --run are mutually exclusive".to_string())),
        (true, false) => {
            if !raw.indices.is_empty() {
                return Err(UsageError("--list takes no extra arguments".to_string()));
            }
            Ok(Mode::List)
        }
        (false, true) => {
            if raw.indices.is_empty() {
                return Err(UsageError("--run requires at least one test index".to_string()));
            }
            let mut indices = Vec::with_capacity(raw.indices.len());
            for raw_idx in &raw.indices {
                let idx: i64 = raw_idx
                    .parse()
                    .map_err(|_| UsageError(format!("invalid index: {raw_idx}")))?;
                if idx < 0 || idx as usize >= num_tests {
                    return Err(UsageError(format!("invalid index: {raw_idx}")));
                }
                indices.push(idx as usize);
            }
            if indices.len() > crate::registry::MAX_TESTS {
                return Err(UsageError(format!(
                    "too many indices: {} exceeds the limit of {}",
                    indices.len(),
                    crate::registry::MAX_TESTS
                )));
            }
            Ok(Mode::Run(indices))
        }
        (false, false) => {
            if raw.indices.is_empty() {
                Err(UsageError("expected one of: --list, --run <index>...".to_string()))
            } else {
                Err(UsageError("extraneous arguments without --run".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_with_no_extra_args_is_accepted() {
        let mode = parse(["--list"], 5).unwrap();
        assert_eq!(mode, Mode::List);
    }

    #[test]
    fn list_with_extra_args_is_rejected() {
        assert!(parse(["--list", "0"], 5).is_err());
    }

    #[test]
    fn run_with_indices_preserves_order_and_duplicates() {
        let mode = parse(["--run", "2", "0", "0"], 5).unwrap();
        assert_eq!(mode, Mode::Run(vec![2, 0, 0]));
    }

    #[test]
    fn run_with_no_indices_is_rejected() {
        assert!(parse(["--run"], 5).is_err());
    }

    #[test]
    fn run_with_out_of_range_index_is_rejected() {
        assert!(parse(["--run", "5"], 5).is_err());
    }

    #[test]
    fn run_with_negative_index_is_rejected() {
        assert!(parse(["--run", "-1"], 5).is_err());
    }

    #[test]
    fn bare_positional_arguments_without_run_are_rejected() {
        assert!(parse(["0", "1"], 5).is_err());
    }

    #[test]
    fn no_arguments_at_all_is_rejected() {
        assert!(parse(Vec::<&str>::new(), 5).is_err());
    }
}
