//! Command-line interface handling for the territory diagnostics driver.
//!
//! Uses the `clap` builder API; every option overrides the matching
//! configuration file setting.

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Optional override for the number of ticks to run
    pub max_ticks: Option<u64>,
    /// Optional override for the territory edge length
    pub grid_size: Option<u32>,
    /// Whether to turn the query cache off
    pub no_cache: bool,
}

impl CliArgs {
    /// Builds the clap command definition.
    pub fn command() -> Command {
        Command::new("territory")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Drives a synthetic workload through the territory index and reports statistics")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .default_value("territory.toml"),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("ticks")
                    .short('t')
                    .long("ticks")
                    .value_name("COUNT")
                    .help("Stop after this many ticks (0 runs until Ctrl+C)")
                    .value_parser(value_parser!(u64)),
            )
            .arg(
                Arg::new("grid")
                    .short('g')
                    .long("grid")
                    .value_name("CELLS")
                    .help("Territory edge length in cells")
                    .value_parser(value_parser!(u32)),
            )
            .arg(
                Arg::new("no-cache")
                    .long("no-cache")
                    .help("Disable the query cache")
                    .action(ArgAction::SetTrue),
            )
    }

    /// Parses the process arguments.
    ///
    /// Exits with a usage message when the arguments are malformed.
    pub fn parse() -> Self {
        Self::from_matches(&Self::command().get_matches())
    }

    /// Parses an explicit argument list, e.g. in tests.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(&Self::command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("territory.toml")),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            max_ticks: matches.get_one::<u64>("ticks").copied(),
            grid_size: matches.get_one::<u32>("grid").copied(),
            no_cache: matches.get_flag("no-cache"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["territory"]).unwrap();
        assert_eq!(args.config_path, PathBuf::from("territory.toml"));
        assert!(args.log_level.is_none());
        assert!(args.max_ticks.is_none());
        assert!(!args.json_logs);
        assert!(!args.no_cache);
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::try_parse_from([
            "territory", "-c", "bench.toml", "-l", "debug", "--json-logs", "-t", "500", "--grid", "12",
            "--no-cache",
        ])
        .unwrap();

        assert_eq!(args.config_path, PathBuf::from("bench.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.json_logs);
        assert_eq!(args.max_ticks, Some(500));
        assert_eq!(args.grid_size, Some(12));
        assert!(args.no_cache);
    }

    #[test]
    fn test_rejects_non_numeric_ticks() {
        assert!(CliArgs::try_parse_from(["territory", "--ticks", "soon"]).is_err());
    }
}
