use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::availability::AvailabilityPolicy;
use crate::constants::{DATA_COLLECTION_INTERVAL_MS, DEFAULT_CORES, DEFAULT_STAT_PATH, MAX_CORE_ID};
use crate::error::MonitorError;

const EXAMPLES: &str = "\
Examples:
  core-usage              # Cores 0,1,2,3 by default
  core-usage 0 2          # Monitor cores 0 and 2
  core-usage 1 2 5 7      # Monitor cores 1,2,5,7
  core-usage 0 12 128     # Monitor cores 0, 12, 128
  core-usage --since-boot # Average load since boot, printed once

Ctrl+C to exit";

/// Command line interface
#[derive(Parser, Debug)]
#[command(name = "core-usage", version, about = "Per-core CPU utilization monitor", after_help = EXAMPLES)]
pub struct Cli {
	/// Core numbers to monitor (0-999) [default: 0 1 2 3]
	#[arg(value_name = "CORES", value_parser = parse_core_id, allow_negative_numbers = true)]
	pub cores: Vec<usize>,

	/// Sampling interval in milliseconds
	#[arg(
		short,
		long,
		value_name = "MS",
		default_value_t = DATA_COLLECTION_INTERVAL_MS,
		value_parser = clap::value_parser!(u64).range(1..)
	)]
	pub interval: u64,

	/// Only treat cores missing from /proc/stat as unavailable
	#[arg(long)]
	pub strict: bool,

	/// Add a column for all cores combined
	#[arg(long)]
	pub total: bool,

	/// Print the average utilization since boot once and exit
	#[arg(long)]
	pub since_boot: bool,

	/// Statistics source to read
	#[arg(long, value_name = "PATH", default_value = DEFAULT_STAT_PATH)]
	pub stat_path: PathBuf,
}

impl Cli {
	/// Parses the process arguments, exiting on help or bad input
	///
	/// A rejected value prints the error followed by the full usage text.
	pub fn parse_or_exit() -> Self {
		Self::try_parse().unwrap_or_else(|err| {
			if err.kind() == ErrorKind::ValueValidation {
				eprint!("{}", usage_error(&err));
				std::process::exit(2);
			}
			err.exit()
		})
	}
}

/// Error message followed by usage and examples
pub fn usage_error(err: &clap::Error) -> String {
	format!("{}\n{}", err.render(), Cli::command().render_help())
}

/// Validates one core identifier
pub fn parse_core_id(arg: &str) -> Result<usize, MonitorError> {
	let core = arg
		.trim()
		.parse::<i64>()
		.map_err(|_| MonitorError::InvalidArgument(format!("Incorrect core number: {}", arg)))?;

	if core < 0 {
		return Err(MonitorError::InvalidArgument(format!(
			"Core number should be 0 or above: {}",
			core
		)));
	}
	if core > MAX_CORE_ID as i64 {
		return Err(MonitorError::InvalidArgument(format!(
			"Core number too large (max. {}): {}",
			MAX_CORE_ID, core
		)));
	}

	Ok(core as usize)
}

/// Resolved settings for one monitoring session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
	/// Core labels in display order
	pub cores: Vec<usize>,
	pub interval: Duration,
	pub policy: AvailabilityPolicy,
	pub show_total: bool,
	pub stat_path: PathBuf,
}

impl Default for MonitorConfig {
	fn default() -> Self {
		Self {
			cores: DEFAULT_CORES.to_vec(),
			interval: Duration::from_millis(DATA_COLLECTION_INTERVAL_MS),
			policy: AvailabilityPolicy::default(),
			show_total: false,
			stat_path: PathBuf::from(DEFAULT_STAT_PATH),
		}
	}
}

impl From<&Cli> for MonitorConfig {
	fn from(cli: &Cli) -> Self {
		let cores = if cli.cores.is_empty() {
			DEFAULT_CORES.to_vec()
		} else {
			cli.cores.clone()
		};

		let policy = if cli.strict {
			AvailabilityPolicy::Strict
		} else {
			AvailabilityPolicy::ZeroUser
		};

		Self {
			cores,
			interval: Duration::from_millis(cli.interval),
			policy,
			show_total: cli.total,
			stat_path: cli.stat_path.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(args: &[&str]) -> Result<MonitorConfig, clap::Error> {
		let argv = std::iter::once("core-usage").chain(args.iter().copied());
		Cli::try_parse_from(argv).map(|cli| MonitorConfig::from(&cli))
	}

	#[test]
	fn defaults() {
		let cfg = parse(&[]).unwrap();
		assert_eq!(cfg, MonitorConfig::default());
		assert_eq!(cfg.cores, vec![0, 1, 2, 3]);
		assert_eq!(cfg.interval, Duration::from_secs(1));
	}

	#[test]
	fn explicit_cores_keep_their_order() {
		let cfg = parse(&["7", "0", "999"]).unwrap();
		assert_eq!(cfg.cores, vec![7, 0, 999]);
	}

	#[test]
	fn flags() {
		let cfg = parse(&["--strict", "--total", "-i", "250", "--stat-path", "/tmp/stat", "3"]).unwrap();
		assert_eq!(cfg.policy, AvailabilityPolicy::Strict);
		assert!(cfg.show_total);
		assert_eq!(cfg.interval, Duration::from_millis(250));
		assert_eq!(cfg.stat_path, PathBuf::from("/tmp/stat"));
		assert_eq!(cfg.cores, vec![3]);
	}

	#[test]
	fn rejects_bad_core_ids() {
		for bad in ["1000", "-1", "abc", "1.5"] {
			let err = parse(&[bad]).unwrap_err();
			assert_eq!(err.kind(), ErrorKind::ValueValidation, "accepted {}", bad);
		}
	}

	#[test]
	fn rejects_zero_interval() {
		assert!(parse(&["-i", "0"]).is_err());
	}

	#[test]
	fn help_does_not_produce_config() {
		let err = parse(&["--help"]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::DisplayHelp);
	}

	#[test]
	fn core_id_messages() {
		assert_eq!(parse_core_id("12").unwrap(), 12);
		assert_eq!(
			parse_core_id("1000").unwrap_err().to_string(),
			"Core number too large (max. 999): 1000"
		);
		assert_eq!(parse_core_id("x").unwrap_err().to_string(), "Incorrect core number: x");
		assert_eq!(parse_core_id("-4").unwrap_err().to_string(), "Core number should be 0 or above: -4");
	}

	#[test]
	fn invalid_core_shows_usage() {
		let err = parse(&["0", "1000"]).unwrap_err();
		let text = usage_error(&err);

		assert!(text.contains("Core number too large (max. 999): 1000"));
		assert!(text.contains("Usage: core-usage [OPTIONS] [CORES]..."));
		assert!(text.contains("Examples:"));
		assert!(text.contains("core-usage 0 2          # Monitor cores 0 and 2"));
	}

	#[test]
	fn cli_definition_is_consistent() {
		Cli::command().debug_assert();
	}
}
