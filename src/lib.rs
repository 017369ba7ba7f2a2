pub mod availability;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod monitor;
pub mod signal;
pub mod snapshot;
pub mod stat;
pub mod usage;

use std::io::{self, Write};

use crate::config::MonitorConfig;
use crate::display::{display_cycle, format_cycle, print_header};
use crate::error::Result;
use crate::monitor::{CancellationToken, SampleLoop, since_boot};
use crate::stat::ProcStatReader;

pub use crate::error::MonitorError;

/// Samples the configured cores and refreshes one terminal line per cycle
///
/// This is the main entry point for continuous monitoring. It returns once
/// `token` is cancelled, or with the first read or output error.
pub fn monitor_cpu_usage(config: &MonitorConfig, token: CancellationToken) -> Result<()> {
	let stdout = io::stdout();
	let mut out = stdout.lock();

	print_header(&mut out, &config.cores)?;

	let mut sampler = SampleLoop::new(ProcStatReader::new(&config.stat_path), config, token);
	let result = sampler.run(|cycle| display_cycle(&mut out, cycle));

	// Leave the cursor below the refreshed line
	writeln!(out)?;
	result
}

/// Prints each configured core's utilization averaged since boot, once
pub fn report_since_boot(config: &MonitorConfig) -> Result<()> {
	let reader = ProcStatReader::new(&config.stat_path);
	let cycle = since_boot(&reader, config)?;

	let stdout = io::stdout();
	let mut out = stdout.lock();
	writeln!(out, "CPU usage since boot: {:?}", config.cores)?;
	writeln!(out, "{}", format_cycle(&cycle).trim_start_matches('\r').trim_end())?;
	Ok(())
}
