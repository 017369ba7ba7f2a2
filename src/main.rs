use anyhow::Context;
use core_usage::config::{Cli, MonitorConfig};
use core_usage::monitor::CancellationToken;
use core_usage::{monitor_cpu_usage, report_since_boot, signal};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
	// Logs go to stderr so they never mix into the refreshed stdout line
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse_or_exit();
	let config = MonitorConfig::from(&cli);

	if cli.since_boot {
		report_since_boot(&config)?;
		return Ok(());
	}

	let token = CancellationToken::new();
	signal::cancel_on_signal(&token).context("failed to install signal handlers")?;

	monitor_cpu_usage(&config, token)?;
	Ok(())
}
