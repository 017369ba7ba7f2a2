use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::availability::AvailabilityPolicy;
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::snapshot::{CoreSnapshot, SnapshotSet};
use crate::stat::StatSource;
use crate::usage::{UtilizationSample, sample};

/// Shared flag telling a running loop to stop at its next iteration boundary
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
	cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::SeqCst);
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::SeqCst)
	}
}

/// Where the loop currently is within a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
	/// Between cycles
	Idle,
	/// Taking the two reads of a cycle
	Sampling,
}

/// Read-only handle on a loop's current state, usable while the loop runs
#[derive(Debug, Clone, Default)]
pub struct LoopStatus {
	sampling: Arc<AtomicBool>,
}

impl LoopStatus {
	pub fn state(&self) -> LoopState {
		if self.sampling.load(Ordering::SeqCst) {
			LoopState::Sampling
		} else {
			LoopState::Idle
		}
	}

	fn set(&self, state: LoopState) {
		self.sampling.store(state == LoopState::Sampling, Ordering::SeqCst);
	}
}

/// Outcome for one configured core
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
	Usage(UtilizationSample),
	Unavailable,
}

impl Reading {
	pub fn percent(&self) -> Option<f64> {
		match self {
			Reading::Usage(s) => Some(s.percent),
			Reading::Unavailable => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreReading {
	pub core: usize,
	pub reading: Reading,
}

/// Everything emitted for one sampling cycle
#[derive(Debug, Clone)]
pub struct Cycle {
	pub timestamp: DateTime<Local>,
	/// Readings in configured core order
	pub readings: Vec<CoreReading>,
	/// Aggregate "all cores" reading, when requested
	pub total: Option<Reading>,
}

/// Repeatedly samples the statistics source and emits per-core utilization
pub struct SampleLoop<S: StatSource> {
	source: S,
	cores: Vec<usize>,
	interval: Duration,
	policy: AvailabilityPolicy,
	show_total: bool,
	token: CancellationToken,
	status: LoopStatus,
}

impl<S: StatSource> SampleLoop<S> {
	pub fn new(source: S, config: &MonitorConfig, token: CancellationToken) -> Self {
		Self {
			source,
			cores: config.cores.clone(),
			interval: config.interval,
			policy: config.policy,
			show_total: config.show_total,
			token,
			status: LoopStatus::default(),
		}
	}

	pub fn state(&self) -> LoopState {
		self.status.state()
	}

	pub fn status(&self) -> LoopStatus {
		self.status.clone()
	}

	/// Runs one read, wait, read cycle
	pub fn sample_once(&mut self) -> Result<Cycle> {
		self.status.set(LoopState::Sampling);
		let snapshots = self.acquire();
		self.status.set(LoopState::Idle);

		let (prev, curr) = snapshots?;
		let cycle = evaluate(&self.cores, self.policy, self.show_total, &prev, &curr);
		debug!(cores = cycle.readings.len(), "cycle complete");
		Ok(cycle)
	}

	fn acquire(&self) -> Result<(SnapshotSet, SnapshotSet)> {
		let prev = self.source.read()?;
		thread::sleep(self.interval);
		let curr = self.source.read()?;
		Ok((prev, curr))
	}

	/// Samples until cancelled, handing every cycle to `sink`
	///
	/// Cancellation is checked between cycles only. A failed read or a failed
	/// sink ends the loop with that error; nothing is retried.
	pub fn run<F>(&mut self, mut sink: F) -> Result<()>
	where
		F: FnMut(&Cycle) -> io::Result<()>,
	{
		info!(
			cores = ?self.cores,
			interval_ms = self.interval.as_millis() as u64,
			policy = self.policy.as_str(),
			"sampling started"
		);
		warn_offline_cores(&self.cores);

		loop {
			if self.token.is_cancelled() {
				info!("sampling cancelled");
				return Ok(());
			}

			let cycle = self.sample_once()?;
			sink(&cycle)?;
		}
	}
}

/// Reads the source once and reports utilization averaged since boot
pub fn since_boot<S: StatSource>(source: &S, config: &MonitorConfig) -> Result<Cycle> {
	let curr = source.read()?;

	// Every reported core measured against a zeroed counter set
	let boot = SnapshotSet {
		cores: curr.cores.keys().map(|&core| (core, CoreSnapshot::default())).collect(),
		aggregate: curr.aggregate.map(|_| CoreSnapshot::default()),
	};

	Ok(evaluate(&config.cores, config.policy, config.show_total, &boot, &curr))
}

/// Turns two snapshot sets into the readings for the configured cores
pub fn evaluate(
	cores: &[usize],
	policy: AvailabilityPolicy,
	show_total: bool,
	prev: &SnapshotSet,
	curr: &SnapshotSet,
) -> Cycle {
	let readings = cores
		.iter()
		.map(|&core| CoreReading {
			core,
			reading: match policy.evaluate(prev.get(core), curr.get(core)) {
				Some((p, c)) => Reading::Usage(sample(p, c)),
				None => Reading::Unavailable,
			},
		})
		.collect();

	let total = show_total.then(|| match (prev.aggregate, curr.aggregate) {
		(Some(p), Some(c)) => Reading::Usage(sample(p, c)),
		_ => Reading::Unavailable,
	});

	Cycle {
		timestamp: Local::now(),
		readings,
		total,
	}
}

fn warn_offline_cores(cores: &[usize]) {
	let online = num_cpus::get();
	for &core in cores.iter().filter(|&&core| core >= online) {
		warn!(core, online, "configured core is beyond the online CPU count");
	}
}
