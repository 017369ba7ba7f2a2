use std::collections::BTreeMap;

/// One core's tick counters at a single instant
///
/// All values are monotonic tick counts since boot, in the column order of
/// `/proc/stat`. Snapshots are built fresh on every read and never mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoreSnapshot {
	pub user: u64,
	pub nice: u64,
	pub system: u64,
	pub idle: u64,
	pub iowait: u64,
	pub irq: u64,
	pub softirq: u64,
	pub steal: u64,
	pub guest: u64,
}

impl CoreSnapshot {
	/// Builds a snapshot from positional counters, zero-filling missing trailing fields
	pub fn from_counters(counters: &[u64]) -> Self {
		let field = |idx: usize| counters.get(idx).copied().unwrap_or(0);

		Self {
			user: field(0),
			nice: field(1),
			system: field(2),
			idle: field(3),
			iowait: field(4),
			irq: field(5),
			softirq: field(6),
			steal: field(7),
			guest: field(8),
		}
	}

	/// Sum of every counter
	pub fn total(&self) -> u64 {
		[
			self.user,
			self.nice,
			self.system,
			self.idle,
			self.iowait,
			self.irq,
			self.softirq,
			self.steal,
			self.guest,
		]
		.iter()
		.fold(0u64, |acc, &v| acc.saturating_add(v))
	}

	/// Ticks spent idle, including time waiting on I/O
	pub fn idle_time(&self) -> u64 {
		self.idle.saturating_add(self.iowait)
	}
}

/// All core snapshots captured in a single pass over the statistics source
///
/// A label missing from `cores` means the kernel did not report that core,
/// which is not the same as a core reporting all-zero counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotSet {
	/// Core label -> counters, ordered by label
	pub cores: BTreeMap<usize, CoreSnapshot>,

	/// The summed "all cores" row, when the source reported one
	pub aggregate: Option<CoreSnapshot>,
}

impl SnapshotSet {
	pub fn get(&self, core: usize) -> Option<&CoreSnapshot> {
		self.cores.get(&core)
	}

	pub fn len(&self) -> usize {
		self.cores.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cores.is_empty()
	}
}
