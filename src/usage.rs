use crate::snapshot::CoreSnapshot;

/// A utilization percentage together with the snapshots it was derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilizationSample {
	pub percent: f64,
	pub prev: CoreSnapshot,
	pub curr: CoreSnapshot,
}

/// Calculates the share of non-idle ticks between two snapshots of one core
///
/// # Arguments
///
/// * `prev` - The earlier snapshot
/// * `curr` - The later snapshot
///
/// # Returns
///
/// A percentage in `[0.0, 100.0]`. If no ticks elapsed, or the counters went
/// backwards (hot-plug, reboot), the result is `0.0`.
pub fn usage(prev: &CoreSnapshot, curr: &CoreSnapshot) -> f64 {
	let total_delta = match curr.total().checked_sub(prev.total()) {
		Some(delta) if delta > 0 => delta,
		_ => return 0.0,
	};

	// A shrinking idle counter counts as no idle time at all
	let idle_delta = curr.idle_time().saturating_sub(prev.idle_time());
	let busy_delta = total_delta.saturating_sub(idle_delta);

	(100.0 * busy_delta as f64 / total_delta as f64).clamp(0.0, 100.0)
}

/// Like [`usage`], keeping the input snapshots alongside the result
pub fn sample(prev: CoreSnapshot, curr: CoreSnapshot) -> UtilizationSample {
	UtilizationSample {
		percent: usage(&prev, &curr),
		prev,
		curr,
	}
}
