use crate::snapshot::CoreSnapshot;

/// Decides whether a configured core gets a percentage or the "unavailable" marker
///
/// `ZeroUser` is a heuristic, not an existence check: a core whose `user`
/// counter is zero in both snapshots is treated as never scheduled, so a core
/// that genuinely did no user-mode work over the whole window looks the same
/// as one the kernel does not have. A label missing from one snapshot set is
/// measured against all-zero counters. `Strict` only looks at whether the
/// kernel reported the label in both sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AvailabilityPolicy {
	#[default]
	ZeroUser,
	Strict,
}

impl AvailabilityPolicy {
	/// Returns the pair to compute usage from, or `None` when the core should
	/// be reported as unavailable
	pub fn evaluate(
		&self,
		prev: Option<&CoreSnapshot>,
		curr: Option<&CoreSnapshot>,
	) -> Option<(CoreSnapshot, CoreSnapshot)> {
		match self {
			AvailabilityPolicy::ZeroUser => {
				if prev.is_none() && curr.is_none() {
					return None;
				}

				let prev = prev.copied().unwrap_or_default();
				let curr = curr.copied().unwrap_or_default();
				if prev.user == 0 && curr.user == 0 {
					return None;
				}
				Some((prev, curr))
			},
			AvailabilityPolicy::Strict => Some((*prev?, *curr?)),
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			AvailabilityPolicy::ZeroUser => "zero-user",
			AvailabilityPolicy::Strict => "strict",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn busy() -> CoreSnapshot {
		CoreSnapshot::from_counters(&[10, 0, 5, 100])
	}

	fn no_user() -> CoreSnapshot {
		CoreSnapshot::from_counters(&[0, 3, 9, 100, 4])
	}

	#[test]
	fn zero_user_in_both_is_unavailable() {
		let policy = AvailabilityPolicy::ZeroUser;
		assert_eq!(policy.evaluate(Some(&no_user()), Some(&no_user())), None);
	}

	#[test]
	fn zero_user_in_one_snapshot_is_available() {
		let policy = AvailabilityPolicy::ZeroUser;
		assert_eq!(
			policy.evaluate(Some(&no_user()), Some(&busy())),
			Some((no_user(), busy()))
		);
	}

	#[test]
	fn missing_from_both_is_unavailable() {
		for policy in [AvailabilityPolicy::ZeroUser, AvailabilityPolicy::Strict] {
			assert_eq!(policy.evaluate(None, None), None);
		}
	}

	#[test]
	fn missing_from_one_side_uses_zero_counters() {
		let policy = AvailabilityPolicy::ZeroUser;
		assert_eq!(policy.evaluate(None, Some(&busy())), Some((CoreSnapshot::default(), busy())));
		assert_eq!(policy.evaluate(Some(&busy()), None), Some((busy(), CoreSnapshot::default())));
		assert_eq!(policy.evaluate(None, Some(&no_user())), None);
	}

	#[test]
	fn strict_needs_label_in_both() {
		let policy = AvailabilityPolicy::Strict;
		assert_eq!(policy.evaluate(Some(&busy()), None), None);
		assert_eq!(policy.evaluate(None, Some(&busy())), None);
	}

	#[test]
	fn strict_accepts_zero_user_cores() {
		let policy = AvailabilityPolicy::Strict;
		assert_eq!(
			policy.evaluate(Some(&no_user()), Some(&no_user())),
			Some((no_user(), no_user()))
		);
	}
}
