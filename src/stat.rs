use std::fs;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, trace};

use crate::constants::{CORE_ROW_PREFIX, DEFAULT_STAT_PATH, MAX_COUNTER_FIELDS, MIN_COUNTER_FIELDS};
use crate::error::{MonitorError, Result};
use crate::snapshot::{CoreSnapshot, SnapshotSet};

/// Anything that can produce a fresh set of per-core counters
pub trait StatSource {
	/// Reads the current counters of every reported core
	fn read(&self) -> Result<SnapshotSet>;
}

impl<S: StatSource + ?Sized> StatSource for &S {
	fn read(&self) -> Result<SnapshotSet> {
		(**self).read()
	}
}

/// Reads per-core counters from a `/proc/stat` formatted file
#[derive(Debug, Clone)]
pub struct ProcStatReader {
	path: PathBuf,
}

impl ProcStatReader {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	fn unavailable(&self, source: std::io::Error) -> MonitorError {
		debug!(path = %self.path.display(), %source, "statistics source unavailable");
		MonitorError::SourceUnavailable {
			path: self.path.clone(),
			source,
		}
	}
}

impl Default for ProcStatReader {
	fn default() -> Self {
		Self::new(DEFAULT_STAT_PATH)
	}
}

impl StatSource for ProcStatReader {
	fn read(&self) -> Result<SnapshotSet> {
		// The file handle is dropped on every return path
		let file = fs::File::open(&self.path).map_err(|e| self.unavailable(e))?;
		let reader = BufReader::new(file);

		let mut set = SnapshotSet::default();
		for line in reader.lines() {
			let line = line.map_err(|e| self.unavailable(e))?;
			apply_line(&mut set, &line);
		}

		debug!(path = %self.path.display(), cores = set.len(), "read statistics");
		Ok(set)
	}
}

/// Parses a complete `/proc/stat` body
///
/// Rows that fail to parse are skipped; lines that are not CPU rows are ignored.
pub fn parse_stat(content: &str) -> SnapshotSet {
	let mut set = SnapshotSet::default();
	for line in content.lines() {
		apply_line(&mut set, line);
	}
	set
}

fn apply_line(set: &mut SnapshotSet, line: &str) {
	match parse_row(line) {
		Ok(Some((RowLabel::Aggregate, snapshot))) => set.aggregate = Some(snapshot),
		Ok(Some((RowLabel::Core(core), snapshot))) => {
			set.cores.insert(core, snapshot);
		},
		Ok(None) => {},
		Err(e) => trace!(line, error = %e, "skipping malformed row"),
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowLabel {
	Aggregate,
	Core(usize),
}

#[derive(Error, Debug, PartialEq, Eq)]
enum MalformedRow {
	#[error("invalid core label {0:?}")]
	Label(String),

	#[error("expected at least 4 counters, got {0}")]
	TooFewCounters(usize),

	#[error("non-numeric counter {0:?}")]
	NonNumeric(String),
}

/// Parses one line. `Ok(None)` means the line is not a CPU row at all.
fn parse_row(line: &str) -> std::result::Result<Option<(RowLabel, CoreSnapshot)>, MalformedRow> {
	let mut tokens = line.split_whitespace();
	let Some(label) = tokens.next() else {
		return Ok(None);
	};
	let Some(suffix) = label.strip_prefix(CORE_ROW_PREFIX) else {
		return Ok(None);
	};

	let label = if suffix.is_empty() {
		RowLabel::Aggregate
	} else {
		// Plain decimal only: no sign, no leading zeros
		let canonical = suffix.bytes().all(|b| b.is_ascii_digit()) && (suffix.len() == 1 || !suffix.starts_with('0'));
		let core = suffix
			.parse::<usize>()
			.ok()
			.filter(|_| canonical)
			.ok_or_else(|| MalformedRow::Label(label.to_string()))?;
		RowLabel::Core(core)
	};

	// Counters past the declared fields (guest_nice and later) are ignored
	let counters = tokens
		.take(MAX_COUNTER_FIELDS)
		.map(|tok| tok.parse::<u64>().map_err(|_| MalformedRow::NonNumeric(tok.to_string())))
		.collect::<std::result::Result<Vec<_>, _>>()?;

	if counters.len() < MIN_COUNTER_FIELDS {
		return Err(MalformedRow::TooFewCounters(counters.len()));
	}

	Ok(Some((label, CoreSnapshot::from_counters(&counters))))
}
