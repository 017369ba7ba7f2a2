use std::io::{self, Write};

use crate::constants::{MIN_SEPARATOR_WIDTH, UNAVAILABLE_MARKER, VALUE_COLUMN_WIDTH};
use crate::monitor::{Cycle, Reading};

/// Writes the banner shown once before the first cycle
pub fn print_header<W: Write>(out: &mut W, cores: &[usize]) -> io::Result<()> {
	writeln!(out, "CPU Cores Monitor: {:?}", cores)?;
	writeln!(out, "Ctrl+C to exit")?;
	writeln!(out, "{}", "-".repeat(separator_width(cores.len())))?;
	out.flush()
}

/// Separator grows with the number of columns but never below a minimum
pub fn separator_width(columns: usize) -> usize {
	(20 + columns * 15).max(MIN_SEPARATOR_WIDTH)
}

/// Fixed-width label so columns line up for core ids up to three digits
fn display_name(core: usize) -> String {
	format!("CPU {:3}", core)
}

/// Percentage or marker, padded to the same width either way
fn format_value(reading: &Reading) -> String {
	let value = match reading.percent() {
		Some(pct) => format!("{:5.1}%", pct),
		None => UNAVAILABLE_MARKER.to_string(),
	};
	format!("{:>width$}", value, width = VALUE_COLUMN_WIDTH)
}

/// Renders one cycle as a single carriage-return-prefixed line
pub fn format_cycle(cycle: &Cycle) -> String {
	let mut line = format!("\rTime: {} ", cycle.timestamp.format("%H:%M:%S"));

	for core in &cycle.readings {
		line.push_str(&format!("| {}: {} ", display_name(core.core), format_value(&core.reading)));
	}

	if let Some(total) = &cycle.total {
		line.push_str(&format!("| {:<7}: {} ", "All", format_value(total)));
	}

	// Wipe leftovers from a previously longer line
	line.push_str("   ");
	line
}

/// Overwrites the current terminal line with the given cycle
pub fn display_cycle<W: Write>(out: &mut W, cycle: &Cycle) -> io::Result<()> {
	write!(out, "{}", format_cycle(cycle))?;
	out.flush()
}

#[cfg(test)]
mod tests {
	use chrono::{Local, TimeZone};

	use super::*;
	use crate::monitor::CoreReading;
	use crate::snapshot::CoreSnapshot;
	use crate::usage::UtilizationSample;

	fn usage(percent: f64) -> Reading {
		Reading::Usage(UtilizationSample {
			percent,
			prev: CoreSnapshot::default(),
			curr: CoreSnapshot::default(),
		})
	}

	fn cycle(readings: Vec<CoreReading>, total: Option<Reading>) -> Cycle {
		Cycle {
			timestamp: Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap(),
			readings,
			total,
		}
	}

	#[test]
	fn line_layout() {
		let c = cycle(
			vec![
				CoreReading { core: 0, reading: usage(75.0) },
				CoreReading { core: 12, reading: Reading::Unavailable },
			],
			None,
		);

		assert_eq!(format_cycle(&c), "\rTime: 09:05:07 | CPU   0:  75.0% | CPU  12:    ---    ");
	}

	#[test]
	fn columns_have_fixed_width() {
		let values = [usage(0.0), usage(9.95), usage(100.0), Reading::Unavailable];
		for v in &values {
			assert_eq!(format_value(v).len(), VALUE_COLUMN_WIDTH);
		}
	}

	#[test]
	fn total_column() {
		let c = cycle(vec![CoreReading { core: 1, reading: usage(12.5) }], Some(usage(33.3)));
		assert!(format_cycle(&c).ends_with("| All    :  33.3%    "));
	}

	#[test]
	fn header_and_separator() {
		let mut out = Vec::new();
		print_header(&mut out, &[0, 1, 2, 3]).unwrap();
		let text = String::from_utf8(out).unwrap();
		let lines: Vec<&str> = text.lines().collect();

		assert_eq!(lines[0], "CPU Cores Monitor: [0, 1, 2, 3]");
		assert_eq!(lines[1], "Ctrl+C to exit");
		assert_eq!(lines[2].len(), 80);
	}

	#[test]
	fn separator_minimum() {
		assert_eq!(separator_width(1), 60);
		assert_eq!(separator_width(10), 170);
	}
}
