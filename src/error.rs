use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the sampler
#[derive(Error, Debug)]
pub enum MonitorError {
	/// The statistics source could not be opened or read. Fatal for the loop.
	#[error("failed to read {}", path.display())]
	SourceUnavailable {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// A user-supplied core identifier was rejected
	#[error("{0}")]
	InvalidArgument(String),

	/// Writing the refreshed line to the terminal failed
	#[error("failed to write output: {0}")]
	Output(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_failing_side() {
		let read = MonitorError::SourceUnavailable {
			path: PathBuf::from("/proc/stat"),
			source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
		};
		assert_eq!(read.to_string(), "failed to read /proc/stat");

		let write = MonitorError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
		assert_eq!(write.to_string(), "failed to write output: closed");
	}

	#[test]
	fn read_error_keeps_its_cause() {
		use std::error::Error as _;

		let err = MonitorError::SourceUnavailable {
			path: PathBuf::from("/proc/stat"),
			source: io::Error::new(io::ErrorKind::NotFound, "gone"),
		};
		assert_eq!(err.source().map(|s| s.to_string()), Some("gone".to_string()));
	}
}
