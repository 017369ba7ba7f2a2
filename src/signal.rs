use std::io;
use std::sync::OnceLock;

use crate::monitor::CancellationToken;

static TOKEN: OnceLock<CancellationToken> = OnceLock::new();

extern "C" fn on_signal(_signum: libc::c_int) {
	// Only an atomic store happens here, which is async-signal-safe
	if let Some(token) = TOKEN.get() {
		token.cancel();
	}
}

/// Routes SIGINT and SIGTERM onto `token` instead of killing the process
///
/// Only the first registered token is used; later calls keep it.
pub fn cancel_on_signal(token: &CancellationToken) -> io::Result<()> {
	let _ = TOKEN.set(token.clone());

	for signum in [libc::SIGINT, libc::SIGTERM] {
		// SAFETY: the handler has the signature libc expects and touches only atomics
		let previous = unsafe { libc::signal(signum, on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t) };
		if previous == libc::SIG_ERR {
			return Err(io::Error::last_os_error());
		}
	}

	Ok(())
}
