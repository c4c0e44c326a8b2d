//! Optional observability helpers for client calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `chainsync_client.call` with the `op`
//!   (operation), `stage` (call site), and `outcome` fields, plus a `warn` event whenever
//!   stored credentials are discarded.
//! - Enable `metrics` to increment the `chainsync_client_call_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Client operations observed by spans and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Any authenticated API request.
	Request,
	/// Refresh-token exchange after a 401.
	Refresh,
	/// Account registration.
	Register,
	/// Credential sign-in.
	Login,
	/// Email verification or re-sending the verification email.
	VerifyEmail,
	/// Sign-out.
	Logout,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Request => "request",
			Operation::Refresh => "refresh",
			Operation::Register => "register",
			Operation::Login => "login",
			Operation::VerifyEmail => "verify_email",
			Operation::Logout => "logout",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}

	/// Maps a result onto [`CallOutcome::Success`] or [`CallOutcome::Failure`].
	pub fn of<T, E>(result: &std::result::Result<T, E>) -> Self {
		if result.is_ok() { CallOutcome::Success } else { CallOutcome::Failure }
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
