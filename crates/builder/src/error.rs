use effigy_gateway::GatewayError;

/// Failure taxonomy for one rebuild cycle.
///
/// Only `Cancelled` and `NotReady` cross the public boundary as raised errors;
/// `ResolutionFailed` and collaborator faults are absorbed into
/// rollback-and-log and reported via [`RebuildOutcome::RolledBack`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RebuildError {
	/// The resolver collaborator is unavailable; nothing was mutated.
	#[error("resolver is not ready")]
	NotReady,
	/// Forward resolution returned no usable data.
	#[error("forward resolution returned no usable data")]
	ResolutionFailed,
	/// Caller-requested cancellation; the in-flight attempt must be discarded.
	#[error("rebuild cancelled")]
	Cancelled,
	/// A collaborator call failed mid-cycle.
	#[error(transparent)]
	Gateway(#[from] GatewayError),
}

/// How one rebuild cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildOutcome {
	/// The mutated snapshot is the new state.
	Committed,
	/// The subject had no draw object; its category data was cleared. Valid
	/// "nothing to show" state, not a failure.
	Cleared,
	/// A mid-cycle fault was absorbed; the pre-cycle snapshot was restored and
	/// remains valid.
	RolledBack {
		/// The absorbed fault.
		error: RebuildError,
	},
}
