//! Collaborator contracts consumed by the Effigy snapshot core.
//!
//! The builder never talks to the asset-override subsystem, the content hash
//! cache, or process memory directly; it only calls these traits. Implementations
//! live outside this workspace and are responsible for their own execution-context
//! constraints (notably [`LivenessProbe`], whose methods must internally run on
//! the subject's owning context).

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use effigy_model::{SubjectAddress, SubjectHandle};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Failure raised by a collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
	/// The resolver collaborator is not connected/initialized.
	#[error("resolver is not initialized")]
	NotInitialized,
	/// Internal fault inside a collaborator call.
	#[error("collaborator failure: {0}")]
	Collaborator(String),
}

/// Result alias for collaborator calls.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Batch path resolution and scalar overlay queries.
///
/// Calls inherit the rebuild cycle's cancellation token at the call site and
/// carry no independent timeout; an unresponsive collaborator hangs the cycle
/// until the caller cancels it.
#[async_trait]
pub trait ResolverGateway: Send + Sync {
	/// Whether the resolver backend is connected and usable.
	fn is_initialized(&self) -> bool;

	/// Resolves every active asset identifier of the subject in one pass,
	/// returning `resolved_path -> [game_paths]`.
	///
	/// `Ok(None)` means the resolver produced no usable data, which is fatal
	/// for the current rebuild cycle.
	async fn resolve_subject(&self, subject: &SubjectHandle) -> Result<Option<BTreeMap<String, Vec<String>>>>;

	/// Batch-resolves identifiers forward and content paths in reverse.
	///
	/// Results are index-aligned with the inputs: `forward_results[i]` is the
	/// resolved target of `forward[i]`, `reverse_results[i]` the identifier set
	/// for `reverse[i]`.
	async fn resolve_paths(&self, forward: &[String], reverse: &[String]) -> Result<(Vec<String>, Vec<Vec<String>>)>;

	/// Current manipulation payload (synchronous getter in the backend).
	fn manipulation_blob(&self) -> String;

	/// Current offset value.
	async fn offset_value(&self) -> Result<String>;

	/// Pose/appearance overlay payload for the subject at `addr`.
	async fn overlay_string(&self, addr: SubjectAddress) -> Result<String>;

	/// Body-shape scale for the subject at `addr`; `None` or empty when the
	/// overlay has nothing for it.
	async fn body_shape_scale(&self, addr: SubjectAddress) -> Result<Option<String>>;

	/// Current title text (synchronous getter in the backend).
	fn title(&self) -> String;
}

/// Content hash cache lookup.
#[async_trait]
pub trait HashStore: Send + Sync {
	/// Maps each path to its known content hash; `None` (or a missing key) for
	/// paths the store has never hashed.
	async fn lookup(&self, paths: &[String]) -> Result<HashMap<String, Option<String>>>;
}

/// Subject liveness and draw-state probing.
///
/// Implementations guarantee internally that probing runs on the subject's
/// owning execution context; the core never touches raw memory.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
	/// Whether the subject's draw-state pointer is currently null.
	async fn is_draw_object_null(&self, addr: SubjectAddress) -> Result<bool>;

	/// Waits until the subject finishes any in-progress draw, bounded by
	/// `timeout`. Best effort: exceeding the bound returns normally.
	async fn wait_while_drawing(&self, subject: &SubjectHandle, correlation: Uuid, timeout: Duration, cancel: &CancellationToken);

	/// Whether the subject object is currently present.
	async fn is_present(&self, subject: &SubjectHandle) -> bool;
}
