use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use effigy_gateway::{HashStore, LivenessProbe, ResolverGateway};
use effigy_model::{Snapshot, SubjectHandle, insert_merge, replacements_from_resolve, replacements_from_subject_resolve};
use effigy_transient::TransientTracker;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::RebuildConfig;
use crate::error::{RebuildError, RebuildOutcome};

/// Rebuilds a subject's asset snapshot from live resolver output.
pub struct SnapshotBuilder {
	resolver: Arc<dyn ResolverGateway>,
	hash_store: Arc<dyn HashStore>,
	liveness: Arc<dyn LivenessProbe>,
	tracker: Arc<TransientTracker>,
	config: RebuildConfig,
}

impl SnapshotBuilder {
	pub fn new(
		resolver: Arc<dyn ResolverGateway>,
		hash_store: Arc<dyn HashStore>,
		liveness: Arc<dyn LivenessProbe>,
		tracker: Arc<TransientTracker>,
		config: RebuildConfig,
	) -> Self {
		Self {
			resolver,
			hash_store,
			liveness,
			tracker,
			config,
		}
	}

	/// Runs one full rebuild cycle for `subject`, mutating `snapshot` in place.
	///
	/// A subject without a draw object clears its category data and returns
	/// [`RebuildOutcome::Cleared`]. Mid-cycle faults other than cancellation
	/// restore the pre-cycle baseline and return [`RebuildOutcome::RolledBack`];
	/// the previous snapshot stays valid and usable. Only cancellation and a
	/// not-ready resolver surface as errors, and after a cancellation the
	/// caller must treat the snapshot as indeterminate until a later cycle
	/// commits.
	pub async fn rebuild(&self, snapshot: &mut Snapshot, subject: &SubjectHandle, cancel: &CancellationToken) -> Result<RebuildOutcome, RebuildError> {
		if !self.resolver.is_initialized() {
			return Err(RebuildError::NotReady);
		}

		// A probe fault means the subject is in no state to be sampled; treat
		// it the same as a missing draw object.
		let draw_object_null = if subject.address.is_null() {
			true
		} else {
			match self.liveness.is_draw_object_null(subject.address).await {
				Ok(null) => null,
				Err(error) => {
					tracing::debug!(subject = %subject, %error, "rebuild.probe_fault");
					true
				}
			}
		};
		if draw_object_null {
			tracing::trace!(subject = %subject, "rebuild.empty_subject");
			snapshot.clear_category(subject.category);
			return Ok(RebuildOutcome::Cleared);
		}

		let baseline = snapshot.baseline();
		let start = Instant::now();
		match self.run_cycle(snapshot, subject, cancel).await {
			Ok(()) => {
				tracing::info!(subject = %subject, elapsed_ms = start.elapsed().as_millis() as u64, "rebuild.committed");
				Ok(RebuildOutcome::Committed)
			}
			Err(RebuildError::Cancelled) => {
				// No rollback: the caller discards the in-flight attempt and
				// must not ship this snapshot until a later cycle commits.
				tracing::debug!(subject = %subject, "rebuild.cancelled");
				Err(RebuildError::Cancelled)
			}
			Err(error) => {
				tracing::warn!(subject = %subject, %error, "rebuild.rolled_back");
				snapshot.restore(baseline);
				Ok(RebuildOutcome::RolledBack { error })
			}
		}
	}

	/// Steps 2-13: everything between baseline capture and commit.
	async fn run_cycle(&self, snapshot: &mut Snapshot, subject: &SubjectHandle, cancel: &CancellationToken) -> Result<(), RebuildError> {
		let category = subject.category;
		tracing::debug!(subject = %subject, "rebuild.start");

		// Stale category state goes first; overlay collection repopulates what
		// the subject still has.
		snapshot.file_replacements.entry(category).or_default().clear();
		snapshot.body_shape_scale.remove(&category);

		// Wait until the subject is done drawing and present so probing does
		// not race the game's own update loop. Both bounds are best-effort.
		self.liveness.wait_while_drawing(subject, Uuid::new_v4(), self.config.draw_wait_timeout, cancel).await;
		ensure_not_cancelled(cancel)?;

		// Deadline-based so slow presence probes count toward the bound and a
		// zero poll interval cannot spin forever.
		let poll_interval = self.config.presence_poll_interval.max(Duration::from_millis(1));
		let presence_deadline = tokio::time::Instant::now() + self.config.presence_timeout;
		while !self.liveness.is_present(subject).await && tokio::time::Instant::now() < presence_deadline {
			tracing::trace!(subject = %subject, "rebuild.presence_wait");
			sleep_cancellable(poll_interval, cancel).await?;
		}

		let resolved = checked(cancel, self.resolver.resolve_subject(subject)).await??.ok_or(RebuildError::ResolutionFailed)?;

		let mut replacements = replacements_from_subject_resolve(&resolved);
		replacements.retain(|_, r| r.has_replacement() && r.has_allowed_game_paths());
		for replacement in replacements.values() {
			tracing::debug!(subject = %subject, %replacement, "rebuild.static_replacement");
		}

		// Pets are re-resolved on every owner change; without pinning their
		// replacements the constant re-resolution causes redraw storms.
		if category.pins_replacements() {
			for path in replacements.values().flat_map(|r| r.game_paths.iter()) {
				self.tracker.add_semi_transient(category, path);
			}
		}

		let committed_paths: Vec<String> = replacements.values().flat_map(|r| r.game_paths.iter().cloned()).collect();
		self.tracker.clear_transient_paths(subject.address, &committed_paths);

		self.tracker.persist_transient(subject.address, category);
		let transient_paths = self.tracker.get_semi_transient(category);
		if !transient_paths.is_empty() {
			let (forward_results, _) = checked(cancel, self.resolver.resolve_paths(&transient_paths, &[])).await??;
			let resolved_transient = replacements_from_resolve(&transient_paths, &forward_results, &[], &[]);
			for replacement in resolved_transient.into_values() {
				tracing::debug!(subject = %subject, %replacement, "rebuild.transient_replacement");
				insert_merge(&mut replacements, replacement);
			}
		}

		// Cleanup sees the pre-prune map: identity resolutions still count as
		// a live backing asset for their pinned path.
		self.tracker.cleanup_semi_transient(category, &replacements);

		snapshot.file_replacements.insert(category, replacements);
		for map in snapshot.file_replacements.values_mut() {
			map.retain(|_, r| r.has_replacement());
		}

		snapshot.manipulation_blob = self.resolver.manipulation_blob();
		let (offset_value, overlay_string, body_shape_scale) = checked(cancel, async {
			tokio::join!(
				self.resolver.offset_value(),
				self.resolver.overlay_string(subject.address),
				self.resolver.body_shape_scale(subject.address),
			)
		})
		.await?;
		snapshot.overlay_strings.insert(category, overlay_string?);
		if let Some(scale) = body_shape_scale? {
			if !scale.is_empty() {
				snapshot.body_shape_scale.insert(category, scale);
			}
		}
		snapshot.title_text = self.resolver.title();
		snapshot.offset_value = offset_value?;

		self.assign_hashes(snapshot, subject, cancel).await?;
		Ok(())
	}

	/// Assigns known content hashes and drops unusable entries: a non-swap
	/// replacement whose file the store has never hashed cannot be shipped.
	async fn assign_hashes(&self, snapshot: &mut Snapshot, subject: &SubjectHandle, cancel: &CancellationToken) -> Result<(), RebuildError> {
		let Some(map) = snapshot.file_replacements.get_mut(&subject.category) else {
			return Ok(());
		};

		let paths: Vec<String> = map.values().map(|r| r.resolved_path.clone()).collect();
		tracing::debug!(subject = %subject, count = paths.len(), "rebuild.hash_lookup");
		let hashes = checked(cancel, self.hash_store.lookup(&paths)).await??;

		for replacement in map.values_mut() {
			replacement.hash = hashes.get(&replacement.resolved_path).and_then(Clone::clone).unwrap_or_default();
		}
		let before = map.len();
		map.retain(|_, r| r.is_file_swap() || !r.hash.is_empty());
		let removed = before - map.len();
		if removed > 0 {
			tracing::debug!(subject = %subject, removed, "rebuild.pruned_unhashed");
		}
		Ok(())
	}
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), RebuildError> {
	if cancel.is_cancelled() { Err(RebuildError::Cancelled) } else { Ok(()) }
}

/// Races `fut` against cancellation; every suspension point in the cycle goes
/// through here so cancellation propagates immediately.
async fn checked<T>(cancel: &CancellationToken, fut: impl Future<Output = T>) -> Result<T, RebuildError> {
	tokio::select! {
		() = cancel.cancelled() => Err(RebuildError::Cancelled),
		value = fut => Ok(value),
	}
}

async fn sleep_cancellable(duration: Duration, cancel: &CancellationToken) -> Result<(), RebuildError> {
	checked(cancel, tokio::time::sleep(duration)).await
}
