//! Transient resource tracker.
//!
//! Subjects reference some assets only indirectly: the resolver never reports
//! them during static resolution, they are observed once as resource loads while
//! the subject animates. This crate remembers those observations between rebuild
//! cycles — per-subject *transient* sets for paths seen but not yet promoted, and
//! per-category *semi-transient* sets for paths pinned to survive rebuilds.
//!
//! Pure in-memory bookkeeping: no operation here performs resolver or hash-store
//! I/O. Locking is per key (subject address or category), so rebuild cycles of
//! unrelated subjects never contend. Guards are never held across an await —
//! every operation is synchronous.

use std::collections::BTreeSet;
use std::hash::Hash;
use std::sync::Arc;

use effigy_model::{ReplacementMap, SubjectAddress, SubjectCategory};
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

type PathSet = Arc<Mutex<BTreeSet<String>>>;

/// Keyed collection of path sets with per-key locking.
#[derive(Debug)]
struct KeyedSets<K> {
	inner: RwLock<FxHashMap<K, PathSet>>,
}

impl<K> Default for KeyedSets<K> {
	fn default() -> Self {
		Self {
			inner: RwLock::new(FxHashMap::default()),
		}
	}
}

impl<K: Eq + Hash + Copy> KeyedSets<K> {
	/// Returns the existing set for `key`, if any.
	fn get(&self, key: K) -> Option<PathSet> {
		self.inner.read().get(&key).cloned()
	}

	/// Returns the set for `key`, creating it lazily.
	fn get_or_create(&self, key: K) -> PathSet {
		if let Some(set) = self.inner.read().get(&key) {
			return Arc::clone(set);
		}
		Arc::clone(self.inner.write().entry(key).or_default())
	}

	fn remove(&self, key: K) -> Option<PathSet> {
		self.inner.write().remove(&key)
	}
}

/// Tracks transient and semi-transient asset identifiers across rebuild cycles.
#[derive(Debug, Default)]
pub struct TransientTracker {
	/// Paths observed for a live subject, not yet promoted or discarded.
	transient: KeyedSets<SubjectAddress>,
	/// Paths pinned to survive rebuilds for their category.
	semi_transient: KeyedSets<SubjectCategory>,
}

impl TransientTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one observed resource load for a subject.
	///
	/// Returns false when the path is already pinned semi-transient for the
	/// category (it needs no independent tracking) or was already recorded.
	pub fn record_transient(&self, addr: SubjectAddress, category: SubjectCategory, path: &str) -> bool {
		let path = path.to_lowercase();
		if let Some(semi) = self.semi_transient.get(category) {
			if semi.lock().contains(&path) {
				return false;
			}
		}
		let inserted = self.transient.get_or_create(addr).lock().insert(path.clone());
		if inserted {
			tracing::trace!(subject = %addr, category = category.as_str(), %path, "transient.record");
		}
		inserted
	}

	/// Promotes everything observed for `addr` into the category's
	/// semi-transient set, leaving the subject's transient set empty.
	pub fn persist_transient(&self, addr: SubjectAddress, category: SubjectCategory) {
		let Some(transient) = self.transient.get(addr) else {
			return;
		};
		let drained = std::mem::take(&mut *transient.lock());
		if drained.is_empty() {
			return;
		}
		tracing::debug!(subject = %addr, category = category.as_str(), count = drained.len(), "transient.persist");
		self.semi_transient.get_or_create(category).lock().extend(drained);
	}

	/// Returns the category's pinned paths, empty entries filtered out.
	pub fn get_semi_transient(&self, category: SubjectCategory) -> Vec<String> {
		match self.semi_transient.get(category) {
			Some(set) => set.lock().iter().filter(|p| !p.is_empty()).cloned().collect(),
			None => Vec::new(),
		}
	}

	/// Explicitly pins one path for the category.
	pub fn add_semi_transient(&self, category: SubjectCategory, path: &str) {
		self.semi_transient.get_or_create(category).lock().insert(path.to_lowercase());
	}

	/// Removes paths that static resolution already accounted for from the
	/// subject's transient set.
	pub fn clear_transient_paths(&self, addr: SubjectAddress, committed_paths: &[String]) {
		let Some(transient) = self.transient.get(addr) else {
			return;
		};
		let mut set = transient.lock();
		let mut removed = 0usize;
		for path in committed_paths {
			if set.remove(&path.to_lowercase()) {
				removed += 1;
			}
		}
		if removed > 0 {
			tracing::debug!(subject = %addr, removed, "transient.clear_committed");
		}
	}

	/// Drops pinned paths whose backing asset no longer appears in any
	/// committed replacement, preventing unbounded growth of stale entries.
	pub fn cleanup_semi_transient(&self, category: SubjectCategory, committed: &ReplacementMap) {
		let Some(semi) = self.semi_transient.get(category) else {
			return;
		};
		let live: BTreeSet<&String> = committed.values().flat_map(|r| r.game_paths.iter()).collect();
		let mut set = semi.lock();
		let before = set.len();
		set.retain(|path| live.contains(path));
		let removed = before - set.len();
		if removed > 0 {
			tracing::debug!(category = category.as_str(), removed, "transient.cleanup_stale");
		}
	}

	/// Forgets all transient state for a subject that stopped being tracked.
	pub fn drop_subject(&self, addr: SubjectAddress) {
		if self.transient.remove(addr).is_some() {
			tracing::debug!(subject = %addr, "transient.drop_subject");
		}
	}
}
