use rustc_hash::FxHashMap;

use crate::replacement::ReplacementMap;
use crate::subject::SubjectCategory;

/// Content-addressed snapshot of one subject's asset state.
///
/// Owned by the subject's controlling context and rewritten in place by the
/// snapshot builder; it persists across rebuild cycles so a failed cycle can
/// roll back to the last committed state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
	/// Per-category resolved file replacements, keyed by resolved path.
	pub file_replacements: FxHashMap<SubjectCategory, ReplacementMap>,
	/// Per-category pose/appearance overlay payload.
	pub overlay_strings: FxHashMap<SubjectCategory, String>,
	/// Per-category body-shape scale; absent when the overlay reported nothing.
	pub body_shape_scale: FxHashMap<SubjectCategory, String>,
	/// Global manipulation payload, not keyed by category.
	pub manipulation_blob: String,
	/// Global title text.
	pub title_text: String,
	/// Global offset value.
	pub offset_value: String,
}

impl Snapshot {
	pub fn new() -> Self {
		Self::default()
	}

	/// Drops everything the snapshot holds for `category`.
	///
	/// Used on the empty-subject path: a subject with no draw object currently
	/// has nothing to show, which is a valid state, not an error.
	pub fn clear_category(&mut self, category: SubjectCategory) {
		self.file_replacements.remove(&category);
		self.overlay_strings.remove(&category);
		self.body_shape_scale.remove(&category);
	}

	/// Captures the rollback baseline: clones of the three per-category maps.
	pub fn baseline(&self) -> CategoryBaseline {
		CategoryBaseline {
			file_replacements: self.file_replacements.clone(),
			overlay_strings: self.overlay_strings.clone(),
			body_shape_scale: self.body_shape_scale.clone(),
		}
	}

	/// Restores the three per-category maps from a previously captured baseline.
	pub fn restore(&mut self, baseline: CategoryBaseline) {
		self.file_replacements = baseline.file_replacements;
		self.overlay_strings = baseline.overlay_strings;
		self.body_shape_scale = baseline.body_shape_scale;
	}
}

/// Pre-cycle copy of the snapshot's per-category maps, taken before any
/// mutation so a failed cycle restores exactly what it started from.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBaseline {
	file_replacements: FxHashMap<SubjectCategory, ReplacementMap>,
	overlay_strings: FxHashMap<SubjectCategory, String>,
	body_shape_scale: FxHashMap<SubjectCategory, String>,
}
