use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Asset-type extensions eligible for tracking.
///
/// Identifiers outside this allow-list are never tracked, regardless of what the
/// resolver returns: models, textures, materials, timelines, animations, effects,
/// atex, skeletons, extra bones, physics, sound, skeleton params, shader packages.
pub const ALLOWED_GAME_PATH_EXTENSIONS: &[&str] = &[
	".mdl", ".tex", ".mtrl", ".tmb", ".pap", ".avfx", ".atex", ".sklb", ".eid", ".phyb", ".scd", ".skp", ".shpk",
];

/// Returns true when `game_path` ends in one of the allow-listed extensions.
pub fn has_allowed_extension(game_path: &str) -> bool {
	let bytes = game_path.as_bytes();
	ALLOWED_GAME_PATH_EXTENSIONS.iter().any(|ext| {
		let ext = ext.as_bytes();
		bytes.len() >= ext.len() && bytes[bytes.len() - ext.len()..].eq_ignore_ascii_case(ext)
	})
}

/// Returns true when `path` is an absolute path on the local content store
/// (Unix root or Windows drive prefix).
fn is_local_path(path: &str) -> bool {
	let bytes = path.as_bytes();
	if bytes.first() == Some(&b'/') {
		return true;
	}
	matches!(bytes, [drive, b':', b'/' | b'\\', ..] if drive.is_ascii_alphabetic())
}

/// One resolved content item: a set of asset identifiers mapping to a single
/// resolved target.
///
/// Identity is the lowercased `resolved_path`; all paths are lowercased on
/// construction so comparisons stay case-insensitive throughout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReplacement {
	/// Asset identifiers that resolve to this target, lowercased, ordered.
	pub game_paths: BTreeSet<String>,
	/// Absolute content path or synthetic swap target, lowercased.
	pub resolved_path: String,
	/// Content hash; empty until assigned from the hash store.
	pub hash: String,
}

impl FileReplacement {
	/// Creates a replacement, lowercasing every path.
	pub fn new(game_paths: impl IntoIterator<Item = impl AsRef<str>>, resolved_path: &str) -> Self {
		Self {
			game_paths: game_paths.into_iter().map(|p| p.as_ref().to_lowercase()).collect(),
			resolved_path: resolved_path.to_lowercase(),
			hash: String::new(),
		}
	}

	/// True when the resolved target is not a real file on the local content
	/// store (asset substitution rather than an on-disk file).
	pub fn is_file_swap(&self) -> bool {
		!is_local_path(&self.resolved_path)
	}

	/// True when the resolved target differs from every game path, i.e. this is
	/// an actual override and not a no-op identity resolution.
	pub fn has_replacement(&self) -> bool {
		!self.game_paths.is_empty() && self.game_paths.iter().all(|p| p != &self.resolved_path)
	}

	/// True when every game path carries an allow-listed extension.
	pub fn has_allowed_game_paths(&self) -> bool {
		self.game_paths.iter().all(|p| has_allowed_extension(p))
	}
}

impl fmt::Display for FileReplacement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[")?;
		for (i, path) in self.game_paths.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			f.write_str(path)?;
		}
		write!(f, "] -> {}", self.resolved_path)
	}
}

/// Per-category replacement set, keyed by lowercased resolved path.
///
/// The map keying enforces the dedup invariant (no two entries share a resolved
/// path) and gives deterministic, path-sorted iteration for commits.
pub type ReplacementMap = BTreeMap<String, FileReplacement>;

/// Inserts `replacement` into `map`, merging `game_paths` when the resolved
/// path is already present.
pub fn insert_merge(map: &mut ReplacementMap, replacement: FileReplacement) {
	match map.entry(replacement.resolved_path.clone()) {
		std::collections::btree_map::Entry::Occupied(mut entry) => {
			entry.get_mut().game_paths.extend(replacement.game_paths);
		}
		std::collections::btree_map::Entry::Vacant(entry) => {
			entry.insert(replacement);
		}
	}
}

/// Folds index-aligned batch resolution output into a replacement map.
///
/// `forward_results[i]` is the resolved target of `forward[i]`; `reverse_results[i]`
/// is the set of identifiers resolving to `reverse[i]`. Identifiers that resolve to
/// the same target end up merged into one entry.
pub fn replacements_from_resolve(forward: &[String], forward_results: &[String], reverse: &[String], reverse_results: &[Vec<String>]) -> ReplacementMap {
	let mut map = ReplacementMap::new();
	for (game_path, resolved) in forward.iter().zip(forward_results) {
		insert_merge(&mut map, FileReplacement::new([game_path], resolved));
	}
	for (resolved, game_paths) in reverse.iter().zip(reverse_results) {
		insert_merge(&mut map, FileReplacement::new(game_paths.iter(), resolved));
	}
	map
}

/// Builds a replacement map from subject-level resolution output
/// (`resolved_path -> [game_paths]`).
pub fn replacements_from_subject_resolve(resolved: &BTreeMap<String, Vec<String>>) -> ReplacementMap {
	let mut map = ReplacementMap::new();
	for (resolved_path, game_paths) in resolved {
		insert_merge(&mut map, FileReplacement::new(game_paths.iter(), resolved_path));
	}
	map
}
