//! Shared data model for Effigy.
//!
//! Defines the subject identity types, the [`FileReplacement`] value type with its
//! dedup-by-resolved-path map, and the [`Snapshot`] owned by a subject's
//! controlling context and rewritten by the snapshot builder.

mod replacement;
mod snapshot;
mod subject;

pub use replacement::{ALLOWED_GAME_PATH_EXTENSIONS, FileReplacement, ReplacementMap, has_allowed_extension, insert_merge, replacements_from_resolve, replacements_from_subject_resolve};
pub use snapshot::{CategoryBaseline, Snapshot};
pub use subject::{SubjectAddress, SubjectCategory, SubjectHandle};
