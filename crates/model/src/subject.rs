use std::fmt;

/// Opaque process address of a live subject object.
///
/// Zero is the canonical "absent" address; the builder never dereferences this,
/// it only hands it to the liveness probe and resolver collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SubjectAddress(pub u64);

impl SubjectAddress {
	/// Returns true when the address is the null/absent sentinel.
	pub const fn is_null(self) -> bool {
		self.0 == 0
	}
}

impl fmt::Display for SubjectAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:#x}", self.0)
	}
}

/// Role classification of a tracked subject.
///
/// The category determines the persistence policy for indirectly-referenced
/// assets: `Pet` replacements are pinned across rebuilds, everything else is
/// re-resolved each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubjectCategory {
	Player,
	MinionOrMount,
	Pet,
	Companion,
}

impl SubjectCategory {
	/// Stable lowercase label for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Player => "player",
			Self::MinionOrMount => "minion_or_mount",
			Self::Pet => "pet",
			Self::Companion => "companion",
		}
	}

	/// True for the category whose replacements are pinned semi-transient.
	pub const fn pins_replacements(self) -> bool {
		matches!(self, Self::Pet)
	}
}

impl fmt::Display for SubjectCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Handle to one live subject: its address, category, and a display name used
/// purely for log context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectHandle {
	pub address: SubjectAddress,
	pub category: SubjectCategory,
	pub name: String,
}

impl SubjectHandle {
	pub fn new(address: SubjectAddress, category: SubjectCategory, name: impl Into<String>) -> Self {
		Self {
			address,
			category,
			name: name.into(),
		}
	}
}

impl fmt::Display for SubjectHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({}, {})", self.name, self.category, self.address)
	}
}
