//! Retrieval tiers: named bundles of "fetch this category" flags.
//!
//! A crawl fetches only the metadata categories its tier requests. Every
//! tier-gated field in the model records whether its category was requested
//! at all, so that "not fetched" and "fetched and empty" stay distinct facts.
//! The three-state contract lives in [`Tiered`]; the named presets form a
//! strict superset chain `minimum < standard < detailed < maximum`.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Metadata categories a crawl can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetrievalCategory {
    Tables,
    TableColumns,
    PrimaryKeys,
    ForeignKeys,
    Indexes,
    Triggers,
    CheckConstraints,
    TablePrivileges,
    ViewDefinitions,
    Routines,
    RoutineParameters,
    RoutineDefinitions,
    Synonyms,
    Sequences,
}

impl RetrievalCategory {
    /// All categories, in the order the crawler requests them.
    pub const ALL: [RetrievalCategory; 14] = [
        RetrievalCategory::Tables,
        RetrievalCategory::TableColumns,
        RetrievalCategory::PrimaryKeys,
        RetrievalCategory::ForeignKeys,
        RetrievalCategory::Indexes,
        RetrievalCategory::Triggers,
        RetrievalCategory::CheckConstraints,
        RetrievalCategory::TablePrivileges,
        RetrievalCategory::ViewDefinitions,
        RetrievalCategory::Routines,
        RetrievalCategory::RoutineParameters,
        RetrievalCategory::RoutineDefinitions,
        RetrievalCategory::Synonyms,
        RetrievalCategory::Sequences,
    ];
}

impl std::fmt::Display for RetrievalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RetrievalCategory::Tables => "tables",
            RetrievalCategory::TableColumns => "table columns",
            RetrievalCategory::PrimaryKeys => "primary keys",
            RetrievalCategory::ForeignKeys => "foreign keys",
            RetrievalCategory::Indexes => "indexes",
            RetrievalCategory::Triggers => "triggers",
            RetrievalCategory::CheckConstraints => "check constraints",
            RetrievalCategory::TablePrivileges => "table privileges",
            RetrievalCategory::ViewDefinitions => "view definitions",
            RetrievalCategory::Routines => "routines",
            RetrievalCategory::RoutineParameters => "routine parameters",
            RetrievalCategory::RoutineDefinitions => "routine definitions",
            RetrievalCategory::Synonyms => "synonyms",
            RetrievalCategory::Sequences => "sequences",
        };
        write!(f, "{name}")
    }
}

/// Per-category retrieval switches.
///
/// A plain bag of booleans so that arbitrary custom combinations can be
/// expressed; the named presets are built from these same switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetrievalFlags {
    pub retrieve_tables: bool,
    pub retrieve_table_columns: bool,
    pub retrieve_primary_keys: bool,
    pub retrieve_foreign_keys: bool,
    pub retrieve_indexes: bool,
    pub retrieve_triggers: bool,
    pub retrieve_check_constraints: bool,
    pub retrieve_table_privileges: bool,
    pub retrieve_view_definitions: bool,
    pub retrieve_routines: bool,
    pub retrieve_routine_parameters: bool,
    pub retrieve_routine_definitions: bool,
    pub retrieve_synonyms: bool,
    pub retrieve_sequences: bool,
}

impl RetrievalFlags {
    /// No categories requested.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if the given category is requested.
    pub fn requests(&self, category: RetrievalCategory) -> bool {
        match category {
            RetrievalCategory::Tables => self.retrieve_tables,
            RetrievalCategory::TableColumns => self.retrieve_table_columns,
            RetrievalCategory::PrimaryKeys => self.retrieve_primary_keys,
            RetrievalCategory::ForeignKeys => self.retrieve_foreign_keys,
            RetrievalCategory::Indexes => self.retrieve_indexes,
            RetrievalCategory::Triggers => self.retrieve_triggers,
            RetrievalCategory::CheckConstraints => self.retrieve_check_constraints,
            RetrievalCategory::TablePrivileges => self.retrieve_table_privileges,
            RetrievalCategory::ViewDefinitions => self.retrieve_view_definitions,
            RetrievalCategory::Routines => self.retrieve_routines,
            RetrievalCategory::RoutineParameters => self.retrieve_routine_parameters,
            RetrievalCategory::RoutineDefinitions => self.retrieve_routine_definitions,
            RetrievalCategory::Synonyms => self.retrieve_synonyms,
            RetrievalCategory::Sequences => self.retrieve_sequences,
        }
    }

    /// Builder-style switch, for assembling custom combinations.
    pub fn with(mut self, category: RetrievalCategory) -> Self {
        match category {
            RetrievalCategory::Tables => self.retrieve_tables = true,
            RetrievalCategory::TableColumns => self.retrieve_table_columns = true,
            RetrievalCategory::PrimaryKeys => self.retrieve_primary_keys = true,
            RetrievalCategory::ForeignKeys => self.retrieve_foreign_keys = true,
            RetrievalCategory::Indexes => self.retrieve_indexes = true,
            RetrievalCategory::Triggers => self.retrieve_triggers = true,
            RetrievalCategory::CheckConstraints => self.retrieve_check_constraints = true,
            RetrievalCategory::TablePrivileges => self.retrieve_table_privileges = true,
            RetrievalCategory::ViewDefinitions => self.retrieve_view_definitions = true,
            RetrievalCategory::Routines => self.retrieve_routines = true,
            RetrievalCategory::RoutineParameters => self.retrieve_routine_parameters = true,
            RetrievalCategory::RoutineDefinitions => self.retrieve_routine_definitions = true,
            RetrievalCategory::Synonyms => self.retrieve_synonyms = true,
            RetrievalCategory::Sequences => self.retrieve_sequences = true,
        }
        self
    }

    /// Returns true if every category requested by `other` is also requested
    /// by `self`.
    pub fn is_superset_of(&self, other: &RetrievalFlags) -> bool {
        RetrievalCategory::ALL
            .iter()
            .all(|&category| !other.requests(category) || self.requests(category))
    }
}

/// Ordinal rank of the named presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TierLevel {
    Minimum,
    Standard,
    Detailed,
    Maximum,
}

impl TierLevel {
    /// Ordinal comparison between named presets.
    pub fn is_at_least(self, other: TierLevel) -> bool {
        self >= other
    }
}

/// A named retrieval tier: either one of the four ordered presets, or an
/// arbitrary custom flag combination.
///
/// Custom tiers carry no ordinal rank and never satisfy
/// [`RetrievalTier::is_at_least`]; they participate only in per-category
/// gating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalTier {
    tag: String,
    level: Option<TierLevel>,
    flags: RetrievalFlags,
}

impl RetrievalTier {
    /// Table and routine discovery only: enough to list what exists.
    pub fn minimum() -> Self {
        let flags = RetrievalFlags::none()
            .with(RetrievalCategory::Tables)
            .with(RetrievalCategory::Routines);
        Self {
            tag: "minimum".to_string(),
            level: Some(TierLevel::Minimum),
            flags,
        }
    }

    /// Minimum, plus columns, primary keys, and routine parameters.
    pub fn standard() -> Self {
        let flags = Self::minimum()
            .flags
            .with(RetrievalCategory::TableColumns)
            .with(RetrievalCategory::PrimaryKeys)
            .with(RetrievalCategory::RoutineParameters);
        Self {
            tag: "standard".to_string(),
            level: Some(TierLevel::Standard),
            flags,
        }
    }

    /// Standard, plus relationship and definition detail.
    pub fn detailed() -> Self {
        let flags = Self::standard()
            .flags
            .with(RetrievalCategory::ForeignKeys)
            .with(RetrievalCategory::Indexes)
            .with(RetrievalCategory::CheckConstraints)
            .with(RetrievalCategory::ViewDefinitions)
            .with(RetrievalCategory::RoutineDefinitions)
            .with(RetrievalCategory::Synonyms)
            .with(RetrievalCategory::Sequences);
        Self {
            tag: "detailed".to_string(),
            level: Some(TierLevel::Detailed),
            flags,
        }
    }

    /// Everything, including triggers and privileges.
    pub fn maximum() -> Self {
        let flags = Self::detailed()
            .flags
            .with(RetrievalCategory::Triggers)
            .with(RetrievalCategory::TablePrivileges);
        Self {
            tag: "maximum".to_string(),
            level: Some(TierLevel::Maximum),
            flags,
        }
    }

    /// An arbitrary custom flag combination under a caller-chosen tag.
    pub fn custom(tag: impl Into<String>, flags: RetrievalFlags) -> Self {
        Self {
            tag: tag.into(),
            level: None,
            flags,
        }
    }

    /// The preset for a given ordinal level.
    pub fn from_level(level: TierLevel) -> Self {
        match level {
            TierLevel::Minimum => Self::minimum(),
            TierLevel::Standard => Self::standard(),
            TierLevel::Detailed => Self::detailed(),
            TierLevel::Maximum => Self::maximum(),
        }
    }

    /// The tier's tag, e.g. `"standard"`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The ordinal rank, if this is a named preset.
    pub fn level(&self) -> Option<TierLevel> {
        self.level
    }

    /// The underlying flag set.
    pub fn flags(&self) -> &RetrievalFlags {
        &self.flags
    }

    /// Returns true if this tier requests the given category.
    pub fn requests(&self, category: RetrievalCategory) -> bool {
        self.flags.requests(category)
    }

    /// Ordinal comparison; custom tiers rank below every preset.
    pub fn is_at_least(&self, level: TierLevel) -> bool {
        self.level.is_some_and(|own| own.is_at_least(level))
    }
}

impl Default for RetrievalTier {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Display for RetrievalTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag)
    }
}

/// A tier-gated attribute: either never requested by the active tier, or
/// loaded (possibly with an empty value).
///
/// Getters built on this must branch on the state, never infer it from
/// whether the loaded value happens to be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tiered<T> {
    NotRequested,
    Loaded(T),
}

impl<T> Tiered<T> {
    /// Returns true if the attribute was fetched.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Tiered::Loaded(_))
    }

    /// The loaded value, or `None` if the category was never requested.
    pub fn get(&self) -> Option<&T> {
        match self {
            Tiered::NotRequested => None,
            Tiered::Loaded(value) => Some(value),
        }
    }

    /// Mutable access to the loaded value.
    pub(crate) fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Tiered::NotRequested => None,
            Tiered::Loaded(value) => Some(value),
        }
    }

    /// The loaded value, or the not-loaded signal naming the category and the
    /// object whose attribute was accessed.
    pub fn require(&self, category: RetrievalCategory, object: &str) -> Result<&T> {
        match self {
            Tiered::NotRequested => Err(CatalogError::not_loaded(category, object)),
            Tiered::Loaded(value) => Ok(value),
        }
    }
}

impl<T> Default for Tiered<T> {
    fn default() -> Self {
        Tiered::NotRequested
    }
}
