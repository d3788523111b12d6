//! Core metadata catalog engine for dbatlas.
//!
//! Crawls a relational database's metadata through a retrieval collaborator
//! and builds an internally consistent, navigable in-memory model of it:
//! schemas, tables, columns, keys, indexes, and routines. The engine applies
//! inclusion/exclusion filtering while the model is built, controls crawl
//! depth through ordered retrieval tiers with a strict "not fetched" versus
//! "fetched and empty" distinction, and ships the directed-graph utilities
//! used to order foreign-key-dependent objects and expand filtered results
//! along foreign-key edges.
//!
//! # Architecture
//! - [`crawl::MetadataSource`] is the inbound seam: collaborators deliver
//!   raw metadata rows per category, and the crawler never asks for a
//!   category the active [`tiers::RetrievalTier`] excludes.
//! - [`catalog::Catalog`] is the outbound surface: a finished, immutable
//!   snapshot with qualified-name lookup, selectable orderings, and
//!   tier-aware attribute access.
//! - [`grep::GrepEngine`] and [`associations::WeakAssociationAnalyzer`]
//!   derive filtered and heuristic views from a finished catalog.
//!
//! The engine holds no global mutable state and is freshly constructible
//! per crawl; parallel crawls of different databases do not interfere.

pub mod associations;
pub mod catalog;
pub mod crawl;
pub mod error;
pub mod filter;
pub mod graph;
pub mod grep;
pub mod logging;
pub mod models;
pub mod tiers;

// Re-export commonly used types
pub use associations::{AssociationOptions, WeakAssociation, WeakAssociationAnalyzer};
pub use catalog::Catalog;
pub use crawl::{CrawlMetadata, CrawlOptions, MetadataSource, crawl};
pub use error::{CatalogError, Result};
pub use filter::InclusionRule;
pub use graph::{DirectedGraph, GraphCycleError};
pub use grep::{GrepEngine, GrepOptions};
pub use models::{
    Column, ColumnAddress, ColumnDataType, ColumnReference, ForeignKey, Index, NamedObject,
    NamedObjectSort, PrimaryKey, Routine, RoutineKind, RoutineParameter, Schema, Sequence,
    Synonym, Table, TableKind,
};
pub use tiers::{RetrievalCategory, RetrievalFlags, RetrievalTier, TierLevel, Tiered};
