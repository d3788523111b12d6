//! Error types for catalog construction and access.
//!
//! The three access-time signals the engine distinguishes are deliberate and
//! never collapsed: [`CatalogError::NotLoaded`] means a category was never
//! requested by the active retrieval tier (as opposed to fetched and empty),
//! [`CatalogError::InvalidPattern`] means an inclusion rule was built from a
//! malformed regular expression, and [`GraphCycleError`] means a topological
//! ordering was attempted on a cyclic graph.

use thiserror::Error;

use crate::graph::GraphCycleError;
use crate::tiers::RetrievalCategory;

/// Main error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Access to an attribute whose category the active retrieval tier never
    /// requested. "Unknown" is a different fact from "absent": callers should
    /// check tier membership before accessing, or treat this as unknown.
    #[error("{category} were not retrieved for {object}")]
    NotLoaded {
        category: RetrievalCategory,
        object: String,
    },

    /// Malformed regular expression supplied to an inclusion rule. Raised at
    /// rule construction, never deferred to match time.
    #[error("invalid pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A retrieval collaborator failed while the catalog was being populated.
    /// The crawl is aborted and the underlying error is surfaced unchanged;
    /// this layer performs no retries.
    #[error("metadata retrieval failed: {context}")]
    Retrieval {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A retrieval collaborator delivered rows that violate the metadata
    /// model, such as a foreign key spanning more than two tables.
    #[error("malformed metadata: {context}")]
    InvalidMetadata { context: String },

    /// Configuration or environment error.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Topological ordering attempted on a graph containing a cycle.
    #[error(transparent)]
    Cycle(#[from] GraphCycleError),
}

/// Convenience type alias for Results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Creates a not-loaded error for a tier-gated attribute.
    pub fn not_loaded(category: RetrievalCategory, object: impl Into<String>) -> Self {
        Self::NotLoaded {
            category,
            object: object.into(),
        }
    }

    /// Creates an invalid-pattern error, preserving the original pattern text.
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Wraps a retrieval collaborator failure with context.
    pub fn retrieval_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Retrieval {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a malformed-metadata error.
    pub fn invalid_metadata(context: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            context: context.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns true if this error is the not-loaded signal.
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, Self::NotLoaded { .. })
    }
}
