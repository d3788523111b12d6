//! Heuristic weak associations: non-constraint-backed relationships
//! inferred from column-naming conventions.
//!
//! A read-only pass over a finished catalog. Proposals are reported, never
//! merged into the model; real foreign keys are never duplicated or
//! shadowed. Requires a catalog whose tier fetched table columns, primary
//! keys, indexes, and foreign keys (the detailed preset and above).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::models::{ColumnAddress, NamedObject};

/// Configuration for weak-association analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationOptions {
    /// Also match `<table-name><key-column>` and the singularized form, so
    /// a column `AUTHORID` matches table `AUTHORS` key column `ID`.
    pub table_prefix_convention: bool,
}

impl Default for AssociationOptions {
    fn default() -> Self {
        Self {
            table_prefix_convention: true,
        }
    }
}

/// A proposed association between an unconstrained column and another
/// table's key column. Synthetic: distinct from, and never merged with,
/// real foreign keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeakAssociation {
    pub primary_key_column: ColumnAddress,
    pub foreign_key_column: ColumnAddress,
}

impl std::fmt::Display for WeakAssociation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ~> {}",
            self.foreign_key_column, self.primary_key_column
        )
    }
}

/// Proposes weak associations for a finished catalog.
pub struct WeakAssociationAnalyzer<'a> {
    catalog: &'a Catalog,
    options: AssociationOptions,
}

impl<'a> WeakAssociationAnalyzer<'a> {
    pub fn new(catalog: &'a Catalog, options: AssociationOptions) -> Self {
        Self { catalog, options }
    }

    /// Runs the analysis. Deterministic: tables and columns are visited in
    /// delivery order, and candidate targets in registration order.
    ///
    /// # Errors
    /// Fails with the not-loaded signal if the catalog's tier did not fetch
    /// table columns, primary keys, indexes, or foreign keys.
    pub fn analyze(&self) -> Result<Vec<WeakAssociation>> {
        let tables = self.catalog.tables()?;

        // Index single-column primary and unique key columns under every
        // name that should find them.
        let mut key_index: HashMap<String, Vec<ColumnAddress>> = HashMap::new();
        for table in tables {
            let mut key_columns: Vec<&str> = Vec::new();
            if let Some(pk) = table.primary_key()? {
                if let [only] = pk.columns.as_slice() {
                    key_columns.push(only.as_str());
                }
            }
            for index in table.indexes()? {
                if index.unique {
                    if let [only] = index.columns.as_slice() {
                        if !key_columns.contains(&only.as_str()) {
                            key_columns.push(only.as_str());
                        }
                    }
                }
            }
            for key_column in key_columns {
                let address = ColumnAddress::new(&table.schema, &table.name, key_column);
                let key_name = normalize(key_column);
                let mut candidates = vec![key_name.clone()];
                if self.options.table_prefix_convention {
                    let table_name = normalize(&table.name);
                    candidates.push(format!("{table_name}{key_name}"));
                    if let Some(singular) = singularize(&table_name) {
                        candidates.push(format!("{singular}{key_name}"));
                    }
                }
                for candidate in candidates {
                    key_index.entry(candidate).or_default().push(address.clone());
                }
            }
        }

        // Columns on either end of a real foreign key are out of bounds.
        let mut constrained: HashSet<String> = HashSet::new();
        for table in tables {
            for fk in table.foreign_keys()? {
                for reference in &fk.column_references {
                    constrained.insert(normalized_full_name(&reference.foreign_key_column));
                    constrained.insert(normalized_full_name(&reference.primary_key_column));
                }
            }
        }

        let mut proposals = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        for table in tables {
            let own_key_columns: Vec<String> = match table.primary_key()? {
                Some(pk) => pk.columns.iter().map(|c| normalize(c)).collect(),
                None => Vec::new(),
            };
            for column in table.columns()? {
                let column_name = normalize(&column.name);
                if own_key_columns.contains(&column_name) {
                    continue;
                }
                let column_address =
                    ColumnAddress::new(&column.schema, &column.table, &column.name);
                if constrained.contains(&normalized_full_name(&column_address)) {
                    continue;
                }
                let Some(targets) = key_index.get(&column_name) else {
                    continue;
                };
                for target in targets {
                    if target.table_full_name() == table.full_name() {
                        continue;
                    }
                    let key = (target.full_name(), column_address.full_name());
                    if !seen.insert(key) {
                        continue;
                    }
                    debug!(
                        from = %column_address,
                        to = %target,
                        "proposing weak association"
                    );
                    proposals.push(WeakAssociation {
                        primary_key_column: target.clone(),
                        foreign_key_column: column_address.clone(),
                    });
                }
            }
        }
        Ok(proposals)
    }
}

/// Identifier normalization for matching: quoting stripped, case folded.
fn normalize(identifier: &str) -> String {
    identifier
        .trim_matches(|c| matches!(c, '"' | '`' | '[' | ']'))
        .to_lowercase()
}

fn normalized_full_name(address: &ColumnAddress) -> String {
    format!(
        "{}.{}.{}",
        normalize(&address.schema),
        normalize(&address.table),
        normalize(&address.column)
    )
}

/// Lightweight singular form of a table name, if it differs.
fn singularize(name: &str) -> Option<String> {
    if let Some(stem) = name.strip_suffix("ies") {
        return Some(format!("{stem}y"));
    }
    if name.ends_with("ss") {
        return None;
    }
    name.strip_suffix('s').map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singularize_common_forms() {
        assert_eq!(singularize("authors").as_deref(), Some("author"));
        assert_eq!(singularize("categories").as_deref(), Some("category"));
        assert_eq!(singularize("address"), None);
        assert_eq!(singularize("book"), None);
    }

    #[test]
    fn normalize_strips_quoting_and_case() {
        assert_eq!(normalize("\"BookId\""), "bookid");
        assert_eq!(normalize("`AUTHORID`"), "authorid");
        assert_eq!(normalize("[OrderId]"), "orderid");
    }
}
