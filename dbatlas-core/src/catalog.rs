//! The finished catalog: a read-only, queryable model of one crawl.
//!
//! Built once per crawl and then treated as an immutable snapshot; rendering
//! consumers may read it concurrently without synchronization. Lookups
//! return an explicit absent result for the ordinary not-found case;
//! tier-gated accessors fail with the not-loaded signal when their category
//! was never requested.

use serde::{Deserialize, Serialize};

use crate::crawl::CrawlMetadata;
use crate::error::Result;
use crate::graph::DirectedGraph;
use crate::models::{
    Column, NamedObject, NamedObjectSort, Routine, Schema, Sequence, Synonym, Table,
    sort_by_delivery_or_name,
};
use crate::tiers::{RetrievalCategory, RetrievalTier, Tiered};

/// The in-memory schema model produced by one crawl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub(crate) tier: RetrievalTier,
    pub(crate) schemas: Vec<Schema>,
    pub(crate) tables: Tiered<Vec<Table>>,
    pub(crate) routines: Tiered<Vec<Routine>>,
    pub(crate) synonyms: Tiered<Vec<Synonym>>,
    pub(crate) sequences: Tiered<Vec<Sequence>>,
    pub(crate) detached_tables: Vec<Table>,
    pub(crate) metadata: CrawlMetadata,
}

impl Catalog {
    /// The retrieval tier this catalog was populated under.
    pub fn tier(&self) -> &RetrievalTier {
        &self.tier
    }

    /// Crawl provenance: timestamp, duration, warnings.
    pub fn metadata(&self) -> &CrawlMetadata {
        &self.metadata
    }

    /// Schemas in delivery order. Schemas are always retrieved.
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    /// Schemas under a selectable ordering.
    pub fn schemas_sorted(&self, sort: NamedObjectSort) -> Vec<&Schema> {
        sort_by_delivery_or_name(&self.schemas, sort)
    }

    /// Looks up a schema by name.
    pub fn lookup_schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// Tables in delivery order.
    pub fn tables(&self) -> Result<&[Table]> {
        Ok(self
            .tables
            .require(RetrievalCategory::Tables, "catalog")?
            .as_slice())
    }

    /// Tables under a selectable ordering: natural is delivery order.
    pub fn tables_sorted(&self, sort: NamedObjectSort) -> Result<Vec<&Table>> {
        Ok(sort_by_delivery_or_name(self.tables()?, sort))
    }

    /// Looks up a table by qualified name. Detached tables are not
    /// discoverable here; resolve them through the foreign key that
    /// references them instead.
    pub fn lookup_table(&self, full_name: &str) -> Result<Option<&Table>> {
        Ok(self.tables()?.iter().find(|t| t.full_name() == full_name))
    }

    /// Looks up a column by qualified `schema.table.column` name.
    pub fn lookup_column(&self, full_name: &str) -> Result<Option<&Column>> {
        let Some((table_name, column_name)) = full_name.rsplit_once('.') else {
            return Ok(None);
        };
        match self.lookup_table(table_name)? {
            Some(table) => table.column(column_name),
            None => Ok(None),
        }
    }

    /// Routines in delivery order.
    pub fn routines(&self) -> Result<&[Routine]> {
        Ok(self
            .routines
            .require(RetrievalCategory::Routines, "catalog")?
            .as_slice())
    }

    pub fn routines_sorted(&self, sort: NamedObjectSort) -> Result<Vec<&Routine>> {
        Ok(sort_by_delivery_or_name(self.routines()?, sort))
    }

    /// Looks up a routine by qualified name.
    pub fn lookup_routine(&self, full_name: &str) -> Result<Option<&Routine>> {
        Ok(self.routines()?.iter().find(|r| r.full_name() == full_name))
    }

    /// Synonyms in delivery order.
    pub fn synonyms(&self) -> Result<&[Synonym]> {
        Ok(self
            .synonyms
            .require(RetrievalCategory::Synonyms, "catalog")?
            .as_slice())
    }

    /// Looks up a synonym by qualified name.
    pub fn lookup_synonym(&self, full_name: &str) -> Result<Option<&Synonym>> {
        Ok(self.synonyms()?.iter().find(|s| s.full_name() == full_name))
    }

    /// Sequences in delivery order.
    pub fn sequences(&self) -> Result<&[Sequence]> {
        Ok(self
            .sequences
            .require(RetrievalCategory::Sequences, "catalog")?
            .as_slice())
    }

    /// Looks up a sequence by qualified name.
    pub fn lookup_sequence(&self, full_name: &str) -> Result<Option<&Sequence>> {
        Ok(self
            .sequences()?
            .iter()
            .find(|s| s.full_name() == full_name))
    }

    /// Resolves the referenced (exporting) end of a foreign key. Falls back
    /// to the detached set, so a reference to a filtered-out table stays
    /// navigable even though ordinary lookups will not find it.
    pub fn referenced_table(&self, fk: &crate::models::ForeignKey) -> Result<Option<&Table>> {
        let Some(name) = fk.referenced_table() else {
            return Ok(None);
        };
        if let Some(table) = self.lookup_table(&name)? {
            return Ok(Some(table));
        }
        Ok(self
            .detached_tables
            .iter()
            .find(|t| t.full_name() == name))
    }

    /// Resolves the referencing (importing) end of a foreign key, with the
    /// same detached fallback as [`Catalog::referenced_table`].
    pub fn referencing_table(&self, fk: &crate::models::ForeignKey) -> Result<Option<&Table>> {
        let Some(name) = fk.referencing_table() else {
            return Ok(None);
        };
        if let Some(table) = self.lookup_table(&name)? {
            return Ok(Some(table));
        }
        Ok(self
            .detached_tables
            .iter()
            .find(|t| t.full_name() == name))
    }

    /// Builds the foreign-key dependency graph over qualified table names:
    /// an edge runs from the referenced table to the referencing table, so a
    /// topological ordering lists parents before children. Vertices are
    /// added in delivery order, which keeps orderings deterministic.
    pub fn foreign_key_graph(&self) -> Result<DirectedGraph<String>> {
        let mut graph = DirectedGraph::new();
        for table in self.tables()? {
            graph.add_vertex(table.full_name());
        }
        for table in self.tables()? {
            for fk in table.foreign_keys()? {
                if let (Some(referenced), Some(referencing)) =
                    (fk.referenced_table(), fk.referencing_table())
                {
                    graph.add_edge(referenced, referencing);
                }
            }
        }
        Ok(graph)
    }

    /// Tables ordered so that foreign-key parents precede their children.
    /// Self-referencing tables make the dependency graph cyclic; check
    /// [`DirectedGraph::contains_cycle`] on [`Catalog::foreign_key_graph`]
    /// first when that is a possibility.
    pub fn tables_in_dependency_order(&self) -> Result<Vec<&Table>> {
        let graph = self.foreign_key_graph()?;
        let order = graph.topological_sort()?;
        let mut tables = Vec::with_capacity(order.len());
        for name in order {
            if let Some(table) = self.lookup_table(&name)? {
                tables.push(table);
            }
        }
        Ok(tables)
    }
}
