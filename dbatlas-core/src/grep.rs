//! Grep filtering: match a descendant's secondary attribute, keep the
//! owning ancestor.
//!
//! Where ordinary inclusion rules match an object's own qualified name, the
//! grep engine matches column qualified names, table and routine remarks,
//! view and routine definition text, and routine parameter names, and keeps
//! the table or routine that owns the match. Matched tables can additionally
//! pull in their foreign-key neighborhood out to a configurable number of
//! hops, implemented with bounded sub-graph extraction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::filter::InclusionRule;
use crate::graph::DirectedGraph;
use crate::models::{NamedObject, Routine, Table};
use crate::tiers::Tiered;

/// Configuration for a grep reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrepOptions {
    /// Rule evaluated against descendant secondary attributes.
    pub rule: InclusionRule,
    /// Keep the ancestors that do NOT contain a match.
    pub invert_match: bool,
    /// Drop non-matching sibling columns and parameters from kept
    /// ancestors instead of keeping them wholesale.
    pub only_matching: bool,
    /// Foreign-key neighborhood expansion for matched tables, in hops:
    /// negative is unlimited reachability, zero is no expansion.
    pub relationship_depth: i32,
}

impl Default for GrepOptions {
    fn default() -> Self {
        Self {
            rule: InclusionRule::default(),
            invert_match: false,
            only_matching: false,
            relationship_depth: 0,
        }
    }
}

impl GrepOptions {
    pub fn new(rule: InclusionRule) -> Self {
        Self {
            rule,
            ..Self::default()
        }
    }

    pub fn inverted(mut self) -> Self {
        self.invert_match = true;
        self
    }

    pub fn only_matching(mut self) -> Self {
        self.only_matching = true;
        self
    }

    pub fn with_relationship_depth(mut self, depth: i32) -> Self {
        self.relationship_depth = depth;
        self
    }
}

/// Reduces a finished catalog to the ancestors whose descendants match.
#[derive(Debug, Clone)]
pub struct GrepEngine {
    options: GrepOptions,
}

impl GrepEngine {
    pub fn new(options: GrepOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GrepOptions {
        &self.options
    }

    /// Produces a reduced copy of the catalog. Tables kept are the direct
    /// matches (after inversion) plus, for a non-zero relationship depth,
    /// every table within that many foreign-key hops of a direct match;
    /// expansion treats foreign-key edges as bidirectional. Tables the grep
    /// drops but which kept foreign keys still reference become detached
    /// stubs, navigable through the reference but invisible to lookups.
    ///
    /// Only fetched attributes are matched: a category the crawl tier never
    /// requested contributes nothing to the decision.
    pub fn reduce(&self, catalog: &Catalog) -> Result<Catalog> {
        let mut reduced = catalog.clone();
        if catalog.tables.is_loaded() {
            self.reduce_tables(catalog, &mut reduced)?;
        }
        if catalog.routines.is_loaded() {
            self.reduce_routines(catalog, &mut reduced);
        }
        Ok(reduced)
    }

    fn reduce_tables(&self, catalog: &Catalog, reduced: &mut Catalog) -> Result<()> {
        let tables = catalog.tables()?;

        let direct: Vec<String> = tables
            .iter()
            .filter(|t| self.table_matches(t) != self.options.invert_match)
            .map(|t| t.full_name())
            .collect();

        let mut kept: HashSet<String> = direct.iter().cloned().collect();
        if self.options.relationship_depth != 0 {
            let graph = relationship_graph(tables);
            for root in &direct {
                let neighborhood =
                    graph.subgraph_to_depth(root, self.options.relationship_depth);
                kept.extend(neighborhood.vertices().cloned());
            }
        }

        let direct: HashSet<String> = direct.into_iter().collect();
        let mut new_tables = Vec::new();
        for table in tables {
            let full = table.full_name();
            if !kept.contains(&full) {
                continue;
            }
            let mut kept_table = table.clone();
            if self.options.only_matching && direct.contains(&full) {
                if let Some(columns) = kept_table.columns.get_mut() {
                    columns.retain(|c| {
                        self.options.rule.test(&c.full_name()) != self.options.invert_match
                    });
                }
            }
            new_tables.push(kept_table);
        }
        debug!(
            kept = new_tables.len(),
            out_of = tables.len(),
            "grep reduced tables"
        );

        // Foreign keys on kept tables may point at tables the grep dropped;
        // those targets stay navigable as detached stubs.
        let mut detached = std::mem::take(&mut reduced.detached_tables);
        for table in &new_tables {
            for list in [table.foreign_keys.get(), table.exported_foreign_keys.get()] {
                let Some(foreign_keys) = list else { continue };
                for fk in foreign_keys {
                    for reference in &fk.column_references {
                        for address in [&reference.primary_key_column, &reference.foreign_key_column]
                        {
                            let target = address.table_full_name();
                            if kept.contains(&target)
                                || detached.iter().any(|t| t.full_name() == target)
                            {
                                continue;
                            }
                            detached.push(Table::detached_stub(&address.schema, &address.table));
                        }
                    }
                }
            }
        }
        reduced.detached_tables = detached;
        reduced.tables = Tiered::Loaded(new_tables);
        Ok(())
    }

    fn reduce_routines(&self, catalog: &Catalog, reduced: &mut Catalog) {
        let Some(routines) = catalog.routines.get() else {
            return;
        };
        let mut new_routines = Vec::new();
        for routine in routines {
            if self.routine_matches(routine) == self.options.invert_match {
                continue;
            }
            let mut kept = routine.clone();
            if self.options.only_matching {
                if let Some(parameters) = kept.parameters.get_mut() {
                    parameters
                        .retain(|p| self.options.rule.test(&p.name) != self.options.invert_match);
                }
            }
            new_routines.push(kept);
        }
        reduced.routines = Tiered::Loaded(new_routines);
    }

    /// A table matches when any fetched secondary attribute does: a column's
    /// qualified name, the table's remarks, or a view's definition text.
    fn table_matches(&self, table: &Table) -> bool {
        let rule = &self.options.rule;
        if let Some(columns) = table.columns.get() {
            if columns.iter().any(|c| rule.test(&c.full_name())) {
                return true;
            }
        }
        if table.remarks().is_some_and(|r| rule.test(r)) {
            return true;
        }
        if let Some(definition) = table.definition.get() {
            if definition.as_deref().is_some_and(|d| rule.test(d)) {
                return true;
            }
        }
        false
    }

    /// A routine matches on its remarks, its definition text, or a
    /// parameter's name.
    fn routine_matches(&self, routine: &Routine) -> bool {
        let rule = &self.options.rule;
        if routine.remarks().is_some_and(|r| rule.test(r)) {
            return true;
        }
        if let Some(definition) = routine.definition.get() {
            if definition.as_deref().is_some_and(|d| rule.test(d)) {
                return true;
            }
        }
        if let Some(parameters) = routine.parameters.get() {
            if parameters.iter().any(|p| rule.test(&p.name)) {
                return true;
            }
        }
        false
    }
}

/// Foreign-key edges between qualified table names, in both directions, so
/// neighborhood expansion reaches parents as well as children.
fn relationship_graph(tables: &[Table]) -> DirectedGraph<String> {
    let mut graph = DirectedGraph::new();
    for table in tables {
        graph.add_vertex(table.full_name());
    }
    for table in tables {
        for list in [table.foreign_keys.get(), table.exported_foreign_keys.get()] {
            let Some(foreign_keys) = list else { continue };
            for fk in foreign_keys {
                if let (Some(referenced), Some(referencing)) =
                    (fk.referenced_table(), fk.referencing_table())
                {
                    graph.add_edge(referenced.clone(), referencing.clone());
                    graph.add_edge(referencing, referenced);
                }
            }
        }
    }
    graph
}
