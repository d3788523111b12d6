//! Catalog population: one sequential pass over a retrieval collaborator.
//!
//! The crawler asks a [`MetadataSource`] for raw rows, one category at a
//! time, and only for the categories the active retrieval tier requests.
//! Inclusion rules are evaluated against each row's qualified name as it
//! arrives, so filtering happens at population time rather than as a later
//! subtractive pass. A retrieval failure aborts the crawl and is surfaced
//! unchanged.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::filter::InclusionRule;
use crate::grep::{GrepEngine, GrepOptions};
use crate::models::{
    AttributeMap, Column, ColumnAddress, ColumnDataType, ColumnReference, CheckConstraint,
    ForeignKey, Index, NamedObject, ParameterDirection, PrimaryKey, Privilege, Routine,
    RoutineKind, RoutineParameter, Schema, Sequence, Synonym, Table, TableKind, Trigger,
    TriggerEvent, TriggerTiming,
};
use crate::tiers::{RetrievalCategory, RetrievalFlags, RetrievalTier, Tiered};

/// A discovered schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaRow {
    pub name: String,
    pub remarks: Option<String>,
}

/// A discovered table or view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    pub schema: String,
    pub name: String,
    pub kind: TableKind,
    pub remarks: Option<String>,
    /// Defining query, for views.
    pub definition: Option<String>,
}

/// A discovered table column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRow {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub ordinal: u32,
    pub data_type: ColumnDataType,
    pub nullable: bool,
    pub default_value: Option<String>,
    pub auto_increment: bool,
    pub remarks: Option<String>,
}

/// A discovered primary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryKeyRow {
    pub schema: String,
    pub table: String,
    pub name: Option<String>,
    /// Key columns in key order.
    pub columns: Vec<String>,
}

/// One column pair of a discovered foreign key. Multi-column keys arrive as
/// several rows sharing a name, distinguished by key sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyRow {
    pub name: String,
    pub key_sequence: u32,
    pub primary_key_schema: String,
    pub primary_key_table: String,
    pub primary_key_column: String,
    pub foreign_key_schema: String,
    pub foreign_key_table: String,
    pub foreign_key_column: String,
}

/// A discovered index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRow {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub unique: bool,
    pub columns: Vec<String>,
}

/// A discovered trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRow {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub event: TriggerEvent,
    pub timing: TriggerTiming,
    pub definition: Option<String>,
}

/// A discovered check constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConstraintRow {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub definition: Option<String>,
}

/// A discovered table privilege grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeRow {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub grantor: Option<String>,
    pub grantee: String,
    pub grantable: bool,
}

/// A discovered routine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineRow {
    pub schema: String,
    pub name: String,
    pub kind: RoutineKind,
    pub remarks: Option<String>,
    pub definition: Option<String>,
}

/// A discovered routine parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineParameterRow {
    pub schema: String,
    pub routine: String,
    pub name: String,
    pub ordinal: u32,
    pub data_type: ColumnDataType,
    pub direction: ParameterDirection,
}

/// A discovered synonym.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymRow {
    pub schema: String,
    pub name: String,
    pub referenced_object: String,
    pub remarks: Option<String>,
}

/// A discovered sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceRow {
    pub schema: String,
    pub name: String,
    pub increment: i64,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub cycle: bool,
    pub remarks: Option<String>,
}

/// The retrieval collaborator: delivers raw metadata rows per category.
///
/// The crawler calls at most one method per category, and only for the
/// categories the active tier requests. Implementations wrap their own
/// failures with [`CatalogError::retrieval_failed`]; the crawler adds no
/// retries and swallows nothing.
///
/// Categories many databases lack (synonyms, sequences, triggers) have
/// default empty implementations so simple sources stay small.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn schemas(&self) -> Result<Vec<SchemaRow>>;
    async fn tables(&self) -> Result<Vec<TableRow>>;
    async fn columns(&self) -> Result<Vec<ColumnRow>>;
    async fn primary_keys(&self) -> Result<Vec<PrimaryKeyRow>>;
    async fn foreign_keys(&self) -> Result<Vec<ForeignKeyRow>>;
    async fn indexes(&self) -> Result<Vec<IndexRow>>;
    async fn routines(&self) -> Result<Vec<RoutineRow>>;

    async fn triggers(&self) -> Result<Vec<TriggerRow>> {
        Ok(Vec::new())
    }

    async fn check_constraints(&self) -> Result<Vec<CheckConstraintRow>> {
        Ok(Vec::new())
    }

    async fn table_privileges(&self) -> Result<Vec<PrivilegeRow>> {
        Ok(Vec::new())
    }

    async fn routine_parameters(&self) -> Result<Vec<RoutineParameterRow>> {
        Ok(Vec::new())
    }

    async fn synonyms(&self) -> Result<Vec<SynonymRow>> {
        Ok(Vec::new())
    }

    async fn sequences(&self) -> Result<Vec<SequenceRow>> {
        Ok(Vec::new())
    }
}

/// Configuration for one crawl: the retrieval tier, per-category inclusion
/// rules, and an optional grep reduction. Supplied fully formed by an
/// external configuration collaborator; this layer parses no files or
/// command lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlOptions {
    pub tier: RetrievalTier,
    pub schema_rule: InclusionRule,
    pub table_rule: InclusionRule,
    pub column_rule: InclusionRule,
    pub routine_rule: InclusionRule,
    pub routine_parameter_rule: InclusionRule,
    pub synonym_rule: InclusionRule,
    pub sequence_rule: InclusionRule,
    pub grep: Option<GrepOptions>,
}

impl Default for CrawlOptions {
    /// Standard tier, every rule admitting all non-empty names, no grep.
    fn default() -> Self {
        Self {
            tier: RetrievalTier::standard(),
            schema_rule: InclusionRule::default(),
            table_rule: InclusionRule::default(),
            column_rule: InclusionRule::default(),
            routine_rule: InclusionRule::default(),
            routine_parameter_rule: InclusionRule::default(),
            synonym_rule: InclusionRule::default(),
            sequence_rule: InclusionRule::default(),
            grep: None,
        }
    }
}

impl CrawlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tier(mut self, tier: RetrievalTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_schema_rule(mut self, rule: InclusionRule) -> Self {
        self.schema_rule = rule;
        self
    }

    pub fn with_table_rule(mut self, rule: InclusionRule) -> Self {
        self.table_rule = rule;
        self
    }

    pub fn with_column_rule(mut self, rule: InclusionRule) -> Self {
        self.column_rule = rule;
        self
    }

    pub fn with_routine_rule(mut self, rule: InclusionRule) -> Self {
        self.routine_rule = rule;
        self
    }

    pub fn with_routine_parameter_rule(mut self, rule: InclusionRule) -> Self {
        self.routine_parameter_rule = rule;
        self
    }

    pub fn with_synonym_rule(mut self, rule: InclusionRule) -> Self {
        self.synonym_rule = rule;
        self
    }

    pub fn with_sequence_rule(mut self, rule: InclusionRule) -> Self {
        self.sequence_rule = rule;
        self
    }

    pub fn with_grep(mut self, grep: GrepOptions) -> Self {
        self.grep = Some(grep);
        self
    }
}

/// Crawl provenance attached to the finished catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlMetadata {
    pub crawled_at: chrono::DateTime<chrono::Utc>,
    pub duration_ms: u64,
    pub warnings: Vec<String>,
}

/// A tier-gated collection field: loaded empty when requested, marked
/// not-requested otherwise.
fn gated<T: Default>(flags: &RetrievalFlags, category: RetrievalCategory) -> Tiered<T> {
    if flags.requests(category) {
        Tiered::Loaded(T::default())
    } else {
        Tiered::NotRequested
    }
}

/// Crawls the source and builds the catalog for it.
///
/// Population is strictly sequential: one category at a time, rows in
/// delivery order. The returned catalog is a finished, immutable snapshot.
///
/// # Errors
/// Fails if the source fails (the source's error is surfaced unchanged), if
/// the source delivers rows violating the metadata model, or if a grep
/// reduction fails.
pub async fn crawl(source: &dyn MetadataSource, options: &CrawlOptions) -> Result<Catalog> {
    let started = std::time::Instant::now();
    let crawled_at = chrono::Utc::now();
    let flags = *options.tier.flags();
    let mut state = CrawlState::default();

    let schemas = fetch_schemas(source, options, &mut state).await?;
    if flags.requests(RetrievalCategory::Tables) {
        fetch_tables(source, options, &flags, &schemas, &mut state).await?;
    }
    if flags.requests(RetrievalCategory::TableColumns) {
        fetch_columns(source, options, &mut state).await?;
    }
    if flags.requests(RetrievalCategory::PrimaryKeys) {
        fetch_primary_keys(source, &mut state).await?;
    }
    if flags.requests(RetrievalCategory::ForeignKeys) {
        fetch_foreign_keys(source, &mut state).await?;
    }
    if flags.requests(RetrievalCategory::Indexes) {
        fetch_indexes(source, &mut state).await?;
    }
    if flags.requests(RetrievalCategory::Triggers) {
        fetch_triggers(source, &mut state).await?;
    }
    if flags.requests(RetrievalCategory::CheckConstraints) {
        fetch_check_constraints(source, &mut state).await?;
    }
    if flags.requests(RetrievalCategory::TablePrivileges) {
        fetch_privileges(source, &mut state).await?;
    }
    if flags.requests(RetrievalCategory::Routines) {
        fetch_routines(source, options, &flags, &schemas, &mut state).await?;
    }
    if flags.requests(RetrievalCategory::RoutineParameters) {
        fetch_routine_parameters(source, options, &mut state).await?;
    }

    let synonyms = if flags.requests(RetrievalCategory::Synonyms) {
        Tiered::Loaded(fetch_synonyms(source, options, &schemas).await?)
    } else {
        Tiered::NotRequested
    };
    let sequences = if flags.requests(RetrievalCategory::Sequences) {
        Tiered::Loaded(fetch_sequences(source, options, &schemas).await?)
    } else {
        Tiered::NotRequested
    };

    let mut catalog = Catalog {
        tier: options.tier.clone(),
        schemas,
        tables: if flags.requests(RetrievalCategory::Tables) {
            Tiered::Loaded(state.tables)
        } else {
            Tiered::NotRequested
        },
        routines: if flags.requests(RetrievalCategory::Routines) {
            Tiered::Loaded(state.routines)
        } else {
            Tiered::NotRequested
        },
        synonyms,
        sequences,
        detached_tables: state.detached,
        metadata: CrawlMetadata {
            crawled_at,
            duration_ms: 0,
            warnings: state.warnings,
        },
    };

    if let Some(grep) = &options.grep {
        catalog = GrepEngine::new(grep.clone()).reduce(&catalog)?;
    }

    catalog.metadata.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    debug!(
        tier = %options.tier,
        duration_ms = catalog.metadata.duration_ms,
        "crawl complete"
    );
    Ok(catalog)
}

#[derive(Default)]
struct CrawlState {
    tables: Vec<Table>,
    table_index: HashMap<String, usize>,
    routines: Vec<Routine>,
    routine_index: HashMap<String, usize>,
    detached: Vec<Table>,
    warnings: Vec<String>,
}

impl CrawlState {
    fn table_mut(&mut self, schema: &str, table: &str) -> Option<&mut Table> {
        let full = format!("{schema}.{table}");
        self.table_index.get(&full).map(|&i| &mut self.tables[i])
    }

    /// Registers a stub for a referenced table that ordinary lookups must
    /// not discover.
    fn ensure_detached(&mut self, schema: &str, table: &str) {
        let full = format!("{schema}.{table}");
        if self.table_index.contains_key(&full) {
            return;
        }
        if self.detached.iter().any(|t| t.full_name() == full) {
            return;
        }
        self.detached.push(Table::detached_stub(schema, table));
    }
}

async fn fetch_schemas(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    state: &mut CrawlState,
) -> Result<Vec<Schema>> {
    let rows = source.schemas().await?;
    let mut schemas = Vec::new();
    for row in rows {
        if !options.schema_rule.test(&row.name) {
            continue;
        }
        if schemas.iter().any(|s: &Schema| s.name == row.name) {
            state
                .warnings
                .push(format!("duplicate schema {} skipped", row.name));
            continue;
        }
        schemas.push(Schema {
            name: row.name,
            remarks: row.remarks,
            attributes: AttributeMap::new(),
        });
    }
    debug!(count = schemas.len(), "retrieved schemas");
    Ok(schemas)
}

async fn fetch_tables(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    flags: &RetrievalFlags,
    schemas: &[Schema],
    state: &mut CrawlState,
) -> Result<()> {
    for row in source.tables().await? {
        if !schemas.iter().any(|s| s.name == row.schema) {
            continue;
        }
        let full = format!("{}.{}", row.schema, row.name);
        if !options.table_rule.test(&full) {
            continue;
        }
        if state.table_index.contains_key(&full) {
            state.warnings.push(format!("duplicate table {full} skipped"));
            continue;
        }
        let definition = if flags.requests(RetrievalCategory::ViewDefinitions) {
            Tiered::Loaded(if row.kind == TableKind::View {
                row.definition
            } else {
                None
            })
        } else {
            Tiered::NotRequested
        };
        let table = Table {
            schema: row.schema,
            name: row.name,
            kind: row.kind,
            remarks: row.remarks,
            attributes: AttributeMap::new(),
            columns: gated(flags, RetrievalCategory::TableColumns),
            primary_key: gated(flags, RetrievalCategory::PrimaryKeys),
            foreign_keys: gated(flags, RetrievalCategory::ForeignKeys),
            exported_foreign_keys: gated(flags, RetrievalCategory::ForeignKeys),
            indexes: gated(flags, RetrievalCategory::Indexes),
            triggers: gated(flags, RetrievalCategory::Triggers),
            check_constraints: gated(flags, RetrievalCategory::CheckConstraints),
            privileges: gated(flags, RetrievalCategory::TablePrivileges),
            definition,
            detached: false,
        };
        state.table_index.insert(full, state.tables.len());
        state.tables.push(table);
    }
    debug!(count = state.tables.len(), "retrieved tables");
    Ok(())
}

async fn fetch_columns(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    state: &mut CrawlState,
) -> Result<()> {
    for row in source.columns().await? {
        let full = format!("{}.{}.{}", row.schema, row.table, row.name);
        if !options.column_rule.test(&full) {
            continue;
        }
        let Some(table) = state.table_mut(&row.schema, &row.table) else {
            continue; // owning table filtered out or never discovered
        };
        let column = Column {
            schema: row.schema,
            table: row.table,
            name: row.name,
            ordinal: row.ordinal,
            data_type: row.data_type,
            nullable: row.nullable,
            default_value: row.default_value,
            auto_increment: row.auto_increment,
            remarks: row.remarks,
            attributes: AttributeMap::new(),
        };
        if let Some(columns) = table.columns.get_mut() {
            columns.push(column);
        }
    }
    // Keep each table's columns in ordinal position order regardless of
    // delivery order.
    for table in &mut state.tables {
        if let Some(columns) = table.columns.get_mut() {
            columns.sort_by_key(|c| c.ordinal);
        }
    }
    Ok(())
}

async fn fetch_primary_keys(source: &dyn MetadataSource, state: &mut CrawlState) -> Result<()> {
    for row in source.primary_keys().await? {
        let full = format!("{}.{}", row.schema, row.table);
        let Some(&position) = state.table_index.get(&full) else {
            continue;
        };
        if let Some(slot) = state.tables[position].primary_key.get_mut() {
            if slot.is_some() {
                state
                    .warnings
                    .push(format!("duplicate primary key for {full} skipped"));
                continue;
            }
            *slot = Some(PrimaryKey {
                name: row.name,
                columns: row.columns,
            });
        }
    }
    Ok(())
}

async fn fetch_foreign_keys(source: &dyn MetadataSource, state: &mut CrawlState) -> Result<()> {
    // Column pairs arrive one row at a time; regroup them by key identity in
    // delivery order.
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<ForeignKeyRow>> = HashMap::new();
    for row in source.foreign_keys().await? {
        let key = format!(
            "{}.{}:{}",
            row.foreign_key_schema, row.foreign_key_table, row.name
        );
        let group = groups.entry(key.clone()).or_default();
        if group.is_empty() {
            order.push(key);
        }
        group.push(row);
    }

    for key in order {
        let Some(mut rows) = groups.remove(&key) else {
            continue;
        };
        rows.sort_by_key(|r| r.key_sequence);
        let first = &rows[0];
        let referencing = (
            first.foreign_key_schema.clone(),
            first.foreign_key_table.clone(),
        );
        let referenced = (
            first.primary_key_schema.clone(),
            first.primary_key_table.clone(),
        );
        // A foreign key spans exactly two tables.
        for row in &rows {
            if (row.foreign_key_schema.as_str(), row.foreign_key_table.as_str())
                != (referencing.0.as_str(), referencing.1.as_str())
                || (row.primary_key_schema.as_str(), row.primary_key_table.as_str())
                    != (referenced.0.as_str(), referenced.1.as_str())
            {
                return Err(CatalogError::invalid_metadata(format!(
                    "foreign key {} spans more than two tables",
                    row.name
                )));
            }
        }
        let fk = ForeignKey {
            name: first.name.clone(),
            column_references: rows
                .iter()
                .map(|row| ColumnReference {
                    key_sequence: row.key_sequence,
                    primary_key_column: ColumnAddress::new(
                        &row.primary_key_schema,
                        &row.primary_key_table,
                        &row.primary_key_column,
                    ),
                    foreign_key_column: ColumnAddress::new(
                        &row.foreign_key_schema,
                        &row.foreign_key_table,
                        &row.foreign_key_column,
                    ),
                })
                .collect(),
        };

        let referencing_full = format!("{}.{}", referencing.0, referencing.1);
        match state.table_index.get(&referencing_full).copied() {
            Some(position) => {
                if let Some(list) = state.tables[position].foreign_keys.get_mut() {
                    list.push(fk.clone());
                }
            }
            None => state.ensure_detached(&referencing.0, &referencing.1),
        }
        let referenced_full = format!("{}.{}", referenced.0, referenced.1);
        match state.table_index.get(&referenced_full).copied() {
            Some(position) => {
                if let Some(list) = state.tables[position].exported_foreign_keys.get_mut() {
                    list.push(fk);
                }
            }
            None => state.ensure_detached(&referenced.0, &referenced.1),
        }
    }
    Ok(())
}

async fn fetch_indexes(source: &dyn MetadataSource, state: &mut CrawlState) -> Result<()> {
    for row in source.indexes().await? {
        let Some(table) = state.table_mut(&row.schema, &row.table) else {
            continue;
        };
        if let Some(indexes) = table.indexes.get_mut() {
            indexes.push(Index {
                name: row.name,
                unique: row.unique,
                columns: row.columns,
            });
        }
    }
    Ok(())
}

async fn fetch_triggers(source: &dyn MetadataSource, state: &mut CrawlState) -> Result<()> {
    for row in source.triggers().await? {
        let Some(table) = state.table_mut(&row.schema, &row.table) else {
            continue;
        };
        if let Some(triggers) = table.triggers.get_mut() {
            triggers.push(Trigger {
                name: row.name,
                event: row.event,
                timing: row.timing,
                definition: row.definition,
            });
        }
    }
    Ok(())
}

async fn fetch_check_constraints(
    source: &dyn MetadataSource,
    state: &mut CrawlState,
) -> Result<()> {
    for row in source.check_constraints().await? {
        let Some(table) = state.table_mut(&row.schema, &row.table) else {
            continue;
        };
        if let Some(constraints) = table.check_constraints.get_mut() {
            constraints.push(CheckConstraint {
                name: row.name,
                definition: row.definition,
            });
        }
    }
    Ok(())
}

async fn fetch_privileges(source: &dyn MetadataSource, state: &mut CrawlState) -> Result<()> {
    for row in source.table_privileges().await? {
        let Some(table) = state.table_mut(&row.schema, &row.table) else {
            continue;
        };
        if let Some(privileges) = table.privileges.get_mut() {
            privileges.push(Privilege {
                name: row.name,
                grantor: row.grantor,
                grantee: row.grantee,
                grantable: row.grantable,
            });
        }
    }
    Ok(())
}

async fn fetch_routines(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    flags: &RetrievalFlags,
    schemas: &[Schema],
    state: &mut CrawlState,
) -> Result<()> {
    for row in source.routines().await? {
        if !schemas.iter().any(|s| s.name == row.schema) {
            continue;
        }
        let full = format!("{}.{}", row.schema, row.name);
        if !options.routine_rule.test(&full) {
            continue;
        }
        if state.routine_index.contains_key(&full) {
            state
                .warnings
                .push(format!("duplicate routine {full} skipped"));
            continue;
        }
        let definition = if flags.requests(RetrievalCategory::RoutineDefinitions) {
            Tiered::Loaded(row.definition)
        } else {
            Tiered::NotRequested
        };
        let routine = Routine {
            schema: row.schema,
            name: row.name,
            kind: row.kind,
            remarks: row.remarks,
            attributes: AttributeMap::new(),
            parameters: gated(flags, RetrievalCategory::RoutineParameters),
            definition,
        };
        state.routine_index.insert(full, state.routines.len());
        state.routines.push(routine);
    }
    debug!(count = state.routines.len(), "retrieved routines");
    Ok(())
}

async fn fetch_routine_parameters(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    state: &mut CrawlState,
) -> Result<()> {
    for row in source.routine_parameters().await? {
        let full = format!("{}.{}.{}", row.schema, row.routine, row.name);
        if !options.routine_parameter_rule.test(&full) {
            continue;
        }
        let routine_full = format!("{}.{}", row.schema, row.routine);
        let Some(&position) = state.routine_index.get(&routine_full) else {
            continue;
        };
        if let Some(parameters) = state.routines[position].parameters.get_mut() {
            parameters.push(RoutineParameter {
                name: row.name,
                ordinal: row.ordinal,
                data_type: row.data_type,
                direction: row.direction,
            });
        }
    }
    for routine in &mut state.routines {
        if let Some(parameters) = routine.parameters.get_mut() {
            parameters.sort_by_key(|p| p.ordinal);
        }
    }
    Ok(())
}

async fn fetch_synonyms(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    schemas: &[Schema],
) -> Result<Vec<Synonym>> {
    let mut synonyms = Vec::new();
    for row in source.synonyms().await? {
        if !schemas.iter().any(|s| s.name == row.schema) {
            continue;
        }
        let full = format!("{}.{}", row.schema, row.name);
        if !options.synonym_rule.test(&full) {
            continue;
        }
        synonyms.push(Synonym {
            schema: row.schema,
            name: row.name,
            referenced_object: row.referenced_object,
            remarks: row.remarks,
            attributes: AttributeMap::new(),
        });
    }
    Ok(synonyms)
}

async fn fetch_sequences(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    schemas: &[Schema],
) -> Result<Vec<Sequence>> {
    let mut sequences = Vec::new();
    for row in source.sequences().await? {
        if !schemas.iter().any(|s| s.name == row.schema) {
            continue;
        }
        let full = format!("{}.{}", row.schema, row.name);
        if !options.sequence_rule.test(&full) {
            continue;
        }
        sequences.push(Sequence {
            schema: row.schema,
            name: row.name,
            increment: row.increment,
            minimum: row.minimum,
            maximum: row.maximum,
            cycle: row.cycle,
            remarks: row.remarks,
            attributes: AttributeMap::new(),
        });
    }
    Ok(sequences)
}
