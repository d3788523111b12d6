//! Core data models for the metadata catalog.
//!
//! These types form the named-object graph a crawl produces: schemas own
//! tables, routines, synonyms, and sequences; tables own columns, keys,
//! indexes, triggers, constraints, and privileges. Tier-gated children are
//! wrapped in [`Tiered`] so accessors can distinguish "never fetched" from
//! "fetched and empty". All models serialize.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tiers::{RetrievalCategory, Tiered};

/// Free-form key/value attributes attachable to any catalog object.
pub type AttributeMap = BTreeMap<String, serde_json::Value>;

/// Capability shared by every catalog entity: a short name, a fully
/// qualified name derived from the parent chain, free-form remarks, and an
/// attachable attribute map. Qualified names are the identity used for
/// equality and lookup.
pub trait NamedObject {
    fn name(&self) -> &str;
    fn full_name(&self) -> String;
    fn remarks(&self) -> Option<&str>;
    fn attributes(&self) -> &AttributeMap;
}

/// Selectable orderings for catalog traversal.
///
/// Alphabetical compares qualified names case-insensitively. Natural uses
/// the type's intrinsic ordering where one exists (a column's ordinal
/// position); objects without an intrinsic ordinal, such as tables, keep the
/// order the retrieval collaborator delivered them in. Delivery order is
/// best-effort and not portable across collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedObjectSort {
    Alphabetical,
    Natural,
}

/// Case-insensitive qualified-name comparison.
pub(crate) fn alphabetical<T: NamedObject>(a: &T, b: &T) -> std::cmp::Ordering {
    a.full_name()
        .to_lowercase()
        .cmp(&b.full_name().to_lowercase())
}

/// Sorts borrowed objects that have no intrinsic ordinal: natural order is
/// the delivery order they are already in.
pub(crate) fn sort_by_delivery_or_name<'a, T: NamedObject>(
    objects: &'a [T],
    sort: NamedObjectSort,
) -> Vec<&'a T> {
    let mut sorted: Vec<&T> = objects.iter().collect();
    if sort == NamedObjectSort::Alphabetical {
        sorted.sort_by(|a, b| alphabetical(*a, *b));
    }
    sorted
}

/// A named container for tables, routines, synonyms, and sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub remarks: Option<String>,
    pub attributes: AttributeMap,
}

impl NamedObject for Schema {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        self.name.clone()
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// Table variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    Table,
    View,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Table => write!(f, "table"),
            TableKind::View => write!(f, "view"),
        }
    }
}

/// A table or view, with exclusive ownership of its children.
///
/// Children whose categories the active tier did not request are recorded as
/// [`Tiered::NotRequested`]; their accessors fail with the not-loaded signal
/// instead of returning an empty default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub kind: TableKind,
    pub remarks: Option<String>,
    pub attributes: AttributeMap,
    pub(crate) columns: Tiered<Vec<Column>>,
    pub(crate) primary_key: Tiered<Option<PrimaryKey>>,
    pub(crate) foreign_keys: Tiered<Vec<ForeignKey>>,
    pub(crate) exported_foreign_keys: Tiered<Vec<ForeignKey>>,
    pub(crate) indexes: Tiered<Vec<Index>>,
    pub(crate) triggers: Tiered<Vec<Trigger>>,
    pub(crate) check_constraints: Tiered<Vec<CheckConstraint>>,
    pub(crate) privileges: Tiered<Vec<Privilege>>,
    pub(crate) definition: Tiered<Option<String>>,
    pub(crate) detached: bool,
}

impl Table {
    /// A stub for a table that was excluded by filtering but is still
    /// referenced, e.g. by a foreign key. Detached tables stay navigable
    /// through the reference, are not discoverable through ordinary catalog
    /// lookups, and report every gated attribute as not loaded.
    pub(crate) fn detached_stub(schema: &str, name: &str) -> Self {
        Self {
            schema: schema.to_string(),
            name: name.to_string(),
            kind: TableKind::Table,
            remarks: None,
            attributes: AttributeMap::new(),
            columns: Tiered::NotRequested,
            primary_key: Tiered::NotRequested,
            foreign_keys: Tiered::NotRequested,
            exported_foreign_keys: Tiered::NotRequested,
            indexes: Tiered::NotRequested,
            triggers: Tiered::NotRequested,
            check_constraints: Tiered::NotRequested,
            privileges: Tiered::NotRequested,
            definition: Tiered::NotRequested,
            detached: true,
        }
    }

    /// True for stubs standing in for filtered-out referenced tables.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Columns in ordinal position order.
    pub fn columns(&self) -> Result<&[Column]> {
        Ok(self
            .columns
            .require(RetrievalCategory::TableColumns, &self.full_name())?
            .as_slice())
    }

    /// Columns under a selectable ordering: natural is ordinal position,
    /// alphabetical is case-insensitive qualified name.
    pub fn columns_sorted(&self, sort: NamedObjectSort) -> Result<Vec<&Column>> {
        let mut columns: Vec<&Column> = self.columns()?.iter().collect();
        match sort {
            NamedObjectSort::Natural => columns.sort_by_key(|c| c.ordinal),
            NamedObjectSort::Alphabetical => columns.sort_by(|a, b| alphabetical(*a, *b)),
        }
        Ok(columns)
    }

    /// Looks up an owned column by short name.
    pub fn column(&self, name: &str) -> Result<Option<&Column>> {
        Ok(self.columns()?.iter().find(|c| c.name == name))
    }

    pub fn primary_key(&self) -> Result<Option<&PrimaryKey>> {
        Ok(self
            .primary_key
            .require(RetrievalCategory::PrimaryKeys, &self.full_name())?
            .as_ref())
    }

    /// Foreign keys this table imports (it is the referencing side).
    pub fn foreign_keys(&self) -> Result<&[ForeignKey]> {
        Ok(self
            .foreign_keys
            .require(RetrievalCategory::ForeignKeys, &self.full_name())?
            .as_slice())
    }

    /// Foreign keys other tables point at this one with (it is the
    /// referenced side).
    pub fn exported_foreign_keys(&self) -> Result<&[ForeignKey]> {
        Ok(self
            .exported_foreign_keys
            .require(RetrievalCategory::ForeignKeys, &self.full_name())?
            .as_slice())
    }

    pub fn indexes(&self) -> Result<&[Index]> {
        Ok(self
            .indexes
            .require(RetrievalCategory::Indexes, &self.full_name())?
            .as_slice())
    }

    pub fn triggers(&self) -> Result<&[Trigger]> {
        Ok(self
            .triggers
            .require(RetrievalCategory::Triggers, &self.full_name())?
            .as_slice())
    }

    pub fn check_constraints(&self) -> Result<&[CheckConstraint]> {
        Ok(self
            .check_constraints
            .require(RetrievalCategory::CheckConstraints, &self.full_name())?
            .as_slice())
    }

    pub fn privileges(&self) -> Result<&[Privilege]> {
        Ok(self
            .privileges
            .require(RetrievalCategory::TablePrivileges, &self.full_name())?
            .as_slice())
    }

    /// The defining query, for views.
    pub fn definition(&self) -> Result<Option<&str>> {
        Ok(self
            .definition
            .require(RetrievalCategory::ViewDefinitions, &self.full_name())?
            .as_deref())
    }
}

impl NamedObject for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// Data types, unified across database engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnDataType {
    /// String/text types with optional length
    String { max_length: Option<u32> },
    /// Integer types with bit width
    Integer { bits: u8, signed: bool },
    /// Floating point types
    Float { precision: Option<u8> },
    Boolean,
    DateTime { with_timezone: bool },
    Date,
    Time,
    /// Binary data
    Binary { max_length: Option<u32> },
    Json,
    /// Database-specific types
    Custom { type_name: String },
}

impl std::fmt::Display for ColumnDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnDataType::String { max_length: Some(n) } => write!(f, "varchar({n})"),
            ColumnDataType::String { max_length: None } => write!(f, "text"),
            ColumnDataType::Integer { bits, signed: true } => write!(f, "int{bits}"),
            ColumnDataType::Integer { bits, signed: false } => write!(f, "uint{bits}"),
            ColumnDataType::Float { precision: Some(p) } => write!(f, "float({p})"),
            ColumnDataType::Float { precision: None } => write!(f, "float"),
            ColumnDataType::Boolean => write!(f, "boolean"),
            ColumnDataType::DateTime { with_timezone: true } => write!(f, "timestamptz"),
            ColumnDataType::DateTime { with_timezone: false } => write!(f, "timestamp"),
            ColumnDataType::Date => write!(f, "date"),
            ColumnDataType::Time => write!(f, "time"),
            ColumnDataType::Binary { .. } => write!(f, "binary"),
            ColumnDataType::Json => write!(f, "json"),
            ColumnDataType::Custom { type_name } => write!(f, "{type_name}"),
        }
    }
}

/// A column, owned exclusively by one table. The parent reference is fixed
/// at creation; `schema.table.column` is the identity used for lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub ordinal: u32,
    pub data_type: ColumnDataType,
    pub nullable: bool,
    pub default_value: Option<String>,
    pub auto_increment: bool,
    pub remarks: Option<String>,
    pub attributes: AttributeMap,
}

impl Column {
    /// Qualified name of the owning table.
    pub fn table_full_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

impl NamedObject for Column {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        format!("{}.{}.{}", self.schema, self.table, self.name)
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// Primary key constraint: an ordered list of column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

/// Addresses a column by its parent chain, without owning it. Used where a
/// reference must survive the referenced object being filtered out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnAddress {
    pub schema: String,
    pub table: String,
    pub column: String,
}

impl ColumnAddress {
    pub fn new(schema: &str, table: &str, column: &str) -> Self {
        Self {
            schema: schema.to_string(),
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn table_full_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}.{}", self.schema, self.table, self.column)
    }
}

impl std::fmt::Display for ColumnAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// One primary-key/foreign-key column pair of a foreign key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReference {
    pub key_sequence: u32,
    pub primary_key_column: ColumnAddress,
    pub foreign_key_column: ColumnAddress,
}

/// A foreign key spanning exactly two tables (possibly the same table).
/// Column-reference pairs are ordered by key sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub name: String,
    pub column_references: Vec<ColumnReference>,
}

impl ForeignKey {
    /// Qualified name of the referencing (importing) table.
    pub fn referencing_table(&self) -> Option<String> {
        self.column_references
            .first()
            .map(|r| r.foreign_key_column.table_full_name())
    }

    /// Qualified name of the referenced (exporting) table.
    pub fn referenced_table(&self) -> Option<String> {
        self.column_references
            .first()
            .map(|r| r.primary_key_column.table_full_name())
    }

    /// True when the key references its own table.
    pub fn is_self_referencing(&self) -> bool {
        match (self.referencing_table(), self.referenced_table()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// A table index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    pub columns: Vec<String>,
}

/// Trigger events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    Insert,
    Update,
    Delete,
}

/// Trigger timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

/// A table trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub name: String,
    pub event: TriggerEvent,
    pub timing: TriggerTiming,
    pub definition: Option<String>,
}

/// A check constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConstraint {
    pub name: String,
    pub definition: Option<String>,
}

/// A table privilege grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Privilege {
    pub name: String,
    pub grantor: Option<String>,
    pub grantee: String,
    pub grantable: bool,
}

/// Routine variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutineKind {
    Procedure,
    Function,
}

impl std::fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutineKind::Procedure => write!(f, "procedure"),
            RoutineKind::Function => write!(f, "function"),
        }
    }
}

/// Routine parameter direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterDirection {
    In,
    Out,
    InOut,
}

/// A routine parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineParameter {
    pub name: String,
    pub ordinal: u32,
    pub data_type: ColumnDataType,
    pub direction: ParameterDirection,
}

/// A stored procedure or function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub schema: String,
    pub name: String,
    pub kind: RoutineKind,
    pub remarks: Option<String>,
    pub attributes: AttributeMap,
    pub(crate) parameters: Tiered<Vec<RoutineParameter>>,
    pub(crate) definition: Tiered<Option<String>>,
}

impl Routine {
    /// Parameters in ordinal order.
    pub fn parameters(&self) -> Result<&[RoutineParameter]> {
        Ok(self
            .parameters
            .require(RetrievalCategory::RoutineParameters, &self.full_name())?
            .as_slice())
    }

    /// The routine body text.
    pub fn definition(&self) -> Result<Option<&str>> {
        Ok(self
            .definition
            .require(RetrievalCategory::RoutineDefinitions, &self.full_name())?
            .as_deref())
    }
}

impl NamedObject for Routine {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// An alternate name for another database object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synonym {
    pub schema: String,
    pub name: String,
    pub referenced_object: String,
    pub remarks: Option<String>,
    pub attributes: AttributeMap,
}

impl NamedObject for Synonym {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// A sequence generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub schema: String,
    pub name: String,
    pub increment: i64,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub cycle: bool,
    pub remarks: Option<String>,
    pub attributes: AttributeMap,
}

impl NamedObject for Sequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, ordinal: u32) -> Column {
        Column {
            schema: "PUBLIC".to_string(),
            table: "BOOKS".to_string(),
            name: name.to_string(),
            ordinal,
            data_type: ColumnDataType::Integer {
                bits: 32,
                signed: true,
            },
            nullable: false,
            default_value: None,
            auto_increment: false,
            remarks: None,
            attributes: AttributeMap::new(),
        }
    }

    #[test]
    fn qualified_names_follow_the_parent_chain() {
        let col = column("BOOKID", 1);
        assert_eq!(col.full_name(), "PUBLIC.BOOKS.BOOKID");
        assert_eq!(col.table_full_name(), "PUBLIC.BOOKS");
    }

    #[test]
    fn detached_stub_reports_not_loaded_everywhere() {
        let stub = Table::detached_stub("PUBLIC", "AUTHORS");
        assert!(stub.is_detached());
        assert!(stub.columns().unwrap_err().is_not_loaded());
        assert!(stub.triggers().unwrap_err().is_not_loaded());
        assert!(stub.primary_key().unwrap_err().is_not_loaded());
        assert!(stub.definition().unwrap_err().is_not_loaded());
    }

    #[test]
    fn column_sorting_natural_and_alphabetical() {
        let mut table = Table::detached_stub("PUBLIC", "BOOKS");
        table.detached = false;
        table.columns = Tiered::Loaded(vec![
            column("TITLE", 2),
            column("bookid", 1),
            column("AUTHOR", 3),
        ]);

        let natural: Vec<&str> = table
            .columns_sorted(NamedObjectSort::Natural)
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(natural, vec!["bookid", "TITLE", "AUTHOR"]);

        let alphabetical: Vec<&str> = table
            .columns_sorted(NamedObjectSort::Alphabetical)
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(alphabetical, vec!["AUTHOR", "bookid", "TITLE"]);
    }

    #[test]
    fn foreign_key_endpoints_come_from_column_references() {
        let fk = ForeignKey {
            name: "FK_BOOKAUTHORS_AUTHORS".to_string(),
            column_references: vec![ColumnReference {
                key_sequence: 1,
                primary_key_column: ColumnAddress::new("PUBLIC", "AUTHORS", "ID"),
                foreign_key_column: ColumnAddress::new("PUBLIC", "BOOKAUTHORS", "AUTHORID"),
            }],
        };
        assert_eq!(fk.referenced_table().as_deref(), Some("PUBLIC.AUTHORS"));
        assert_eq!(
            fk.referencing_table().as_deref(),
            Some("PUBLIC.BOOKAUTHORS")
        );
        assert!(!fk.is_self_referencing());
    }
}
