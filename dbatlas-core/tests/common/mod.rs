//! In-memory retrieval source over a small books database, shared by the
//! integration tests.

// Not every test binary exercises every fixture helper.
#![allow(dead_code)]

use async_trait::async_trait;
use dbatlas_core::crawl::{
    CheckConstraintRow, ColumnRow, ForeignKeyRow, IndexRow, MetadataSource, PrimaryKeyRow,
    PrivilegeRow, RoutineParameterRow, RoutineRow, SchemaRow, SequenceRow, SynonymRow, TableRow,
    TriggerRow,
};
use dbatlas_core::error::Result;
use dbatlas_core::models::{
    ColumnDataType, ParameterDirection, RoutineKind, TableKind, TriggerEvent, TriggerTiming,
};

/// Rows describing two schemas: PUBLIC holds the books tables, a view, two
/// routines, a synonym, and a sequence; INTERNAL holds an audit table.
pub struct BooksSource {
    include_routines: bool,
}

impl BooksSource {
    pub fn new() -> Self {
        Self {
            include_routines: true,
        }
    }

    /// A variant whose database genuinely has no routines.
    pub fn without_routines() -> Self {
        Self {
            include_routines: false,
        }
    }
}

impl Default for BooksSource {
    fn default() -> Self {
        Self::new()
    }
}

fn int() -> ColumnDataType {
    ColumnDataType::Integer {
        bits: 32,
        signed: true,
    }
}

fn varchar(max_length: u32) -> ColumnDataType {
    ColumnDataType::String {
        max_length: Some(max_length),
    }
}

fn table_row(schema: &str, name: &str, remarks: Option<&str>) -> TableRow {
    TableRow {
        schema: schema.to_string(),
        name: name.to_string(),
        kind: TableKind::Table,
        remarks: remarks.map(str::to_string),
        definition: None,
    }
}

fn column_row(
    schema: &str,
    table: &str,
    name: &str,
    ordinal: u32,
    data_type: ColumnDataType,
) -> ColumnRow {
    ColumnRow {
        schema: schema.to_string(),
        table: table.to_string(),
        name: name.to_string(),
        ordinal,
        data_type,
        nullable: false,
        default_value: None,
        auto_increment: false,
        remarks: None,
    }
}

fn fk_row(
    name: &str,
    pk_table: &str,
    pk_column: &str,
    fk_table: &str,
    fk_column: &str,
) -> ForeignKeyRow {
    ForeignKeyRow {
        name: name.to_string(),
        key_sequence: 1,
        primary_key_schema: "PUBLIC".to_string(),
        primary_key_table: pk_table.to_string(),
        primary_key_column: pk_column.to_string(),
        foreign_key_schema: "PUBLIC".to_string(),
        foreign_key_table: fk_table.to_string(),
        foreign_key_column: fk_column.to_string(),
    }
}

#[async_trait]
impl MetadataSource for BooksSource {
    async fn schemas(&self) -> Result<Vec<SchemaRow>> {
        Ok(vec![
            SchemaRow {
                name: "PUBLIC".to_string(),
                remarks: Some("Application schema".to_string()),
            },
            SchemaRow {
                name: "INTERNAL".to_string(),
                remarks: None,
            },
        ])
    }

    async fn tables(&self) -> Result<Vec<TableRow>> {
        Ok(vec![
            table_row("PUBLIC", "AUTHORS", Some("Contributing authors")),
            table_row("PUBLIC", "BOOKS", Some("Published books")),
            table_row("PUBLIC", "BOOKAUTHORS", None),
            table_row("PUBLIC", "REVIEWS", Some("Reader reviews")),
            TableRow {
                schema: "PUBLIC".to_string(),
                name: "AUTHORSLIST".to_string(),
                kind: TableKind::View,
                remarks: None,
                definition: Some("SELECT FIRSTNAME, LASTNAME FROM AUTHORS".to_string()),
            },
            table_row("INTERNAL", "AUDITLOG", None),
        ])
    }

    async fn columns(&self) -> Result<Vec<ColumnRow>> {
        Ok(vec![
            column_row("PUBLIC", "AUTHORS", "ID", 1, int()),
            column_row("PUBLIC", "AUTHORS", "FIRSTNAME", 2, varchar(50)),
            column_row("PUBLIC", "AUTHORS", "LASTNAME", 3, varchar(50)),
            column_row("PUBLIC", "BOOKS", "BOOKID", 1, int()),
            column_row("PUBLIC", "BOOKS", "TITLE", 2, varchar(200)),
            column_row("PUBLIC", "BOOKS", "PUBLISHERID", 3, int()),
            column_row("PUBLIC", "BOOKAUTHORS", "BOOKID", 1, int()),
            column_row("PUBLIC", "BOOKAUTHORS", "AUTHORID", 2, int()),
            column_row("PUBLIC", "REVIEWS", "REVIEWID", 1, int()),
            column_row("PUBLIC", "REVIEWS", "AUTHORID", 2, int()),
            column_row("PUBLIC", "REVIEWS", "COMMENTS", 3, varchar(2000)),
            column_row("PUBLIC", "AUTHORSLIST", "FIRSTNAME", 1, varchar(50)),
            column_row("PUBLIC", "AUTHORSLIST", "LASTNAME", 2, varchar(50)),
            column_row("INTERNAL", "AUDITLOG", "ENTRYID", 1, int()),
            column_row("INTERNAL", "AUDITLOG", "ENTRY", 2, varchar(4000)),
        ])
    }

    async fn primary_keys(&self) -> Result<Vec<PrimaryKeyRow>> {
        Ok(vec![
            PrimaryKeyRow {
                schema: "PUBLIC".to_string(),
                table: "AUTHORS".to_string(),
                name: Some("PK_AUTHORS".to_string()),
                columns: vec!["ID".to_string()],
            },
            PrimaryKeyRow {
                schema: "PUBLIC".to_string(),
                table: "BOOKS".to_string(),
                name: Some("PK_BOOKS".to_string()),
                columns: vec!["BOOKID".to_string()],
            },
            PrimaryKeyRow {
                schema: "PUBLIC".to_string(),
                table: "BOOKAUTHORS".to_string(),
                name: Some("PK_BOOKAUTHORS".to_string()),
                columns: vec!["BOOKID".to_string(), "AUTHORID".to_string()],
            },
            PrimaryKeyRow {
                schema: "PUBLIC".to_string(),
                table: "REVIEWS".to_string(),
                name: Some("PK_REVIEWS".to_string()),
                columns: vec!["REVIEWID".to_string()],
            },
            PrimaryKeyRow {
                schema: "INTERNAL".to_string(),
                table: "AUDITLOG".to_string(),
                name: Some("PK_AUDITLOG".to_string()),
                columns: vec!["ENTRYID".to_string()],
            },
        ])
    }

    async fn foreign_keys(&self) -> Result<Vec<ForeignKeyRow>> {
        Ok(vec![
            fk_row(
                "FK_BOOKAUTHORS_BOOKS",
                "BOOKS",
                "BOOKID",
                "BOOKAUTHORS",
                "BOOKID",
            ),
            fk_row(
                "FK_BOOKAUTHORS_AUTHORS",
                "AUTHORS",
                "ID",
                "BOOKAUTHORS",
                "AUTHORID",
            ),
        ])
    }

    async fn indexes(&self) -> Result<Vec<IndexRow>> {
        Ok(vec![
            IndexRow {
                schema: "PUBLIC".to_string(),
                table: "BOOKS".to_string(),
                name: "UQ_BOOKS_TITLE".to_string(),
                unique: true,
                columns: vec!["TITLE".to_string()],
            },
            IndexRow {
                schema: "PUBLIC".to_string(),
                table: "REVIEWS".to_string(),
                name: "IDX_REVIEWS_AUTHOR".to_string(),
                unique: false,
                columns: vec!["AUTHORID".to_string()],
            },
        ])
    }

    async fn triggers(&self) -> Result<Vec<TriggerRow>> {
        Ok(vec![TriggerRow {
            schema: "PUBLIC".to_string(),
            table: "BOOKS".to_string(),
            name: "TRG_BOOKS_AUDIT".to_string(),
            event: TriggerEvent::Insert,
            timing: TriggerTiming::After,
            definition: Some("INSERT INTO INTERNAL.AUDITLOG (ENTRY) VALUES ('book')".to_string()),
        }])
    }

    async fn check_constraints(&self) -> Result<Vec<CheckConstraintRow>> {
        Ok(vec![CheckConstraintRow {
            schema: "PUBLIC".to_string(),
            table: "REVIEWS".to_string(),
            name: "CK_REVIEWS_COMMENTS".to_string(),
            definition: Some("COMMENTS IS NOT NULL".to_string()),
        }])
    }

    async fn table_privileges(&self) -> Result<Vec<PrivilegeRow>> {
        Ok(vec![PrivilegeRow {
            schema: "PUBLIC".to_string(),
            table: "BOOKS".to_string(),
            name: "SELECT".to_string(),
            grantor: Some("ADMIN".to_string()),
            grantee: "READER_ROLE".to_string(),
            grantable: false,
        }])
    }

    async fn routines(&self) -> Result<Vec<RoutineRow>> {
        if !self.include_routines {
            return Ok(Vec::new());
        }
        Ok(vec![
            RoutineRow {
                schema: "PUBLIC".to_string(),
                name: "NEW_BOOK".to_string(),
                kind: RoutineKind::Procedure,
                remarks: Some("Registers a new book".to_string()),
                definition: Some("INSERT INTO BOOKS (TITLE) VALUES (?)".to_string()),
            },
            RoutineRow {
                schema: "PUBLIC".to_string(),
                name: "BOOK_COUNT".to_string(),
                kind: RoutineKind::Function,
                remarks: None,
                definition: Some("SELECT COUNT(*) FROM BOOKS".to_string()),
            },
        ])
    }

    async fn routine_parameters(&self) -> Result<Vec<RoutineParameterRow>> {
        if !self.include_routines {
            return Ok(Vec::new());
        }
        Ok(vec![RoutineParameterRow {
            schema: "PUBLIC".to_string(),
            routine: "NEW_BOOK".to_string(),
            name: "TITLE".to_string(),
            ordinal: 1,
            data_type: varchar(200),
            direction: ParameterDirection::In,
        }])
    }

    async fn synonyms(&self) -> Result<Vec<SynonymRow>> {
        Ok(vec![SynonymRow {
            schema: "PUBLIC".to_string(),
            name: "PUBLICATIONS".to_string(),
            referenced_object: "PUBLIC.BOOKS".to_string(),
            remarks: None,
        }])
    }

    async fn sequences(&self) -> Result<Vec<SequenceRow>> {
        Ok(vec![SequenceRow {
            schema: "PUBLIC".to_string(),
            name: "BOOK_ID_SEQ".to_string(),
            increment: 1,
            minimum: Some(1),
            maximum: None,
            cycle: false,
            remarks: None,
        }])
    }
}
