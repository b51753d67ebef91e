use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::GenerateError;
use crate::generator::context::GenerateContext;
use crate::generator::field_rules::{self, FieldOutcome, CHAIN_SEPARATOR};
use crate::model::{Index, Table};
use crate::naming;

/// Everything the renderer needs to emit one schema file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaFile {
    /// Singular table name, used as the output file name.
    pub file_stem: String,
    /// Extra imports required by the declarations, deduplicated.
    pub imports: Vec<String>,
    /// Entity type name (`user_roles` -> `UserRole`).
    pub schema_name: String,
    /// Schema-level annotations.
    pub annotations: Vec<String>,
    /// Field declarations in column order.
    pub fields: Vec<String>,
    /// Index declarations, unique indexes first.
    pub indexes: Vec<String>,
}

/// Turns finalized tables into [`SchemaFile`] records.
#[derive(Debug, Clone, Copy)]
pub struct SchemaGenerator<'c> {
    config: &'c Config,
}

impl<'c> SchemaGenerator<'c> {
    /// Create a generator over a read-only configuration.
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// Generate one table.
    ///
    /// The first failing column aborts the table; skipped columns are left out.
    pub fn generate(&self, table: &Table) -> Result<SchemaFile, GenerateError> {
        let mut ctx = GenerateContext::new();
        let singular = naming::singularize(&table.name);

        let annotations = generate_annotations(table);

        let mut fields = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            match field_rules::generate_field(&mut ctx, self.config, table, column)? {
                FieldOutcome::Declared(decl) => fields.push(decl),
                FieldOutcome::Skipped => {
                    debug!(table = %table.name, column = %column.name, "skipping implicit id column");
                }
            }
        }

        let indexes = table.indexes.iter().map(generate_index).collect();

        info!(table = %table.name, fields = fields.len(), "generated schema");
        Ok(SchemaFile {
            schema_name: naming::to_upper_words(&singular),
            file_stem: singular,
            imports: ctx.into_imports(),
            annotations,
            fields,
            indexes,
        })
    }

    /// Generate every table independently; one table's error does not stop the others.
    pub fn generate_all(&self, tables: &[Table]) -> Vec<Result<SchemaFile, GenerateError>> {
        tables.iter().map(|table| self.generate(table)).collect()
    }
}

/// Composite `field.ID(..)` annotation when several primary key columns are also foreign keys.
fn generate_annotations(table: &Table) -> Vec<String> {
    let keys: Vec<String> = table
        .columns
        .iter()
        .filter(|c| c.is_primary && c.foreign_key.is_some())
        .map(|c| quote(&c.name))
        .collect();

    if keys.len() > 1 {
        vec![format!("field.ID({})", keys.join(", "))]
    } else {
        Vec::new()
    }
}

fn generate_index(index: &Index) -> String {
    let columns: Vec<String> = index.columns.iter().map(|c| quote(c)).collect();
    let mut parts = vec![format!("index.Fields({})", columns.join(", "))];
    if index.is_unique {
        parts.push("Unique()".to_string());
    }
    parts.join(CHAIN_SEPARATOR)
}

fn quote(name: &str) -> String {
    format!("\"{name}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, ForeignKey};

    fn fk(table: &str) -> Option<ForeignKey> {
        Some(ForeignKey {
            table: table.to_string(),
            column: "id".to_string(),
        })
    }

    #[test]
    fn composite_key_annotation_needs_two_primary_foreign_keys() {
        let mut table = Table::new("user_roles");
        let mut user_id = Column::new("user_id", "int8");
        user_id.is_primary = true;
        user_id.foreign_key = fk("users");
        let mut role_id = Column::new("role_id", "int8");
        role_id.is_primary = true;
        role_id.foreign_key = fk("roles");
        table.columns = vec![user_id.clone(), role_id];

        assert_eq!(
            generate_annotations(&table),
            vec![r#"field.ID("user_id", "role_id")"#.to_string()]
        );

        table.columns = vec![user_id];
        assert!(generate_annotations(&table).is_empty());
    }

    #[test]
    fn index_declaration_lists_columns_and_uniqueness() {
        let index = Index {
            columns: vec!["org_id".to_string(), "slug".to_string()],
            is_unique: true,
        };
        assert_eq!(
            generate_index(&index),
            "index.Fields(\"org_id\", \"slug\").\nUnique()"
        );
    }
}
