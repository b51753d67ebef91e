use serde_json::Value;
use tracing::debug;

use crate::error::ParseError;
use crate::model::{Column, ForeignKey, Index, Table};
use crate::parser::default_expr::resolve_default;
use crate::parser::tree::{self, ConstraintKind, Node};

/// Parse pg_query JSON text and walk it. See [`walk`].
pub fn parse_tree_json(json: &str) -> Result<Vec<Table>, ParseError> {
    let tree: Value = serde_json::from_str(json)?;
    walk(&tree)
}

/// Build the table model from a parse tree of one or more statements.
///
/// Statements are applied in source order in a single pass: an index or
/// constraint may only reference tables and columns declared before it.
/// Statement kinds other than `CREATE TABLE` and `CREATE INDEX` are skipped.
pub fn walk(tree: &Value) -> Result<Vec<Table>, ParseError> {
    let mut tables: Vec<Table> = Vec::new();

    for stmt in statements(Node::new(tree))? {
        let Some((kind, body)) = stmt.tagged() else {
            continue;
        };
        match kind {
            "CreateStmt" => {
                let table = parse_create_stmt(body, &tables)?;
                debug!(table = %table.name, columns = table.columns.len(), "parsed CREATE TABLE");
                tables.push(table);
            }
            "IndexStmt" => apply_index_stmt(&mut tables, body)?,
            other => debug!(kind = other, "skipping statement"),
        }
    }

    for table in &mut tables {
        table.finalize();
    }
    Ok(tables)
}

fn statements(root: Node<'_>) -> Result<Vec<Node<'_>>, ParseError> {
    if !root.value().is_array() {
        return Err(ParseError::missing("RawStmt"));
    }
    root.items().map(|raw| raw.require("RawStmt.stmt")).collect()
}

fn parse_create_stmt(stmt: Node<'_>, tables: &[Table]) -> Result<Table, ParseError> {
    let mut table = Table::new(tree::relation_name(stmt)?);

    for elem in stmt.get("tableElts").into_iter().flat_map(Node::items) {
        let Some((kind, body)) = elem.tagged() else {
            continue;
        };
        match kind {
            "ColumnDef" => {
                let column = parse_column_def(body, tables, &table)?;
                table.columns.push(column);
            }
            "Constraint" => apply_table_constraint(&mut table, tables, body)?,
            _ => {}
        }
    }
    Ok(table)
}

fn parse_column_def(def: Node<'_>, tables: &[Table], table: &Table) -> Result<Column, ParseError> {
    let name = tree::non_empty_str(def, "colname")?;
    let ty = tree::type_name(def.require("typeName")?)?;
    let mut column = Column::new(name, ty);

    for node in def.get("constraints").into_iter().flat_map(Node::items) {
        let constraint = node.require("Constraint")?;
        let Some(kind) = ConstraintKind::of(constraint) else {
            continue;
        };
        match kind {
            ConstraintKind::NotNull => column.is_not_null = true,
            ConstraintKind::Default => {
                let (expr_kind, expr) = constraint
                    .require("raw_expr")?
                    .tagged()
                    .ok_or_else(|| ParseError::missing("raw_expr"))?;
                let value = resolve_default(expr_kind, expr)?;
                // DEFAULT NULL is the implicit default.
                if !value.is_null() {
                    column.default = Some(value);
                }
            }
            ConstraintKind::PrimaryKey => {
                column.is_primary = true;
                column.is_not_null = true;
            }
            ConstraintKind::Unique => column.is_unique = true,
            ConstraintKind::ForeignKey => {
                column.foreign_key = Some(foreign_key_target(constraint, tables, table)?);
            }
        }
    }
    Ok(column)
}

fn apply_table_constraint(
    table: &mut Table,
    tables: &[Table],
    constraint: Node<'_>,
) -> Result<(), ParseError> {
    let Some(kind) = ConstraintKind::of(constraint) else {
        return Ok(());
    };
    match kind {
        ConstraintKind::PrimaryKey => {
            for key in constraint.get("keys").map(Node::string_list).unwrap_or_default() {
                let column = find_column(table, &key, "set primary key")?;
                column.is_primary = true;
                column.is_not_null = true;
            }
        }
        ConstraintKind::ForeignKey => {
            let target = foreign_key_target(constraint, tables, table)?;
            // Only the first column pair of a composite foreign key is kept.
            let fk_column = tree::non_empty_str(constraint, "fk_attrs.0.String.str")?;
            find_column(table, &fk_column, "set foreign key")?.foreign_key = Some(target);
        }
        ConstraintKind::Unique => {
            let keys = constraint.get("keys").map(Node::string_list).unwrap_or_default();
            apply_unique_columns(table, keys, true, "set unique constraint")?;
        }
        ConstraintKind::NotNull | ConstraintKind::Default => {}
    }
    Ok(())
}

/// Column assumed when the referenced table's primary key is not known yet.
const IMPLICIT_KEY_COLUMN: &str = "id";

/// `REFERENCES t (c)`, or `REFERENCES t` pointing at `t`'s primary key.
///
/// Without a column list the key is looked up in the table being created
/// (self reference) and the tables walked so far.
fn foreign_key_target(
    constraint: Node<'_>,
    tables: &[Table],
    current: &Table,
) -> Result<ForeignKey, ParseError> {
    let table = tree::non_empty_str(constraint, "pktable.RangeVar.relname")?;
    let column = match constraint.get("pk_attrs") {
        Some(attrs) => tree::non_empty_str(attrs, "0.String.str")
            .map_err(|_| ParseError::missing("pk_attrs.0.String.str"))?,
        None => std::iter::once(current)
            .chain(tables)
            .filter(|t| t.name == table)
            .flat_map(|t| &t.columns)
            .find(|c| c.is_primary)
            .map_or_else(|| IMPLICIT_KEY_COLUMN.to_string(), |c| c.name.clone()),
    };
    Ok(ForeignKey { table, column })
}

fn apply_index_stmt(tables: &mut [Table], stmt: Node<'_>) -> Result<(), ParseError> {
    let table_name = tree::relation_name(stmt)?;
    let table = tables
        .iter_mut()
        .find(|t| t.name == table_name)
        .ok_or_else(|| ParseError::UnknownTable {
            table: table_name.clone(),
            purpose: "create index",
        })?;

    let is_unique = stmt.get("unique").is_some_and(Node::as_bool);
    let columns: Vec<String> = stmt
        .get("indexParams")
        .into_iter()
        .flat_map(Node::items)
        .filter_map(|param| param.get("IndexElem.name").and_then(Node::as_str))
        .map(str::to_string)
        .collect();

    if columns.is_empty() {
        return Err(ParseError::missing("indexParams.IndexElem.name"));
    }
    debug!(table = %table.name, ?columns, is_unique, "parsed CREATE INDEX");
    apply_unique_columns(table, columns, is_unique, "create index")
}

/// One column marks the column itself; several columns become an [`Index`].
fn apply_unique_columns(
    table: &mut Table,
    columns: Vec<String>,
    is_unique: bool,
    purpose: &'static str,
) -> Result<(), ParseError> {
    if columns.len() > 1 {
        table.indexes.push(Index { columns, is_unique });
    } else if let Some(column) = columns.first() {
        find_column(table, column, purpose)?.is_unique |= is_unique;
    }
    Ok(())
}

fn find_column<'t>(
    table: &'t mut Table,
    column: &str,
    purpose: &'static str,
) -> Result<&'t mut Column, ParseError> {
    let table_name = table.name.clone();
    table
        .column_mut(column)
        .ok_or_else(|| ParseError::UnknownColumn {
            table: table_name,
            column: column.to_string(),
            purpose,
        })
}
