#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use pg2ent::config::Config;
use pg2ent::model::Table;
use pg2ent::parser::ddl_walker;
use serde_json::{json, Value};

pub(crate) fn fixture_dir(fixture: &str) -> PathBuf {
    PathBuf::from("tests/fixtures").join(fixture)
}

pub(crate) fn load_fixture_tables(fixture: &str) -> Vec<Table> {
    let path = fixture_dir(fixture).join("parse_tree.json");
    let json = std::fs::read_to_string(path).expect("fixture parse tree should be readable");
    ddl_walker::parse_tree_json(&json).expect("fixture parse tree should walk")
}

pub(crate) fn load_fixture_config(fixture: &str) -> Config {
    Config::load(&fixture_dir(fixture).join("pg2ent.yaml")).expect("fixture config should load")
}

pub(crate) fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{nanos}"))
}

/// Wrap statement nodes in the top-level `RawStmt` list.
pub(crate) fn tree(stmts: Vec<Value>) -> Value {
    Value::Array(
        stmts
            .into_iter()
            .map(|stmt| json!({"RawStmt": {"stmt": stmt}}))
            .collect(),
    )
}

pub(crate) fn create_table(name: &str, elements: Vec<Value>) -> Value {
    json!({"CreateStmt": {
        "relation": {"RangeVar": {"relname": name, "inh": true, "relpersistence": "p"}},
        "tableElts": elements,
        "oncommit": 0
    }})
}

pub(crate) fn type_name(ty: &str) -> Value {
    json!({"TypeName": {
        "names": [{"String": {"str": "pg_catalog"}}, {"String": {"str": ty}}],
        "typemod": -1
    }})
}

pub(crate) fn column(name: &str, ty: &str, constraints: Vec<Value>) -> Value {
    let mut def = json!({
        "colname": name,
        "typeName": type_name(ty),
        "is_local": true
    });
    if !constraints.is_empty() {
        def["constraints"] = Value::Array(constraints);
    }
    json!({"ColumnDef": def})
}

fn strings(names: &[&str]) -> Value {
    names
        .iter()
        .map(|name| json!({"String": {"str": name}}))
        .collect()
}

pub(crate) fn not_null() -> Value {
    json!({"Constraint": {"contype": 1}})
}

pub(crate) fn primary_key() -> Value {
    json!({"Constraint": {"contype": 5}})
}

pub(crate) fn unique() -> Value {
    json!({"Constraint": {"contype": 6}})
}

pub(crate) fn default(expr: Value) -> Value {
    json!({"Constraint": {"contype": 2, "raw_expr": expr}})
}

pub(crate) fn references(table: &str, column: &str) -> Value {
    json!({"Constraint": {
        "contype": 8,
        "pktable": {"RangeVar": {"relname": table}},
        "pk_attrs": strings(&[column])
    }})
}

/// `REFERENCES <table>` without a column list.
pub(crate) fn references_table(table: &str) -> Value {
    json!({"Constraint": {
        "contype": 8,
        "pktable": {"RangeVar": {"relname": table}}
    }})
}

pub(crate) fn table_primary_key(keys: &[&str]) -> Value {
    json!({"Constraint": {"contype": 5, "keys": strings(keys)}})
}

pub(crate) fn table_unique(keys: &[&str]) -> Value {
    json!({"Constraint": {"contype": 6, "keys": strings(keys)}})
}

pub(crate) fn table_foreign_key(column: &str, table: &str, target: &str) -> Value {
    json!({"Constraint": {
        "contype": 8,
        "pktable": {"RangeVar": {"relname": table}},
        "fk_attrs": strings(&[column]),
        "pk_attrs": strings(&[target])
    }})
}

pub(crate) fn index_stmt(table: &str, columns: &[&str], is_unique: bool) -> Value {
    let params: Vec<Value> = columns
        .iter()
        .map(|name| json!({"IndexElem": {"name": name, "ordering": 0}}))
        .collect();
    let mut stmt = json!({
        "relation": {"RangeVar": {"relname": table}},
        "accessMethod": "btree",
        "indexParams": params
    });
    if is_unique {
        stmt["unique"] = Value::Bool(true);
    }
    json!({"IndexStmt": stmt})
}

pub(crate) fn string_const(value: &str) -> Value {
    json!({"A_Const": {"val": {"String": {"str": value}}}})
}

pub(crate) fn integer_const(value: i64) -> Value {
    json!({"A_Const": {"val": {"Integer": {"ival": value}}}})
}

pub(crate) fn func_call(segments: &[&str]) -> Value {
    json!({"FuncCall": {"funcname": strings(segments)}})
}

pub(crate) fn type_cast(arg: Value, ty: &str) -> Value {
    json!({"TypeCast": {"arg": arg, "typeName": type_name(ty)}})
}

pub(crate) fn value_function(op: i64, typmod: i64) -> Value {
    json!({"SQLValueFunction": {"op": op, "typmod": typmod}})
}
