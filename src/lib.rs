//! Generate ent schema declarations from PostgreSQL table-definition statements.
//!
//! The pipeline reads the pg_query JSON parse tree of a DDL script, builds a
//! [`model::Table`] list, and turns each table into a
//! [`generator::schema_generator::SchemaFile`] through the configured rules.
#![warn(missing_docs)]

/// YAML generation settings: type mappings, refinements and override rules.
pub mod config;
/// Error types for each pipeline stage.
pub mod error;
/// Column -> field declaration rules and per-table assembly.
pub mod generator;
/// Tables, columns, indexes and resolved defaults.
pub mod model;
/// Inflection and identifier case conversion.
pub mod naming;
/// Rendering and writing schema files.
pub mod output;
/// Parse tree walking and default expression resolution.
pub mod parser;
