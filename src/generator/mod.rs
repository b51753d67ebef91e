/// Per-table generation state (imports).
pub mod context;
/// Column -> field declaration rules.
pub mod field_rules;
/// Ordered override rule matching.
pub mod override_rules;
/// Table -> schema record assembly.
pub mod schema_generator;
