/// Writes rendered schema files to the output directory.
pub mod formatter;
/// Renders a schema record as ent schema Go source.
pub mod template;
