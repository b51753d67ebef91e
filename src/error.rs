use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while walking the parse tree.
///
/// Every variant is fatal for the run: the model cannot be trusted once the
/// tree has an unexpected shape or a statement references something that was
/// not declared earlier.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The parse tree document is not valid JSON.
    #[error("invalid parse tree JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A node required by the statement shape is absent or empty.
    #[error("parse tree is missing `{path}`")]
    MissingField {
        /// Dotted path of the missing node, relative to its statement.
        path: String,
    },

    /// A default expression kind outside the supported set.
    #[error("unsupported default expression `{kind}`")]
    UnsupportedExpression {
        /// Tag of the expression node.
        kind: String,
    },

    /// A `SQLValueFunction` operator code outside the known table.
    #[error("SQLValueFunction op {op} is not supported")]
    UnsupportedValueFunction {
        /// Operator code as it appeared in the tree.
        op: String,
    },

    /// A statement references a table that was not created before it.
    #[error("cannot find table `{table}` to {purpose}")]
    UnknownTable {
        /// Referenced table name.
        table: String,
        /// What the statement was trying to do.
        purpose: &'static str,
    },

    /// A constraint or index references a column the table does not declare.
    #[error("cannot find column `{column}` in table `{table}` to {purpose}")]
    UnknownColumn {
        /// Table being modified.
        table: String,
        /// Referenced column name.
        column: String,
        /// What the statement was trying to do.
        purpose: &'static str,
    },
}

impl ParseError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }
}

/// Errors raised while generating declarations for one table.
///
/// These abort only the table being generated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// No `type` mapping exists for the column's type.
    #[error(r#"mapping for "{table}"."{column}" type "{ty}" not found in the configuration"#)]
    MissingTypeMapping {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Normalized column type.
        ty: String,
    },

    /// A column is both unique and carries a default value.
    #[error(r#""{table}"."{column}" is unique, it cannot have a default value"#)]
    UniqueWithDefault {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },
}

/// Errors raised while loading the YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        /// Configuration path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`crate::config::Config`].
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        /// Configuration path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Errors raised while writing rendered schema files.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The file stem derived from a table name is not a single file name.
    #[error("invalid output name '{name}': {reason}")]
    InvalidName {
        /// Offending file stem.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Two tables map to the same file stem.
    #[error("tables map to the same output file '{name}.go'")]
    DuplicateName {
        /// Shared file stem.
        name: String,
    },

    /// The formatter program could not be started.
    #[error("failed to run {program}: {source}")]
    FormatSpawn {
        /// Formatter program.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The formatter rejected the generated files.
    #[error("{program} failed: {stderr}")]
    Format {
        /// Formatter program.
        program: String,
        /// Formatter diagnostics.
        stderr: String,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        /// Output directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A schema file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
