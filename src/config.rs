use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Generation settings, usually loaded from `pg2ent.yaml`.
///
/// ```yaml
/// out-dir: ent/schema
/// rule:
///   immutable-columns: [created_at]
/// type:
///   int8: field.Int64("%s")
///   text: field.String("%s")
/// overrides:
///   - name: json payloads
///     matchers: [{ prop: Type, value: jsonb }]
///     with: field.JSON("%s", map[string]any{})
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// pg_query JSON parse tree to read when none is given on the command line.
    pub parse_tree: Option<PathBuf>,
    /// Directory the schema files are written to.
    pub out_dir: Option<PathBuf>,
    /// Run `gofmt -w` over the written files.
    pub format: bool,
    /// Global generation switches.
    pub rule: RuleConfig,
    /// Column type -> field builder template (`%s` is the column name).
    #[serde(rename = "type")]
    pub types: BTreeMap<String, String>,
    /// Builder template -> refinements applied whenever that builder is chosen.
    pub define: BTreeMap<String, DefineType>,
    /// Ordered override rules; the first matching rule wins.
    pub overrides: Vec<OverrideRule>,
}

/// Global generation switches.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct RuleConfig {
    /// Do not emit `Default(..)` modifiers.
    pub no_default: bool,
    /// Columns that always get `Immutable()`.
    pub immutable_columns: BTreeSet<String>,
}

/// Refinement of a builder template.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct DefineType {
    /// Replacement builder template (`%s` is the column name).
    pub field: Option<String>,
    /// Imports required by the templates.
    pub imports: Vec<String>,
    /// Argument for a `GoType(..)` modifier.
    pub go_type: Option<String>,
    /// Argument for a `SchemaType(..)` modifier.
    pub schema_type: Option<String>,
    /// Replacement for the `Default(%s)` template.
    pub default: Option<String>,
}

/// A user rule replacing the whole declaration of matching columns.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OverrideRule {
    /// Rule name, used in logs.
    pub name: String,
    /// All matchers must hold for the rule to apply.
    #[serde(default)]
    pub matchers: Vec<Matcher>,
    /// Declaration template (`%s` is the column name).
    pub with: String,
    /// Imports required by the template.
    #[serde(default)]
    pub imports: Vec<String>,
}

/// Compares one column property against an expected value.
///
/// A missing or `null` value matches an absent property.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Matcher {
    /// Property to read from the column.
    pub prop: ColumnProperty,
    /// Expected value.
    #[serde(default)]
    pub value: Option<MatchValue>,
}

/// Column properties an override rule can match on.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum ColumnProperty {
    /// Column name.
    #[serde(alias = "name")]
    Name,
    /// Normalized column type.
    #[serde(alias = "type")]
    Type,
    /// Primary key membership.
    #[serde(alias = "is-primary")]
    IsPrimary,
    /// `NOT NULL`.
    #[serde(alias = "is-not-null")]
    IsNotNull,
    /// Single-column uniqueness.
    #[serde(alias = "is-unique")]
    IsUnique,
    /// Presence of a foreign key.
    #[serde(alias = "foreign-key")]
    ForeignKey,
    /// Presence of a default value.
    #[serde(alias = "DefaultType", alias = "default")]
    Default,
}

/// Expected value of a [`Matcher`].
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MatchValue {
    /// Flag or presence check.
    Flag(bool),
    /// Name or type comparison.
    Text(String),
}

impl Config {
    /// Read and parse a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
