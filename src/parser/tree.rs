use serde_json::Value;

use crate::error::ParseError;

/// Borrowed view of one node of the pg_query JSON document.
///
/// The walker never matches on the JSON directly; every lookup goes through a
/// dotted path (`relation.RangeVar.relname`, `keys.0.String.str`) so the tree
/// layout stays in one place.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    value: &'a Value,
}

impl<'a> Node<'a> {
    /// Wrap a JSON value.
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// The wrapped JSON value.
    pub fn value(self) -> &'a Value {
        self.value
    }

    /// Follow a dotted path; numeric segments index arrays.
    pub fn get(self, path: &str) -> Option<Node<'a>> {
        let mut current = self.value;
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(Node::new(current))
    }

    /// Like [`Node::get`] but a missing node is a structural error.
    pub fn require(self, path: &str) -> Result<Node<'a>, ParseError> {
        self.get(path).ok_or_else(|| ParseError::missing(path))
    }

    /// Split a tagged node `{"Tag": {...}}` into its tag and body.
    pub fn tagged(self) -> Option<(&'a str, Node<'a>)> {
        match self.value {
            Value::Object(map) => map.iter().next().map(|(k, v)| (k.as_str(), Node::new(v))),
            _ => None,
        }
    }

    /// Items of an array node; empty for anything else.
    pub fn items(self) -> impl Iterator<Item = Node<'a>> {
        self.value
            .as_array()
            .into_iter()
            .flatten()
            .map(Node::new)
    }

    /// Last field of an object node, in key order.
    pub fn last_field(self) -> Option<Node<'a>> {
        self.value.as_object()?.values().last().map(Node::new)
    }

    /// String content, or `None` for non-string nodes.
    pub fn as_str(self) -> Option<&'a str> {
        self.value.as_str()
    }

    /// Integer content; numeric strings are accepted.
    pub fn as_i64(self) -> Option<i64> {
        match self.value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Boolean content; anything but `true` reads as `false`.
    pub fn as_bool(self) -> bool {
        self.value.as_bool().unwrap_or(false)
    }

    /// Node serialized back to JSON source text (`"active"`, `42`).
    pub fn raw(self) -> String {
        self.value.to_string()
    }

    /// Content of a `{"String": {"str": ..}}` node.
    pub fn string_value(self) -> Option<&'a str> {
        self.get("String.str")?.as_str()
    }

    /// Contents of every `String` node in an array node, skipping others.
    pub fn string_list(self) -> Vec<String> {
        self.items()
            .filter_map(Node::string_value)
            .map(str::to_string)
            .collect()
    }
}

/// Name of the relation a statement targets (`relation.RangeVar.relname`).
pub fn relation_name(stmt: Node<'_>) -> Result<String, ParseError> {
    non_empty_str(stmt, "relation.RangeVar.relname")
}

/// Last segment of a qualified type name list (`[pg_catalog, int4]` -> `int4`).
pub fn type_name(type_node: Node<'_>) -> Result<String, ParseError> {
    const PATH: &str = "TypeName.names";
    type_node
        .require(PATH)?
        .items()
        .last()
        .and_then(Node::string_value)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ParseError::missing(PATH))
}

/// Required string field that must not be empty.
pub fn non_empty_str(node: Node<'_>, path: &str) -> Result<String, ParseError> {
    node.get(path)
        .and_then(Node::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ParseError::missing(path))
}

/// Constraint codes the walker acts on.
///
/// The numeric values are the pg_query `ConstrType` codes; everything else
/// (`NULL`, `CHECK`, `EXCLUDE`, identity) is ignored by the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `NOT NULL`.
    NotNull,
    /// `DEFAULT <expr>`.
    Default,
    /// `PRIMARY KEY`.
    PrimaryKey,
    /// `UNIQUE`.
    Unique,
    /// `REFERENCES` / `FOREIGN KEY`.
    ForeignKey,
}

impl ConstraintKind {
    /// Map a `contype` code; `None` for codes the walker ignores.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::NotNull),
            2 => Some(Self::Default),
            5 => Some(Self::PrimaryKey),
            6 => Some(Self::Unique),
            8 => Some(Self::ForeignKey),
            _ => None,
        }
    }

    /// Read the kind of a `Constraint` body node.
    pub fn of(constraint: Node<'_>) -> Option<Self> {
        constraint
            .get("contype")
            .and_then(Node::as_i64)
            .and_then(Self::from_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_follows_objects_and_array_indexes() {
        let value = json!({"keys": [{"String": {"str": "id"}}, {"String": {"str": "org_id"}}]});
        let node = Node::new(&value);
        assert_eq!(
            node.get("keys.1.String.str").and_then(Node::as_str),
            Some("org_id")
        );
        assert!(node.get("keys.2").is_none());
        assert!(node.get("keys.x").is_none());
    }

    #[test]
    fn require_reports_the_missing_path() {
        let value = json!({});
        let err = Node::new(&value).require("raw_expr").unwrap_err();
        assert!(matches!(err, ParseError::MissingField { ref path } if path == "raw_expr"));
    }

    #[test]
    fn type_name_keeps_last_segment() {
        let value = json!({"TypeName": {"names": [
            {"String": {"str": "pg_catalog"}},
            {"String": {"str": "int4"}}
        ], "typemod": -1}});
        assert_eq!(type_name(Node::new(&value)).unwrap(), "int4");
    }

    #[test]
    fn type_name_rejects_empty_paths() {
        let value = json!({"TypeName": {"names": []}});
        assert!(type_name(Node::new(&value)).is_err());
    }

    #[test]
    fn constraint_codes_map_to_kinds() {
        assert_eq!(ConstraintKind::from_code(1), Some(ConstraintKind::NotNull));
        assert_eq!(ConstraintKind::from_code(2), Some(ConstraintKind::Default));
        assert_eq!(ConstraintKind::from_code(5), Some(ConstraintKind::PrimaryKey));
        assert_eq!(ConstraintKind::from_code(6), Some(ConstraintKind::Unique));
        assert_eq!(ConstraintKind::from_code(8), Some(ConstraintKind::ForeignKey));
        assert_eq!(ConstraintKind::from_code(4), None);
    }

    #[test]
    fn raw_keeps_json_source_text() {
        let value = json!({"str": "active"});
        assert_eq!(Node::new(&value).last_field().unwrap().raw(), "\"active\"");
    }
}
