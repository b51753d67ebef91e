use std::collections::BTreeSet;

use crate::generator::schema_generator::SchemaFile;

const ENT_IMPORT: &str = "entgo.io/ent";
const SCHEMA_IMPORT: &str = "entgo.io/ent/schema";
const FIELD_IMPORT: &str = "entgo.io/ent/schema/field";
const INDEX_IMPORT: &str = "entgo.io/ent/schema/index";

/// Render a schema record as an ent schema Go source file.
///
/// Continuation lines of chained declarations are indented one level deeper
/// than the declaration itself, the way `gofmt` lays out builder chains.
pub fn render_schema(file: &SchemaFile) -> String {
    let name = &file.schema_name;
    let mut out = String::new();

    out.push_str("package schema\n\n");
    out.push_str(&render_imports(file));

    out.push_str(&format!(
        "\n// {name} holds the schema definition for the {name} entity.\n\
         type {name} struct {{\n\tent.Schema\n}}\n"
    ));

    if !file.annotations.is_empty() {
        out.push_str(&render_method(
            name,
            "Annotations",
            "schema.Annotation",
            &file.annotations,
        ));
    }
    out.push_str(&render_method(name, "Fields", "ent.Field", &file.fields));
    if !file.indexes.is_empty() {
        out.push_str(&render_method(name, "Indexes", "ent.Index", &file.indexes));
    }
    out
}

fn render_imports(file: &SchemaFile) -> String {
    let mut imports: BTreeSet<String> = BTreeSet::new();
    imports.insert(quote_import(ENT_IMPORT));
    if !file.fields.is_empty() || !file.annotations.is_empty() {
        imports.insert(quote_import(FIELD_IMPORT));
    }
    if !file.annotations.is_empty() {
        imports.insert(quote_import(SCHEMA_IMPORT));
    }
    if !file.indexes.is_empty() {
        imports.insert(quote_import(INDEX_IMPORT));
    }
    imports.extend(file.imports.iter().map(|i| quote_import(i)));

    let mut out = String::from("import (\n");
    for import in imports {
        out.push('\t');
        out.push_str(&import);
        out.push('\n');
    }
    out.push_str(")\n");
    out
}

/// Configured imports may already carry an alias (`decimal "github.com/..."`).
fn quote_import(import: &str) -> String {
    if import.contains('"') {
        import.to_string()
    } else {
        format!("\"{import}\"")
    }
}

fn render_method(schema: &str, method: &str, item_type: &str, items: &[String]) -> String {
    let mut out = format!(
        "\n// {method} of the {schema}.\nfunc ({schema}) {method}() []{item_type} {{\n\treturn []{item_type}{{\n"
    );
    for item in items.iter().filter(|item| !item.is_empty()) {
        for (i, line) in item.lines().enumerate() {
            out.push_str(if i == 0 { "\t\t" } else { "\t\t\t" });
            out.push_str(line);
            out.push('\n');
        }
        // Trailing comma after the last line of each chained declaration.
        out.pop();
        out.push_str(",\n");
    }
    out.push_str("\t}\n}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_schema() -> SchemaFile {
        SchemaFile {
            file_stem: "user".to_string(),
            imports: vec!["entgo.io/ent/dialect/entsql".to_string()],
            schema_name: "User".to_string(),
            annotations: Vec::new(),
            fields: vec![
                "field.String(\"email\").\nUnique()".to_string(),
                "field.Time(\"created_at\")".to_string(),
            ],
            indexes: Vec::new(),
        }
    }

    #[test]
    fn renders_fields_with_indented_chains() {
        let rendered = render_schema(&user_schema());
        let expected = "package schema

import (
\t\"entgo.io/ent\"
\t\"entgo.io/ent/dialect/entsql\"
\t\"entgo.io/ent/schema/field\"
)

// User holds the schema definition for the User entity.
type User struct {
\tent.Schema
}

// Fields of the User.
func (User) Fields() []ent.Field {
\treturn []ent.Field{
\t\tfield.String(\"email\").
\t\t\tUnique(),
\t\tfield.Time(\"created_at\"),
\t}
}
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn indexes_and_annotations_pull_their_imports() {
        let mut file = user_schema();
        file.annotations = vec![r#"field.ID("a", "b")"#.to_string()];
        file.indexes = vec![r#"index.Fields("a", "b")"#.to_string()];
        let rendered = render_schema(&file);

        assert!(rendered.contains("\t\"entgo.io/ent/schema\"\n"));
        assert!(rendered.contains("\t\"entgo.io/ent/schema/index\"\n"));
        assert!(rendered.contains("func (User) Annotations() []schema.Annotation {"));
        assert!(rendered.contains("\t\tindex.Fields(\"a\", \"b\"),\n"));
    }

    #[test]
    fn aliased_imports_are_kept_verbatim() {
        assert_eq!(
            quote_import(r#"decimal "github.com/shopspring/decimal""#),
            r#"decimal "github.com/shopspring/decimal""#
        );
        assert_eq!(quote_import("github.com/google/uuid"), r#""github.com/google/uuid""#);
    }
}
