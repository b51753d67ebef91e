use tracing::info;

use crate::config::Config;
use crate::error::GenerateError;
use crate::generator::context::GenerateContext;
use crate::generator::override_rules;
use crate::model::{Column, Table};

/// Column type that keeps an `id` primary key in the generated fields.
pub const UUID_TYPE: &str = "uuid";
/// Import required by raw SQL default annotations.
pub const ENTSQL_IMPORT: &str = "entgo.io/ent/dialect/entsql";

const DEFAULT_TEMPLATE: &str = "Default(%s)";
const NILLABLE: &str = "Nillable()";
const OPTIONAL: &str = "Optional()";
const UNIQUE: &str = "Unique()";
const IMMUTABLE: &str = "Immutable()";

/// Separator between chained builder calls.
pub const CHAIN_SEPARATOR: &str = ".\n";

/// Result of generating one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// The column is the implicit integer `id` and gets no declaration.
    Skipped,
    /// Chained field declaration.
    Declared(String),
}

/// Replace the first `%s` placeholder of a template.
pub fn substitute(template: &str, value: &str) -> String {
    template.replacen("%s", value, 1)
}

/// Generate the field declaration for one column.
///
/// Override rules replace the whole declaration. Otherwise the type mapping
/// picks a builder and the column's constraints append modifiers in a fixed
/// order: nullability, default, uniqueness, immutability.
pub fn generate_field(
    ctx: &mut GenerateContext,
    config: &Config,
    table: &Table,
    column: &Column,
) -> Result<FieldOutcome, GenerateError> {
    if column.name == "id" && column.is_primary && column.ty != UUID_TYPE {
        return Ok(FieldOutcome::Skipped);
    }

    if let Some(rule) = override_rules::first_match(&config.overrides, column) {
        info!(
            table = %table.name,
            column = %column.name,
            rule = %rule.name,
            "override matched"
        );
        ctx.add_imports(&rule.imports);
        return Ok(FieldOutcome::Declared(substitute(&rule.with, &column.name)));
    }

    let builder = config
        .types
        .get(&column.ty)
        .ok_or_else(|| GenerateError::MissingTypeMapping {
            table: table.name.clone(),
            column: column.name.clone(),
            ty: column.ty.clone(),
        })?;

    let mut fragments: Vec<String> = Vec::new();
    let mut default_template = DEFAULT_TEMPLATE;

    match config.define.get(builder) {
        Some(define) => {
            let field = define.field.as_deref().unwrap_or(builder);
            fragments.push(substitute(field, &column.name));
            if let Some(go_type) = non_empty(define.go_type.as_deref()) {
                fragments.push(format!("GoType({go_type})"));
            }
            if let Some(schema_type) = non_empty(define.schema_type.as_deref()) {
                fragments.push(format!("SchemaType({schema_type})"));
            }
            if let Some(template) = non_empty(define.default.as_deref()) {
                default_template = template;
            }
            ctx.add_imports(&define.imports);
        }
        None => fragments.push(substitute(builder, &column.name)),
    }

    if !column.is_not_null {
        fragments.push(NILLABLE.to_string());
        fragments.push(OPTIONAL.to_string());
    }

    if column.default.is_some() && column.is_unique {
        return Err(GenerateError::UniqueWithDefault {
            table: table.name.clone(),
            column: column.name.clone(),
        });
    }

    // Primary keys are never optional; their defaults are left to the database.
    if let Some(default) = column.default.as_ref().filter(|_| !column.is_primary) {
        if !fragments.iter().any(|f| f == OPTIONAL) {
            fragments.push(OPTIONAL.to_string());
        }
        if !config.rule.no_default {
            fragments.push(substitute(default_template, default.literal()));
        }
        if let Some(raw) = default.raw_sql() {
            ctx.add_import(ENTSQL_IMPORT);
            fragments.push(raw_default_annotation(&raw));
        }
    }

    if column.is_unique {
        fragments.push(UNIQUE.to_string());
    }
    if config.rule.immutable_columns.contains(&column.name) {
        fragments.push(IMMUTABLE.to_string());
    }

    Ok(FieldOutcome::Declared(fragments.join(CHAIN_SEPARATOR)))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn raw_default_annotation(raw: &str) -> String {
    format!(
        "Annotations(&entsql.Annotation{{\n\tDefault: {},\n}})",
        go_string(raw)
    )
}

/// Interpreted Go string literal; non-ASCII text is kept as UTF-8.
fn go_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DefaultValue;

    fn config() -> Config {
        Config::from_yaml_str(
            r#"
type:
  int8: field.Int64("%s")
  text: field.String("%s")
  timestamptz: field.Time("%s")
"#,
        )
        .unwrap()
    }

    fn declared(outcome: FieldOutcome) -> String {
        match outcome {
            FieldOutcome::Declared(decl) => decl,
            FieldOutcome::Skipped => panic!("expected a declaration"),
        }
    }

    #[test]
    fn nullable_column_gets_nillable_and_optional() {
        let mut ctx = GenerateContext::new();
        let table = Table::new("users");
        let column = Column::new("nickname", "text");
        let decl = declared(generate_field(&mut ctx, &config(), &table, &column).unwrap());
        assert_eq!(decl, "field.String(\"nickname\").\nNillable().\nOptional()");
    }

    #[test]
    fn function_default_adds_raw_annotation_and_import() {
        let mut ctx = GenerateContext::new();
        let table = Table::new("users");
        let mut column = Column::new("created_at", "timestamptz");
        column.is_not_null = true;
        column.default = Some(DefaultValue::FunctionCall {
            name: "now".to_string(),
        });

        let decl = declared(generate_field(&mut ctx, &config(), &table, &column).unwrap());

        assert_eq!(
            decl,
            "field.Time(\"created_at\").\nOptional().\nDefault(now).\n\
             Annotations(&entsql.Annotation{\n\tDefault: \"now()\",\n})"
        );
        assert_eq!(ctx.imports().collect::<Vec<_>>(), vec![ENTSQL_IMPORT]);
    }

    #[test]
    fn literal_default_has_no_annotation() {
        let mut ctx = GenerateContext::new();
        let table = Table::new("users");
        let mut column = Column::new("login_count", "int8");
        column.is_not_null = true;
        column.default = Some(DefaultValue::Literal {
            tag: "Integer".to_string(),
            text: "0".to_string(),
        });

        let decl = declared(generate_field(&mut ctx, &config(), &table, &column).unwrap());

        assert_eq!(decl, "field.Int64(\"login_count\").\nOptional().\nDefault(0)");
        assert_eq!(ctx.imports().count(), 0);
    }

    #[test]
    fn optional_is_not_repeated_for_nullable_defaults() {
        let mut ctx = GenerateContext::new();
        let table = Table::new("users");
        let mut column = Column::new("status", "text");
        column.default = Some(DefaultValue::Literal {
            tag: "String".to_string(),
            text: "\"active\"".to_string(),
        });

        let decl = declared(generate_field(&mut ctx, &config(), &table, &column).unwrap());

        assert_eq!(decl.matches(OPTIONAL).count(), 1);
        assert!(decl.ends_with("Default(\"active\")"));
    }

    #[test]
    fn primary_key_default_is_left_to_the_database() {
        let mut ctx = GenerateContext::new();
        let table = Table::new("users");
        let mut column = Column::new("id", UUID_TYPE);
        column.is_primary = true;
        column.is_not_null = true;
        column.default = Some(DefaultValue::FunctionCall {
            name: "gen_random_uuid".to_string(),
        });
        let config = Config::from_yaml_str("type:\n  uuid: field.UUID(\"%s\", uuid.UUID{})\n").unwrap();

        let decl = declared(generate_field(&mut ctx, &config, &table, &column).unwrap());

        assert_eq!(decl, "field.UUID(\"id\", uuid.UUID{})");
        assert_eq!(ctx.imports().count(), 0);
    }

    #[test]
    fn unique_primary_key_with_default_still_conflicts() {
        let mut ctx = GenerateContext::new();
        let table = Table::new("users");
        let mut column = Column::new("code", "text");
        column.is_primary = true;
        column.is_unique = true;
        column.default = Some(DefaultValue::Literal {
            tag: "String".to_string(),
            text: "\"x\"".to_string(),
        });

        let err = generate_field(&mut ctx, &config(), &table, &column).unwrap_err();

        assert!(matches!(err, GenerateError::UniqueWithDefault { .. }));
    }

    #[test]
    fn raw_default_is_a_go_string_literal() {
        assert_eq!(
            raw_default_annotation("concat('é', \"x\")"),
            "Annotations(&entsql.Annotation{\n\tDefault: \"concat('é', \\\"x\\\")\",\n})"
        );
        assert_eq!(go_string("a\\b\n"), r#""a\\b\n""#);
        assert_eq!(go_string("\u{7}"), r#""\u0007""#);
    }

    #[test]
    fn substitute_replaces_first_placeholder_only() {
        assert_eq!(substitute("f(\"%s\", \"%s\")", "a"), "f(\"a\", \"%s\")");
    }
}
