use crate::error::ParseError;
use crate::model::DefaultValue;
use crate::parser::tree::{self, Node};

/// `SQLValueFunction` keyword templates indexed by operator code.
///
/// `%s` is replaced by the precision modifier (`typmod`).
pub const VALUE_FUNCTION_TEMPLATES: [&str; 9] = [
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIME(%s)",
    "CURRENT_TIMESTAMP",
    "CURRENT_TIMESTAMP(%s)",
    "LOCALTIME",
    "LOCALTIME(%s)",
    "LOCALTIMESTAMP",
    "LOCALTIMESTAMP(%s)",
];

/// Resolve a tagged default expression (`raw_expr`) into a [`DefaultValue`].
///
/// Function arguments are not parsed: `DEFAULT gen_random_uuid()` and
/// `DEFAULT nextval('seq')` both keep only the function name.
pub fn resolve_default(kind: &str, expr: Node<'_>) -> Result<DefaultValue, ParseError> {
    match kind {
        "A_Const" => resolve_constant(expr),
        "FuncCall" => {
            let name = expr
                .require("funcname")?
                .items()
                .last()
                .and_then(Node::string_value)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ParseError::missing("funcname"))?;
            Ok(DefaultValue::FunctionCall {
                name: name.to_string(),
            })
        }
        "TypeCast" => {
            let (inner_kind, inner) = expr
                .require("arg")?
                .tagged()
                .ok_or_else(|| ParseError::missing("arg"))?;
            let inner = resolve_default(inner_kind, inner)?;
            let cast_type = tree::type_name(expr.require("typeName")?)?;
            Ok(DefaultValue::TypeCast {
                inner: Box::new(inner),
                cast_type,
            })
        }
        "SQLValueFunction" => resolve_value_function(expr),
        other => Err(ParseError::UnsupportedExpression {
            kind: other.to_string(),
        }),
    }
}

fn resolve_constant(expr: Node<'_>) -> Result<DefaultValue, ParseError> {
    let (tag, scalar) = expr
        .require("val")?
        .tagged()
        .ok_or_else(|| ParseError::missing("val"))?;
    let text = scalar.last_field().map(Node::raw).unwrap_or_default();
    Ok(DefaultValue::Literal {
        tag: tag.to_string(),
        text,
    })
}

fn resolve_value_function(expr: Node<'_>) -> Result<DefaultValue, ParseError> {
    let op = expr.require("op")?;
    let template = op
        .as_i64()
        .and_then(|code| usize::try_from(code).ok())
        .and_then(|code| VALUE_FUNCTION_TEMPLATES.get(code))
        .ok_or_else(|| ParseError::UnsupportedValueFunction { op: op.raw() })?;
    let precision = expr
        .get("typmod")
        .and_then(Node::as_i64)
        .map(|typmod| typmod.to_string())
        .unwrap_or_default();
    Ok(DefaultValue::SqlValueFunction {
        keyword: template.replacen("%s", &precision, 1),
    })
}
