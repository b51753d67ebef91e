//! Semantic schema model built from the parse tree.
//!
//! Tables, columns and indexes are created and mutated only while the
//! statements are walked. [`Table::finalize`] freezes the index order; after
//! that the model is read-only input for the generator.

/// A table declared by a `CREATE TABLE` statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Relation name as written in the statement.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Composite indexes; unique ones first once finalized.
    pub indexes: Vec<Index>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Look up a declared column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Mutable lookup used while constraints and indexes are applied.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Stable-sort indexes so unique indexes precede non-unique ones.
    pub fn finalize(&mut self) {
        self.indexes.sort_by_key(|index| !index.is_unique);
    }
}

/// A column definition plus the constraints applied to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Last segment of the declared type path (`pg_catalog.int4` -> `int4`).
    pub ty: String,
    /// Part of the primary key.
    pub is_primary: bool,
    /// Declared `NOT NULL`, or implied by the primary key.
    pub is_not_null: bool,
    /// Covered by a single-column unique constraint or index.
    pub is_unique: bool,
    /// Resolved `DEFAULT` expression.
    pub default: Option<DefaultValue>,
    /// Referenced table and column.
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    /// Create a nullable column without constraints.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ..Self::default()
        }
    }
}

/// Target of a foreign key.
///
/// Only the first column pair of a multi-column foreign key is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Referenced table.
    pub table: String,
    /// Referenced column.
    pub column: String,
}

/// An index spanning more than one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Indexed columns in statement order.
    pub columns: Vec<String>,
    /// Declared `UNIQUE`.
    pub is_unique: bool,
}

/// A resolved `DEFAULT` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Constant kept as its source text; `tag` is the scalar kind (`String`, `Integer`, ...).
    Literal {
        /// Scalar node tag.
        tag: String,
        /// Verbatim value text.
        text: String,
    },
    /// Function call; arguments are not captured.
    FunctionCall {
        /// Function name without schema qualification.
        name: String,
    },
    /// Cast of another resolved default to `cast_type`.
    TypeCast {
        /// The expression being cast.
        inner: Box<DefaultValue>,
        /// Target type name.
        cast_type: String,
    },
    /// SQL keyword function such as `CURRENT_TIMESTAMP(3)`.
    SqlValueFunction {
        /// Rendered keyword, precision included.
        keyword: String,
    },
}

impl DefaultValue {
    /// Text substituted into the default template.
    pub fn literal(&self) -> &str {
        match self {
            Self::Literal { text, .. } => text,
            Self::FunctionCall { name } => name,
            Self::TypeCast { inner, .. } => inner.literal(),
            Self::SqlValueFunction { keyword } => keyword,
        }
    }

    /// Type the default was declared with.
    pub fn declared_type(&self) -> &str {
        match self {
            Self::Literal { tag, .. } => tag,
            Self::FunctionCall { .. } => "Func",
            Self::TypeCast { cast_type, .. } => cast_type,
            Self::SqlValueFunction { .. } => "SQLValueFunction",
        }
    }

    /// SQL expression the database must evaluate itself, if any.
    pub fn raw_sql(&self) -> Option<String> {
        match self {
            Self::FunctionCall { name } => Some(format!("{name}()")),
            Self::SqlValueFunction { keyword } => Some(keyword.clone()),
            Self::Literal { .. } | Self::TypeCast { .. } => None,
        }
    }

    /// True for `NULL` and casts of `NULL`.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Literal { tag, .. } => tag == "Null",
            Self::TypeCast { inner, .. } => inner.is_null(),
            Self::FunctionCall { .. } | Self::SqlValueFunction { .. } => false,
        }
    }
}
