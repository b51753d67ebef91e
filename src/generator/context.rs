use std::collections::BTreeSet;

/// Mutable state scoped to the generation of one table.
///
/// Field and index builders register the imports their declarations need;
/// the set is drained into the table's [`super::schema_generator::SchemaFile`].
#[derive(Debug, Clone, Default)]
pub struct GenerateContext {
    imports: BTreeSet<String>,
}

impl GenerateContext {
    /// Start with no imports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one import path.
    pub fn add_import(&mut self, import: impl Into<String>) {
        self.imports.insert(import.into());
    }

    /// Register every import path in `imports`.
    pub fn add_imports<I, S>(&mut self, imports: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for import in imports {
            self.add_import(import.as_ref());
        }
    }

    /// Registered imports, sorted and deduplicated.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    /// Consume the context into its import list.
    pub fn into_imports(self) -> Vec<String> {
        self.imports.into_iter().collect()
    }
}
