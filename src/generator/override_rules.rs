use crate::config::{ColumnProperty, MatchValue, Matcher, OverrideRule};
use crate::model::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyValue<'a> {
    Text(&'a str),
    Flag(bool),
    Present(bool),
}

impl ColumnProperty {
    fn read(self, column: &Column) -> PropertyValue<'_> {
        match self {
            Self::Name => PropertyValue::Text(&column.name),
            Self::Type => PropertyValue::Text(&column.ty),
            Self::IsPrimary => PropertyValue::Flag(column.is_primary),
            Self::IsNotNull => PropertyValue::Flag(column.is_not_null),
            Self::IsUnique => PropertyValue::Flag(column.is_unique),
            Self::ForeignKey => PropertyValue::Present(column.foreign_key.is_some()),
            Self::Default => PropertyValue::Present(column.default.is_some()),
        }
    }
}

impl Matcher {
    /// True when the column's property equals the expected value.
    ///
    /// Presence properties compare against `true`/`false`; an expected `null`
    /// matches only an absent property.
    pub fn matches(&self, column: &Column) -> bool {
        match (self.prop.read(column), &self.value) {
            (PropertyValue::Text(actual), Some(MatchValue::Text(expected))) => {
                actual == expected.as_str()
            }
            (PropertyValue::Flag(actual), Some(MatchValue::Flag(expected)))
            | (PropertyValue::Present(actual), Some(MatchValue::Flag(expected))) => {
                actual == *expected
            }
            (PropertyValue::Present(present), None) => !present,
            _ => false,
        }
    }
}

impl OverrideRule {
    /// True when every matcher holds.
    pub fn matches(&self, column: &Column) -> bool {
        self.matchers.iter().all(|m| m.matches(column))
    }
}

/// First rule in list order whose matchers all hold.
pub fn first_match<'r>(rules: &'r [OverrideRule], column: &Column) -> Option<&'r OverrideRule> {
    rules.iter().find(|rule| rule.matches(column))
}
