//! Record shapes flowing from the codec to the CSV file
//!
//! A detail response is first decoded into a [`FieldMapping`] whose keys
//! depend on what the service returned. It only becomes a fixed-width
//! [`Row`] when projected onto the run's [`Header`].

use std::collections::HashMap;

/// Value substituted for any field a response did not provide
pub const PLACEHOLDER: &str = "NA";

/// Name given to a component whose display name is missing
pub const UNKNOWN_COMPONENT: &str = "Unknown";

/// Field name to text value, as decoded from one detail response
///
/// Keys are dynamic: the primary tags plus one entry per component name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    fields: HashMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any earlier value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (name, value) in iter {
            mapping.insert(name, value);
        }
        mapping
    }
}

/// The ordered column list of the output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    /// Builds the header as `primary ++ detail`
    pub fn new(primary: &[String], detail: &[String]) -> Self {
        Self {
            columns: primary.iter().chain(detail).cloned().collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Projects a mapping onto this header
    ///
    /// `row[i]` is the mapping's value for `columns[i]`, or `placeholder`
    /// when the mapping has no such key. Keys not named by the header are
    /// dropped.
    pub fn project(&self, mapping: &FieldMapping, placeholder: &str) -> Row {
        let values = self
            .columns
            .iter()
            .map(|column| mapping.get(column).unwrap_or(placeholder).to_string())
            .collect();
        Row { values }
    }
}

impl From<Vec<String>> for Header {
    fn from(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

/// One output record, always as wide as the header it was projected on
///
/// Rows can only be built through [`Header::project`], so a row never
/// disagrees with its header about width or column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
