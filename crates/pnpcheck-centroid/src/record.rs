use indexmap::{IndexMap, IndexSet};

/// A single centroid cell, typed by a numeric parse attempt at read time.
///
/// Numeric fields keep the source token alongside the parsed value so that
/// identifier-like columns survive numeric-looking content (a package named
/// `0603` must stay `0603`, not become `603`).
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Number { value: f64, raw: String },
    Text(String),
}

impl Field {
    pub fn from_token(token: &str) -> Self {
        match token.parse::<f64>() {
            Ok(value) => Field::Number {
                value,
                raw: token.to_string(),
            },
            Err(_) => Field::Text(token.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Field::Number { value, .. } => Some(*value),
            Field::Text(_) => None,
        }
    }

    /// The field as text: the source token for numbers, the string itself
    /// otherwise.
    pub fn as_str(&self) -> &str {
        match self {
            Field::Number { raw, .. } => raw,
            Field::Text(text) => text,
        }
    }
}

/// One data row of a centroid file, keyed by the header's column names in
/// header order. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    fields: IndexMap<String, Field>,
}

impl PlacementRecord {
    pub(crate) fn new(fields: IndexMap<String, Field>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&Field> {
        self.fields.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn reference(&self) -> Option<&str> {
        self.text("Ref")
    }

    pub fn package(&self) -> Option<&str> {
        self.text("Package")
    }

    pub fn pos_x(&self) -> Option<f64> {
        self.number("PosX")
    }

    pub fn pos_y(&self) -> Option<f64> {
        self.number("PosY")
    }

    pub fn rotation(&self) -> Option<f64> {
        self.number("Rot")
    }

    pub fn side(&self) -> Option<&str> {
        self.text("Side")
    }

    fn text(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(Field::as_str)
    }

    fn number(&self, column: &str) -> Option<f64> {
        self.fields.get(column)?.as_number()
    }
}

/// The distinct `Package` values of a record sequence, in first-seen order.
/// Feeding a set (rather than one entry per component) into footprint
/// resolution is what guarantees each package is looked up once per run.
pub fn distinct_packages(records: &[PlacementRecord]) -> IndexSet<String> {
    records
        .iter()
        .filter_map(PlacementRecord::package)
        .map(str::to_string)
        .collect()
}
