// Column model — a tagged variant fixed at load time

use serde::{Deserialize, Serialize};

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Cell storage for a column.
///
/// Numeric cells may be missing (`None`). Categorical cells are opaque
/// tokens; an empty field is just another token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<String>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(values) => values.len(),
            ColumnValues::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column of a [`Table`](super::Table).
///
/// Numeric columns loaded from text remember each cell's source text. A cell
/// whose value was not changed is written back with that text, so untouched
/// numeric data survives a round trip byte for byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: ColumnValues,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    source: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
            source: Vec::new(),
        }
    }

    /// Numeric column parsed from `text`, one source cell per value.
    pub fn numeric_with_source(
        name: impl Into<String>,
        values: Vec<Option<f64>>,
        text: Vec<String>,
    ) -> Self {
        let mut column = Self::numeric(name, values);
        column.source = text.into_iter().map(Some).collect();
        column
    }

    /// Numeric column; `None` marks a missing cell.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnValues::Numeric(values))
    }

    pub fn categorical<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            name,
            ColumnValues::Categorical(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn kind(&self) -> ColumnKind {
        super::classify(self)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Same name, new cells. Source text is kept only for numeric cells whose
    /// value is unchanged (both missing, or bit-identical).
    pub fn with_values(&self, values: ColumnValues) -> Self {
        let source = match (&self.values, &values) {
            (ColumnValues::Numeric(before), ColumnValues::Numeric(after))
                if !self.source.is_empty() =>
            {
                self.source
                    .iter()
                    .zip(before.iter().zip(after))
                    .map(|(text, (old, new))| {
                        let unchanged = match (old, new) {
                            (Some(a), Some(b)) => a.to_bits() == b.to_bits(),
                            (None, None) => true,
                            _ => false,
                        };
                        if unchanged {
                            text.clone()
                        } else {
                            None
                        }
                    })
                    .collect()
            }
            _ => Vec::new(),
        };

        Self {
            name: self.name.clone(),
            values,
            source,
        }
    }

    /// Render a cell the way the delimited writer emits it.
    pub fn cell_text(&self, row: usize) -> Option<String> {
        if let Some(Some(text)) = self.source.get(row) {
            return Some(text.clone());
        }
        match &self.values {
            ColumnValues::Numeric(values) => values
                .get(row)
                .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
            ColumnValues::Categorical(values) => values.get(row).cloned(),
        }
    }
}
