use serde::{Deserialize, Serialize};

use super::columns;

/// A raw cell value as delivered by the record source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    Blank,
    Text(String),
    Number(f64),
}

impl RawValue {
    /// Builds a value from cell text; empty or whitespace-only text is blank.
    pub fn from_cell(cell: &str) -> Self {
        if cell.trim().is_empty() {
            Self::Blank
        } else {
            Self::Text(cell.to_string())
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Blank => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(n) => n.is_nan(),
        }
    }

    /// The value as text, without any normalization applied.
    pub fn as_text(&self) -> Option<String> {
        match self {
            _ if self.is_blank() => None,
            Self::Text(text) => Some(text.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Blank => None,
        }
    }
}

/// One input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based data row number (header excluded).
    pub row: usize,
    fields: Vec<(String, RawValue)>,
}

impl Record {
    pub fn new(row: usize, fields: Vec<(String, RawValue)>) -> Self {
        Self { row, fields }
    }

    /// Returns the raw value of a field, `None` when the column is absent.
    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Declared output identifier, trimmed; empty when blank or absent.
    pub fn declared_id(&self) -> String {
        self.text_of(columns::POSICAO)
    }

    /// Declared template name, trimmed; empty when blank or absent.
    pub fn template_name(&self) -> String {
        self.text_of(columns::TIPO_SUPORTE)
    }

    fn text_of(&self, field: &str) -> String {
        self.get(field)
            .and_then(RawValue::as_text)
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }

    fn rename_field(&mut self, from: &str, to: &str) {
        for (name, _) in self.fields.iter_mut() {
            if name == from {
                *name = to.to_string();
            }
        }
    }
}

/// The full content of one input sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBatch {
    /// Header columns in sheet order.
    pub columns: Vec<String>,
    /// Data rows in sheet order.
    pub records: Vec<Record>,
}

impl RecordBatch {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Required columns absent from the header, in declaration order.
    pub fn missing_columns(&self) -> Vec<String> {
        columns::REQUIRED
            .iter()
            .filter(|column| !self.has_column(column))
            .map(|column| column.to_string())
            .collect()
    }

    /// Renames the legacy `Name` column to `TipoSuporte` when the latter is
    /// absent. Returns whether the rename happened.
    pub fn apply_template_alias(&mut self) -> bool {
        if self.has_column(columns::TIPO_SUPORTE) || !self.has_column(columns::TEMPLATE_ALIAS) {
            return false;
        }

        for column in self.columns.iter_mut() {
            if column == columns::TEMPLATE_ALIAS {
                *column = columns::TIPO_SUPORTE.to_string();
            }
        }
        for record in self.records.iter_mut() {
            record.rename_field(columns::TEMPLATE_ALIAS, columns::TIPO_SUPORTE);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
