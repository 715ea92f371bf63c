//! Attribute value normalization.
//!
//! Raw cells become the text written into template attributes. Normalization
//! is string to string: blanks become [`PLACEHOLDER`], numeric fields get the
//! decimal comma replaced by a period, everything is trimmed. Values are never
//! parsed, rounded or converted.

use serde::Serialize;

use crate::record::{columns, RawValue, Record};

/// Value written for blank or absent cells.
pub const PLACEHOLDER: &str = "-";

/// Tag receiving the run date.
pub const DATE_TAG: &str = "DATA_ATUAL";

/// How a field's raw value is canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Numeric,
}

/// Where an attribute tag takes its value from.
#[derive(Debug, Clone, Copy)]
enum TagSource {
    Column(&'static str, FieldKind),
    TemplateName,
    RunDate,
}

/// Attribute tags in injection order.
static TAGS: [(&str, TagSource); 15] = [
    ("POSICAO", TagSource::Column(columns::POSICAO, FieldKind::Text)),
    ("TIPOSUPORTE", TagSource::TemplateName),
    ("ELEVACAO", TagSource::Column(columns::ELEVACAO, FieldKind::Numeric)),
    ("H", TagSource::Column(columns::MEDIDA_H, FieldKind::Numeric)),
    ("L", TagSource::Column(columns::MEDIDA_L, FieldKind::Numeric)),
    ("M", TagSource::Column(columns::MEDIDA_M, FieldKind::Numeric)),
    ("H1", TagSource::Column(columns::MEDIDA_H1, FieldKind::Numeric)),
    ("H2", TagSource::Column(columns::MEDIDA_H2, FieldKind::Numeric)),
    ("L1", TagSource::Column(columns::MEDIDA_L1, FieldKind::Numeric)),
    ("L2", TagSource::Column(columns::MEDIDA_L2, FieldKind::Numeric)),
    ("B", TagSource::Column(columns::MEDIDA_B, FieldKind::Numeric)),
    (DATE_TAG, TagSource::RunDate),
    ("NUM_DOC", TagSource::Column(columns::NUM_DOC, FieldKind::Text)),
    ("QTD", TagSource::Column(columns::QTD, FieldKind::Text)),
    ("CLIENTE", TagSource::Column(columns::CLIENTE, FieldKind::Text)),
];

/// Normalizes one raw cell. `None` means the column is absent.
pub fn normalize(raw: Option<&RawValue>, kind: FieldKind) -> String {
    let text = match raw.and_then(RawValue::as_text) {
        Some(text) => text,
        None => return PLACEHOLDER.to_string(),
    };

    let trimmed = text.trim();
    match kind {
        FieldKind::Text => trimmed.to_string(),
        FieldKind::Numeric => trimmed.replace(',', "."),
    }
}

/// The normalized attribute values of one record, in tag order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSet {
    entries: Vec<(&'static str, String)>,
}

impl AttributeSet {
    /// Builds the attribute set of a record. `date_stamp` is computed once per
    /// run by the caller.
    pub fn from_record(record: &Record, date_stamp: &str) -> Self {
        let entries = TAGS
            .iter()
            .map(|(tag, source)| {
                let value = match source {
                    TagSource::Column(column, kind) => normalize(record.get(column), *kind),
                    TagSource::TemplateName => {
                        normalize(record.get(columns::TIPO_SUPORTE), FieldKind::Text)
                    }
                    TagSource::RunDate => date_stamp.to_string(),
                };
                (*tag, value)
            })
            .collect();

        Self { entries }
    }

    /// Returns the value of a tag (tags are upper-case).
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(tag, value)| (*tag, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
