//! Delimited text (CSV) record source.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::SourceError;
use super::traits::RecordSource;
use super::types::{RawValue, Record, RecordBatch};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads a delimited text export of the support sheet.
///
/// The first row is the header. Short rows are padded with blank cells;
/// header names are trimmed. Row numbers are line numbers minus one, so
/// they match the sheet row below the header even across empty lines.
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvRecordSource {
    /// Creates a source for the given file and field delimiter.
    pub fn new(path: impl Into<PathBuf>, delimiter: char) -> Self {
        Self {
            path: path.into(),
            delimiter: delimiter as u8,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses sheet content already held in memory.
    pub fn parse(&self, content: &[u8]) -> Result<RecordBatch, SourceError> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(content);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| SourceError::InvalidRow {
                row: 0,
                reason: e.to_string(),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if columns.iter().all(|c| c.is_empty()) {
            return Err(SourceError::MissingHeader {
                path: self.path.clone(),
            });
        }

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(|e| SourceError::InvalidRow {
                row: e
                    .position()
                    .map(row_from_position)
                    .unwrap_or(index + 1),
                reason: e.to_string(),
            })?;
            let row_number = row.position().map(row_from_position).unwrap_or(index + 1);

            // Fully empty lines are not records
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let fields = columns
                .iter()
                .enumerate()
                .filter(|(_, name)| !name.is_empty())
                .map(|(i, name)| {
                    let value = row.get(i).map(RawValue::from_cell).unwrap_or(RawValue::Blank);
                    (name.clone(), value)
                })
                .collect();

            records.push(Record::new(row_number, fields));
        }

        debug!(
            "Parsed {} records with {} columns from {:?}",
            records.len(),
            columns.len(),
            self.path
        );

        Ok(RecordBatch::new(columns, records))
    }
}

fn row_from_position(position: &csv::Position) -> usize {
    usize::try_from(position.line()).unwrap_or(usize::MAX).saturating_sub(1)
}

#[async_trait]
impl RecordSource for CsvRecordSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn load(&self) -> Result<RecordBatch, SourceError> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                SourceError::Io(e)
            }
        })?;

        let source = self.clone();
        tokio::task::spawn_blocking(move || source.parse(&content))
            .await
            .map_err(|e| SourceError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> CsvRecordSource {
        CsvRecordSource::new("sheet.csv", ';')
    }

    #[test]
    fn test_parse_header_and_rows() {
        let content = "POSICAO;TipoSuporte;Elevacao\nPOS-001;SUP-A;+12,5\nPOS-002;SUP-B;\n";
        let batch = source().parse(content.as_bytes()).unwrap();

        assert_eq!(batch.columns, vec!["POSICAO", "TipoSuporte", "Elevacao"]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[0].row, 1);
        assert_eq!(batch.records[0].declared_id(), "POS-001");
        assert_eq!(
            batch.records[0].get("Elevacao"),
            Some(&RawValue::Text("+12,5".to_string()))
        );
        assert_eq!(batch.records[1].get("Elevacao"), Some(&RawValue::Blank));
    }

    #[test]
    fn test_parse_strips_bom_and_trims_headers() {
        let content = "\u{FEFF} POSICAO ; TipoSuporte\nP1;A\n";
        let batch = source().parse(content.as_bytes()).unwrap();
        assert_eq!(batch.columns, vec!["POSICAO", "TipoSuporte"]);
        assert_eq!(batch.records[0].template_name(), "A");
    }

    #[test]
    fn test_short_rows_are_padded_with_blanks() {
        let content = "POSICAO;TipoSuporte;MEDIDA_H\nP1;A\n";
        let batch = source().parse(content.as_bytes()).unwrap();
        assert_eq!(batch.records[0].get("MEDIDA_H"), Some(&RawValue::Blank));
    }

    #[test]
    fn test_empty_lines_are_skipped_but_row_numbers_kept() {
        let content = "POSICAO;TipoSuporte\nP1;A\n;\nP3;B\n";
        let batch = source().parse(content.as_bytes()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[1].row, 3);
    }

    #[test]
    fn test_blank_lines_do_not_shift_row_numbers() {
        let content = "POSICAO;TipoSuporte\nP1;A\n\nP3;B\n\n\nP6;C\n";
        let batch = source().parse(content.as_bytes()).unwrap();
        let rows: Vec<usize> = batch.records.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![1, 3, 6]);
    }

    #[test]
    fn test_quoted_line_breaks_keep_the_starting_row() {
        let content = "POSICAO;TipoSuporte;CLIENTE\nP1;A;\"two\nlines\"\nP2;B;x\n";
        let batch = source().parse(content.as_bytes()).unwrap();
        assert_eq!(batch.records[0].row, 1);
        assert_eq!(batch.records[1].row, 3);
    }

    #[test]
    fn test_comma_delimiter() {
        let source = CsvRecordSource::new("sheet.csv", ',');
        let batch = source.parse(b"POSICAO,TipoSuporte\n\"P,1\",A\n").unwrap();
        assert_eq!(batch.records[0].declared_id(), "P,1");
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let result = source().parse(b"");
        assert!(matches!(result, Err(SourceError::MissingHeader { .. })));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let source = CsvRecordSource::new("/nonexistent/sheet.csv", ';');
        let result = source.load().await;
        assert!(matches!(result, Err(SourceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, "POSICAO;TipoSuporte\nP1;A\n").unwrap();

        let batch = CsvRecordSource::new(&path, ';').load().await.unwrap();
        assert_eq!(batch.len(), 1);
    }
}
