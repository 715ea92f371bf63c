//! Testing utilities and mock implementations.
//!
//! Mocks of the collaborator traits, so batches can be exercised without
//! real templates or a PDF toolchain.
//!
//! # Example
//!
//! ```rust,ignore
//! use supportgen_core::testing::{fixtures, MockDocumentBackend, MockRenderer, StaticRecordSource};
//!
//! let backend = MockDocumentBackend::new();
//! backend.set_no_attributes("SUP-B").await;
//!
//! let source = StaticRecordSource::new(fixtures::batch(vec![
//!     fixtures::record(1, "POS-001", "SUP-A"),
//! ]));
//! ```

mod mock_document;
mod mock_renderer;
mod mock_source;

pub use mock_document::MockDocumentBackend;
pub use mock_renderer::MockRenderer;
pub use mock_source::StaticRecordSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::record::{columns, RawValue, Record, RecordBatch};

    /// Header with every required and optional column.
    pub fn columns() -> Vec<String> {
        columns::REQUIRED
            .iter()
            .chain(columns::OPTIONAL.iter())
            .map(|c| c.to_string())
            .collect()
    }

    /// A record with the given identifier and template and plausible
    /// measurements.
    pub fn record(row: usize, id: &str, template: &str) -> Record {
        record_with(
            row,
            &[
                (columns::POSICAO, id),
                (columns::TIPO_SUPORTE, template),
                (columns::ELEVACAO, "12,5"),
                (columns::MEDIDA_H, "300"),
                (columns::MEDIDA_L, "150"),
                (columns::MEDIDA_M, ""),
                (columns::MEDIDA_H1, "120"),
                (columns::MEDIDA_H2, ""),
                (columns::MEDIDA_L1, "75"),
                (columns::MEDIDA_L2, ""),
                (columns::MEDIDA_B, "50"),
                (columns::NUM_DOC, "DOC-001"),
                (columns::QTD, "2"),
                (columns::CLIENTE, "ACME"),
            ],
        )
    }

    /// A record from `(column, cell)` pairs, cells read like sheet cells.
    pub fn record_with(row: usize, cells: &[(&str, &str)]) -> Record {
        Record::new(
            row,
            cells
                .iter()
                .map(|(column, cell)| (column.to_string(), RawValue::from_cell(cell)))
                .collect(),
        )
    }

    /// A batch with the full header.
    pub fn batch(records: Vec<Record>) -> RecordBatch {
        RecordBatch::new(columns(), records)
    }

    /// A batch whose header lacks `column`.
    pub fn batch_without(column: &str, records: Vec<Record>) -> RecordBatch {
        RecordBatch::new(
            columns().into_iter().filter(|c| c != column).collect(),
            records,
        )
    }
}
