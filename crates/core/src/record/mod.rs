//! Tabular input records.
//!
//! A `RecordSource` delivers the rows of the support sheet as a
//! `RecordBatch`: the header columns plus one `Record` per data row, in sheet
//! order. `CsvRecordSource` reads a delimited text export of the sheet.

pub mod columns;
mod csv_source;
mod error;
mod traits;
mod types;

pub use csv_source::CsvRecordSource;
pub use error::SourceError;
pub use traits::RecordSource;
pub use types::{RawValue, Record, RecordBatch};
