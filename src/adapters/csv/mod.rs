//! CSV adapters - reading cancellation uploads and writing result exports.

mod cancellation_csv;

pub use cancellation_csv::{
    parse_cancellations, write_results, CsvError, OUTPUT_COLUMNS, REQUIRED_COLUMNS,
};
