mod csv;
mod processor;

pub use csv::CsvFormat;
pub use processor::{BatchSummary, Processor};
