mod error;
mod payload;
mod record;
mod time;

pub use error::{ErrorKind, StreamError};
pub use payload::Payload;
pub use record::{
    EntryResult, PutBatchOutcome, StreamEntry, TransformRecord, TransformResult,
    TransformedRecord,
};
pub use time::{date_from_ms, now_ms, timestamp_from_ms};
