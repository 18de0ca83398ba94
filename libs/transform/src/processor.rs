use stream_api::{Payload, StreamError, TransformRecord, TransformResult, TransformedRecord};

use super::csv::CsvFormat;

// ════════════════════════════════════════════════════════════════
//  Header state
// ════════════════════════════════════════════════════════════════

/// Per-invocation header accumulator.
///
/// Set once by the first successfully decoded record of a batch and never
/// re-emitted, even when later records carry different field sets. A fresh
/// instance is created for every invocation, so concurrent invocations
/// share nothing.
#[derive(Default)]
struct HeaderState {
    emitted: bool,
}

// ════════════════════════════════════════════════════════════════
//  Processor
// ════════════════════════════════════════════════════════════════

/// Counts reported once per invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub success: usize,
    pub failure: usize,
}

/// The transform stage: JSON record payloads in, delimited-text payloads
/// out, one outcome per input record.
#[derive(Clone, Copy, Debug, Default)]
pub struct Processor {
    format: CsvFormat,
}

impl Processor {
    pub fn new(format: CsvFormat) -> Self {
        Self { format }
    }

    /// Transform one batch, isolating failures per record.
    ///
    /// The output has exactly one entry per input, in input order, with the
    /// input's `record_id`. A record failing any step yields
    /// `ProcessingFailed` carrying its original payload untouched; the rest
    /// of the batch is unaffected. Records are processed in positional
    /// order, so the header always lands on the first decodable record.
    pub fn process_batch(&self, records: Vec<TransformRecord>) -> (Vec<TransformedRecord>, BatchSummary) {
        let mut header = HeaderState::default();
        let mut summary = BatchSummary::default();

        let output = records
            .into_iter()
            .map(|record| match self.transform_record(&record, &mut header) {
                Ok(data) => {
                    summary.success += 1;
                    TransformedRecord {
                        record_id: record.record_id,
                        result: TransformResult::Ok,
                        data,
                    }
                }
                Err(e) => {
                    summary.failure += 1;
                    tracing::error!(record_id = %record.record_id, error = %e, "record transform failed");
                    TransformedRecord {
                        record_id: record.record_id,
                        result: TransformResult::ProcessingFailed,
                        data: record.data,
                    }
                }
            })
            .collect();

        tracing::info!(
            success = summary.success,
            failure = summary.failure,
            "processing completed"
        );

        (output, summary)
    }

    /// Decode one payload and re-encode it as delimited text.
    fn transform_record(
        &self,
        record: &TransformRecord,
        header: &mut HeaderState,
    ) -> Result<Payload, StreamError> {
        let value = record.data.as_json()?;
        let fields = value
            .as_object()
            .ok_or_else(|| StreamError::format_err("payload is not a JSON object"))?;

        // Nothing below can fail, so claiming the header here is safe.
        let mut text = String::new();
        if !header.emitted {
            header.emitted = true;
            text.push_str(&self.format.header_line(fields.keys().map(|k| k.as_str())));
            text.push('\n');
        }
        text.push_str(&self.format.row_line(fields));

        Ok(Payload::from_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_record(id: &str, json: &str) -> TransformRecord {
        TransformRecord {
            record_id: id.to_string(),
            data: Payload::from_text(json),
        }
    }

    #[test]
    fn transforms_a_batch_of_valid_records() {
        let processor = Processor::default();
        let records = vec![
            json_record("r1", r#"{"id":1,"name":"Widget"}"#),
            json_record("r2", r#"{"id":2,"name":"Gadget"}"#),
        ];

        let (out, summary) = processor.process_batch(records);

        assert_eq!(summary, BatchSummary { success: 2, failure: 0 });
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].result, TransformResult::Ok);
        assert_eq!(out[0].data.as_utf8().unwrap(), "id,name\n1,Widget\n");
        assert_eq!(out[1].data.as_utf8().unwrap(), "2,Gadget\n");
    }

    #[test]
    fn malformed_records_fail_in_isolation() {
        let processor = Processor::default();
        let bad_payload = Payload::new(vec![0xff, 0xfe, 0x00]);
        let records = vec![
            json_record("r1", r#"{"id":1}"#),
            TransformRecord { record_id: "r2".into(), data: bad_payload.clone() },
            json_record("r3", "{not json"),
            json_record("r4", r#"{"id":4}"#),
        ];

        let (out, summary) = processor.process_batch(records);

        assert_eq!(summary, BatchSummary { success: 2, failure: 2 });
        assert_eq!(out.len(), 4);

        let ids: Vec<&str> = out.iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3", "r4"]);

        assert_eq!(out[1].result, TransformResult::ProcessingFailed);
        assert_eq!(out[1].data, bad_payload); // byte-identical original
        assert_eq!(out[2].result, TransformResult::ProcessingFailed);
        assert_eq!(out[2].data.as_utf8().unwrap(), "{not json");
        assert_eq!(out[3].result, TransformResult::Ok);
    }

    #[test]
    fn non_object_payload_fails() {
        let processor = Processor::default();
        let (out, summary) = processor.process_batch(vec![json_record("r1", "[1,2,3]")]);

        assert_eq!(summary.failure, 1);
        assert_eq!(out[0].result, TransformResult::ProcessingFailed);
        assert_eq!(out[0].data.as_utf8().unwrap(), "[1,2,3]");
    }

    #[test]
    fn header_emitted_exactly_once_per_batch() {
        let processor = Processor::default();
        let records = vec![
            json_record("r1", r#"{"a":1,"b":2}"#),
            json_record("r2", r#"{"a":3,"b":4}"#),
            // Different field set, still no second header.
            json_record("r3", r#"{"x":5}"#),
        ];

        let (out, _) = processor.process_batch(records);

        let headers = out
            .iter()
            .filter(|r| r.data.as_utf8().unwrap().starts_with("a,b\n"))
            .count();
        assert_eq!(headers, 1);
        assert_eq!(out[1].data.as_utf8().unwrap(), "3,4\n");
        assert_eq!(out[2].data.as_utf8().unwrap(), "5\n");
    }

    #[test]
    fn header_falls_to_first_decodable_record() {
        let processor = Processor::default();
        let records = vec![
            json_record("r1", "garbage"),
            json_record("r2", r#"{"a":1,"b":2}"#),
        ];

        let (out, _) = processor.process_batch(records);

        assert_eq!(out[0].result, TransformResult::ProcessingFailed);
        assert_eq!(out[1].data.as_utf8().unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn empty_batch_yields_empty_output() {
        let processor = Processor::default();
        let (out, summary) = processor.process_batch(Vec::new());
        assert!(out.is_empty());
        assert_eq!(summary, BatchSummary::default());
    }

    #[test]
    fn field_order_is_preserved_end_to_end() {
        let processor = Processor::default();
        let records = vec![json_record(
            "r1",
            r#"{"zulu":1,"alpha":2,"mike":3}"#,
        )];

        let (out, _) = processor.process_batch(records);
        assert_eq!(out[0].data.as_utf8().unwrap(), "zulu,alpha,mike\n1,2,3\n");
    }
}
