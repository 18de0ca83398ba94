use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use serde::Serialize;

use stream_api::{PutBatchOutcome, StreamEntry, StreamError};

// ═══════════════════════════════════════════════════════════════
//  StreamPublisher
// ═══════════════════════════════════════════════════════════════

/// Submission side of the stream.
///
/// `Ok` with a populated `failed_count` is a partial per-entry failure
/// report; `Err` is a whole-call failure (network class). The producer
/// handles both without retrying.
pub trait StreamPublisher {
    fn put_batch(&mut self, entries: &[StreamEntry]) -> Result<PutBatchOutcome, StreamError>;
}

// ═══════════════════════════════════════════════════════════════
//  TcpStreamPublisher
// ═══════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct PutBatchRequest<'a> {
    stream: &'a str,
    records: &'a [StreamEntry],
}

/// Newline-framed JSON client for the stream's ingestion endpoint.
///
/// Connects lazily on the first batch. A hard error drops the connection,
/// so the next batch starts from a fresh connect; the failed batch itself
/// is not resent.
pub struct TcpStreamPublisher {
    endpoint: String,
    stream_name: String,
    conn: Option<TcpStream>,
    buf: Vec<u8>,
}

impl TcpStreamPublisher {
    pub fn new(endpoint: impl Into<String>, stream_name: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            stream_name: stream_name.into(),
            conn: None,
            buf: Vec::with_capacity(8192),
        }
    }

    fn ensure_connected(&mut self) -> Result<(), StreamError> {
        if self.conn.is_none() {
            let stream = TcpStream::connect(&self.endpoint)
                .map_err(|e| StreamError::io(format!("connect {}: {e}", self.endpoint)))?;
            self.conn = Some(stream);
        }
        Ok(())
    }

    fn submit(&mut self, entries: &[StreamEntry]) -> Result<PutBatchOutcome, StreamError> {
        self.buf.clear();
        serde_json::to_writer(
            &mut self.buf,
            &PutBatchRequest { stream: &self.stream_name, records: entries },
        )?;
        self.buf.push(b'\n');

        self.ensure_connected()?;
        let conn = self.conn.as_mut().unwrap();
        conn.write_all(&self.buf)
            .map_err(|e| StreamError::io(format!("send batch: {e}")))?;

        let mut line = String::new();
        BufReader::new(&*conn)
            .read_line(&mut line)
            .map_err(|e| StreamError::io(format!("read response: {e}")))?;
        if line.is_empty() {
            return Err(StreamError::io("connection closed before response"));
        }

        let outcome: PutBatchOutcome = serde_json::from_str(line.trim_end())?;
        Ok(outcome)
    }
}

impl StreamPublisher for TcpStreamPublisher {
    fn put_batch(&mut self, entries: &[StreamEntry]) -> Result<PutBatchOutcome, StreamError> {
        match self.submit(entries) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // Drop the connection so the next batch reconnects; the
                // failed batch is left to the stream's redelivery semantics.
                self.conn = None;
                Err(e)
            }
        }
    }
}
