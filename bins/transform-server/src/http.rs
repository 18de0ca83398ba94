use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use stream_api::{TransformRecord, TransformedRecord};
use transform::Processor;

// ═══════════════════════════════════════════════════════════════
//  Invocation wire types
// ═══════════════════════════════════════════════════════════════

/// One invocation from the stream runtime: a buffered batch of records.
#[derive(Debug, Deserialize)]
pub(crate) struct TransformEvent {
    #[serde(default)]
    pub invocation_id: Option<String>,
    pub records: Vec<TransformRecord>,
}

/// The response batch: one outcome per input record, same order.
#[derive(Debug, Serialize)]
pub(crate) struct TransformOutput {
    pub records: Vec<TransformedRecord>,
}

// ═══════════════════════════════════════════════════════════════
//  Routes
// ═══════════════════════════════════════════════════════════════

#[derive(Clone)]
pub(crate) struct AppState {
    processor: Processor,
}

pub fn router(processor: Processor) -> Router {
    Router::new()
        .route("/transform", post(handle_transform))
        .route("/healthz", get(handle_healthz))
        .with_state(AppState { processor })
}

// ═══════════════════════════════════════════════════════════════
//  POST /transform
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_transform(
    State(state): State<AppState>,
    axum::Json(event): axum::Json<TransformEvent>,
) -> impl IntoResponse {
    tracing::debug!(
        invocation = event.invocation_id.as_deref().unwrap_or("-"),
        records = event.records.len(),
        "invocation received"
    );

    let (records, _summary) = state.processor.process_batch(event.records);
    axum::Json(TransformOutput { records }).into_response()
}

// ═══════════════════════════════════════════════════════════════
//  GET /healthz
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_healthz() -> impl IntoResponse {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use stream_api::Payload;
    use transform::CsvFormat;

    async fn spawn_server() -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Processor::new(CsvFormat::default()));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    /// One HTTP/1.1 request over a raw socket; returns (status line, body).
    async fn request(addr: std::net::SocketAddr, target: &str, body: Option<&str>) -> (String, String) {
        let mut conn = tokio::net::TcpStream::connect(addr).await.unwrap();

        let request = match body {
            Some(body) => format!(
                "POST {target} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            ),
            None => format!("GET {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"),
        };
        conn.write_all(request.as_bytes()).await.unwrap();

        let mut response = Vec::new();
        conn.read_to_end(&mut response).await.unwrap();
        let response = String::from_utf8(response).unwrap();

        let status = response.lines().next().unwrap_or_default().to_string();
        let body = response
            .split_once("\r\n\r\n")
            .map(|(_, b)| b.to_string())
            .unwrap_or_default();
        (status, body)
    }

    #[tokio::test]
    async fn healthz_responds_ok() {
        let addr = spawn_server().await;
        let (status, body) = request(addr, "/healthz", None).await;
        assert!(status.contains("200"));
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn transform_returns_one_outcome_per_record() {
        let addr = spawn_server().await;

        let good = Payload::from_text(r#"{"id":1,"name":"Widget"}"#).to_base64();
        let bad = Payload::from_text("not json").to_base64();
        let event = format!(
            r#"{{"invocation_id":"inv-1","records":[{{"record_id":"a","data":"{good}"}},{{"record_id":"b","data":"{bad}"}}]}}"#
        );

        let (status, body) = request(addr, "/transform", Some(&event)).await;
        assert!(status.contains("200"));

        let output: serde_json::Value = serde_json::from_str(&body).unwrap();
        let records = output["records"].as_array().unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0]["record_id"], "a");
        assert_eq!(records[0]["result"], "Ok");
        let transformed = Payload::from_base64(records[0]["data"].as_str().unwrap()).unwrap();
        assert_eq!(transformed.as_utf8().unwrap(), "id,name\n1,Widget\n");

        assert_eq!(records[1]["record_id"], "b");
        assert_eq!(records[1]["result"], "ProcessingFailed");
        // Failed record keeps its original wire payload.
        assert_eq!(records[1]["data"].as_str().unwrap(), bad);
    }

    #[tokio::test]
    async fn empty_batch_is_served_not_rejected() {
        let addr = spawn_server().await;
        let (status, body) = request(addr, "/transform", Some(r#"{"records":[]}"#)).await;
        assert!(status.contains("200"));

        let output: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(output["records"].as_array().unwrap().len(), 0);
    }
}
