use stream_api::StreamError;

#[derive(Debug, thiserror::Error)]
pub enum OrdersGenError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Stream(#[from] StreamError),

    #[error("sequence store {path}: {source}")]
    Store { path: String, source: std::io::Error },
}
