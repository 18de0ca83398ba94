use clap::Args;
use serde::Deserialize;

use stream_api::StreamError;
use transform::CsvFormat;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Stream(#[from] StreamError),
}

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub listen: Option<String>,
    pub delimiter: Option<String>,
}

pub fn load_config(path: &str) -> Result<Config, ServeError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ServeError::Config(format!("cannot read config {path}: {e}")))?;
    toml::from_str(&content).map_err(|e| ServeError::Config(format!("bad config {path}: {e}")))
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Path to config.toml
    #[arg(long, default_value = "config.toml", env = "TRANSFORM_CONFIG")]
    pub config: String,

    /// Listen address (host:port)
    #[arg(long, env = "TRANSFORM_LISTEN")]
    pub listen: Option<String>,

    /// Output delimiter for transformed rows
    #[arg(long)]
    pub delimiter: Option<String>,
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Final configuration after merge: config.toml < env/CLI
pub struct Effective {
    pub listen: String,
    pub format: CsvFormat,
}

impl Effective {
    pub fn new(args: &ServeArgs) -> Result<Self, ServeError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => c,
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e);
                }
                Config::default()
            }
        };

        let delimiter = args.delimiter.clone().or(cfg.delimiter).unwrap_or_else(|| ",".into());

        Ok(Self {
            listen: args
                .listen
                .clone()
                .or(cfg.listen)
                .unwrap_or_else(|| "127.0.0.1:9581".into()),
            format: CsvFormat::from_config(&delimiter)?,
        })
    }
}
