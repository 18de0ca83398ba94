use clap::Args;
use serde::Deserialize;

use super::error::OrdersGenError;

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub count: Option<u64>,
    pub batch_size: Option<usize>,
    pub pause_ms: Option<u64>,
    pub seed: Option<i64>,
    pub id_file: Option<String>,
    pub stream: Option<StreamConfig>,
}

#[derive(Debug, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_stream_name")]
    pub name: String,
    pub endpoint: Option<String>,
}

fn default_stream_name() -> String {
    "orders".into()
}

pub fn load_config(path: &str) -> Result<Config, OrdersGenError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| OrdersGenError::Config(format!("cannot read config {path}: {e}")))?;
    toml::from_str(&content).map_err(|e| OrdersGenError::Config(format!("bad config {path}: {e}")))
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug)]
pub struct GenArgs {
    /// Path to config.toml
    #[arg(long, default_value = "config.toml", env = "ORDERS_GEN_CONFIG")]
    pub config: String,

    /// Total number of records to produce
    #[arg(long)]
    pub count: Option<u64>,

    /// Maximum records per batch submission
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pause between batches, in milliseconds
    #[arg(long)]
    pub pause_ms: Option<u64>,

    /// Seed for the PRNG (0 = current time)
    #[arg(long)]
    pub seed: Option<i64>,

    /// Path of the sequence counter file
    #[arg(long)]
    pub id_file: Option<String>,

    /// Stream name carried in submissions
    #[arg(long)]
    pub stream_name: Option<String>,

    /// Stream ingestion endpoint (host:port)
    #[arg(long, env = "ORDERS_GEN_ENDPOINT")]
    pub endpoint: Option<String>,
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Final configuration after merge: config.toml < env/CLI
pub struct Effective {
    pub count: u64,
    pub batch_size: usize,
    pub pause_ms: u64,
    pub seed: i64,
    pub id_file: String,
    pub stream_name: String,
    pub endpoint: String,
}

impl Effective {
    pub fn new(args: &GenArgs) -> Result<Self, OrdersGenError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => c,
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e);
                }
                Config::default()
            }
        };

        let (cfg_stream_name, cfg_endpoint) = match cfg.stream {
            Some(s) => (Some(s.name), s.endpoint),
            None => (None, None),
        };

        let endpoint = args
            .endpoint
            .clone()
            .or(cfg_endpoint)
            .ok_or_else(|| OrdersGenError::Config("no stream endpoint configured".into()))?;

        let batch_size = args.batch_size.or(cfg.batch_size).unwrap_or(100);
        if batch_size == 0 {
            return Err(OrdersGenError::Config("batch_size must be at least 1".into()));
        }

        Ok(Self {
            count: args.count.or(cfg.count).unwrap_or(100),
            batch_size,
            pause_ms: args.pause_ms.or(cfg.pause_ms).unwrap_or(10),
            seed: args.seed.or(cfg.seed).unwrap_or(0),
            id_file: args.id_file.clone().or(cfg.id_file).unwrap_or_else(|| "id.txt".into()),
            stream_name: args
                .stream_name
                .clone()
                .or(cfg_stream_name)
                .unwrap_or_else(default_stream_name),
            endpoint,
        })
    }
}
