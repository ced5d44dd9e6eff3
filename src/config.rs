use std::env;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "lexpipe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,lexpipe=debug".to_string()
}

/// Runtime settings, loaded once from the environment and passed into
/// constructors. No stage reads the environment after startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_path: PathBuf,
    pub upload_dir: PathBuf,
    /// Base URL of the model-capability endpoint. Empty disables the
    /// capability entirely (classification degrades to the unknown
    /// sentinel, extraction to heuristics).
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    /// Cap on rendered page previews passed to the capability.
    pub max_preview_images: usize,
    /// Whether keyword-synthesized obligations inherit the document's
    /// case id. The source behavior left it blank; kept configurable.
    pub attach_case_to_synthesized: bool,
    /// Queue poll interval for the worker binary.
    pub poll_interval_secs: u64,
}

impl Settings {
    pub fn from_env() -> Self {
        let data_dir = env::var("LEXPIPE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        Self {
            database_path: env::var("LEXPIPE_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("lexpipe.db")),
            upload_dir: env::var("LEXPIPE_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("uploads")),
            llm_base_url: env::var("LEXPIPE_LLM_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            llm_model: env::var("LEXPIPE_LLM_MODEL").unwrap_or_else(|_| "llama3:8b".to_string()),
            llm_timeout_secs: parse_env("LEXPIPE_LLM_TIMEOUT_SECS", 300),
            max_preview_images: parse_env("LEXPIPE_MAX_PREVIEW_IMAGES", 2),
            attach_case_to_synthesized: env::var("LEXPIPE_ATTACH_CASE_TO_SYNTHESIZED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            poll_interval_secs: parse_env("LEXPIPE_POLL_INTERVAL_SECS", 5),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}
