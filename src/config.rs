use std::env;

pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const OUTPUT_VAR: &str = "CHESS_OUTPUT";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    /// One `ServerMsg` JSON object per line.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub output: OutputFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Config::from_output_var(env::var(OUTPUT_VAR).ok().as_deref())
    }

    fn from_output_var(value: Option<&str>) -> Self {
        let output = match value.map(|v| v.trim().to_ascii_lowercase()) {
            None => OutputFormat::Text,
            Some(v) if v.is_empty() || v == "text" => OutputFormat::Text,
            Some(v) if v == "json" => OutputFormat::Json,
            Some(v) => {
                log::warn!("Unknown {} value {:?}, using text output", OUTPUT_VAR, v);
                OutputFormat::Text
            }
        };
        Config { output }
    }
}

/// Logs go to stderr, filtered by `LOG_LEVEL`.
pub fn init_logger() {
    let logger_env = env_logger::Env::default().filter_or(LOG_LEVEL_VAR, DEFAULT_LOG_LEVEL);
    env_logger::Builder::from_env(logger_env).format_timestamp_millis().init();
}
