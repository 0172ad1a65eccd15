use std::str::FromStr;

use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown output format {other}, expected text or json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: tracing::Level,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Read `REVIEWS_LOG` and `REVIEWS_OUTPUT`. Call `dotenvy::dotenv()` first
    /// if a `.env` file should be honoured.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(level) = lookup("REVIEWS_LOG") {
            config.log_level = level
                .parse::<tracing::Level>()
                .with_context(|| format!("invalid REVIEWS_LOG value {level}"))?;
        }
        if let Some(output) = lookup("REVIEWS_OUTPUT") {
            config.output = output
                .parse::<OutputFormat>()
                .context("invalid REVIEWS_OUTPUT value")?;
        }
        Ok(config)
    }
}
