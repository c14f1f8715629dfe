use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::layout::{FontFamily, LayoutConfig, SearchConfig};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Root directory holding `<form_id>/form.json` definitions.
    pub forms_dir: PathBuf,
    pub font: FontFamily,
    /// Baseline font size for rows assembled from form definitions.
    pub font_size_px: f32,
    pub cost_ceiling: f32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            forms_dir: PathBuf::from(env_or("FORMS_DIR", "data")),
            font: env_or("LAYOUT_FONT", "sans")
                .parse::<FontFamily>()
                .map_err(anyhow::Error::msg)
                .context("LAYOUT_FONT must be one of sans, serif, mono")?,
            font_size_px: parse_positive("LAYOUT_FONT_SIZE_PX", "12")?,
            cost_ceiling: parse_positive("SHAKE_COST_CEILING", "10000")?,
        })
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            font: self.font,
            search: SearchConfig {
                cost_ceiling: self.cost_ceiling,
                ..SearchConfig::default()
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_positive(key: &str, default: &str) -> Result<f32> {
    let value = env_or(key, default)
        .parse::<f32>()
        .with_context(|| format!("{key} must be a number"))?;
    if !(value.is_finite() && value > 0.0) {
        anyhow::bail!("{key} must be a positive number, got {value}");
    }
    Ok(value)
}
