//! Server configuration, optionally loaded from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// Largest accepted `delay_scale`; a 2.5s docker call becomes about 4 minutes.
pub const MAX_DELAY_SCALE: f64 = 100.0;

/// Harness configuration (TOML).
///
/// Every field is optional in the file; missing fields take the defaults
/// below. Command-line flags override whatever is loaded here.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Address to bind the HTTP server to.
    pub bind: String,

    /// Port to listen on.
    pub port: u16,

    /// Multiplier applied to every scripted delay. `0.0` runs scenarios instantly.
    pub delay_scale: f64,

    /// Run at most one scenario at a time instead of letting runs interleave.
    pub serialize_runs: bool,

    /// Directory holding the dashboard's static files.
    pub static_dir: PathBuf,

    /// Deployment label reported by `/api/status`.
    pub environment: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            delay_scale: 1.0,
            serialize_runs: false,
            static_dir: PathBuf::from("public"),
            environment: "development".to_string(),
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bind.trim().is_empty() {
            return Err(anyhow!("bind must be a non-empty address"));
        }
        if !(0.0..=MAX_DELAY_SCALE).contains(&self.delay_scale) {
            return Err(anyhow!(
                "delay_scale must be between 0 and {MAX_DELAY_SCALE}, got {}",
                self.delay_scale
            ));
        }
        if self.environment.trim().is_empty() {
            return Err(anyhow!("environment must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `HarnessConfig::default()`.
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    if !path.exists() {
        let cfg = HarnessConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: HarnessConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
