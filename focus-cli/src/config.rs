use anyhow::{Context, Result};
use chrono_tz::Tz;
use focus_core::{FocusEngine, ReadinessPolicy, ScoreWeights};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringSection,
    pub policy: PolicySection,
    pub display: DisplaySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    pub priority_weight: f64,
    pub deadline_weight: f64,
    pub successor_impact_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    /// Organization toggle: block tasks whose direct predecessors are open.
    pub enforce_predecessor_completion: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// IANA timezone that decides what "due today" means.
    pub timezone: String,
    /// Max entries printed per list (0 = no limit).
    pub limit: usize,
    pub show_score_detail: bool,
}

impl Default for ScoringSection {
    fn default() -> Self {
        let w = ScoreWeights::default();
        Self {
            priority_weight: w.priority,
            deadline_weight: w.deadline,
            successor_impact_weight: w.successor_impact,
        }
    }
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            enforce_predecessor_completion: ReadinessPolicy::default().enforce_predecessor_completion,
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            limit: 10,
            show_score_detail: true,
        }
    }
}

impl Config {
    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights::new(
            self.scoring.priority_weight,
            self.scoring.deadline_weight,
            self.scoring.successor_impact_weight,
        )
    }

    pub fn policy(&self) -> ReadinessPolicy {
        ReadinessPolicy {
            enforce_predecessor_completion: self.policy.enforce_predecessor_completion,
        }
    }

    pub fn timezone(&self) -> Result<Tz> {
        Ok(focus_core::time::parse_timezone(&self.display.timezone)?)
    }

    /// Engine configured from this file. Weights are validated up front so a
    /// bad config fails before any snapshot is read.
    pub fn engine(&self) -> Result<FocusEngine> {
        let weights = self.weights();
        weights.validate().context("config [scoring]")?;
        Ok(FocusEngine::new()
            .with_weights(weights)
            .with_policy(self.policy())
            .with_timezone(self.timezone().context("config [display].timezone")?)
            .with_score_detail(self.display.show_score_detail))
    }
}

pub fn focus_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".focus"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(focus_home()?.join("config.toml"))
}

pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&s)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
