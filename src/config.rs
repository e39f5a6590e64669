// src/config.rs
//! Analyzer configuration (TOML).
//!
//! Resolution order:
//! 1. explicit path (`--config`)
//! 2. `ANALYZER_CONFIG_PATH`
//! 3. `config/analyzer.toml`, if it exists
//! 4. built-in defaults
//!
//! `LEXICON_PATH`, when set and non-empty, overrides `[lexicon].path`.
//!
//! ```toml
//! [lexicon]
//! path = "data/lexicon.json"
//!
//! [transcript]
//! path = "data/transcript.txt"
//!
//! [ranker]
//! per_metric = 3
//! length_window = 1
//!
//! [scoring]
//! min = -3.0
//! max = 3.0
//! ```

use crate::ranker::{RankerParams, DEFAULT_LENGTH_WINDOW, DEFAULT_PER_METRIC};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/analyzer.toml";
pub const DEFAULT_LEXICON_PATH: &str = "data/lexicon.json";
pub const ENV_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";
pub const ENV_LEXICON_PATH: &str = "LEXICON_PATH";

const DEFAULT_SCORE_MIN: f64 = -3.0;
const DEFAULT_SCORE_MAX: f64 = 3.0;

fn default_lexicon_path() -> PathBuf {
    PathBuf::from(DEFAULT_LEXICON_PATH)
}
fn default_per_metric() -> usize {
    DEFAULT_PER_METRIC
}
fn default_length_window() -> usize {
    DEFAULT_LENGTH_WINDOW
}
fn default_score_min() -> f64 {
    DEFAULT_SCORE_MIN
}
fn default_score_max() -> f64 {
    DEFAULT_SCORE_MAX
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub lexicon: LexiconSection,
    #[serde(default)]
    pub transcript: TranscriptSection,
    #[serde(default)]
    pub ranker: RankerSection,
    #[serde(default)]
    pub scoring: ScoreRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconSection {
    #[serde(default = "default_lexicon_path")]
    pub path: PathBuf,
}

impl Default for LexiconSection {
    fn default() -> Self {
        Self {
            path: default_lexicon_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSection {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankerSection {
    #[serde(default = "default_per_metric")]
    pub per_metric: usize,
    #[serde(default = "default_length_window")]
    pub length_window: usize,
}

impl Default for RankerSection {
    fn default() -> Self {
        Self {
            per_metric: default_per_metric(),
            length_window: default_length_window(),
        }
    }
}

/// Advisory sentiment range shown when registering a word. Not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    #[serde(default = "default_score_min")]
    pub min: f64,
    #[serde(default = "default_score_max")]
    pub max: f64,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self {
            min: default_score_min(),
            max: default_score_max(),
        }
    }
}

impl AnalyzerConfig {
    /// Resolve and load the configuration (see module docs for the order).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = if let Some(p) = explicit {
            Self::from_file(p)?
        } else if let Some(p) = std::env::var_os(ENV_CONFIG_PATH).filter(|v| !v.is_empty()) {
            Self::from_file(Path::new(&p))?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
        } else {
            debug!("no config file found, using defaults");
            Self::default()
        };

        if let Ok(p) = std::env::var(ENV_LEXICON_PATH) {
            let p = p.trim();
            if !p.is_empty() {
                debug!(path = p, "lexicon path overridden from env");
                cfg.lexicon.path = PathBuf::from(p);
            }
        }
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_toml_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut cfg: Self =
            toml::from_str(text).map_err(|e| anyhow!("invalid analyzer config: {e}"))?;
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn ranker_params(&self) -> RankerParams {
        RankerParams {
            per_metric: self.ranker.per_metric,
            length_window: self.ranker.length_window,
        }
    }

    fn sanitize(&mut self) {
        if self.ranker.per_metric == 0 {
            self.ranker.per_metric = DEFAULT_PER_METRIC;
        }
        if !self.scoring.min.is_finite() || !self.scoring.max.is_finite() {
            self.scoring = ScoreRange::default();
        }
        if self.scoring.min > self.scoring.max {
            std::mem::swap(&mut self.scoring.min, &mut self.scoring.max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_all_defaults() {
        let cfg = AnalyzerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, AnalyzerConfig::default());
        assert_eq!(cfg.lexicon.path, PathBuf::from(DEFAULT_LEXICON_PATH));
        assert_eq!(cfg.ranker_params(), RankerParams::default());
        assert_eq!(cfg.scoring.min, -3.0);
        assert_eq!(cfg.scoring.max, 3.0);
    }

    #[test]
    fn sections_are_read() {
        let cfg = AnalyzerConfig::from_toml_str(
            r#"
            [lexicon]
            path = "/tmp/lex.json"

            [transcript]
            path = "calls/001.txt"

            [ranker]
            per_metric = 5
            length_window = 2

            [scoring]
            min = -5.0
            max = 5.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.lexicon.path, PathBuf::from("/tmp/lex.json"));
        assert_eq!(cfg.transcript.path, Some(PathBuf::from("calls/001.txt")));
        assert_eq!(
            cfg.ranker_params(),
            RankerParams {
                per_metric: 5,
                length_window: 2
            }
        );
        assert_eq!(cfg.scoring, ScoreRange { min: -5.0, max: 5.0 });
    }

    #[test]
    fn out_of_shape_values_are_sanitized() {
        let cfg = AnalyzerConfig::from_toml_str(
            r#"
            [ranker]
            per_metric = 0

            [scoring]
            min = 4.0
            max = -1.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.ranker.per_metric, DEFAULT_PER_METRIC);
        assert_eq!(cfg.scoring, ScoreRange { min: -1.0, max: 4.0 });

        let cfg = AnalyzerConfig::from_toml_str("[scoring]\nmin = nan\n").unwrap();
        assert_eq!(cfg.scoring, ScoreRange::default());
    }

    #[test]
    fn bad_toml_is_an_error() {
        let err = AnalyzerConfig::from_toml_str("[ranker\nper_metric = ").unwrap_err();
        assert!(err.to_string().contains("invalid analyzer config"));
    }
}
