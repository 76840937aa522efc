//! Engine configuration
//!
//! Every threshold and weight set that has more than one sensible value is a
//! named policy here, so callers choose explicitly instead of editing code.
//!
//! ```no_run
//! use shade_match::EngineConfig;
//! use std::path::Path;
//!
//! let config = EngineConfig::from_json_file(Path::new("shade_match.json"))?;
//! // or from SHADE_MATCH_* environment variables
//! let config = EngineConfig::from_env()?;
//! # Ok::<(), shade_match::MatchError>(())
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{MatchError, Result};
use crate::services::color_difference::{DistanceMetric, MatchPercentagePolicy};
use crate::services::grouping::GroupingOptions;
use crate::services::pairing::PairingOptions;
use crate::services::sampling::DEFAULT_MIN_SAMPLES;
use crate::services::shade_scoring::ScoringMode;
use crate::services::tone::UndertonePolicy;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Delta E to match-percentage mapping
    pub match_percentage: MatchPercentagePolicy,
    /// Standard or enhanced weight set
    pub scoring_mode: ScoringMode,
    /// Distance used when scoring shades
    pub distance_metric: DistanceMetric,
    /// Undertone thresholds
    pub undertone_policy: UndertonePolicy,
    /// Ranked shades kept per tone before pairing
    pub per_tone_limit: usize,
    /// Pairs returned from dual-point matching
    pub pair_limit: usize,
    /// Distinct-brand groups returned
    pub max_groups: usize,
    /// Pairs kept per group
    pub pairs_per_group: usize,
    /// Minimum pixel samples for sample reduction
    pub min_samples: usize,
    /// Drop shades flagged unavailable before scoring
    pub available_only: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let pairing = PairingOptions::default();
        let grouping = GroupingOptions::default();
        Self {
            match_percentage: MatchPercentagePolicy::STANDARD,
            scoring_mode: ScoringMode::Standard,
            distance_metric: DistanceMetric::Ciede2000,
            undertone_policy: UndertonePolicy::LAB_STANDARD,
            per_tone_limit: pairing.per_tone_limit,
            pair_limit: pairing.pair_limit,
            max_groups: grouping.max_groups,
            pairs_per_group: grouping.pairs_per_group,
            min_samples: DEFAULT_MIN_SAMPLES,
            available_only: false,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| MatchError::InvalidConfig(format!("{key}={raw:?} is not valid")))
}

impl EngineConfig {
    pub fn pairing(&self) -> PairingOptions {
        PairingOptions {
            per_tone_limit: self.per_tone_limit,
            pair_limit: self.pair_limit,
        }
    }

    pub fn grouping(&self) -> GroupingOptions {
        GroupingOptions {
            max_groups: self.max_groups,
            pairs_per_group: self.pairs_per_group,
        }
    }

    /// Reject settings that would silently produce empty results
    pub fn validate(&self) -> Result<()> {
        let scale = self.match_percentage.scale;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(MatchError::InvalidConfig(format!(
                "match percentage scale must be positive, got {scale}"
            )));
        }
        for (name, value) in [
            ("per_tone_limit", self.per_tone_limit),
            ("pair_limit", self.pair_limit),
            ("max_groups", self.max_groups),
            ("pairs_per_group", self.pairs_per_group),
        ] {
            if value == 0 {
                return Err(MatchError::InvalidConfig(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MatchError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MatchError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    /// Save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MatchError::InvalidConfig(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| {
            MatchError::InvalidConfig(format!("cannot write {}: {e}", path.display()))
        })
    }

    /// Defaults overridden by `SHADE_MATCH_*` environment variables
    pub fn from_env() -> Result<Self> {
        #[cfg(feature = "env")]
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `SHADE_MATCH_*` key
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("SHADE_MATCH_SCALE") {
            config.match_percentage.scale = parse_var("SHADE_MATCH_SCALE", &raw)?;
        }
        if let Some(raw) = lookup("SHADE_MATCH_SCORING_MODE") {
            config.scoring_mode = ScoringMode::from_str(&raw).ok_or_else(|| {
                MatchError::InvalidConfig(format!("unknown scoring mode {raw:?}"))
            })?;
        }
        if let Some(raw) = lookup("SHADE_MATCH_DISTANCE") {
            config.distance_metric = match raw.trim().to_lowercase().as_str() {
                "cie76" => DistanceMetric::Cie76,
                "ciede2000" => DistanceMetric::Ciede2000,
                _ => {
                    return Err(MatchError::InvalidConfig(format!(
                        "unknown distance metric {raw:?}"
                    )))
                }
            };
        }
        if let Some(raw) = lookup("SHADE_MATCH_UNDERTONE_POLICY") {
            config.undertone_policy = match raw.trim().to_lowercase().as_str() {
                "lab" | "standard" => UndertonePolicy::LAB_STANDARD,
                "image" => UndertonePolicy::IMAGE_DERIVED,
                _ => {
                    return Err(MatchError::InvalidConfig(format!(
                        "unknown undertone policy {raw:?}"
                    )))
                }
            };
        }
        if let Some(raw) = lookup("SHADE_MATCH_PER_TONE_LIMIT") {
            config.per_tone_limit = parse_var("SHADE_MATCH_PER_TONE_LIMIT", &raw)?;
        }
        if let Some(raw) = lookup("SHADE_MATCH_PAIR_LIMIT") {
            config.pair_limit = parse_var("SHADE_MATCH_PAIR_LIMIT", &raw)?;
        }
        if let Some(raw) = lookup("SHADE_MATCH_MAX_GROUPS") {
            config.max_groups = parse_var("SHADE_MATCH_MAX_GROUPS", &raw)?;
        }
        if let Some(raw) = lookup("SHADE_MATCH_PAIRS_PER_GROUP") {
            config.pairs_per_group = parse_var("SHADE_MATCH_PAIRS_PER_GROUP", &raw)?;
        }
        if let Some(raw) = lookup("SHADE_MATCH_MIN_SAMPLES") {
            config.min_samples = parse_var("SHADE_MATCH_MIN_SAMPLES", &raw)?;
        }
        if let Some(raw) = lookup("SHADE_MATCH_AVAILABLE_ONLY") {
            config.available_only = parse_var("SHADE_MATCH_AVAILABLE_ONLY", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }
}
