//! Multi-factor scoring of catalog shades against one target color

use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{
    Coverage, DepthBucket, Finish, LabColor, MatchError, Result, ShadeCandidate, ShadeMatch,
    SkinToneAnalysis, SkinType, Undertone, UserPreferences,
};
use crate::services::color_difference::{DistanceMetric, MatchPercentagePolicy};
use crate::services::color_space::hex_to_lab;
use crate::services::tone::{
    depth_bucket, depth_compatibility, undertone_compatibility, UndertonePolicy,
};

/// Upper bound of the preference multiplier
pub const MAX_PREFERENCE_BOOST: f64 = 1.5;
const MIN_PREFERENCE_BOOST: f64 = 0.5;
const PREFERENCE_MATCH_BOOST: f64 = 1.2;

/// Which weight set the scorer uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    #[default]
    Standard,
    /// Adds a product quality term from ratings
    Enhanced,
}

impl ScoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMode::Standard => "standard",
            ScoringMode::Enhanced => "enhanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Some(ScoringMode::Standard),
            "enhanced" => Some(ScoringMode::Enhanced),
            _ => None,
        }
    }
}

/// Weights of each factor in the overall score, summing to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub color: f64,
    pub undertone: f64,
    pub depth: f64,
    pub preference: f64,
    pub quality: f64,
}

impl ScoringWeights {
    pub const STANDARD: Self = Self {
        color: 0.40,
        undertone: 0.25,
        depth: 0.25,
        preference: 0.10,
        quality: 0.0,
    };

    pub const ENHANCED: Self = Self {
        color: 0.40,
        undertone: 0.25,
        depth: 0.20,
        preference: 0.10,
        quality: 0.05,
    };

    pub fn for_mode(mode: ScoringMode) -> Self {
        match mode {
            ScoringMode::Standard => Self::STANDARD,
            ScoringMode::Enhanced => Self::ENHANCED,
        }
    }

    pub fn total(&self) -> f64 {
        self.color + self.undertone + self.depth + self.preference + self.quality
    }
}

/// The color a catalog is scored against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeTarget {
    pub lab: LabColor,
    pub undertone: Undertone,
    pub depth: DepthBucket,
}

impl From<&SkinToneAnalysis> for ShadeTarget {
    fn from(analysis: &SkinToneAnalysis) -> Self {
        Self {
            lab: analysis.lab,
            undertone: analysis.undertone,
            depth: analysis.depth,
        }
    }
}

/// Finish factor for a skin type
fn skin_finish_factor(skin_type: SkinType, finish: Finish) -> f64 {
    match (skin_type, finish) {
        (SkinType::Oily, Finish::Matte) => 1.2,
        (SkinType::Oily, Finish::Dewy) => 0.8,
        (SkinType::Dry, Finish::Dewy) => 1.2,
        (SkinType::Dry, Finish::Matte) => 0.8,
        (SkinType::Combination, Finish::Satin | Finish::Natural) => 1.1,
        (SkinType::Sensitive, Finish::Natural) => 1.05,
        _ => 1.0,
    }
}

/// Multiplier in [0.5, 1.5] from coverage, finish and skin type fit
pub fn preference_multiplier(candidate: &ShadeCandidate, prefs: Option<&UserPreferences>) -> f64 {
    let Some(prefs) = prefs else {
        return 1.0;
    };

    let coverage = Coverage::from_product_name(&candidate.product);
    let finish = Finish::from_product_name(&candidate.product);

    let mut boost: f64 = 1.0;
    if prefs.preferred_coverage == Some(coverage) {
        boost *= PREFERENCE_MATCH_BOOST;
    }
    if prefs.preferred_finish == Some(finish) {
        boost *= PREFERENCE_MATCH_BOOST;
    }
    if let Some(skin_type) = prefs.skin_type {
        boost *= skin_finish_factor(skin_type, finish);
    }

    boost.clamp(MIN_PREFERENCE_BOOST, MAX_PREFERENCE_BOOST)
}

/// Rating quality in [0, 1], pulled toward 0.5 when there are few reviews
pub fn quality_score(rating: Option<f64>, review_count: Option<u32>) -> f64 {
    let Some(rating) = rating.filter(|r| r.is_finite()) else {
        return 0.5;
    };
    let normalized = (rating / 5.0).clamp(0.0, 1.0);
    let reviews = review_count.unwrap_or(0) as f64;
    let confidence = ((1.0 + reviews).ln() / 101f64.ln()).min(1.0);
    0.5 + (normalized - 0.5) * confidence
}

/// Scores and ranks catalog shades for a single target
#[derive(Debug, Clone)]
pub struct ShadeScorer {
    weights: ScoringWeights,
    metric: DistanceMetric,
    match_policy: MatchPercentagePolicy,
    undertone_policy: UndertonePolicy,
    available_only: bool,
}

impl Default for ShadeScorer {
    fn default() -> Self {
        Self::new(
            ScoringWeights::STANDARD,
            MatchPercentagePolicy::STANDARD,
            UndertonePolicy::LAB_STANDARD,
        )
    }
}

impl ShadeScorer {
    pub fn new(
        weights: ScoringWeights,
        match_policy: MatchPercentagePolicy,
        undertone_policy: UndertonePolicy,
    ) -> Self {
        Self {
            weights,
            metric: DistanceMetric::Ciede2000,
            match_policy,
            undertone_policy,
            available_only: false,
        }
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Skip candidates flagged unavailable
    pub fn available_only(mut self, available_only: bool) -> Self {
        self.available_only = available_only;
        self
    }

    /// Lab of a candidate, preferring a precomputed value over its hex
    fn resolve_lab(candidate: &ShadeCandidate) -> Result<LabColor> {
        if let Some(lab) = candidate.lab {
            return Ok(lab);
        }
        match candidate.hex.as_deref() {
            Some(hex) => hex_to_lab(hex),
            None => Err(MatchError::invalid_color("", "candidate has no color")),
        }
    }

    /// Score one candidate, or `None` when it has no usable color
    pub fn score_candidate(
        &self,
        target: &ShadeTarget,
        candidate: &ShadeCandidate,
        prefs: Option<&UserPreferences>,
    ) -> Option<ShadeMatch> {
        if self.available_only && !candidate.available {
            return None;
        }

        let lab = match Self::resolve_lab(candidate) {
            Ok(lab) => lab,
            Err(e) => {
                tracing::warn!(
                    brand = %candidate.brand,
                    product = %candidate.product,
                    shade = %candidate.shade_name,
                    "skipping shade: {e}"
                );
                return None;
            }
        };

        let undertone = candidate
            .undertone
            .unwrap_or_else(|| self.undertone_policy.classify(lab));
        let depth = candidate.depth.unwrap_or_else(|| depth_bucket(lab));

        let color_distance = self.metric.distance(target.lab, lab);
        let match_percentage = self.match_policy.percentage(color_distance);
        let undertone_compat = undertone_compatibility(target.undertone, undertone);
        let depth_compat = depth_compatibility(target.depth, depth);
        let preference = preference_multiplier(candidate, prefs);
        let quality = (self.weights.quality > 0.0)
            .then(|| quality_score(candidate.rating, candidate.review_count));

        let w = &self.weights;
        let overall_score = w.color * match_percentage / 100.0
            + w.undertone * undertone_compat
            + w.depth * depth_compat
            + w.preference * preference / MAX_PREFERENCE_BOOST
            + w.quality * quality.unwrap_or(0.0);

        Some(ShadeMatch {
            candidate: candidate.clone(),
            lab,
            undertone,
            depth,
            color_distance,
            match_percentage,
            undertone_compatibility: undertone_compat,
            depth_compatibility: depth_compat,
            preference_score: preference,
            quality_score: quality,
            overall_score,
        })
    }

    /// Score a whole catalog, best first. Unusable entries are dropped.
    pub fn score(
        &self,
        target: &ShadeTarget,
        catalog: &[ShadeCandidate],
        prefs: Option<&UserPreferences>,
    ) -> Vec<ShadeMatch> {
        #[cfg(feature = "parallel")]
        let mut matches: Vec<ShadeMatch> = catalog
            .par_iter()
            .filter_map(|candidate| self.score_candidate(target, candidate, prefs))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let mut matches: Vec<ShadeMatch> = catalog
            .iter()
            .filter_map(|candidate| self.score_candidate(target, candidate, prefs))
            .collect();

        if matches.is_empty() {
            tracing::debug!(catalog = catalog.len(), "no usable shades to score");
        }

        rank(&mut matches);
        tracing::debug!(
            catalog = catalog.len(),
            scored = matches.len(),
            "scored catalog"
        );
        matches
    }

    /// Score an externally fed candidate stream, checking `cancel` between entries
    pub fn score_stream<I>(
        &self,
        target: &ShadeTarget,
        candidates: I,
        prefs: Option<&UserPreferences>,
        cancel: &AtomicBool,
    ) -> Result<Vec<ShadeMatch>>
    where
        I: IntoIterator<Item = ShadeCandidate>,
    {
        let mut matches = Vec::new();
        for candidate in candidates {
            if cancel.load(Ordering::Relaxed) {
                tracing::debug!(scored = matches.len(), "scoring cancelled");
                return Err(MatchError::Cancelled);
            }
            if let Some(m) = self.score_candidate(target, &candidate, prefs) {
                matches.push(m);
            }
        }
        rank(&mut matches);
        Ok(matches)
    }

    /// Highest scoring shade, or `EmptyCatalog` when nothing is usable
    pub fn best(
        &self,
        target: &ShadeTarget,
        catalog: &[ShadeCandidate],
        prefs: Option<&UserPreferences>,
    ) -> Result<ShadeMatch> {
        self.score(target, catalog, prefs)
            .into_iter()
            .next()
            .ok_or(MatchError::EmptyCatalog)
    }
}

/// Stable sort, highest overall score first
fn rank(matches: &mut [ShadeMatch]) {
    matches.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
}
