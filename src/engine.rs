use std::sync::atomic::AtomicBool;

use crate::config::EngineConfig;
use crate::models::{
    DualPointAnalysis, PairedShadeMatch, Recommendations, Result, RgbColor, ShadeCandidate,
    ShadeMatch, SkinToneAnalysis, UserPreferences,
};
use crate::services::color_space::{parse_hex, rgb_to_lab};
use crate::services::grouping::group_recommendations;
use crate::services::pairing::{analyze_dual_point, match_dual_point, rank_dual_point};
use crate::services::sampling::SampleReducer;
use crate::services::shade_scoring::{ScoringWeights, ShadeScorer, ShadeTarget};
use crate::services::tone::classify;

/// Shade matching engine. Construct one per configuration and share it by
/// reference; it holds no mutable state.
#[derive(Debug, Clone)]
pub struct ShadeMatchEngine {
    config: EngineConfig,
    scorer: ShadeScorer,
    sampler: SampleReducer,
}

impl Default for ShadeMatchEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl ShadeMatchEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let scorer = ShadeScorer::new(
            ScoringWeights::for_mode(config.scoring_mode),
            config.match_percentage,
            config.undertone_policy,
        )
        .with_metric(config.distance_metric)
        .available_only(config.available_only);
        let sampler = SampleReducer::new(config.min_samples);

        Self {
            config,
            scorer,
            sampler,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze an 8-bit color. `confidence` defaults to 1.0 and is clamped to [0, 1].
    pub fn analyze_rgb(&self, rgb: RgbColor, confidence: Option<f64>) -> SkinToneAnalysis {
        let lab = rgb_to_lab(rgb);
        let profile = classify(lab, &self.config.undertone_policy);
        SkinToneAnalysis {
            hex: rgb.to_hex(),
            rgb,
            lab,
            undertone: profile.undertone,
            depth: profile.depth,
            depth_scale: profile.depth_scale,
            confidence: confidence.unwrap_or(1.0).clamp(0.0, 1.0),
        }
    }

    pub fn analyze_hex(&self, hex: &str, confidence: Option<f64>) -> Result<SkinToneAnalysis> {
        let rgb = parse_hex(hex)?;
        Ok(self.analyze_rgb(rgb, confidence))
    }

    /// Reduce sampled pixels to a single analyzed tone
    pub fn analyze_samples(&self, samples: &[RgbColor]) -> Result<SkinToneAnalysis> {
        self.sampler.reduce(samples, &self.config.undertone_policy)
    }

    pub fn analyze_dual_point(
        &self,
        primary_hex: &str,
        secondary_hex: &str,
    ) -> Result<DualPointAnalysis> {
        let primary = self.analyze_hex(primary_hex, None)?;
        let secondary = self.analyze_hex(secondary_hex, None)?;
        Ok(analyze_dual_point(primary, secondary))
    }

    /// Rank the catalog against one analyzed tone, best first
    pub fn match_shades(
        &self,
        target: &SkinToneAnalysis,
        catalog: &[ShadeCandidate],
        prefs: Option<&UserPreferences>,
    ) -> Vec<ShadeMatch> {
        self.scorer.score(&ShadeTarget::from(target), catalog, prefs)
    }

    pub fn match_hex(
        &self,
        hex: &str,
        catalog: &[ShadeCandidate],
        prefs: Option<&UserPreferences>,
    ) -> Result<Vec<ShadeMatch>> {
        let target = self.analyze_hex(hex, None)?;
        Ok(self.match_shades(&target, catalog, prefs))
    }

    pub fn best_match(
        &self,
        target: &SkinToneAnalysis,
        catalog: &[ShadeCandidate],
        prefs: Option<&UserPreferences>,
    ) -> Result<ShadeMatch> {
        self.scorer.best(&ShadeTarget::from(target), catalog, prefs)
    }

    /// Score candidates as they arrive, stopping with `Cancelled` once `cancel` is set
    pub fn match_stream<I>(
        &self,
        target: &SkinToneAnalysis,
        candidates: I,
        prefs: Option<&UserPreferences>,
        cancel: &AtomicBool,
    ) -> Result<Vec<ShadeMatch>>
    where
        I: IntoIterator<Item = ShadeCandidate>,
    {
        self.scorer
            .score_stream(&ShadeTarget::from(target), candidates, prefs, cancel)
    }

    pub fn match_dual_point(
        &self,
        analysis: &DualPointAnalysis,
        catalog: &[ShadeCandidate],
        prefs: Option<&UserPreferences>,
    ) -> Vec<PairedShadeMatch> {
        match_dual_point(
            &self.scorer,
            analysis,
            catalog,
            prefs,
            &self.config.pairing(),
        )
    }

    /// Paired matches plus brand-diverse groups for presentation. Groups are
    /// built from every ranked pair; only the returned pair list is cut to
    /// `pair_limit`.
    pub fn recommend(
        &self,
        analysis: &DualPointAnalysis,
        catalog: &[ShadeCandidate],
        prefs: Option<&UserPreferences>,
    ) -> Recommendations {
        let mut pairs = rank_dual_point(
            &self.scorer,
            analysis,
            catalog,
            prefs,
            self.config.per_tone_limit,
        );
        let groups = group_recommendations(&pairs, &self.config.grouping());
        pairs.truncate(self.config.pair_limit);
        tracing::debug!(
            analysis = %analysis.id,
            pairs = pairs.len(),
            groups = groups.len(),
            "built recommendations"
        );
        Recommendations { pairs, groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DepthBucket, MatchError, Undertone};

    #[test]
    fn test_new_validates_config() {
        let config = EngineConfig {
            pair_limit: 0,
            ..Default::default()
        };
        assert!(matches!(
            ShadeMatchEngine::new(config),
            Err(MatchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_analyze_hex() {
        let engine = ShadeMatchEngine::default();
        let analysis = engine.analyze_hex("d4a574", Some(1.7)).unwrap();
        assert_eq!(analysis.hex, "#D4A574");
        assert_eq!(analysis.undertone, Undertone::Warm);
        assert_eq!(analysis.depth, DepthBucket::Light);
        assert_eq!(analysis.confidence, 1.0);
    }

    #[test]
    fn test_invalid_target_is_fatal() {
        let engine = ShadeMatchEngine::default();
        let catalog = vec![ShadeCandidate::new("A", "Line", "1", "#D4A574")];
        assert!(matches!(
            engine.match_hex("#NOPE00", &catalog, None),
            Err(MatchError::InvalidColorFormat { .. })
        ));
        assert!(engine.analyze_dual_point("#D4A574", "oops").is_err());
    }

    #[test]
    fn test_dual_point_delta_e_and_consistency() {
        let engine = ShadeMatchEngine::default();
        let analysis = engine.analyze_dual_point("#D4A574", "#D4A574").unwrap();
        assert_eq!(analysis.delta_e, 0.0);
        assert!(analysis.undertone_consistency);
    }
}
