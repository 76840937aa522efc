//! Dual-point pairing: primary and secondary shades recommended together
//!
//! Both tones are ranked independently, the top results are crossed, and pairs
//! from the same brand or product line get a multiplicative discount on their
//! mean delta E.

use std::cmp::Ordering;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    DualPointAnalysis, PairedShadeMatch, ShadeCandidate, ShadeMatch, SkinToneAnalysis,
    UserPreferences,
};
use crate::services::color_difference::delta_e_2000;
use crate::services::shade_scoring::{ShadeScorer, ShadeTarget};

pub const SAME_PRODUCT_BONUS: f64 = 0.8;
pub const SAME_BRAND_BONUS: f64 = 0.9;

/// Limits applied while pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingOptions {
    /// Ranked shades kept per tone before crossing
    pub per_tone_limit: usize,
    /// Pairs returned
    pub pair_limit: usize,
}

impl Default for PairingOptions {
    fn default() -> Self {
        Self {
            per_tone_limit: 20,
            pair_limit: 50,
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn same_brand(a: &ShadeCandidate, b: &ShadeCandidate) -> bool {
    normalize(&a.brand) == normalize(&b.brand)
}

pub fn same_product(a: &ShadeCandidate, b: &ShadeCandidate) -> bool {
    same_brand(a, b) && normalize(&a.product) == normalize(&b.product)
}

/// Discount on the pair score, lower is better
pub fn pair_bonus(brand_consistency: bool, product_consistency: bool) -> f64 {
    if product_consistency {
        SAME_PRODUCT_BONUS
    } else if brand_consistency {
        SAME_BRAND_BONUS
    } else {
        1.0
    }
}

pub fn build_pair(primary: ShadeMatch, secondary: ShadeMatch) -> PairedShadeMatch {
    let brand_consistency = same_brand(&primary.candidate, &secondary.candidate);
    let product_consistency = same_product(&primary.candidate, &secondary.candidate);
    let mean_distance = (primary.color_distance + secondary.color_distance) / 2.0;

    PairedShadeMatch {
        overall_score: mean_distance * pair_bonus(brand_consistency, product_consistency),
        primary,
        secondary,
        brand_consistency,
        product_consistency,
    }
}

/// Same product first, then same brand, then lowest score
pub fn compare_pairs(a: &PairedShadeMatch, b: &PairedShadeMatch) -> Ordering {
    b.product_consistency
        .cmp(&a.product_consistency)
        .then_with(|| b.brand_consistency.cmp(&a.brand_consistency))
        .then_with(|| a.overall_score.total_cmp(&b.overall_score))
}

/// Cross the top `per_tone_limit` of two ranked lists into every pair, sorted
/// by `compare_pairs` but not truncated
pub fn rank_pairs(
    primary: &[ShadeMatch],
    secondary: &[ShadeMatch],
    per_tone_limit: usize,
) -> Vec<PairedShadeMatch> {
    let primary = &primary[..primary.len().min(per_tone_limit)];
    let secondary = &secondary[..secondary.len().min(per_tone_limit)];

    let mut pairs: Vec<PairedShadeMatch> = primary
        .iter()
        .flat_map(|p| secondary.iter().map(move |s| build_pair(p.clone(), s.clone())))
        .collect();
    pairs.sort_by(compare_pairs);

    tracing::debug!(
        primary = primary.len(),
        secondary = secondary.len(),
        pairs = pairs.len(),
        "paired shades"
    );
    pairs
}

/// Cross two ranked lists into sorted pairs, cut to `pair_limit`
pub fn pair_matches(
    primary: &[ShadeMatch],
    secondary: &[ShadeMatch],
    options: &PairingOptions,
) -> Vec<PairedShadeMatch> {
    let mut pairs = rank_pairs(primary, secondary, options.per_tone_limit);
    pairs.truncate(options.pair_limit);
    pairs
}

/// Every ranked pair for both tones of an analysis, before the pair limit
pub fn rank_dual_point(
    scorer: &ShadeScorer,
    analysis: &DualPointAnalysis,
    catalog: &[ShadeCandidate],
    prefs: Option<&UserPreferences>,
    per_tone_limit: usize,
) -> Vec<PairedShadeMatch> {
    let primary = scorer.score(&ShadeTarget::from(&analysis.primary), catalog, prefs);
    let secondary = scorer.score(&ShadeTarget::from(&analysis.secondary), catalog, prefs);
    rank_pairs(&primary, &secondary, per_tone_limit)
}

/// Rank the catalog against both tones of an analysis and pair the results
pub fn match_dual_point(
    scorer: &ShadeScorer,
    analysis: &DualPointAnalysis,
    catalog: &[ShadeCandidate],
    prefs: Option<&UserPreferences>,
    options: &PairingOptions,
) -> Vec<PairedShadeMatch> {
    let mut pairs = rank_dual_point(scorer, analysis, catalog, prefs, options.per_tone_limit);
    pairs.truncate(options.pair_limit);
    pairs
}

pub fn analyze_dual_point(
    primary: SkinToneAnalysis,
    secondary: SkinToneAnalysis,
) -> DualPointAnalysis {
    DualPointAnalysis {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        delta_e: delta_e_2000(primary.lab, secondary.lab),
        undertone_consistency: primary.undertone == secondary.undertone,
        primary,
        secondary,
    }
}
