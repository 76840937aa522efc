//! Reduction of sampled skin pixels to one representative tone
//!
//! Samples are converted to Lab, trimmed per channel to a percentile band,
//! and aggregated with a median lightness and mean chromaticity.

use crate::models::{LabColor, MatchError, Result, RgbColor, SkinToneAnalysis};
use crate::services::color_difference::delta_e_76;
use crate::services::color_space::{lab_to_rgb, rgb_to_lab};
use crate::services::tone::{classify, UndertonePolicy};

pub const DEFAULT_MIN_SAMPLES: usize = 10;
const PERCENTILE_LOW: f64 = 15.0;
const PERCENTILE_HIGH: f64 = 85.0;

/// Turns raw pixel samples into a `SkinToneAnalysis`
#[derive(Debug, Clone)]
pub struct SampleReducer {
    min_samples: usize,
    percentile_low: f64,
    percentile_high: f64,
}

impl Default for SampleReducer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SAMPLES)
    }
}

impl SampleReducer {
    pub fn new(min_samples: usize) -> Self {
        Self {
            min_samples,
            percentile_low: PERCENTILE_LOW,
            percentile_high: PERCENTILE_HIGH,
        }
    }

    pub fn reduce(
        &self,
        samples: &[RgbColor],
        policy: &UndertonePolicy,
    ) -> Result<SkinToneAnalysis> {
        if samples.len() < self.min_samples.max(1) {
            return Err(MatchError::InsufficientSampleData {
                found: samples.len(),
                required: self.min_samples.max(1),
            });
        }

        let labs: Vec<LabColor> = samples.iter().copied().map(rgb_to_lab).collect();
        let mut kept = self.remove_outliers(&labs);
        if kept.is_empty() {
            tracing::debug!(samples = labs.len(), "percentile filter removed every sample");
            kept = labs;
        }

        let lab = representative(&kept);
        let spread = rms_spread(&kept, lab);
        let confidence = confidence(samples.len(), kept.len(), spread);
        let rgb = lab_to_rgb(lab);
        let profile = classify(lab, policy);

        tracing::debug!(
            samples = samples.len(),
            kept = kept.len(),
            spread,
            confidence,
            "reduced samples"
        );

        Ok(SkinToneAnalysis {
            hex: rgb.to_hex(),
            rgb,
            lab,
            undertone: profile.undertone,
            depth: profile.depth,
            depth_scale: profile.depth_scale,
            confidence,
        })
    }

    /// Keep samples inside the percentile band on every channel
    fn remove_outliers(&self, labs: &[LabColor]) -> Vec<LabColor> {
        let l = self.band(labs.iter().map(|c| c.l).collect());
        let a = self.band(labs.iter().map(|c| c.a).collect());
        let b = self.band(labs.iter().map(|c| c.b).collect());

        labs.iter()
            .copied()
            .filter(|c| {
                (l.0..=l.1).contains(&c.l) && (a.0..=a.1).contains(&c.a) && (b.0..=b.1).contains(&c.b)
            })
            .collect()
    }

    fn band(&self, mut values: Vec<f64>) -> (f64, f64) {
        values.sort_by(f64::total_cmp);
        let last = values.len() - 1;
        let at = |p: f64| ((values.len() as f64 * p / 100.0) as usize).min(last);
        (values[at(self.percentile_low)], values[at(self.percentile_high)])
    }
}

/// Median L*, mean a* and b*
fn representative(labs: &[LabColor]) -> LabColor {
    let mut lightness: Vec<f64> = labs.iter().map(|c| c.l).collect();
    lightness.sort_by(f64::total_cmp);
    let n = labs.len() as f64;

    LabColor::new(
        lightness[lightness.len() / 2],
        labs.iter().map(|c| c.a).sum::<f64>() / n,
        labs.iter().map(|c| c.b).sum::<f64>() / n,
    )
}

fn rms_spread(labs: &[LabColor], center: LabColor) -> f64 {
    let sum: f64 = labs.iter().map(|c| delta_e_76(*c, center).powi(2)).sum();
    (sum / labs.len() as f64).sqrt()
}

fn confidence(total: usize, kept: usize, spread: f64) -> f64 {
    let size_score: f64 = if total >= 1000 {
        1.0
    } else if total >= 100 {
        0.8
    } else {
        0.5
    };
    let spread_score: f64 = if spread < 5.0 {
        1.0
    } else if spread < 10.0 {
        0.7
    } else {
        0.4
    };
    let retained = kept as f64 / total as f64;
    let agreement_score: f64 = if retained >= 0.5 {
        1.0
    } else if retained >= 0.25 {
        0.8
    } else {
        0.6
    };

    (0.4 * size_score + 0.3 * spread_score + 0.3 * agreement_score).clamp(0.0, 1.0)
}
