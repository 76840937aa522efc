//! Undertone and depth classification from L*a*b*

use serde::{Deserialize, Serialize};

use crate::models::{DepthBucket, LabColor, Undertone};

/// Threshold set used to classify undertone from a* and b*
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UndertonePolicy {
    /// Olive requires a* below this...
    pub olive_max_a: f64,
    /// ...and |b*| below this
    pub olive_max_abs_b: f64,
    pub cool_max_a: f64,
    pub warm_min_a: f64,
    pub warm_min_b: f64,
}

impl UndertonePolicy {
    /// Thresholds for colors sampled and averaged in Lab
    pub const LAB_STANDARD: Self = Self {
        olive_max_a: -2.0,
        olive_max_abs_b: 3.0,
        cool_max_a: -2.0,
        warm_min_a: 2.0,
        warm_min_b: 5.0,
    };

    /// Wider bands for colors taken straight from camera images
    pub const IMAGE_DERIVED: Self = Self {
        olive_max_a: -4.0,
        olive_max_abs_b: 6.0,
        cool_max_a: -4.0,
        warm_min_a: 4.0,
        warm_min_b: 10.0,
    };

    pub fn classify(&self, lab: LabColor) -> Undertone {
        if lab.a < self.olive_max_a && lab.b.abs() < self.olive_max_abs_b {
            Undertone::Olive
        } else if lab.a < self.cool_max_a {
            Undertone::Cool
        } else if lab.a > self.warm_min_a && lab.b > self.warm_min_b {
            Undertone::Warm
        } else {
            Undertone::Neutral
        }
    }
}

impl Default for UndertonePolicy {
    fn default() -> Self {
        Self::LAB_STANDARD
    }
}

/// Lower L* bound of each bucket, lightest first; anything below the last is very deep
const DEPTH_LIGHTNESS_FLOORS: [(DepthBucket, f64); 5] = [
    (DepthBucket::Fair, 75.0),
    (DepthBucket::Light, 65.0),
    (DepthBucket::Medium, 55.0),
    (DepthBucket::Tan, 45.0),
    (DepthBucket::Deep, 35.0),
];

pub fn depth_bucket(lab: LabColor) -> DepthBucket {
    DEPTH_LIGHTNESS_FLOORS
        .iter()
        .find(|(_, floor)| lab.l >= *floor)
        .map(|(bucket, _)| *bucket)
        .unwrap_or(DepthBucket::VeryDeep)
}

/// Continuous 1-10 depth, 1 = lightest
pub fn depth_scale(lab: LabColor) -> f64 {
    (1.0 + 9.0 * (100.0 - lab.l) / 100.0).clamp(1.0, 10.0)
}

/// Undertone and depth of one color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneProfile {
    pub undertone: Undertone,
    pub depth: DepthBucket,
    pub depth_scale: f64,
}

pub fn classify(lab: LabColor, policy: &UndertonePolicy) -> ToneProfile {
    ToneProfile {
        undertone: policy.classify(lab),
        depth: depth_bucket(lab),
        depth_scale: depth_scale(lab),
    }
}

/// Symmetric compatibility between two undertones, 1.0 = identical
pub fn undertone_compatibility(a: Undertone, b: Undertone) -> f64 {
    use Undertone::*;

    match (a, b) {
        (Cool, Cool) | (Neutral, Neutral) | (Warm, Warm) | (Olive, Olive) => 1.0,
        (Neutral, _) | (_, Neutral) => 0.85,
        (Olive, Warm) | (Warm, Olive) => 0.6,
        (Olive, Cool) | (Cool, Olive) => 0.5,
        (Cool, Warm) | (Warm, Cool) => 0.3,
    }
}

/// Compatibility by number of depth bands apart
pub fn depth_compatibility(a: DepthBucket, b: DepthBucket) -> f64 {
    match a.distance(b) {
        0 => 1.0,
        1 => 0.9,
        2 => 0.7,
        3 => 0.5,
        4 => 0.4,
        _ => 0.3,
    }
}
