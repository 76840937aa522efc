use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::color::{LabColor, RgbColor};
use super::tone::{DepthBucket, Undertone};

/// One analyzed target color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinToneAnalysis {
    pub hex: String,
    pub rgb: RgbColor,
    pub lab: LabColor,
    pub undertone: Undertone,
    pub depth: DepthBucket,
    /// Continuous 1-10 depth scale, 1 lightest
    pub depth_scale: f64,
    /// 0.0-1.0
    pub confidence: f64,
}

/// Primary (facial) and secondary (shadow) tones analyzed together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualPointAnalysis {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub primary: SkinToneAnalysis,
    pub secondary: SkinToneAnalysis,
    /// CIEDE2000 between the two tones
    pub delta_e: f64,
    pub undertone_consistency: bool,
}
