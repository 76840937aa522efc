use serde::{Deserialize, Serialize};

use super::color::LabColor;
use super::tone::{DepthBucket, Undertone};

/// Product coverage level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    Light,
    Medium,
    Full,
}

impl Coverage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Coverage::Light => "light",
            Coverage::Medium => "medium",
            Coverage::Full => "full",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" | "sheer" => Some(Coverage::Light),
            "medium" => Some(Coverage::Medium),
            "full" => Some(Coverage::Full),
            _ => None,
        }
    }

    /// Classify coverage from product-line name keywords
    pub fn from_product_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let words: Vec<&str> = name
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has = |keys: &[&str]| words.iter().any(|w| keys.contains(w));

        if has(&["sheer", "tint", "tinted", "bb", "cc"]) {
            Coverage::Light
        } else if has(&["full", "maximum", "complete"]) {
            Coverage::Full
        } else {
            Coverage::Medium
        }
    }
}

/// Product finish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    Matte,
    Satin,
    Natural,
    Dewy,
}

impl Finish {
    pub fn as_str(&self) -> &'static str {
        match self {
            Finish::Matte => "matte",
            Finish::Satin => "satin",
            Finish::Natural => "natural",
            Finish::Dewy => "dewy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "matte" => Some(Finish::Matte),
            "satin" => Some(Finish::Satin),
            "natural" => Some(Finish::Natural),
            "dewy" | "radiant" | "luminous" => Some(Finish::Dewy),
            _ => None,
        }
    }

    /// Infer finish from product name keywords, `Natural` when nothing matches
    pub fn from_product_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("matte") || name.contains("mattifying") || name.contains("oil-free") {
            Finish::Matte
        } else if ["dewy", "glow", "luminous", "radiant", "hydrating"]
            .iter()
            .any(|k| name.contains(k))
        {
            Finish::Dewy
        } else if name.contains("satin") || name.contains("velvet") {
            Finish::Satin
        } else {
            Finish::Natural
        }
    }
}

/// Skin type used to weight finish preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinType {
    Oily,
    Dry,
    Combination,
    Normal,
    Sensitive,
}

impl SkinType {
    pub const ALL: [SkinType; 5] = [
        SkinType::Oily,
        SkinType::Dry,
        SkinType::Combination,
        SkinType::Normal,
        SkinType::Sensitive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkinType::Oily => "oily",
            SkinType::Dry => "dry",
            SkinType::Combination => "combination",
            SkinType::Normal => "normal",
            SkinType::Sensitive => "sensitive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "oily" => Some(SkinType::Oily),
            "dry" => Some(SkinType::Dry),
            "combination" => Some(SkinType::Combination),
            "normal" => Some(SkinType::Normal),
            "sensitive" => Some(SkinType::Sensitive),
            _ => None,
        }
    }

}

/// Optional user preferences applied as a score boost
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub skin_type: Option<SkinType>,
    #[serde(default)]
    pub preferred_coverage: Option<Coverage>,
    #[serde(default)]
    pub preferred_finish: Option<Finish>,
}

fn default_available() -> bool {
    true
}

/// A catalog shade as supplied by the catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadeCandidate {
    #[serde(default)]
    pub id: Option<String>,
    pub brand: String,
    pub product: String,
    pub shade_name: String,
    #[serde(default)]
    pub hex: Option<String>,
    #[serde(default)]
    pub lab: Option<LabColor>,
    #[serde(default)]
    pub undertone: Option<Undertone>,
    #[serde(default)]
    pub depth: Option<DepthBucket>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

impl ShadeCandidate {
    /// Minimal available candidate with a hex color
    pub fn new(
        brand: impl Into<String>,
        product: impl Into<String>,
        shade_name: impl Into<String>,
        hex: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            brand: brand.into(),
            product: product.into(),
            shade_name: shade_name.into(),
            hex: Some(hex.into()),
            lab: None,
            undertone: None,
            depth: None,
            price: None,
            available: true,
            rating: None,
            review_count: None,
        }
    }
}

/// One candidate scored against one target color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadeMatch {
    pub candidate: ShadeCandidate,
    pub lab: LabColor,
    pub undertone: Undertone,
    pub depth: DepthBucket,
    /// Delta E to the target (lower is closer)
    pub color_distance: f64,
    /// 0-100
    pub match_percentage: f64,
    pub undertone_compatibility: f64,
    pub depth_compatibility: f64,
    /// Preference multiplier, 0.5-1.5
    pub preference_score: f64,
    pub quality_score: Option<f64>,
    /// Weighted score in [0, 1], higher is better
    pub overall_score: f64,
}

impl ShadeMatch {
    pub fn brand(&self) -> &str {
        &self.candidate.brand
    }

    pub fn product(&self) -> &str {
        &self.candidate.product
    }
}

/// Primary and secondary shades recommended together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedShadeMatch {
    pub primary: ShadeMatch,
    pub secondary: ShadeMatch,
    /// Mean delta E scaled by the pair discount (lower is better)
    pub overall_score: f64,
    pub brand_consistency: bool,
    pub product_consistency: bool,
}

/// Pairs sharing a brand and product line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationGroup {
    pub brand: String,
    pub product_line: String,
    pub pairs: Vec<PairedShadeMatch>,
    /// Mean pair score over every member of the group (lower is better)
    pub group_score: f64,
    pub coverage: Coverage,
    /// Members before truncation
    pub total_pairs: usize,
}

/// Output of a full dual-point recommendation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub pairs: Vec<PairedShadeMatch>,
    pub groups: Vec<RecommendationGroup>,
}
