//! # shade_match
//!
//! Perceptual shade matching for skin tones: sRGB to CIE L*a*b* conversion,
//! CIE76 / CIEDE2000 color difference, undertone and depth classification,
//! multi-factor shade scoring, dual-point pairing and brand-diverse grouping.
//!
//! ```rust
//! use shade_match::{ShadeCandidate, ShadeMatchEngine};
//!
//! let engine = ShadeMatchEngine::default();
//! let catalog = vec![
//!     ShadeCandidate::new("Brand A", "Skin Tint", "Honey", "#D4A574"),
//!     ShadeCandidate::new("Brand B", "Full Cover", "Mocha", "#8D5524"),
//! ];
//! let matches = engine.match_hex("#D4A574", &catalog, None)?;
//! assert_eq!(matches[0].candidate.shade_name, "Honey");
//! # Ok::<(), shade_match::MatchError>(())
//! ```

pub mod config;
pub mod engine;
pub mod models;
pub mod services;

// Re-export for convenience
pub use config::EngineConfig;
pub use engine::ShadeMatchEngine;
pub use models::{
    Coverage, DepthBucket, DualPointAnalysis, Finish, LabColor, MatchError, PairedShadeMatch,
    RecommendationGroup, Recommendations, Result, RgbColor, ShadeCandidate, ShadeMatch,
    SkinToneAnalysis, SkinType, Undertone, UserPreferences,
};
pub use services::color_difference::{
    delta_e_2000, delta_e_76, DistanceMetric, MatchPercentagePolicy, MatchQuality,
};
pub use services::color_space::{hex_to_lab, parse_hex, rgb_to_lab};
pub use services::shade_scoring::{ScoringMode, ScoringWeights};
pub use services::tone::UndertonePolicy;
