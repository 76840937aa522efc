pub mod analysis;
pub mod color;
pub mod error;
pub mod shade;
pub mod tone;

pub use analysis::{DualPointAnalysis, SkinToneAnalysis};
pub use color::{LabColor, LchColor, RgbColor, XyzColor};
pub use error::{MatchError, Result};
pub use shade::{
    Coverage, Finish, PairedShadeMatch, RecommendationGroup, Recommendations, ShadeCandidate,
    ShadeMatch, SkinType, UserPreferences,
};
pub use tone::{DepthBucket, Undertone};
