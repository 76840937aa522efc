use std::fmt;

use serde::{Deserialize, Serialize};

/// Underlying cast of a skin tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Undertone {
    Cool,
    Neutral,
    Warm,
    Olive,
}

impl Undertone {
    pub const ALL: [Undertone; 4] = [
        Undertone::Cool,
        Undertone::Neutral,
        Undertone::Warm,
        Undertone::Olive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Undertone::Cool => "cool",
            Undertone::Neutral => "neutral",
            Undertone::Warm => "warm",
            Undertone::Olive => "olive",
        }
    }
}

impl fmt::Display for Undertone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named depth band, ordered lightest to darkest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthBucket {
    Fair,
    Light,
    Medium,
    Tan,
    Deep,
    VeryDeep,
}

impl DepthBucket {
    pub const ALL: [DepthBucket; 6] = [
        DepthBucket::Fair,
        DepthBucket::Light,
        DepthBucket::Medium,
        DepthBucket::Tan,
        DepthBucket::Deep,
        DepthBucket::VeryDeep,
    ];

    /// Position in the light-to-dark ordering
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Number of bands between two buckets
    pub fn distance(&self, other: DepthBucket) -> usize {
        self.index().abs_diff(other.index())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DepthBucket::Fair => "fair",
            DepthBucket::Light => "light",
            DepthBucket::Medium => "medium",
            DepthBucket::Tan => "tan",
            DepthBucket::Deep => "deep",
            DepthBucket::VeryDeep => "very-deep",
        }
    }
}

impl fmt::Display for DepthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_ordering_matches_index() {
        for pair in DepthBucket::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].index() + 1, pair[1].index());
        }
    }

    #[test]
    fn test_depth_distance_is_symmetric() {
        assert_eq!(DepthBucket::Fair.distance(DepthBucket::Tan), 3);
        assert_eq!(DepthBucket::Tan.distance(DepthBucket::Fair), 3);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&DepthBucket::VeryDeep).unwrap();
        assert_eq!(json, "\"very-deep\"");
        let undertone: Undertone = serde_json::from_str("\"olive\"").unwrap();
        assert_eq!(undertone, Undertone::Olive);
    }
}
