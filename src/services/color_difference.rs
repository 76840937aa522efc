//! Perceptual color difference (CIE76 and CIEDE2000)

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::models::LabColor;

/// 25^7, used by the chroma compensation terms
const POW25_7: f64 = 6_103_515_625.0;

/// Euclidean distance in Lab (CIE76)
pub fn delta_e_76(lab1: LabColor, lab2: LabColor) -> f64 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// Hue angle in radians, 0..2π
#[inline]
fn hue_radians(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        0.0
    } else {
        b.atan2(a).rem_euclid(2.0 * PI)
    }
}

/// CIEDE2000 color difference with kL = kC = kH = 1
pub fn delta_e_2000(lab1: LabColor, lab2: LabColor) -> f64 {
    const KL: f64 = 1.0;
    const KC: f64 = 1.0;
    const KH: f64 = 1.0;

    let c1 = lab1.a.hypot(lab1.b);
    let c2 = lab2.a.hypot(lab2.b);
    let c_bar7 = ((c1 + c2) / 2.0).powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt());

    let a1p = lab1.a * (1.0 + g);
    let a2p = lab2.a * (1.0 + g);
    let c1p = a1p.hypot(lab1.b);
    let c2p = a2p.hypot(lab2.b);
    let h1p = hue_radians(a1p, lab1.b);
    let h2p = hue_radians(a2p, lab2.b);

    let delta_lp = lab2.l - lab1.l;
    let delta_cp = c2p - c1p;

    let chroma_product = c1p * c2p;
    let delta_hp = if chroma_product == 0.0 {
        0.0
    } else {
        let dh = h2p - h1p;
        if dh > PI {
            dh - 2.0 * PI
        } else if dh < -PI {
            dh + 2.0 * PI
        } else {
            dh
        }
    };
    let delta_big_hp = 2.0 * chroma_product.sqrt() * (delta_hp / 2.0).sin();

    let l_bar = (lab1.l + lab2.l) / 2.0;
    let cp_bar = (c1p + c2p) / 2.0;
    let hp_bar = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= PI {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 2.0 * PI {
        (h1p + h2p + 2.0 * PI) / 2.0
    } else {
        (h1p + h2p - 2.0 * PI) / 2.0
    };

    let t = 1.0 - 0.17 * (hp_bar - 30f64.to_radians()).cos()
        + 0.24 * (2.0 * hp_bar).cos()
        + 0.32 * (3.0 * hp_bar + 6f64.to_radians()).cos()
        - 0.20 * (4.0 * hp_bar - 63f64.to_radians()).cos();

    let l_dev = (l_bar - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l_dev / (20.0 + l_dev).sqrt();
    let sc = 1.0 + 0.045 * cp_bar;
    let sh = 1.0 + 0.015 * cp_bar * t;

    let delta_theta = 30f64.to_radians() * (-((hp_bar.to_degrees() - 275.0) / 25.0).powi(2)).exp();
    let cp_bar7 = cp_bar.powi(7);
    let rc = 2.0 * (cp_bar7 / (cp_bar7 + POW25_7)).sqrt();
    let rt = -(2.0 * delta_theta).sin() * rc;

    let term_l = delta_lp / (KL * sl);
    let term_c = delta_cp / (KC * sc);
    let term_h = delta_big_hp / (KH * sh);

    (term_l * term_l + term_c * term_c + term_h * term_h + rt * term_c * term_h)
        .max(0.0)
        .sqrt()
}

/// Which difference formula a caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Fast Euclidean distance for first-pass work
    Cie76,
    #[default]
    Ciede2000,
}

impl DistanceMetric {
    pub fn distance(&self, lab1: LabColor, lab2: LabColor) -> f64 {
        match self {
            DistanceMetric::Cie76 => delta_e_76(lab1, lab2),
            DistanceMetric::Ciede2000 => delta_e_2000(lab1, lab2),
        }
    }
}

/// Linear mapping from delta E to a 0-100 match percentage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchPercentagePolicy {
    /// Percentage points lost per unit of delta E
    pub scale: f64,
}

impl MatchPercentagePolicy {
    pub const STANDARD: Self = Self { scale: 2.0 };
    pub const STRICT: Self = Self { scale: 5.0 };

    pub fn percentage(&self, delta_e: f64) -> f64 {
        (100.0 - self.scale * delta_e).clamp(0.0, 100.0)
    }
}

impl Default for MatchPercentagePolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Perceptual quality band of a delta E value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl MatchQuality {
    pub fn from_delta_e(delta_e: f64) -> Self {
        if delta_e < 2.0 {
            MatchQuality::Excellent
        } else if delta_e < 7.0 {
            MatchQuality::Good
        } else if delta_e < 12.0 {
            MatchQuality::Fair
        } else {
            MatchQuality::Poor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sharma, Wu & Dalal (2005) reference pairs
    const REFERENCE_PAIRS: [(f64, f64, f64, f64, f64, f64, f64); 34] = [
        (50.0, 2.6772, -79.7751, 50.0, 0.0, -82.7485, 2.0425),
        (50.0, 3.1571, -77.2803, 50.0, 0.0, -82.7485, 2.8615),
        (50.0, 2.8361, -74.0200, 50.0, 0.0, -82.7485, 3.4412),
        (50.0, -1.3802, -84.2814, 50.0, 0.0, -82.7485, 1.0000),
        (50.0, -1.1848, -84.8006, 50.0, 0.0, -82.7485, 1.0000),
        (50.0, -0.9009, -85.5211, 50.0, 0.0, -82.7485, 1.0000),
        (50.0, 0.0, 0.0, 50.0, -1.0, 2.0, 2.3669),
        (50.0, -1.0, 2.0, 50.0, 0.0, 0.0, 2.3669),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0009, 7.1792),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0010, 7.1792),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0011, 7.2195),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0012, 7.2195),
        (50.0, -0.0010, 2.4900, 50.0, 0.0009, -2.4900, 4.8045),
        (50.0, -0.0010, 2.4900, 50.0, 0.0010, -2.4900, 4.8045),
        (50.0, -0.0010, 2.4900, 50.0, 0.0011, -2.4900, 4.7461),
        (50.0, 2.5, 0.0, 50.0, 0.0, -2.5, 4.3065),
        (50.0, 2.5, 0.0, 73.0, 25.0, -18.0, 27.1492),
        (50.0, 2.5, 0.0, 61.0, -5.0, 29.0, 22.8977),
        (50.0, 2.5, 0.0, 56.0, -27.0, -3.0, 31.9030),
        (50.0, 2.5, 0.0, 58.0, 24.0, 15.0, 19.4535),
        (50.0, 2.5, 0.0, 50.0, 3.1736, 0.5854, 1.0000),
        (50.0, 2.5, 0.0, 50.0, 3.2972, 0.0, 1.0000),
        (50.0, 2.5, 0.0, 50.0, 1.8634, 0.5757, 1.0000),
        (50.0, 2.5, 0.0, 50.0, 3.2592, 0.3350, 1.0000),
        (60.2574, -34.0099, 36.2677, 60.4626, -34.1751, 39.4387, 1.2644),
        (63.0109, -31.0961, -5.8663, 62.8187, -29.7946, -4.0864, 1.2630),
        (61.2901, 3.7196, -5.3901, 61.4292, 2.2480, -4.9620, 1.8731),
        (35.0831, -44.1164, 3.7933, 35.0232, -40.0716, 1.5901, 1.8645),
        (22.7233, 20.0904, -46.6940, 23.0331, 14.9730, -42.5619, 2.0373),
        (36.4612, 47.8580, 18.3852, 36.2715, 50.5065, 21.2231, 1.4146),
        (90.8027, -2.0831, 1.4410, 91.1528, -1.6435, 0.0447, 1.4441),
        (90.9257, -0.5406, -0.9208, 88.6381, -0.8985, -0.7239, 1.5381),
        (6.7747, -0.2908, -2.4247, 5.8714, -0.0985, -2.2286, 0.6377),
        (2.0776, 0.0795, -1.1350, 0.9033, -0.0636, -0.5514, 0.9082),
    ];

    #[test]
    fn test_ciede2000_reference_pairs() {
        for (i, &(l1, a1, b1, l2, a2, b2, expected)) in REFERENCE_PAIRS.iter().enumerate() {
            let lab1 = LabColor::new(l1, a1, b1);
            let lab2 = LabColor::new(l2, a2, b2);
            let forward = delta_e_2000(lab1, lab2);
            let backward = delta_e_2000(lab2, lab1);
            assert!(
                (forward - expected).abs() < 5e-4,
                "pair {}: expected {:.4}, got {:.4}",
                i + 1,
                expected,
                forward
            );
            assert!((forward - backward).abs() < 1e-9, "pair {} not symmetric", i + 1);
        }
    }

    #[test]
    fn test_identity() {
        let lab = LabColor::new(70.99, 11.14, 31.99);
        assert_eq!(delta_e_2000(lab, lab), 0.0);
        assert_eq!(delta_e_76(lab, lab), 0.0);
    }

    #[test]
    fn test_cie76_is_euclidean() {
        let d = delta_e_76(LabColor::new(50.0, 0.0, 0.0), LabColor::new(53.0, 4.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_metric_dispatch() {
        let a = LabColor::new(50.0, 2.5, 0.0);
        let b = LabColor::new(58.0, 24.0, 15.0);
        assert_eq!(DistanceMetric::Cie76.distance(a, b), delta_e_76(a, b));
        assert_eq!(DistanceMetric::default().distance(a, b), delta_e_2000(a, b));
    }

    #[test]
    fn test_match_percentage_policies() {
        assert_eq!(MatchPercentagePolicy::STANDARD.percentage(0.0), 100.0);
        assert_eq!(MatchPercentagePolicy::STANDARD.percentage(10.0), 80.0);
        assert_eq!(MatchPercentagePolicy::STRICT.percentage(10.0), 50.0);
        assert_eq!(MatchPercentagePolicy::STRICT.percentage(40.0), 0.0);
    }

    #[test]
    fn test_match_quality_bands() {
        assert_eq!(MatchQuality::from_delta_e(0.5), MatchQuality::Excellent);
        assert_eq!(MatchQuality::from_delta_e(6.1), MatchQuality::Good);
        assert_eq!(MatchQuality::from_delta_e(9.0), MatchQuality::Fair);
        assert_eq!(MatchQuality::from_delta_e(30.0), MatchQuality::Poor);
        assert!(MatchQuality::Excellent < MatchQuality::Poor);
    }
}
