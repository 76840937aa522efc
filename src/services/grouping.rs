//! Brand/product-line grouping of paired recommendations

use std::collections::{HashMap, HashSet};

use crate::models::{Coverage, PairedShadeMatch, RecommendationGroup};

/// Limits applied while grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingOptions {
    /// Groups returned, one per brand
    pub max_groups: usize,
    /// Pairs kept in each group
    pub pairs_per_group: usize,
}

impl Default for GroupingOptions {
    fn default() -> Self {
        Self {
            max_groups: 4,
            pairs_per_group: 3,
        }
    }
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Group pairs by the primary shade's brand and product line, then pick at
/// most one group per brand, best group score first
pub fn group_recommendations(
    pairs: &[PairedShadeMatch],
    options: &GroupingOptions,
) -> Vec<RecommendationGroup> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut buckets: Vec<Vec<&PairedShadeMatch>> = Vec::new();

    for pair in pairs {
        let group_key = (key(pair.primary.brand()), key(pair.primary.product()));
        let slot = *index.entry(group_key).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(pair);
    }

    let mut groups: Vec<RecommendationGroup> = buckets
        .into_iter()
        .map(|members| {
            let first = &members[0].primary;
            let group_score =
                members.iter().map(|p| p.overall_score).sum::<f64>() / members.len() as f64;
            RecommendationGroup {
                brand: first.brand().to_string(),
                product_line: first.product().to_string(),
                coverage: Coverage::from_product_name(first.product()),
                group_score,
                total_pairs: members.len(),
                pairs: members
                    .into_iter()
                    .take(options.pairs_per_group)
                    .cloned()
                    .collect(),
            }
        })
        .collect();

    groups.sort_by(|a, b| a.group_score.total_cmp(&b.group_score));

    let mut seen_brands = HashSet::new();
    let selected: Vec<RecommendationGroup> = groups
        .into_iter()
        .filter(|group| seen_brands.insert(key(&group.brand)))
        .take(options.max_groups)
        .collect();

    tracing::debug!(
        pairs = pairs.len(),
        groups = selected.len(),
        "grouped recommendations"
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DepthBucket, LabColor, ShadeCandidate, ShadeMatch, Undertone};
    use crate::services::pairing::build_pair;

    fn shade(brand: &str, product: &str, distance: f64) -> ShadeMatch {
        ShadeMatch {
            candidate: ShadeCandidate::new(brand, product, "x", "#C68642"),
            lab: LabColor::new(61.0, 18.0, 45.0),
            undertone: Undertone::Warm,
            depth: DepthBucket::Medium,
            color_distance: distance,
            match_percentage: 100.0 - 2.0 * distance,
            undertone_compatibility: 1.0,
            depth_compatibility: 1.0,
            preference_score: 1.0,
            quality_score: None,
            overall_score: 0.0,
        }
    }

    fn pair(brand: &str, product: &str, distance: f64) -> PairedShadeMatch {
        build_pair(shade(brand, product, distance), shade(brand, product, distance))
    }

    #[test]
    fn test_one_group_per_brand() {
        let pairs = vec![
            pair("A", "Tint", 1.0),
            pair("A", "Full Cover", 1.5),
            pair("B", "Foundation", 2.0),
            pair("C", "Foundation", 3.0),
            pair("D", "Foundation", 4.0),
            pair("E", "Foundation", 5.0),
        ];
        let groups = group_recommendations(&pairs, &GroupingOptions::default());
        let brands: Vec<_> = groups.iter().map(|g| g.brand.as_str()).collect();
        assert_eq!(brands, ["A", "B", "C", "D"]);
        assert_eq!(groups[0].product_line, "Tint");
        assert_eq!(groups[0].coverage, Coverage::Light);
    }

    #[test]
    fn test_group_score_is_mean_and_pairs_truncated() {
        let pairs: Vec<_> = [1.0, 2.0, 3.0, 6.0]
            .iter()
            .map(|d| pair("A", "Line", *d))
            .collect();
        let groups = group_recommendations(&pairs, &GroupingOptions::default());
        assert_eq!(groups.len(), 1);
        // each pair is same-product, so scores are 0.8x
        assert!((groups[0].group_score - 0.8 * 3.0).abs() < 1e-12);
        assert_eq!(groups[0].pairs.len(), 3);
        assert_eq!(groups[0].total_pairs, 4);
    }

    #[test]
    fn test_groups_sorted_by_score() {
        let pairs = vec![pair("Z", "Line", 9.0), pair("Y", "Full Coverage", 1.0)];
        let groups = group_recommendations(&pairs, &GroupingOptions::default());
        assert_eq!(groups[0].brand, "Y");
        assert_eq!(groups[0].coverage, Coverage::Full);
        assert_eq!(groups[1].coverage, Coverage::Medium);
    }

    #[test]
    fn test_brand_keys_ignore_case() {
        let pairs = vec![pair("Brand", "One", 1.0), pair("BRAND ", "Two", 2.0)];
        let groups = group_recommendations(&pairs, &GroupingOptions::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].product_line, "One");
    }

    #[test]
    fn test_empty_input() {
        assert!(group_recommendations(&[], &GroupingOptions::default()).is_empty());
    }
}
