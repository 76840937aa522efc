//! Property tests for the color math and pairing invariants

use std::collections::HashSet;

use proptest::prelude::*;

use shade_match::services::grouping::{group_recommendations, GroupingOptions};
use shade_match::services::pairing::{pair_matches, PairingOptions};
use shade_match::services::tone::undertone_compatibility;
use shade_match::{
    delta_e_2000, delta_e_76, rgb_to_lab, DualPointAnalysis, LabColor, RgbColor, ShadeCandidate,
    ShadeMatchEngine, Undertone,
};

fn lab_strategy() -> impl Strategy<Value = LabColor> {
    (0.0..100.0f64, -128.0..128.0f64, -128.0..128.0f64).prop_map(|(l, a, b)| LabColor::new(l, a, b))
}

fn rgb_strategy() -> impl Strategy<Value = RgbColor> {
    any::<[u8; 3]>().prop_map(RgbColor::from)
}

fn undertone_strategy() -> impl Strategy<Value = Undertone> {
    prop::sample::select(Undertone::ALL.to_vec())
}

fn catalog_strategy() -> impl Strategy<Value = Vec<ShadeCandidate>> {
    prop::collection::vec((0usize..6, 0usize..3, rgb_strategy()), 1..24).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (brand, line, rgb))| {
                ShadeCandidate::new(
                    format!("Brand {brand}"),
                    format!("Line {line}"),
                    format!("Shade {i}"),
                    rgb.to_hex(),
                )
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_conversion_is_deterministic(rgb in rgb_strategy()) {
        prop_assert_eq!(rgb_to_lab(rgb), rgb_to_lab(rgb));
        let parsed: RgbColor = rgb.to_hex().parse().unwrap();
        prop_assert_eq!(parsed, rgb);
    }

    #[test]
    fn prop_delta_e_identity(lab in lab_strategy()) {
        prop_assert_eq!(delta_e_2000(lab, lab), 0.0);
        prop_assert_eq!(delta_e_76(lab, lab), 0.0);
    }

    #[test]
    fn prop_delta_e_symmetry(a in lab_strategy(), b in lab_strategy()) {
        prop_assert!((delta_e_2000(a, b) - delta_e_2000(b, a)).abs() < 1e-9);
        prop_assert_eq!(delta_e_76(a, b), delta_e_76(b, a));
        prop_assert!(delta_e_2000(a, b) >= 0.0);
    }

    #[test]
    fn prop_undertone_table_symmetric(a in undertone_strategy(), b in undertone_strategy()) {
        prop_assert_eq!(undertone_compatibility(a, b), undertone_compatibility(b, a));
    }

    #[test]
    fn prop_closer_color_never_scores_worse(
        target in rgb_strategy(),
        x in rgb_strategy(),
        y in rgb_strategy(),
    ) {
        let engine = ShadeMatchEngine::default();
        let target = engine.analyze_rgb(target, None);
        let shades = vec![
            ShadeCandidate::new("A", "Line", "x", x.to_hex()),
            ShadeCandidate::new("A", "Line", "y", y.to_hex()),
        ];
        let matches = engine.match_shades(&target, &shades, None);
        let mx = matches.iter().find(|m| m.candidate.shade_name == "x").unwrap();
        let my = matches.iter().find(|m| m.candidate.shade_name == "y").unwrap();
        if mx.color_distance < my.color_distance {
            prop_assert!(mx.match_percentage >= my.match_percentage);
        }
    }

    #[test]
    fn prop_pairs_and_groups_hold_invariants(
        catalog in catalog_strategy(),
        primary in rgb_strategy(),
        secondary in rgb_strategy(),
    ) {
        let engine = ShadeMatchEngine::default();
        let primary = engine.analyze_rgb(primary, None);
        let secondary = engine.analyze_rgb(secondary, None);
        let first = engine.match_shades(&primary, &catalog, None);
        let second = engine.match_shades(&secondary, &catalog, None);
        let pairs = pair_matches(&first, &second, &PairingOptions::default());

        for pair in &pairs {
            prop_assert!(!pair.product_consistency || pair.brand_consistency);
        }

        let groups = group_recommendations(&pairs, &GroupingOptions::default());
        let mut brands: Vec<_> = groups.iter().map(|g| g.brand.clone()).collect();
        brands.sort();
        brands.dedup();
        prop_assert_eq!(brands.len(), groups.len());

        let distinct_primary_brands: HashSet<_> =
            pairs.iter().map(|p| p.primary.candidate.brand.clone()).collect();
        prop_assert_eq!(groups.len(), distinct_primary_brands.len().min(4));
    }

    #[test]
    fn prop_recommend_covers_every_ranked_brand(
        catalog in catalog_strategy(),
        primary in rgb_strategy(),
        secondary in rgb_strategy(),
    ) {
        let engine = ShadeMatchEngine::default();
        let analysis = DualPointAnalysis {
            id: Default::default(),
            created_at: Default::default(),
            delta_e: 0.0,
            undertone_consistency: true,
            primary: engine.analyze_rgb(primary, None),
            secondary: engine.analyze_rgb(secondary, None),
        };
        let recommendations = engine.recommend(&analysis, &catalog, None);

        let ranked_brands: HashSet<_> = engine
            .match_shades(&analysis.primary, &catalog, None)
            .into_iter()
            .take(20)
            .map(|m| m.candidate.brand)
            .collect();
        prop_assert_eq!(recommendations.groups.len(), ranked_brands.len().min(4));
        prop_assert!(recommendations.pairs.len() <= 50);
    }
}
