//! Property-based tests for binning, rule learning and prediction.

use oner::*;
use proptest::prelude::*;

fn labels_strategy(levels: usize, len: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(0..levels, len)
        .prop_map(|codes| codes.into_iter().map(|c| format!("c{}", c)).collect())
}

proptest! {
    #[test]
    fn prop_equal_length_bins(
        values in proptest::collection::vec(-1000.0f64..1000.0, 2..200),
        nbins in 2usize..10,
    ) {
        let factor = bin(&Column::numeric(values.clone()), &BinningConfig::new(nbins, BinMethod::Length))
            .unwrap()
            .into_inner();
        prop_assert!(factor.num_levels() <= nbins);
        prop_assert_eq!(factor.missing_count(), 0);

        if let Some(boundaries) = factor.discretization().boundaries() {
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let width = (max - min) / nbins as f64;
            let mut edges = vec![min];
            edges.extend_from_slice(boundaries.cut_points());
            edges.push(max);
            for pair in edges.windows(2) {
                prop_assert!((pair[1] - pair[0] - width).abs() <= 1e-9 * (1.0 + width));
            }
        }
    }

    #[test]
    fn prop_equal_content_balanced(n in 20usize..200, nbins in 2usize..6) {
        let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let factor = bin(&Column::numeric(values), &BinningConfig::new(nbins, BinMethod::Content))
            .unwrap()
            .into_inner();
        let expected = n as f64 / nbins as f64;
        prop_assert_eq!(factor.num_levels(), nbins);
        for count in factor.counts() {
            prop_assert!((count as f64 - expected).abs() <= 2.0);
        }
    }

    #[test]
    fn prop_clusters_deterministic(
        values in proptest::collection::vec(0.0f64..100.0, 10..100),
        nbins in 2usize..6,
    ) {
        let config = BinningConfig::new(nbins, BinMethod::Clusters);
        let a = bin(&Column::numeric(values.clone()), &config).unwrap().into_inner();
        let b = bin(&Column::numeric(values), &config).unwrap().into_inner();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_naive_cut_count(
        (values, labels) in (10usize..100).prop_flat_map(|n| (
            proptest::collection::vec(-50.0f64..50.0, n),
            labels_strategy(4, n),
        )),
    ) {
        let target = Factor::from_labels(labels.iter().map(Some));
        prop_assume!(target.num_levels() >= 2);
        let cut = optimal_cut(&values, &target, OptimalMethod::Naive).unwrap().into_inner();
        if let Some(boundaries) = cut.boundaries() {
            let cuts = boundaries.cut_points();
            prop_assert!(cuts.len() < target.num_levels());
            prop_assert!(cuts.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn prop_predictions_follow_rules(
        (feature, target) in (4usize..60).prop_flat_map(|n| (
            labels_strategy(5, n),
            labels_strategy(3, n),
        )),
    ) {
        let data = Table::from_columns(vec![
            ("f", Column::categorical(&feature)),
            ("y", Column::categorical(&target)),
        ])
        .unwrap();
        let model = RuleLearner::default().learn(&data);
        prop_assume!(model.is_ok());
        let model = model.unwrap();

        let predicted = model.predict(&data, PredictionType::Class).unwrap();
        prop_assert!(predicted.diagnostics.is_empty());
        for (level, class) in feature.iter().zip(predicted.value.classes().unwrap()) {
            prop_assert_eq!(class.label(), model.rule_for(level));
        }

        let eval = model.evaluate(&data).unwrap();
        prop_assert_eq!(eval.correct, model.correct());
        prop_assert_eq!(eval.total, model.total());
    }

    #[test]
    fn prop_first_tie_break_is_leftmost(
        (feature, target) in (4usize..40).prop_flat_map(|n| (
            labels_strategy(3, n),
            labels_strategy(2, n),
        )),
    ) {
        let data = Table::from_columns(vec![
            ("left", Column::categorical(&feature)),
            ("right", Column::categorical(&feature)),
            ("y", Column::categorical(&target)),
        ])
        .unwrap();
        if let Ok(model) = RuleLearner::default().learn(&data) {
            prop_assert_eq!(model.feature(), "left");
        }
    }
}
