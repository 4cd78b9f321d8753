//! Common test utilities for the OneR integration tests.

#![allow(dead_code)]

use oner::*;
use rand::prelude::*;

/// The two-level scenario: `x` predicts `y` for 5 of 6 rows
pub fn two_level_table() -> Table {
    Table::from_columns(vec![
        ("x", Column::categorical(["1", "1", "1", "2", "2", "2"])),
        ("y", Column::categorical(["A", "A", "B", "B", "B", "B"])),
    ])
    .unwrap()
}

/// Three well separated classes around 0, 10 and 20 in column `x`, plus a
/// random numeric `noise` column and a random text column `color`
pub fn separated_classes(per_class: usize, seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = Vec::new();
    let mut noise = Vec::new();
    let mut color = Vec::new();
    let mut class = Vec::new();

    for (label, center) in [("low", 0.0), ("mid", 10.0), ("high", 20.0)] {
        for _ in 0..per_class {
            x.push(center + rng.gen_range(-2.0..2.0));
            noise.push(rng.gen_range(0.0..100.0));
            color.push(["red", "green", "blue"][rng.gen_range(0..3)]);
            class.push(label);
        }
    }

    Table::from_columns(vec![
        ("noise", Column::numeric(noise)),
        ("x", Column::numeric(x)),
        ("color", Column::text(color)),
        ("class", Column::text(class)),
    ])
    .unwrap()
}

/// Random numeric values in `[lo, hi)`
pub fn random_values(n: usize, lo: f64, hi: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(lo..hi)).collect()
}

/// Factor from string labels
pub fn factor(labels: &[&str]) -> Factor {
    Factor::from_labels(labels.iter().map(|s| Some(*s)))
}

/// Assert two floats are within `eps`
pub fn assert_close(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "{} != {} (eps {})", a, b, eps);
}
