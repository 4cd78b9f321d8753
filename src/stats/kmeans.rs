//! One-dimensional k-means with caller-supplied initial centers.

use crate::core::error::{OneRError, Result};

/// Result of a 1-D k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Ascending centers of the non-empty clusters
    pub centers: Vec<f64>,
    /// Number of points per center
    pub sizes: Vec<usize>,
    /// Lloyd iterations performed
    pub iterations: usize,
    /// Whether assignments stopped changing before `max_iter`
    pub converged: bool,
}

/// Lloyd's algorithm on the real line.
///
/// Each value goes to its nearest center, ties to the lower-indexed one.
/// A cluster that loses all its points keeps its previous center while
/// iterating and is dropped from the result.
pub fn kmeans_1d(values: &[f64], initial_centers: &[f64], max_iter: usize) -> Result<KMeansFit> {
    if values.is_empty() {
        return Err(OneRError::usage("k-means on an empty sample"));
    }
    if initial_centers.is_empty() {
        return Err(OneRError::usage("k-means needs at least one center"));
    }
    if values.iter().chain(initial_centers).any(|v| !v.is_finite()) {
        return Err(OneRError::numerical("k-means input contains non-finite values"));
    }

    let mut centers = initial_centers.to_vec();
    let mut assignment = vec![usize::MAX; values.len()];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iter {
        iterations += 1;

        let mut changed = false;
        for (slot, &v) in assignment.iter_mut().zip(values) {
            let nearest = nearest_center(&centers, v);
            if *slot != nearest {
                *slot = nearest;
                changed = true;
            }
        }

        if !changed {
            converged = true;
            break;
        }

        let mut sums = vec![0.0; centers.len()];
        let mut counts = vec![0usize; centers.len()];
        for (&c, &v) in assignment.iter().zip(values) {
            sums[c] += v;
            counts[c] += 1;
        }
        for (center, (sum, count)) in centers.iter_mut().zip(sums.into_iter().zip(counts)) {
            if count > 0 {
                *center = sum / count as f64;
            }
        }
    }

    let mut sizes = vec![0usize; centers.len()];
    for &c in &assignment {
        sizes[c] += 1;
    }

    let mut clusters: Vec<(f64, usize)> = centers
        .into_iter()
        .zip(sizes)
        .filter(|&(_, size)| size > 0)
        .collect();
    clusters.sort_by(|a, b| a.0.total_cmp(&b.0));

    log::debug!(
        "k-means: {} cluster(s) after {} iteration(s), converged = {}",
        clusters.len(),
        iterations,
        converged
    );

    Ok(KMeansFit {
        centers: clusters.iter().map(|c| c.0).collect(),
        sizes: clusters.iter().map(|c| c.1).collect(),
        iterations,
        converged,
    })
}

fn nearest_center(centers: &[f64], value: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &c) in centers.iter().enumerate() {
        let d = (value - c).abs();
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}
