use super::squared_distance;
use crate::points::PointSet;
use rand::RngExt;
use tracing::{trace, warn};

/// Draws an index with probability proportional to its distance. Zero-distance entries are
/// never returned.
#[inline(always)]
fn sample_by_distance(rng: &mut impl RngExt, min_distances: &[f64], sum: f64) -> usize {
    if !sum.is_finite() {
        return sample_overflowed(rng, min_distances);
    }

    let random_threshold = rng.random::<f64>() * sum;
    let mut cumsum = 0.0;

    for (i, &distance) in min_distances.iter().enumerate() {
        cumsum += distance;
        if cumsum > random_threshold {
            return i;
        }
    }

    // Rounding left the threshold just out of reach
    min_distances
        .iter()
        .rposition(|&d| d > 0.0)
        .unwrap_or(min_distances.len() - 1)
}

/// Draw for when the squared distances, or their sum, overflowed to infinity. Infinite
/// weights outweigh any finite one, so they share the draw uniformly. Otherwise only the
/// sum overflowed and the weights are scaled down by their maximum.
#[cold]
fn sample_overflowed(rng: &mut impl RngExt, min_distances: &[f64]) -> usize {
    let infinite = min_distances
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_infinite())
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    if !infinite.is_empty() {
        return infinite[rng.random_range(0..infinite.len())];
    }

    let max = min_distances.iter().copied().fold(0.0, f64::max);
    let scaled = min_distances.iter().map(|d| d / max).collect::<Vec<_>>();
    let sum = scaled.iter().sum();
    sample_by_distance(rng, &scaled, sum)
}

/// Uniform pick among the indices that haven't been chosen yet.
fn sample_unchosen(rng: &mut impl RngExt, n: usize, chosen: &[usize]) -> usize {
    let remaining = (0..n).filter(|i| !chosen.contains(i)).collect::<Vec<_>>();
    assert!(!remaining.is_empty(), "every point is already a centroid");
    remaining[rng.random_range(0..remaining.len())]
}

#[cfg(not(feature = "parallel"))]
fn update_min_distances(points: &PointSet, chosen: &[f64], min_distances: &mut [f64]) {
    for (point, min_d) in points.iter().zip(min_distances.iter_mut()) {
        *min_d = squared_distance(point, chosen).min(*min_d);
    }
}

#[cfg(feature = "parallel")]
fn update_min_distances(points: &PointSet, chosen: &[f64], min_distances: &mut [f64]) {
    use rayon::prelude::*;

    points
        .par_iter()
        .zip(min_distances.par_iter_mut())
        .for_each(|(point, min_d)| *min_d = squared_distance(point, chosen).min(*min_d));
}

/// k-means++ seeding. Returns `k` distinct indices into `points`, in selection order.
///
/// When every remaining point coincides with a chosen one, the distance weights are all
/// zero and the next index is drawn uniformly from the unchosen ones instead. Once squared
/// distances overflow (coordinates around 1e154 apart), the points at infinite distance
/// share the draw uniformly.
pub fn find_initial(rng: &mut impl RngExt, points: &PointSet, k: usize) -> Vec<usize> {
    let n = points.len();
    assert!(k >= 1, "need at least one centroid");
    assert!(k <= n, "cannot pick {k} centroids from {n} points");

    let mut init_points = Vec::<usize>::with_capacity(k);
    let c0 = rng.random_range(0..n);
    init_points.push(c0);

    if k == 1 {
        return init_points;
    }

    let mut min_distances = vec![f64::INFINITY; n];
    update_min_distances(points, points.point(c0), &mut min_distances);

    for _ in 1..k {
        let sum: f64 = min_distances.iter().sum();

        let next = if sum > 0.0 {
            sample_by_distance(rng, &min_distances, sum)
        } else {
            warn!(
                chosen = init_points.len(),
                "all points coincide with chosen centroids, picking uniformly"
            );
            sample_unchosen(rng, n, &init_points)
        };
        trace!(next, sum, "k-means++ pick");

        init_points.push(next);
        update_min_distances(points, points.point(next), &mut min_distances);
    }

    init_points
}
