use super::{Centroids, ClusterError, EmptyClusterSnafu, squared_distance};
use crate::config::EmptyClusterPolicy;
use crate::points::PointSet;
use tracing::{debug, warn};

/// Index of the nearest centroid. Only a strictly smaller distance moves the pick, so
/// the lowest index wins ties.
#[inline(always)]
fn nearest(point: &[f64], centroids: &Centroids) -> usize {
    let mut min = f64::INFINITY;
    let mut min_idx = 0;
    for (j, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < min {
            min = d;
            min_idx = j;
        }
    }
    min_idx
}

#[cfg(not(feature = "parallel"))]
#[inline]
pub fn assign_points(points: &PointSet, centroids: &Centroids, assignments: &mut [usize]) {
    assert_eq!(points.len(), assignments.len());
    for (point, assignment) in points.iter().zip(assignments.iter_mut()) {
        *assignment = nearest(point, centroids);
    }
}

// Each assignment only reads the current snapshot, so the rows are independent
#[cfg(feature = "parallel")]
#[inline]
pub fn assign_points(points: &PointSet, centroids: &Centroids, assignments: &mut [usize]) {
    use rayon::prelude::*;

    assert_eq!(points.len(), assignments.len());
    points
        .par_iter()
        .zip(assignments.par_iter_mut())
        .for_each(|(point, assignment)| *assignment = nearest(point, centroids));
}

/// Per-cluster member counts and coordinate sums for one iteration.
#[derive(Debug)]
pub struct Accumulator {
    dim: usize,
    pub counts: Vec<usize>,
    pub sums: Vec<f64>,
}

impl Accumulator {
    fn new(k: usize, dim: usize) -> Self {
        Self {
            dim,
            counts: vec![0; k],
            sums: vec![0.0; k * dim],
        }
    }

    #[inline(always)]
    fn add(&mut self, cluster: usize, point: &[f64]) {
        self.counts[cluster] += 1;
        let sum = &mut self.sums[cluster * self.dim..(cluster + 1) * self.dim];
        for (s, &x) in sum.iter_mut().zip(point) {
            *s += x;
        }
    }
}

/// Sums observations per cluster. Always sequential and in observation order, also with
/// the `parallel` feature.
pub fn accumulate(points: &PointSet, k: usize, assignments: &[usize]) -> Accumulator {
    assert_eq!(points.len(), assignments.len());

    let mut acc = Accumulator::new(k, points.dim());
    for (point, &cluster) in points.iter().zip(assignments) {
        assert!(cluster < k);
        acc.add(cluster, point);
    }
    acc
}

/// Produces the next centroid set as per-cluster means.
pub fn update_centroids(
    acc: &Accumulator,
    previous: &Centroids,
    policy: EmptyClusterPolicy,
    iteration: usize,
) -> Result<Centroids, ClusterError> {
    let dim = previous.dim();
    assert_eq!(acc.dim, dim);
    assert_eq!(acc.counts.len(), previous.k());

    let mut coords = Vec::with_capacity(acc.sums.len());

    for (j, &count) in acc.counts.iter().enumerate() {
        if count == 0 {
            match policy {
                EmptyClusterPolicy::Fail => {
                    return EmptyClusterSnafu {
                        cluster: j,
                        iteration,
                    }
                    .fail();
                }
                EmptyClusterPolicy::KeepPrevious => {
                    warn!(cluster = j, iteration, "empty cluster keeps its previous centroid");
                    coords.extend_from_slice(previous.centroid(j));
                    continue;
                }
            }
        }

        let count = count as f64;
        coords.extend(acc.sums[j * dim..(j + 1) * dim].iter().map(|&s| s / count));
    }

    Ok(Centroids::from_coords(dim, coords))
}

#[derive(Debug)]
pub struct LloydsLoopResult {
    pub centroids: Centroids,
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
}

pub fn lloyds_loop(
    points: &PointSet,
    initial: Centroids,
    max_iter: usize,
    policy: EmptyClusterPolicy,
) -> Result<LloydsLoopResult, ClusterError> {
    assert_eq!(points.dim(), initial.dim());
    assert!(initial.k() >= 1);
    assert!(initial.k() <= points.len());

    let k = initial.k();
    let mut centroids = initial;
    let mut assignments = vec![0usize; points.len()];

    for i in 1..=max_iter {
        assign_points(points, &centroids, &mut assignments);
        let acc = accumulate(points, k, &assignments);
        let next = update_centroids(&acc, &centroids, policy, i)?;

        // Exact, see kmeans.rs
        let converged = next == centroids;
        debug!(iteration = i, counts = ?acc.counts, converged, "lloyd iteration");

        centroids = next;
        if converged {
            return Ok(LloydsLoopResult {
                centroids,
                assignments,
                iterations: i,
                converged: true,
            });
        }
    }

    Ok(LloydsLoopResult {
        centroids,
        assignments,
        iterations: max_iter,
        converged: false,
    })
}
