use crate::config::{Config, Init};
use crate::points::PointSet;
use rand::RngExt;
use snafu::prelude::*;
use tracing::{debug, info};

pub mod lloyds;
pub mod plus_plus_init;

// References:
// - Least squares quantization in PCM (S. Lloyd)
//   https://ieeexplore.ieee.org/document/1056489
// - k-means++: The Advantages of Careful Seeding (D. Arthur, S. Vassilvitskii)
//   https://theory.stanford.edu/~sergei/papers/kMeansPP-soda.pdf
//
// Convergence is exact equality between consecutive centroid sets, no shift tolerance.

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClusterError {
    #[snafu(display(
        "point set is {n}x{d}, but the configuration expects {expected_n}x{expected_d}"
    ))]
    ShapeMismatch {
        n: usize,
        d: usize,
        expected_n: usize,
        expected_d: usize,
    },

    #[snafu(display("cluster {cluster} has no observations after iteration {iteration}"))]
    EmptyCluster { cluster: usize, iteration: usize },
}

#[inline(always)]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "vectors must have the same dimensionality");
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

/// An immutable set of `k` centroids, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Centroids {
    dim: usize,
    coords: Vec<f64>,
}

impl Centroids {
    pub(crate) fn from_coords(dim: usize, coords: Vec<f64>) -> Self {
        assert!(dim > 0);
        assert!(coords.len().is_multiple_of(dim));
        Self { dim, coords }
    }

    /// Copies the given observations, in the given order.
    pub fn from_indices(points: &PointSet, indices: &[usize]) -> Self {
        let mut coords = Vec::with_capacity(indices.len() * points.dim());
        for &i in indices {
            coords.extend_from_slice(points.point(i));
        }
        Self::from_coords(points.dim(), coords)
    }

    pub fn first_k(points: &PointSet, k: usize) -> Self {
        assert!(k <= points.len());
        let indices = (0..k).collect::<Vec<_>>();
        Self::from_indices(points, &indices)
    }

    #[inline(always)]
    pub fn centroid(&self, j: usize) -> &[f64] {
        &self.coords[j * self.dim..(j + 1) * self.dim]
    }

    pub fn iter(&self) -> std::slice::ChunksExact<'_, f64> {
        self.coords.chunks_exact(self.dim)
    }

    pub fn k(&self) -> usize {
        self.coords.len() / self.dim
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// The k-means++ picks, in selection order. `None` when the first `k` observations were
    /// used instead.
    pub seed_indices: Option<Vec<usize>>,
    pub centroids: Centroids,
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
}

pub fn find_centroids(
    rng: &mut impl RngExt,
    points: &PointSet,
    config: &Config,
) -> Result<Clustering, ClusterError> {
    ensure!(
        points.len() == config.n() && points.dim() == config.d(),
        ShapeMismatchSnafu {
            n: points.len(),
            d: points.dim(),
            expected_n: config.n(),
            expected_d: config.d(),
        }
    );

    let (seed_indices, initial) = match config.init() {
        Init::FirstK => (None, Centroids::first_k(points, config.k())),
        Init::PlusPlus => {
            let indices = plus_plus_init::find_initial(rng, points, config.k());
            debug!(?indices, "initialized k-means++");
            let initial = Centroids::from_indices(points, &indices);
            (Some(indices), initial)
        }
    };

    let result = lloyds::lloyds_loop(
        points,
        initial,
        config.max_iter(),
        config.empty_cluster_policy(),
    )?;

    if result.converged {
        info!(iterations = result.iterations, "converged");
    } else {
        info!(
            iterations = result.iterations,
            "stopped at the iteration limit without converging"
        );
    }

    Ok(Clustering {
        seed_indices,
        centroids: result.centroids,
        assignments: result.assignments,
        iterations: result.iterations,
        converged: result.converged,
    })
}
