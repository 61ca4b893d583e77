//! k-means clustering of `d`-dimensional observations: Lloyd's algorithm, optionally
//! seeded with k-means++ driven by a fixed-seed generator, so every run on the same input
//! gives the same output.
//!
//! ```
//! use kmeanspp::{Config, Init, PointSet};
//!
//! let points = PointSet::from_rows(
//!     2,
//!     [[0.0, 0.0], [10.0, 0.0], [0.0, 2.0], [10.0, 2.0]],
//! )
//! .unwrap();
//! let config = Config::new(2, 4, 2, 10).unwrap();
//!
//! let result = kmeanspp::cluster(&points, &config).unwrap();
//! assert!(result.converged);
//! assert_eq!(result.to_string(), "0.00,1.00\n10.00,1.00\n");
//!
//! let seeded = kmeanspp::cluster(&points, &config.with_init(Init::PlusPlus)).unwrap();
//! assert_eq!(seeded.seed_indices.map(|indices| indices.len()), Some(2));
//! ```

mod config;
mod format;
#[cfg(feature = "_debug")]
pub mod kmeans;
#[cfg(not(feature = "_debug"))]
mod kmeans;
mod points;
#[cfg(feature = "_debug")]
pub mod rng;
#[cfg(not(feature = "_debug"))]
mod rng;

pub use config::{Config, ConfigError, EmptyClusterPolicy, Init};
pub use format::{format_centroids, format_indices};
pub use kmeans::{Centroids, ClusterError, Clustering, squared_distance};
pub use points::{InputError, PointSet, read_exact_points, read_points};
pub use rng::RANDOM_SEED;

/// Runs the configured initialization and the Lloyd loop with a freshly seeded generator.
///
/// Fails if `points` doesn't have the `n` x `d` shape of `config`, or if a cluster empties
/// out under [`EmptyClusterPolicy::Fail`].
pub fn cluster(points: &PointSet, config: &Config) -> Result<Clustering, ClusterError> {
    let mut rng = rng::new();
    kmeans::find_centroids(&mut rng, points, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn blobs() -> PointSet {
        let mut points = PointSet::new(2, 30);
        for (cx, cy) in [(0.0, 0.0), (20.0, 0.0), (0.0, 20.0)] {
            for i in 0..10 {
                let dx = (i % 3) as f64 * 0.5;
                let dy = (i / 3) as f64 * 0.25;
                points.push(&[cx + dx, cy + dy]);
            }
        }
        points
    }

    #[test]
    fn deterministic() {
        let points = blobs();
        let config = Config::new(3, 30, 2, 100).unwrap().with_init(Init::PlusPlus);
        let a = cluster(&points, &config).unwrap();
        let b = cluster(&points, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn plus_plus_finds_the_blobs() {
        let points = blobs();
        let config = Config::new(3, 30, 2, 100).unwrap().with_init(Init::PlusPlus);
        let result = cluster(&points, &config).unwrap();

        assert!(result.converged);
        assert_eq!(result.centroids.k(), 3);

        // Members of a blob share a cluster, and the three blobs get different clusters
        let labels = [0, 10, 20].map(|start| result.assignments[start]);
        for (blob, &label) in labels.iter().enumerate() {
            let members = &result.assignments[blob * 10..(blob + 1) * 10];
            assert!(members.iter().all(|&a| a == label), "blob {blob} was split");
        }
        assert_ne!(labels[0], labels[1]);
        assert_ne!(labels[1], labels[2]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn output_starts_with_seed_indices() {
        let points = blobs();
        let config = Config::new(3, 30, 2, 100).unwrap().with_init(Init::PlusPlus);
        let result = cluster(&points, &config).unwrap();

        let output = result.to_string();
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            format_indices(result.seed_indices.as_deref().unwrap())
        );
        assert_eq!(
            &output[lines[0].len() + 1..],
            format_centroids(&result.centroids).as_str()
        );
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), 2);
        }
    }

    #[test]
    fn single_cluster_is_the_mean() {
        let points = blobs();
        let config = Config::new(1, 30, 2, 1).unwrap();
        let result = cluster(&points, &config).unwrap();

        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
        let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;
        let centroid = result.centroids.centroid(0);
        assert!((centroid[0] - mean_x).abs() < 1e-12);
        assert!((centroid[1] - mean_y).abs() < 1e-12);
    }

    #[test]
    fn end_to_end_from_csv() {
        let input = "0,0\n0,2\n10,0\n10,2\n";
        let config = Config::new(2, 4, 2, 10).unwrap();
        let points = read_exact_points(input.as_bytes(), config.n(), config.d()).unwrap();

        let result = cluster(&points, &config).unwrap();
        assert_eq!(result.to_string(), "5.00,0.00\n5.00,2.00\n");
        assert_eq!(result.iterations, 2);
    }
}
