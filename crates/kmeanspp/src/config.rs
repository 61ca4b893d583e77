use snafu::prelude::*;

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[snafu(display("number of clusters must be positive"))]
    ZeroClusters,

    #[snafu(display("number of observations must be positive"))]
    ZeroObservations,

    #[snafu(display("number of dimensions must be positive"))]
    ZeroDimensions,

    #[snafu(display("maximum number of iterations must be positive"))]
    ZeroIterations,

    #[snafu(display("number of clusters ({k}) must be less than the number of observations ({n})"))]
    TooManyClusters { k: usize, n: usize },
}

/// How the initial centroids are chosen.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Init {
    /// Copy the first `k` observations.
    #[default]
    FirstK,
    /// Seed with k-means++ using the fixed-seed generator.
    PlusPlus,
}

/// What the Lloyd loop does when an iteration leaves a cluster without observations.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum EmptyClusterPolicy {
    /// Stop with [`crate::ClusterError::EmptyCluster`].
    #[default]
    Fail,
    /// The empty cluster keeps its centroid from the previous iteration.
    KeepPrevious,
}

/// Validated run parameters. Construction fails on anything the clustering core can't run
/// with, so a `Config` in hand always satisfies `1 <= k < n`, `d >= 1`, `max_iter >= 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    k: usize,
    n: usize,
    d: usize,
    max_iter: usize,
    init: Init,
    empty_cluster: EmptyClusterPolicy,
}

impl Config {
    pub fn new(k: usize, n: usize, d: usize, max_iter: usize) -> Result<Self, ConfigError> {
        ensure!(d >= 1, ZeroDimensionsSnafu);
        ensure!(max_iter >= 1, ZeroIterationsSnafu);
        ensure!(n >= 1, ZeroObservationsSnafu);
        ensure!(k >= 1, ZeroClustersSnafu);
        ensure!(k < n, TooManyClustersSnafu { k, n });

        Ok(Self {
            k,
            n,
            d,
            max_iter,
            init: Init::default(),
            empty_cluster: EmptyClusterPolicy::default(),
        })
    }

    pub fn with_init(self, init: Init) -> Self {
        Self { init, ..self }
    }

    pub fn with_empty_cluster_policy(self, empty_cluster: EmptyClusterPolicy) -> Self {
        Self {
            empty_cluster,
            ..self
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn d(&self) -> usize {
        self.d
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn init(&self) -> Init {
        self.init
    }

    pub fn empty_cluster_policy(&self) -> EmptyClusterPolicy {
        self.empty_cluster
    }
}
