#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use lloyd_core::distance::{nearest, squared_euclidean};
use lloyd_core::{dataset, Assignments, BoundingBox, Float, KMeansError, Matrix, Result};
use rand::Rng;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Iteration budget used by [`KMeans::default`].
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Final state of a K-means run.
///
/// `assignments` is always the nearest-centroid labelling of the training
/// data under `centroids`, so the two never disagree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster centers of shape `(k, n_features)`.
    pub centroids: Matrix,
    /// Cluster index of every training point, each in `0..k`.
    pub assignments: Assignments,
    /// Number of update steps performed.
    pub iterations: usize,
    /// `true` if the last update left every centroid coordinate unchanged.
    pub converged: bool,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: Float,
}

/// **K-Means clustering** with bounding-box initialization.
///
/// K-Means partitions `n` samples into `k` clusters by iteratively:
/// 1. Assigning each sample to the nearest centroid
/// 2. Updating centroids as the mean of assigned samples
///
/// # Algorithm
///
/// **Lloyd's algorithm**:
/// 1. Draw `k` centroids uniformly from the per-feature `[min, max)` box of
///    the data
/// 2. Repeat until convergence or `max_iter` updates:
///    - **Assignment step**: assign each point to the closest centroid, ties
///      going to the lowest index
///    - **Update step**: recompute each centroid as the mean of its points;
///      a centroid with no points is re-drawn from the bounding box
///    - **Reassignment**: label the points against the updated centroids
/// 3. Return the last centroids and their assignments
///
/// The reassignment of one iteration is the assignment step of the next, so
/// every iteration costs a single distance pass.
///
/// # Convergence
///
/// The algorithm stops when:
/// - An update reproduces the previous centroids exactly, OR
/// - `max_iter` updates have run
///
/// # Randomness
///
/// All draws come from the caller's RNG. Seeding it (for example with
/// `StdRng::seed_from_u64`) makes the whole fit reproducible.
///
/// # Restarts
///
/// With `n_init > 1` the algorithm is run from that many independent random
/// initializations and the run with the lowest inertia is kept.
///
/// # Errors
///
/// - [`KMeansError::InvalidInput`] if the data is empty or non-finite,
///   `k == 0`, `k > n_samples`, `max_iter == 0` or `n_init == 0`
/// - [`KMeansError::ShapeMismatch`] if initial centroids or prediction
///   queries have the wrong shape
/// - [`KMeansError::NotFitted`] if prediction called before fitting
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Number of clusters.
    k: usize,
    /// Maximum number of update steps per run.
    max_iter: usize,
    /// Number of random restarts.
    n_init: usize,
    /// Best run of the last fit.
    clustering: Option<Clustering>,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            k: 8,
            max_iter: DEFAULT_ITERATIONS,
            n_init: 1,
            clustering: None,
        }
    }
}

impl KMeans {
    /// Creates a new, unfitted K-Means model with a single restart.
    ///
    /// # Example
    ///
    /// ```
    /// use lloyd_models::k_means::KMeans;
    ///
    /// let kmeans = KMeans::new(3, 100).with_n_init(5);
    /// assert_eq!(kmeans.k(), 3);
    /// assert_eq!(kmeans.n_init(), 5);
    /// ```
    pub fn new(k: usize, max_iter: usize) -> Self {
        Self {
            k,
            max_iter,
            ..Self::default()
        }
    }

    /// Sets the number of random restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Checks the data and hyperparameters, returning the data's bounding box.
    fn validate(&self, x: &Matrix) -> Result<BoundingBox> {
        dataset::validate(x)?;

        let n = x.nrows();

        if self.k == 0 {
            return Err(KMeansError::invalid_input("k must be positive"));
        }

        if self.k > n {
            return Err(KMeansError::invalid_input(format!(
                "k = {} exceeds n_samples = {}",
                self.k, n
            )));
        }

        if self.max_iter == 0 {
            return Err(KMeansError::invalid_input("max_iter must be positive"));
        }

        if self.n_init == 0 {
            return Err(KMeansError::invalid_input("n_init must be positive"));
        }

        BoundingBox::of(x)
    }

    /// Updates centroids as the mean of assigned samples.
    ///
    /// A cluster with no assigned samples gets a fresh draw from `bounds`.
    /// Empty clusters are re-drawn in index order.
    ///
    /// # Returns
    ///
    /// New centroid matrix of shape `(k, n_features)` and the number of
    /// clusters that had to be re-drawn.
    fn update_centroids<R: Rng + ?Sized>(
        &self,
        x: &Matrix,
        assignments: &[usize],
        bounds: &BoundingBox,
        rng: &mut R,
    ) -> (Matrix, usize) {
        let d = x.ncols();
        let mut new_centroids = Matrix::zeros(self.k, d);
        let mut counts = vec![0usize; self.k];

        for (i, &cluster) in assignments.iter().enumerate() {
            for j in 0..d {
                new_centroids[(cluster, j)] += x[(i, j)];
            }
            counts[cluster] += 1;
        }

        let mut redrawn = 0;
        for (c, &count) in counts.iter().enumerate() {
            if count > 0 {
                let count_f = count as Float;
                for j in 0..d {
                    new_centroids[(c, j)] /= count_f;
                }

                // the plain sum can overflow for finite data near Float::MAX
                if (0..d).any(|j| !new_centroids[(c, j)].is_finite()) {
                    scaled_mean_into(&mut new_centroids, c, x, assignments, count_f);
                }
            } else {
                debug!(cluster = c, "re-drawing empty cluster");
                bounds.sample_into(&mut new_centroids, c, rng);
                redrawn += 1;
            }
        }

        (new_centroids, redrawn)
    }

    /// Runs Lloyd iterations from `centroids` until convergence or `max_iter`.
    fn lloyd<R: Rng + ?Sized>(
        &self,
        x: &Matrix,
        bounds: &BoundingBox,
        mut centroids: Matrix,
        rng: &mut R,
    ) -> Clustering {
        let mut assignments = assign_clusters(x, &centroids);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            let (updated, redrawn) = self.update_centroids(x, &assignments, bounds, rng);
            assignments = assign_clusters(x, &updated);
            trace!(iteration = iterations, redrawn, "k-means update");

            converged = updated == centroids;
            centroids = updated;
            if converged {
                break;
            }
        }

        let inertia = inertia(x, &centroids, &assignments);

        Clustering {
            centroids,
            assignments,
            iterations,
            converged,
            inertia,
        }
    }

    /// Clusters `x` without storing the result.
    ///
    /// Performs `n_init` runs, each starting from `k` centroids drawn from
    /// the bounding box of `x`, and returns the one with the lowest inertia.
    /// On equal inertia the earlier run wins.
    ///
    /// # Complexity
    ///
    /// Let `n = n_samples`, `d = n_features`, `t = iterations until convergence`.
    /// - Time: `O(n_init * t * k * n * d)`
    /// - Space: `O(k * d + n)` for centroids and assignments
    pub fn cluster<R: Rng + ?Sized>(&self, x: &Matrix, rng: &mut R) -> Result<Clustering> {
        let bounds = self.validate(x)?;
        debug!(
            low = ?bounds.low(),
            high = ?bounds.high(),
            "sampling initial centroids from data bounds"
        );

        let mut best: Option<Clustering> = None;

        for run in 0..self.n_init {
            let initial = bounds.sample(self.k, rng);
            let clustering = self.lloyd(x, &bounds, initial, rng);

            debug!(
                run,
                k = self.k,
                iterations = clustering.iterations,
                converged = clustering.converged,
                inertia = clustering.inertia,
                "k-means run finished"
            );

            let improves = best
                .as_ref()
                .is_none_or(|b| clustering.inertia < b.inertia);
            if improves {
                best = Some(clustering);
            }
        }

        best.ok_or_else(|| KMeansError::invalid_input("n_init must be positive"))
    }

    /// Fits the K-Means model on training data `x`.
    ///
    /// See [`cluster`](KMeans::cluster) for the procedure. The winning run is
    /// stored and used by [`predict`](KMeans::predict).
    pub fn fit<R: Rng + ?Sized>(&mut self, x: &Matrix, rng: &mut R) -> Result<&Clustering> {
        let clustering = self.cluster(x, rng)?;
        let fitted: &Clustering = self.clustering.insert(clustering);
        Ok(fitted)
    }

    /// Fits the model starting from caller-supplied centroids.
    ///
    /// Runs exactly once regardless of `n_init`. The RNG is only consumed if a
    /// cluster empties out and has to be re-drawn.
    ///
    /// # Errors
    ///
    /// - [`KMeansError::ShapeMismatch`] if `initial` is not `(k, n_features)`
    /// - [`KMeansError::InvalidInput`] if `initial` holds a non-finite value,
    ///   or for any of the conditions of [`fit`](KMeans::fit)
    pub fn fit_from<R: Rng + ?Sized>(
        &mut self,
        x: &Matrix,
        initial: &Matrix,
        rng: &mut R,
    ) -> Result<&Clustering> {
        let bounds = self.validate(x)?;

        if initial.shape() != (self.k, x.ncols()) {
            return Err(KMeansError::ShapeMismatch {
                expected: format!("{} x {} centroids", self.k, x.ncols()),
                got: format!("{} x {} centroids", initial.nrows(), initial.ncols()),
            });
        }

        if initial.iter().any(|v| !v.is_finite()) {
            return Err(KMeansError::invalid_input(
                "initial centroids must be finite",
            ));
        }

        let clustering = self.lloyd(x, &bounds, initial.clone(), rng);
        debug!(
            k = self.k,
            iterations = clustering.iterations,
            converged = clustering.converged,
            inertia = clustering.inertia,
            "k-means run from given centroids finished"
        );

        let fitted: &Clustering = self.clustering.insert(clustering);
        Ok(fitted)
    }

    /// Predicts cluster assignments for input matrix `x`.
    ///
    /// # Errors
    ///
    /// - [`KMeansError::NotFitted`] if model not fitted
    /// - [`KMeansError::ShapeMismatch`] if `x.ncols()` doesn't match training data
    /// - [`KMeansError::InvalidInput`] if `x` holds a non-finite value
    pub fn predict(&self, x: &Matrix) -> Result<Assignments> {
        let centroids = self.centroids().ok_or(KMeansError::NotFitted)?;

        if x.ncols() != centroids.ncols() {
            return Err(KMeansError::ShapeMismatch {
                expected: format!("{} features", centroids.ncols()),
                got: format!("{} features", x.ncols()),
            });
        }

        if x.nrows() == 0 {
            return Ok(Vec::new());
        }

        dataset::validate(x)?;

        Ok(assign_clusters(x, centroids))
    }

    /// Learned cluster centroids, or `None` if not fitted.
    pub fn centroids(&self) -> Option<&Matrix> {
        self.clustering.as_ref().map(|c| &c.centroids)
    }

    /// Full result of the last fit, or `None` if not fitted.
    pub fn clustering(&self) -> Option<&Clustering> {
        self.clustering.as_ref()
    }

    /// Returns the number of clusters.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn n_init(&self) -> usize {
        self.n_init
    }
}

/// Clusters `x` into `k` groups with at most `iterations` updates.
///
/// Single-run shorthand for `KMeans::new(k, iterations).cluster(x, rng)`.
///
/// # Example
///
/// ```
/// use lloyd_core::Matrix;
/// use lloyd_models::k_means::kmeans;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let x = Matrix::from_row_slice(4, 1, &[0.0, 0.5, 9.5, 10.0]);
/// let mut rng = StdRng::seed_from_u64(0);
///
/// let clustering = kmeans(&x, 2, 100, &mut rng).unwrap();
/// assert_eq!(clustering.centroids.shape(), (2, 1));
/// assert_eq!(clustering.assignments.len(), 4);
///
/// assert!(kmeans(&x, 5, 100, &mut rng).is_err());
/// ```
pub fn kmeans<R: Rng + ?Sized>(
    x: &Matrix,
    k: usize,
    iterations: usize,
    rng: &mut R,
) -> Result<Clustering> {
    KMeans::new(k, iterations).cluster(x, rng)
}

/// Assigns each sample to the nearest centroid.
///
/// # Returns
///
/// Vector of cluster assignments of length `n_samples`, where each element
/// is in `0..k`.
fn assign_clusters(x: &Matrix, centroids: &Matrix) -> Assignments {
    let mut assignments = vec![0usize; x.nrows()];

    #[cfg(feature = "parallel")]
    {
        assignments
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, label)| *label = nearest(x, i, centroids).0);
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (i, label) in assignments.iter_mut().enumerate() {
            *label = nearest(x, i, centroids).0;
        }
    }

    assignments
}

/// Recomputes row `c` of `centroids` as `Σ x_i / count` over its members.
///
/// Every term is at most `Float::MAX / count` in magnitude, so the sum stays
/// finite for any finite data.
fn scaled_mean_into(
    centroids: &mut Matrix,
    c: usize,
    x: &Matrix,
    assignments: &[usize],
    count_f: Float,
) {
    for j in 0..x.ncols() {
        centroids[(c, j)] = assignments
            .iter()
            .enumerate()
            .filter(|&(_, &cluster)| cluster == c)
            .map(|(i, _)| x[(i, j)] / count_f)
            .sum();
    }
}

fn inertia(x: &Matrix, centroids: &Matrix, assignments: &[usize]) -> Float {
    assignments
        .iter()
        .enumerate()
        .map(|(i, &c)| squared_euclidean(x, i, centroids, c))
        .sum()
}
