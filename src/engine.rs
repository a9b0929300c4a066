//! Lloyd's k-means over color samples.
//!
//! The engine owns the input samples and exactly `k` clusters. Each
//! [`ClusteringEngine::step`] reassigns every sample to its nearest center and
//! recomputes the centers of the clusters that received members. A cluster
//! that ends up with no members keeps its previous center and contributes
//! nothing to the convergence diff for that step.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::centroid::{ArithmeticMean, CentroidStrategy};
use crate::cluster::{Cluster, ClusterSet};
use crate::error::{PaletteError, PaletteResult};
use crate::metric::{DistanceMetric, Metric};
use crate::sample::Sample;

/// Parameters of a clustering run.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Number of clusters, fixed for the whole run.
    pub k: usize,
    /// A step whose largest center shift is below this value converges.
    pub min_diff: f64,
    /// Optional cap on the number of steps.
    pub max_iterations: Option<usize>,
    /// Fail with [`PaletteError::NonConvergence`] when the cap is hit.
    pub strict: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            k: 8,
            min_diff: 1.0,
            max_iterations: None,
            strict: false,
        }
    }
}

impl EngineConfig {
    pub fn new(k: usize, min_diff: f64) -> Self {
        Self {
            k,
            min_diff,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Check the configuration against the number of input samples.
    pub fn validate(&self, samples: usize) -> PaletteResult<()> {
        if samples == 0 {
            return Err(PaletteError::EmptyInput);
        }
        if self.k == 0 || self.k > samples {
            return Err(PaletteError::InvalidClusterCount { k: self.k, samples });
        }
        if self.min_diff.is_nan() || self.min_diff < 0.0 {
            return Err(PaletteError::InvalidThreshold(self.min_diff));
        }
        Ok(())
    }
}

/// Outcome of a single assignment-and-update pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// Largest distance any center moved during the step.
    pub diff: f64,
    pub converged: bool,
}

/// Iterative k-means over a fixed sample sequence.
#[derive(Debug)]
pub struct ClusteringEngine<M = Metric, C = ArithmeticMean> {
    samples: Vec<Sample>,
    clusters: ClusterSet,
    min_diff: f64,
    metric: M,
    centroid: C,
    iterations: usize,
    last_step: Option<Step>,
}

impl<M: DistanceMetric, C: CentroidStrategy> ClusteringEngine<M, C> {
    /// Seed `config.k` clusters from distinct positions of `samples`, drawn
    /// uniformly without replacement.
    pub fn initialize<R: Rng + ?Sized>(
        samples: Vec<Sample>,
        config: &EngineConfig,
        metric: M,
        centroid: C,
        rng: &mut R,
    ) -> PaletteResult<Self> {
        config.validate(samples.len())?;

        let clusters = rand::seq::index::sample(rng, samples.len(), config.k)
            .iter()
            .map(|i| Cluster::seeded(samples[i]))
            .collect();

        debug!(k = config.k, samples = samples.len(), "seeded clusters");

        Ok(Self::from_parts(
            samples,
            ClusterSet::new(clusters),
            config.min_diff,
            metric,
            centroid,
        ))
    }

    /// Start from explicit centers instead of random seeding.
    pub fn with_centers(
        samples: Vec<Sample>,
        centers: Vec<Sample>,
        min_diff: f64,
        metric: M,
        centroid: C,
    ) -> PaletteResult<Self> {
        EngineConfig::new(centers.len(), min_diff).validate(samples.len())?;
        let clusters = centers.into_iter().map(Cluster::seeded).collect();
        Ok(Self::from_parts(
            samples,
            ClusterSet::new(clusters),
            min_diff,
            metric,
            centroid,
        ))
    }

    fn from_parts(
        samples: Vec<Sample>,
        clusters: ClusterSet,
        min_diff: f64,
        metric: M,
        centroid: C,
    ) -> Self {
        Self {
            samples,
            clusters,
            min_diff,
            metric,
            centroid,
            iterations: 0,
            last_step: None,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn clusters(&self) -> &ClusterSet {
        &self.clusters
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Number of completed steps.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn last_step(&self) -> Option<Step> {
        self.last_step
    }

    pub fn is_converged(&self) -> bool {
        self.last_step.is_some_and(|s| s.converged)
    }

    pub fn into_clusters(self) -> ClusterSet {
        self.clusters
    }

    /// Index of the nearest center; the lowest index wins ties.
    fn nearest(&self, sample: &Sample) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, center) in self.clusters.centers().enumerate() {
            let d = self.metric.distance(sample, center);
            if d < best_dist {
                best_dist = d;
                best = i;
            }
        }
        best
    }

    /// Partition every sample by nearest current center.
    ///
    /// Read-only over the clusters; member order follows sample order.
    pub fn assign(&self) -> Vec<Vec<Sample>> {
        let mut groups = vec![Vec::new(); self.clusters.len()];
        for sample in &self.samples {
            groups[self.nearest(sample)].push(*sample);
        }
        groups
    }

    /// Run one assignment-and-update pass.
    pub fn step(&mut self) -> PaletteResult<Step> {
        let groups = self.assign();

        let mut diff = 0.0f64;
        for (cluster, members) in self.clusters.clusters_mut().iter_mut().zip(groups) {
            if members.is_empty() {
                cluster.members.clear();
                continue;
            }
            let center = self.centroid.centroid(&members)?;
            diff = diff.max(self.metric.distance(&cluster.center, &center));
            *cluster = Cluster { center, members };
        }

        // A zero shift is a fixed point even when `min_diff` is zero.
        let step = Step {
            diff,
            converged: diff < self.min_diff || diff == 0.0,
        };
        self.iterations += 1;
        self.last_step = Some(step);
        debug!(iteration = self.iterations, diff, "k-means step");
        Ok(step)
    }

    /// Step until convergence or until `max_iterations` steps have run in
    /// this call.
    ///
    /// `on_step` sees the 1-based iteration number and the clusters after
    /// every completed step. Hitting the cap returns the current clusters
    /// unless `strict` is set.
    pub fn run_until_converged<F>(
        &mut self,
        max_iterations: Option<usize>,
        strict: bool,
        mut on_step: F,
    ) -> PaletteResult<&ClusterSet>
    where
        F: FnMut(usize, &ClusterSet),
    {
        let mut ran = 0usize;
        loop {
            if let Some(cap) = max_iterations
                && ran >= cap
            {
                let diff = self.last_step.map_or(f64::INFINITY, |s| s.diff);
                if strict {
                    return Err(PaletteError::NonConvergence {
                        iterations: self.iterations,
                        diff,
                    });
                }
                warn!(iterations = self.iterations, diff, "iteration cap reached before convergence");
                return Ok(&self.clusters);
            }

            let step = self.step()?;
            ran += 1;
            on_step(self.iterations, &self.clusters);

            if step.converged {
                info!(iterations = self.iterations, diff = step.diff, "k-means converged");
                return Ok(&self.clusters);
            }
        }
    }

    /// Reorder clusters by descending member count.
    pub fn sort_by_size(&mut self) {
        self.clusters.sort_by_size();
    }
}
