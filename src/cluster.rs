//! Clusters and the fixed-size set of clusters owned by a run.

use crate::metric::DistanceMetric;
use crate::sample::Sample;

/// A center plus the samples currently assigned to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    pub center: Sample,
    pub members: Vec<Sample>,
}

impl Cluster {
    /// Seed cluster whose only member is its own center.
    pub fn seeded(center: Sample) -> Self {
        Self {
            center,
            members: vec![center],
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Distance from the farthest member to the center, 0 when empty.
    pub fn max_distance<M: DistanceMetric + ?Sized>(&self, metric: &M) -> f64 {
        self.members
            .iter()
            .map(|m| metric.distance(m, &self.center))
            .fold(0.0, f64::max)
    }
}

/// Exactly `k` clusters, in index order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    pub fn centers(&self) -> impl Iterator<Item = &Sample> {
        self.clusters.iter().map(|c| &c.center)
    }

    /// Sum of member counts over all clusters.
    pub fn total_members(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    pub(crate) fn clusters_mut(&mut self) -> &mut [Cluster] {
        &mut self.clusters
    }

    /// Stable reorder by descending member count.
    pub fn sort_by_size(&mut self) {
        self.clusters.sort_by(|a, b| b.len().cmp(&a.len()));
    }

    pub fn into_inner(self) -> Vec<Cluster> {
        self.clusters
    }
}

impl<'a> IntoIterator for &'a ClusterSet {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Euclidean;

    #[test]
    fn seeded_cluster_holds_its_center() {
        let c = Cluster::seeded(Sample::from_rgb([1, 2, 3]));
        assert_eq!(c.members, vec![Sample::from_rgb([1, 2, 3])]);
        assert_eq!(c.max_distance(&Euclidean), 0.0);
    }

    #[test]
    fn max_distance_picks_farthest_member() {
        let c = Cluster {
            center: Sample::new([0.0, 0.0, 0.0]),
            members: vec![
                Sample::new([1.0, 0.0, 0.0]),
                Sample::new([0.0, 6.0, 8.0]),
                Sample::new([0.0, 3.0, 0.0]),
            ],
        };
        assert_eq!(c.max_distance(&Euclidean), 10.0);
    }

    #[test]
    fn sort_by_size_is_descending_and_stable() {
        let a = Cluster::seeded(Sample::from_rgb([1, 0, 0]));
        let mut b = Cluster::seeded(Sample::from_rgb([2, 0, 0]));
        b.members.push(b.center);
        let c = Cluster::seeded(Sample::from_rgb([3, 0, 0]));

        let mut set = ClusterSet::new(vec![a.clone(), b.clone(), c.clone()]);
        set.sort_by_size();
        assert_eq!(set.into_inner(), vec![b, a, c]);
    }
}
