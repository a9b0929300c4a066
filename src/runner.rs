//! Driving a clustering run and handing its results to presentation code.
//!
//! The runner never draws anything itself. Per-iteration palettes go to a
//! [`PaletteRenderer`], final statistics go to a [`StatsRenderer`], and display
//! colors come from a [`ColorEncoder`].

use palette::Srgb;
use tracing::info;

use crate::centroid::{ArithmeticMean, CentroidStrategy};
use crate::cluster::ClusterSet;
use crate::engine::{ClusteringEngine, EngineConfig};
use crate::error::PaletteResult;
use crate::metric::{DistanceMetric, Metric};
use crate::sample::Sample;
use crate::source::ColorSpace;

pub const SIZE_CHART_TITLE: &str = "Number of elements per cluster";
pub const SIZE_CHART_OUTPUT: &str = "cluster-sizes";
pub const SPREAD_CHART_TITLE: &str = "Largest distance within cluster";
pub const SPREAD_CHART_OUTPUT: &str = "cluster-spread";

/// Turns integer RGB into a display token.
pub trait ColorEncoder {
    fn encode(&self, rgb: [u8; 3]) -> String;
}

/// Receives the palette after every completed step.
pub trait PaletteRenderer {
    fn render(&mut self, colors: &[String], iteration: usize);
}

/// Receives the per-cluster statistics once a run has finished.
pub trait StatsRenderer {
    fn render(&mut self, chart: &StatsChart);
}

/// Uppercase `RRGGBB` hex.
#[derive(Clone, Copy, Debug, Default)]
pub struct HexEncoder;

impl ColorEncoder for HexEncoder {
    fn encode(&self, rgb: [u8; 3]) -> String {
        let c = Srgb::<u8>::new(rgb[0], rgb[1], rgb[2]);
        format!("{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
    }
}

/// Discards everything it is given.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRenderer;

impl PaletteRenderer for NoopRenderer {
    fn render(&mut self, _colors: &[String], _iteration: usize) {}
}

impl StatsRenderer for NoopRenderer {
    fn render(&mut self, _chart: &StatsChart) {}
}

/// One chart worth of per-cluster values, in cluster-index order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsChart {
    pub title: String,
    pub output: String,
    pub entries: Vec<(String, u64)>,
}

/// Final numbers for one cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterStat {
    pub color: String,
    pub center: Sample,
    pub count: usize,
    pub max_distance: f64,
}

/// Everything a finished run produces.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Display colors in cluster-index order.
    pub palette: Vec<String>,
    pub counts: Vec<usize>,
    pub max_distances: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
    /// Per-cluster statistics, largest cluster first.
    pub ranked: Vec<ClusterStat>,
}

/// Display colors of every center, in cluster order.
pub fn display_colors<E: ColorEncoder + ?Sized>(
    clusters: &ClusterSet,
    space: ColorSpace,
    encoder: &E,
) -> Vec<String> {
    clusters
        .centers()
        .map(|c| encoder.encode(space.to_display(c)))
        .collect()
}

/// Runs an engine to completion and reports on it.
pub struct ClusterRunner<M = Metric, C = ArithmeticMean> {
    engine: ClusteringEngine<M, C>,
    config: EngineConfig,
    space: ColorSpace,
}

impl<M: DistanceMetric, C: CentroidStrategy> ClusterRunner<M, C> {
    pub fn new(engine: ClusteringEngine<M, C>, config: EngineConfig, space: ColorSpace) -> Self {
        Self {
            engine,
            config,
            space,
        }
    }

    pub fn engine(&self) -> &ClusteringEngine<M, C> {
        &self.engine
    }

    /// Current clusters; largest first once [`ClusterRunner::run`] returned.
    pub fn clusters(&self) -> &ClusterSet {
        self.engine.clusters()
    }

    pub fn run<E, P, S>(
        &mut self,
        encoder: &E,
        palette: &mut P,
        stats: &mut S,
    ) -> PaletteResult<RunSummary>
    where
        E: ColorEncoder + ?Sized,
        P: PaletteRenderer + ?Sized,
        S: StatsRenderer + ?Sized,
    {
        let space = self.space;
        self.engine.run_until_converged(
            self.config.max_iterations,
            self.config.strict,
            |iteration, clusters| {
                let colors = display_colors(clusters, space, encoder);
                palette.render(&colors, iteration);
            },
        )?;

        let clusters = self.engine.clusters();
        let metric = self.engine.metric();
        let palette_colors = display_colors(clusters, space, encoder);
        let counts: Vec<usize> = clusters.iter().map(|c| c.len()).collect();
        let max_distances: Vec<f64> = clusters.iter().map(|c| c.max_distance(metric)).collect();

        stats.render(&StatsChart {
            title: SIZE_CHART_TITLE.to_string(),
            output: SIZE_CHART_OUTPUT.to_string(),
            entries: palette_colors
                .iter()
                .cloned()
                .zip(counts.iter().map(|&n| n as u64))
                .collect(),
        });
        stats.render(&StatsChart {
            title: SPREAD_CHART_TITLE.to_string(),
            output: SPREAD_CHART_OUTPUT.to_string(),
            entries: palette_colors
                .iter()
                .cloned()
                .zip(max_distances.iter().map(|&d| d as u64))
                .collect(),
        });

        let mut ranked: Vec<ClusterStat> = clusters
            .iter()
            .zip(&palette_colors)
            .zip(&max_distances)
            .map(|((c, color), &max_distance)| ClusterStat {
                color: color.clone(),
                center: c.center,
                count: c.len(),
                max_distance,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));

        let iterations = self.engine.iterations();
        let converged = self.engine.is_converged();
        self.engine.sort_by_size();

        info!(iterations, converged, k = palette_colors.len(), "palette extracted");

        Ok(RunSummary {
            palette: palette_colors,
            counts,
            max_distances,
            iterations,
            converged,
            ranked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Euclidean;

    #[derive(Default)]
    struct Recorder {
        palettes: Vec<(usize, Vec<String>)>,
        charts: Vec<StatsChart>,
    }

    impl PaletteRenderer for Recorder {
        fn render(&mut self, colors: &[String], iteration: usize) {
            self.palettes.push((iteration, colors.to_vec()));
        }
    }

    impl StatsRenderer for Recorder {
        fn render(&mut self, chart: &StatsChart) {
            self.charts.push(chart.clone());
        }
    }

    fn rgb(r: u8, g: u8, b: u8) -> Sample {
        Sample::from_rgb([r, g, b])
    }

    fn runner() -> ClusterRunner<Euclidean> {
        let mut samples = vec![rgb(0, 0, 250); 2];
        samples.extend(vec![rgb(250, 10, 0); 5]);
        samples.push(rgb(240, 0, 0));
        let engine = ClusteringEngine::with_centers(
            samples,
            vec![rgb(0, 0, 250), rgb(240, 0, 0)],
            0.01,
            Euclidean,
            ArithmeticMean,
        )
        .unwrap();
        ClusterRunner::new(engine, EngineConfig::new(2, 0.01), ColorSpace::Rgb)
    }

    #[test]
    fn hex_encoder_is_uppercase() {
        assert_eq!(HexEncoder.encode([255, 10, 171]), "FF0AAB");
    }

    #[test]
    fn renders_every_step_and_two_charts() {
        let mut runner = runner();
        let mut palettes = Recorder::default();
        let mut stats = Recorder::default();
        let summary = runner.run(&HexEncoder, &mut palettes, &mut stats).unwrap();

        assert!(summary.converged);
        let iterations: Vec<usize> = palettes.palettes.iter().map(|(i, _)| *i).collect();
        assert_eq!(iterations, (1..=summary.iterations).collect::<Vec<_>>());
        assert_eq!(palettes.palettes.last().unwrap().1, summary.palette);

        assert_eq!(stats.charts.len(), 2);
        assert_eq!(stats.charts[0].title, SIZE_CHART_TITLE);
        assert_eq!(
            stats.charts[0].entries,
            vec![("0000FA".to_string(), 2), ("F80800".to_string(), 6)]
        );
        assert_eq!(stats.charts[1].output, SPREAD_CHART_OUTPUT);
        assert_eq!(stats.charts[1].entries[0], ("0000FA".to_string(), 0));
    }

    #[test]
    fn palette_keeps_index_order_but_clusters_are_ranked() {
        let mut runner = runner();
        let summary = runner
            .run(&HexEncoder, &mut NoopRenderer, &mut NoopRenderer)
            .unwrap();

        assert_eq!(summary.palette, vec!["0000FA", "F80800"]);
        assert_eq!(summary.counts, vec![2, 6]);
        assert_eq!(summary.ranked[0].color, "F80800");
        assert_eq!(summary.ranked[0].count, 6);
        assert_eq!(runner.clusters().get(0).unwrap().len(), 6);
        assert_eq!(runner.clusters().get(1).unwrap().len(), 2);
    }

    #[test]
    fn max_distance_measures_the_farthest_member() {
        let mut runner = runner();
        let summary = runner
            .run(&HexEncoder, &mut NoopRenderer, &mut NoopRenderer)
            .unwrap();

        // Red cluster center is (248.33.., 8.33.., 0); (240, 0, 0) is farthest.
        let expected = (((250.0 * 5.0 + 240.0) / 6.0 - 240.0f64).powi(2)
            + (50.0f64 / 6.0).powi(2))
        .sqrt();
        assert_eq!(summary.max_distances[0], 0.0);
        assert!((summary.max_distances[1] - expected).abs() < 1e-9);
    }
}
