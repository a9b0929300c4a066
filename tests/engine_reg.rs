//! Clustering engine regression test with pluggable strategies

use image_to_palette_wasm::{
    ArithmeticMean, CentroidStrategy, ClusteringEngine, CylindricalHsv, DistanceMetric,
    EngineConfig, PaletteResult, Sample,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

struct Manhattan;

impl DistanceMetric for Manhattan {
    fn distance(&self, p: &Sample, q: &Sample) -> f64 {
        p.coords().iter().zip(q.coords()).map(|(a, b)| (a - b).abs()).sum()
    }
}

/// Per-coordinate minimum, to check that the engine uses the injected strategy.
struct Lowest;

impl CentroidStrategy for Lowest {
    fn centroid(&self, members: &[Sample]) -> PaletteResult<Sample> {
        ArithmeticMean.centroid(members)?;
        let mut out = [f64::INFINITY; 3];
        for m in members {
            for (o, v) in out.iter_mut().zip(m.coords()) {
                *o = o.min(*v);
            }
        }
        Ok(Sample::new(out))
    }
}

fn grid() -> Vec<Sample> {
    let mut out = Vec::new();
    for r in 0..6u8 {
        for b in 0..6u8 {
            out.push(Sample::from_rgb([r * 40, 0, b * 40]));
        }
    }
    out
}

#[test]
fn custom_metric_and_strategy_are_used() {
    let mut engine = ClusteringEngine::with_centers(
        vec![
            Sample::from_rgb([10, 0, 0]),
            Sample::from_rgb([20, 0, 0]),
            Sample::from_rgb([200, 0, 0]),
        ],
        vec![Sample::from_rgb([10, 0, 0]), Sample::from_rgb([200, 0, 0])],
        0.5,
        Manhattan,
        Lowest,
    )
    .unwrap();

    let step = engine.step().unwrap();
    assert_eq!(step.diff, 0.0);
    assert_eq!(
        engine.clusters().get(0).unwrap().center,
        Sample::from_rgb([10, 0, 0])
    );
    assert_eq!(engine.clusters().get(0).unwrap().len(), 2);
}

#[test]
fn runs_to_a_fixed_point_for_many_seeds() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut engine = ClusteringEngine::initialize(
            grid(),
            &EngineConfig::new(4, 1e-6),
            image_to_palette_wasm::Euclidean,
            ArithmeticMean,
            &mut rng,
        )
        .unwrap();

        let mut snapshots = 0;
        engine
            .run_until_converged(Some(100), false, |_, clusters| {
                assert_eq!(clusters.len(), 4);
                assert_eq!(clusters.total_members(), 36);
                snapshots += 1;
            })
            .unwrap();
        assert_eq!(snapshots, engine.iterations());

        // converged centers are the means of their members
        for c in engine.clusters().iter().filter(|c| !c.is_empty()) {
            assert_eq!(c.center, ArithmeticMean.centroid(&c.members).unwrap());
        }
    }
}

#[test]
fn hsv_metric_groups_across_the_hue_seam() {
    let samples = vec![
        Sample::new([355.0, 0.8, 200.0]),
        Sample::new([5.0, 0.8, 200.0]),
        Sample::new([180.0, 0.8, 200.0]),
        Sample::new([175.0, 0.8, 200.0]),
    ];
    let mut engine = ClusteringEngine::with_centers(
        samples.clone(),
        vec![samples[0], samples[2]],
        1e-3,
        CylindricalHsv,
        ArithmeticMean,
    )
    .unwrap();

    let groups = engine.assign();
    assert_eq!(groups[0], vec![samples[0], samples[1]]);
    assert_eq!(groups[1], vec![samples[2], samples[3]]);
    engine.step().unwrap();
    assert_eq!(engine.clusters().total_members(), 4);
}
