//! Morph state machine behavior over real sampled data: convergence,
//! interruption, and the ignore rule for repeated toggles.

use festive_viz::morph::{clamp01, ease_in_out_cubic, Mode, MorphDriver, MORPH_STEP};
use festive_viz::rng::Mulberry32;
use festive_viz::sampler::{sample, ParticleSet, ShapeKind, SHAPE_SEED};

const COUNT: usize = 64;

fn targets() -> (ParticleSet, ParticleSet) {
    let mut rng = Mulberry32::new(SHAPE_SEED);
    let tree = sample(ShapeKind::Tree, COUNT, &mut rng);
    let cake = sample(ShapeKind::Cake, COUNT, &mut rng);
    (tree, cake)
}

fn max_diff(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

/// Tick until the driver goes idle, returning how many ticks it took.
fn run_to_completion(
    driver: &mut MorphDriver,
    to: &ParticleSet,
    pos: &mut [f32],
    col: &mut [f32],
) -> usize {
    let mut ticks = 0;
    while driver.in_progress() {
        assert!(driver.tick(to, pos, col));
        ticks += 1;
        assert!(ticks < 200, "morph failed to finish");
    }
    ticks
}

#[test]
fn morph_converges_to_the_target() {
    let (tree, cake) = targets();
    let mut pos = tree.positions.clone();
    let mut col = tree.colors.clone();
    let mut driver = MorphDriver::new(Mode::Tree, COUNT * 3);

    assert!(driver.begin(Mode::Cake, &pos, &col));
    let ticks = run_to_completion(&mut driver, &cake, &mut pos, &mut col);

    // One second at 72 updates/second, give or take step rounding.
    assert!((71..=74).contains(&ticks), "ticks: {ticks}");
    assert!(max_diff(&pos, &cake.positions) <= 1e-6);
    assert!(max_diff(&col, &cake.colors) <= 1e-6);
    assert_eq!(driver.mode(), Mode::Cake);
    assert!(!driver.in_progress());
}

#[test]
fn idle_driver_ticks_are_inert() {
    let (tree, _) = targets();
    let mut pos = tree.positions.clone();
    let mut col = tree.colors.clone();
    let mut driver = MorphDriver::new(Mode::Tree, COUNT * 3);

    assert!(!driver.tick(&tree, &mut pos, &mut col));
    assert_eq!(pos, tree.positions);
    assert_eq!(col, tree.colors);
}

#[test]
fn interrupted_morph_reverses_from_the_blended_buffer() {
    let (tree, cake) = targets();
    let mut pos = tree.positions.clone();
    let mut col = tree.colors.clone();
    let mut driver = MorphDriver::new(Mode::Tree, COUNT * 3);

    driver.begin(Mode::Cake, &pos, &col);
    for _ in 0..29 {
        driver.tick(&cake, &mut pos, &mut col);
    }

    // Mid-flight: the live buffer matches neither endpoint.
    assert!(max_diff(&pos, &tree.positions) > 1e-3);
    assert!(max_diff(&pos, &cake.positions) > 1e-3);
    let snapshot = pos.clone();

    // Reverse. The new morph starts from the interrupted blend: its
    // first tick lands exactly where blending the snapshot by one
    // eased step would.
    assert!(driver.begin(Mode::Tree, &pos, &col));
    driver.tick(&tree, &mut pos, &mut col);
    let p = ease_in_out_cubic(clamp01(MORPH_STEP));
    for i in 0..pos.len() {
        let expected = snapshot[i] + (tree.positions[i] - snapshot[i]) * p;
        assert_eq!(pos[i], expected, "component {i}");
    }

    let ticks = run_to_completion(&mut driver, &tree, &mut pos, &mut col);
    assert!((70..=74).contains(&ticks), "ticks: {ticks}");
    assert!(max_diff(&pos, &tree.positions) <= 1e-6);
    assert!(max_diff(&col, &tree.colors) <= 1e-6);
    assert_eq!(driver.mode(), Mode::Tree);
}

#[test]
fn repeated_toggle_to_the_inflight_target_is_ignored() {
    let (tree, cake) = targets();
    let mut pos = tree.positions.clone();
    let mut col = tree.colors.clone();
    let mut driver = MorphDriver::new(Mode::Tree, COUNT * 3);

    driver.begin(Mode::Cake, &pos, &col);
    for _ in 0..10 {
        driver.tick(&cake, &mut pos, &mut col);
    }

    // Same target again: no restart, progress is preserved.
    assert!(!driver.begin(Mode::Cake, &pos, &col));
    let remaining = run_to_completion(&mut driver, &cake, &mut pos, &mut col);
    assert!(remaining <= 64, "morph restarted: {remaining} ticks left");
    assert!(max_diff(&pos, &cake.positions) <= 1e-6);
}
