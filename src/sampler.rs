//! Procedural point-cloud generation for the two silhouettes and the
//! background starfield.
//!
//! All sampling is driven through [`Rand01`], and every particle of a
//! given shape consumes a fixed number of draws, so a single generator
//! threaded through tree, cake and twinkle seeds reproduces the same
//! clouds on every run.

use glam::Vec3;

use crate::rng::Rand01;

/// Particles in the morphable cloud.
pub const PARTICLE_COUNT: usize = 8000;
/// Particles in the non-morphing background starfield.
pub const STAR_COUNT: usize = 900;

/// Seed for the shape generator (tree, cake, twinkle seeds, in that order).
pub const SHAPE_SEED: u32 = 20251225;
/// Seed for the starfield generator, independent of the shape stream.
pub const STAR_SEED: u32 = 424242;

const TAU: f64 = std::f64::consts::TAU;

/// Which silhouette to sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Tree,
    Cake,
}

/// A fixed-length cloud: flat xyz position triplets and rgb color
/// triplets, one of each per particle. Reference sets are built once
/// and never mutated; the renderer copies them into its live buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSet {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl ParticleSet {
    fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn push(&mut self, pos: [f64; 3], col: Vec3) {
        self.positions.extend(pos.map(|c| c as f32));
        self.colors.extend_from_slice(&[col.x, col.y, col.z]);
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(f32::from(r), f32::from(g), f32::from(b)) / 255.0
}

/// Sample one silhouette. Pure in its inputs: the same draw sequence
/// always yields a bit-identical set.
pub fn sample(kind: ShapeKind, count: usize, rng: &mut impl Rand01) -> ParticleSet {
    match kind {
        ShapeKind::Tree => sample_tree(count, rng),
        ShapeKind::Cake => sample_cake(count, rng),
    }
}

fn sample_tree(count: usize, rng: &mut impl Rand01) -> ParticleSet {
    let mut set = ParticleSet::with_capacity(count);

    let green_a = rgb(32, 170, 98);
    let green_b = rgb(14, 104, 64);
    let gold = rgb(255, 215, 120);
    let red = rgb(255, 105, 130);
    let blue = rgb(120, 195, 255);

    for _ in 0..count {
        let u = rng.next();
        let v = rng.next();
        let w = rng.next();

        let y_n = u.powf(0.65); // denser near bottom
        let height = 1.35;
        let y = y_n * height - 0.62;

        // Uniform angle plus a spiral twist that advances with height.
        let theta = v * TAU + y_n * 6.2;
        // Cone taper with a little radius jitter; w^0.35 pulls mass
        // toward the outer edge rather than filling the disk.
        let radius = (1.0 - y_n) * (0.78 + 0.14 * (rng.next() - 0.5));
        let r = radius * w.powf(0.35);

        let pos = [theta.cos() * r, y, theta.sin() * r];

        // Ornaments: cascading bands on one draw, so the stated
        // fractions partition exactly.
        let ornament = rng.next();
        let col = if ornament < 0.07 {
            red
        } else if ornament < 0.12 {
            gold
        } else if ornament < 0.16 {
            blue
        } else {
            green_a.lerp(green_b, y_n as f32)
        };

        set.push(pos, col);
    }

    set
}

fn sample_cake(count: usize, rng: &mut impl Rand01) -> ParticleSet {
    let mut set = ParticleSet::with_capacity(count);

    let cream = rgb(255, 245, 235);
    let pink = rgb(255, 160, 200);
    let berry = rgb(255, 95, 125);
    let mint = rgb(145, 230, 210);
    let lemon = rgb(255, 240, 140);

    for _ in 0..count {
        let a = rng.next();
        let b = rng.next();
        let c = rng.next();

        // 3% candle flame particles in a thin column above the cake.
        if a < 0.03 {
            let theta = b * TAU;
            let r = 0.06 * c.sqrt();
            let y = 0.55 + 0.55 * rng.next();
            let pos = [theta.cos() * r, y, theta.sin() * r];

            let col = if rng.next() < 0.5 { lemon } else { berry };
            set.push(pos, col);
            continue;
        }

        // Cake body: uniform-area disk cross-sections stacked into a
        // soft cylinder.
        let height = 0.9;
        let y_n = b;
        let y = y_n * height - 0.55;

        let theta = c * TAU;
        let radius = 0.62;
        let rr = radius * rng.next().sqrt();
        let pos = [theta.cos() * rr, y, theta.sin() * rr];

        // Colors: alternating layer bands plus a sprinkle cascade.
        let sprinkle = rng.next();
        let mut base = cream.lerp(pink, 0.55);
        let band = (y_n * 6.0).floor() as i64 % 2;
        if band == 1 {
            base = base.lerp(pink, 0.25);
        }

        let col = if sprinkle < 0.08 {
            berry
        } else if sprinkle < 0.12 {
            mint
        } else if sprinkle < 0.15 {
            lemon
        } else {
            base
        };

        set.push(pos, col);
    }

    set
}

/// Sample the background stars: a flattened spherical shell of faint
/// grayscale points. Never morphed, so it gets its own generator.
pub fn sample_starfield(count: usize, rng: &mut impl Rand01) -> ParticleSet {
    let mut set = ParticleSet::with_capacity(count);

    for _ in 0..count {
        let r = 2.8 + rng.next() * 5.0;
        let theta = rng.next() * TAU;
        let phi = (2.0 * rng.next() - 1.0).acos();

        let pos = [
            r * phi.sin() * theta.cos(),
            r * phi.cos() * 0.6,
            r * phi.sin() * theta.sin(),
        ];

        let shade = (0.6 + rng.next() * 0.4) as f32;
        set.push(pos, Vec3::splat(shade));
    }

    set
}

/// One scalar per particle, fed to the vertex stage to desynchronize
/// the twinkle oscillation.
pub fn twinkle_seeds(count: usize, rng: &mut impl Rand01) -> Vec<f32> {
    (0..count).map(|_| rng.next() as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted draw sequence for boundary checks.
    struct Scripted {
        draws: Vec<f64>,
        at: usize,
    }

    impl Scripted {
        fn new(draws: &[f64]) -> Self {
            Self {
                draws: draws.to_vec(),
                at: 0,
            }
        }
    }

    impl Rand01 for Scripted {
        fn next(&mut self) -> f64 {
            let v = self.draws[self.at % self.draws.len()];
            self.at += 1;
            v
        }
    }

    fn color_of(set: &ParticleSet, i: usize) -> [f32; 3] {
        [set.colors[i * 3], set.colors[i * 3 + 1], set.colors[i * 3 + 2]]
    }

    #[test]
    fn candle_body_partition_is_exact() {
        // First draw just below the threshold: candle, well above the body.
        let mut rng = Scripted::new(&[0.029999, 0.5, 0.5, 0.5, 0.5]);
        let set = sample_cake(1, &mut rng);
        assert!(set.positions[1] >= 0.55);

        // Exactly at the threshold: body, below the candle column.
        let mut rng = Scripted::new(&[0.03, 0.5, 0.5, 0.5, 0.5]);
        let set = sample_cake(1, &mut rng);
        assert!(set.positions[1] < 0.55);
    }

    #[test]
    fn ornament_cascade_boundaries() {
        let red = [255.0 / 255.0, 105.0 / 255.0, 130.0 / 255.0];
        let gold = [255.0 / 255.0, 215.0 / 255.0, 120.0 / 255.0];
        let blue = [120.0 / 255.0, 195.0 / 255.0, 255.0 / 255.0];

        // Draw order: u, v, w, jitter, ornament.
        let cases: [(f64, Option<[f32; 3]>); 6] = [
            (0.069999, Some(red)),
            (0.07, Some(gold)),
            (0.119999, Some(gold)),
            (0.12, Some(blue)),
            (0.159999, Some(blue)),
            (0.16, None), // green gradient
        ];

        for (ornament, expected) in cases {
            let mut rng = Scripted::new(&[0.5, 0.5, 0.5, 0.5, ornament]);
            let set = sample_tree(1, &mut rng);
            match expected {
                Some(c) => assert_eq!(color_of(&set, 0), c, "ornament draw {ornament}"),
                None => {
                    // Green channel dominates on the gradient side.
                    let c = color_of(&set, 0);
                    assert!(c[1] > c[0] && c[1] > c[2], "ornament draw {ornament}: {c:?}");
                }
            }
        }
    }

    #[test]
    fn sprinkle_cascade_boundaries() {
        let berry = [255.0 / 255.0, 95.0 / 255.0, 125.0 / 255.0];
        let mint = [145.0 / 255.0, 230.0 / 255.0, 210.0 / 255.0];
        let lemon = [255.0 / 255.0, 240.0 / 255.0, 140.0 / 255.0];

        // Draw order for a body particle: a, b, c, rr, sprinkle.
        let cases: [(f64, Option<[f32; 3]>); 6] = [
            (0.079999, Some(berry)),
            (0.08, Some(mint)),
            (0.119999, Some(mint)),
            (0.12, Some(lemon)),
            (0.149999, Some(lemon)),
            (0.15, None), // layered base tone
        ];

        for (sprinkle, expected) in cases {
            let mut rng = Scripted::new(&[0.5, 0.5, 0.5, 0.5, sprinkle]);
            let set = sample_cake(1, &mut rng);
            match expected {
                Some(c) => assert_eq!(color_of(&set, 0), c, "sprinkle draw {sprinkle}"),
                None => {
                    let c = color_of(&set, 0);
                    // cream/pink blend: warm, red-leaning.
                    assert!(c[0] > c[2] && c[2] > 0.5, "sprinkle draw {sprinkle}: {c:?}");
                }
            }
        }
    }

    #[test]
    fn layer_bands_alternate() {
        // Body particles at two adjacent height bands; band parity
        // decides whether the extra pink tint applies.
        let even = {
            let mut rng = Scripted::new(&[0.5, 0.05, 0.5, 0.5, 0.5]);
            color_of(&sample_cake(1, &mut rng), 0)
        };
        let odd = {
            let mut rng = Scripted::new(&[0.5, 0.2, 0.5, 0.5, 0.5]);
            color_of(&sample_cake(1, &mut rng), 0)
        };
        // The odd band is pulled further toward pink: less green.
        assert!(odd[1] < even[1]);
        assert_eq!(even[0], odd[0]); // red channel saturated either way
    }

    #[test]
    fn five_draws_per_particle_both_shapes() {
        let mut rng = Scripted::new(&[0.5]);
        let _ = sample_tree(10, &mut rng);
        assert_eq!(rng.at, 50);

        let mut rng = Scripted::new(&[0.5]);
        let _ = sample_cake(10, &mut rng);
        assert_eq!(rng.at, 50);

        // Candle branch consumes the same budget as the body branch.
        let mut rng = Scripted::new(&[0.0, 0.5, 0.5, 0.5, 0.5]);
        let _ = sample_cake(1, &mut rng);
        assert_eq!(rng.at, 5);
    }
}
