//! Drifting clouds behind the playfield. Cosmetic only: the renderer reads
//! them, nothing in the game rules does.
//!
//! Coordinates are canvas fractions so the core never needs pixel dimensions;
//! `x`/`y` are the cloud anchor, `size` and `speed` are 0.5..1.0 multipliers.

use rand::Rng;

pub const CLOUD_KINDS: u8 = 4;

/// Fraction of the canvas width a speed-1.0 cloud covers per second.
const DRIFT_PER_SEC: f64 = 0.05;
/// Nominal cloud width as a width fraction, used to decide when a cloud has
/// fully left the canvas.
const CLOUD_WIDTH: f64 = 0.12;

#[derive(Clone, Copy, Debug)]
pub struct Cloud {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub kind: u8, // one of CLOUD_KINDS shapes
}

/// 5 to 8 clouds scattered over the upper 60% of the sky.
pub fn generate(rng: &mut impl Rng) -> Vec<Cloud> {
    let count = rng.gen_range(5..=8);
    (0..count)
        .map(|_| Cloud {
            x: rng.gen_range(0.0..1.0),
            y: rng.gen_range(0.0..0.6),
            size: rng.gen_range(0.5..1.0),
            speed: rng.gen_range(0.5..1.0),
            kind: rng.gen_range(0..CLOUD_KINDS),
        })
        .collect()
}

/// Drift left by `dt_ms`; clouds leaving the left edge re-enter from the
/// right with a fresh height and shape.
pub fn drift(clouds: &mut [Cloud], dt_ms: f64, rng: &mut impl Rng) {
    for cloud in clouds {
        cloud.x -= cloud.speed * DRIFT_PER_SEC * (dt_ms / 1_000.0);
        if cloud.x + CLOUD_WIDTH * cloud.size < 0.0 {
            cloud.x = rng.gen_range(1.0..1.1);
            cloud.y = rng.gen_range(0.0..0.6);
            cloud.kind = rng.gen_range(0..CLOUD_KINDS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn generation_stays_in_bounds() {
        for seed in 0..8 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let clouds = generate(&mut rng);
            assert!((5..=8).contains(&clouds.len()));
            for cloud in &clouds {
                assert!((0.0..1.0).contains(&cloud.x));
                assert!((0.0..0.6).contains(&cloud.y));
                assert!((0.5..1.0).contains(&cloud.size));
                assert!(cloud.kind < CLOUD_KINDS);
            }
        }
    }

    #[test]
    fn clouds_drift_left_and_wrap_to_the_right() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut clouds = vec![Cloud {
            x: 0.01,
            y: 0.2,
            size: 1.0,
            speed: 1.0,
            kind: 0,
        }];
        drift(&mut clouds, 100.0, &mut rng);
        assert!(clouds[0].x < 0.01);
        // Push it fully off the left edge; it respawns on the right.
        drift(&mut clouds, 60_000.0, &mut rng);
        assert!(clouds[0].x >= 1.0);
    }
}
