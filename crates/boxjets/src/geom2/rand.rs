//! Synthetic volunteer annotations around a consensus box.
//!
//! Model
//! - Each simulated volunteer draws the consensus box with bounded uniform
//!   jitter on center, size and angle; sizes are kept positive.
//! - Start/end points are jittered copies of the true base and tip.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG,
//!   so draw `k` of a batch can be regenerated on its own.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{BoxParams, Point};

/// Jitter amplitudes for simulated annotations.
#[derive(Clone, Copy, Debug)]
pub struct AnnotationCfg {
    /// Number of volunteers.
    pub count: usize,
    /// Center jitter, absolute (pixels).
    pub center_jitter: f64,
    /// Width/height jitter, relative amplitude in [0, 0.9].
    pub size_jitter: f64,
    /// Angle jitter, radians.
    pub angle_jitter: f64,
    /// Point jitter for start/end extracts (pixels).
    pub point_jitter: f64,
}

impl Default for AnnotationCfg {
    fn default() -> Self {
        Self {
            count: 12,
            center_jitter: 2.0,
            size_jitter: 0.15,
            angle_jitter: 0.1,
            point_jitter: 1.5,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// One simulated volunteer's annotations.
#[derive(Clone, Copy, Debug)]
pub struct Annotation {
    pub start: Point,
    pub end: Point,
    pub bx: BoxParams,
}

#[inline]
fn sym<R: Rng>(rng: &mut R, amp: f64) -> f64 {
    if amp <= 0.0 {
        0.0
    } else {
        rng.gen_range(-amp..=amp)
    }
}

/// Draw `cfg.count` jittered annotations of the jet `(start, end, bx)`.
pub fn draw_annotations(
    start: Point,
    end: Point,
    bx: BoxParams,
    cfg: AnnotationCfg,
    tok: ReplayToken,
) -> Vec<Annotation> {
    let mut rng = tok.to_std_rng();
    let sj = cfg.size_jitter.clamp(0.0, 0.9);
    (0..cfg.count)
        .map(|_| {
            let jitter_pt =
                |rng: &mut StdRng, p: Point| p + Point::new(sym(rng, cfg.point_jitter), sym(rng, cfg.point_jitter));
            let s = jitter_pt(&mut rng, start);
            let e = jitter_pt(&mut rng, end);
            let b = BoxParams {
                cx: bx.cx + sym(&mut rng, cfg.center_jitter),
                cy: bx.cy + sym(&mut rng, cfg.center_jitter),
                width: bx.width * (1.0 + sym(&mut rng, sj)),
                height: bx.height * (1.0 + sym(&mut rng, sj)),
                angle: bx.angle + sym(&mut rng, cfg.angle_jitter),
            };
            Annotation { start: s, end: e, bx: b }
        })
        .collect()
}
