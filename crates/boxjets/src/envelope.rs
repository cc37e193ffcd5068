//! Sigma envelope around a consensus box.
//!
//! Given the raw per-annotation parameter vectors that were averaged into a
//! consensus box, the envelope is the pair of boxes `mean ± sigma·std`, taken
//! per parameter. Rendering fills the band between the two outlines.
//!
//! Conventions
//! - Standard deviation is the population one (divide by `n`).
//! - Angles are radians, as for `compute_box_corners`.
//! - The lower box is not clamped: a large `sigma·std` may give a negative
//!   width or height, which `compute_box_corners` accepts (the outline then
//!   folds over the center).

use serde::{Deserialize, Serialize};

use crate::error::JetError;
use crate::geom2::{BoxParams, Quad};

/// `mean + sigma·std` and `mean − sigma·std` boxes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SigmaEnvelope {
    pub upper: BoxParams,
    pub lower: BoxParams,
}

impl SigmaEnvelope {
    /// Corner polygons of the upper and lower boxes.
    pub fn polygons(&self) -> (Quad, Quad) {
        (self.upper.corners(), self.lower.corners())
    }
}

/// Per-parameter mean and population standard deviation.
pub fn mean_std(values: &[BoxParams]) -> Result<([f64; 5], [f64; 5]), JetError> {
    if values.is_empty() {
        return Err(JetError::EmptyInput("cluster values"));
    }
    let n = values.len() as f64;
    let mut mean = [0.0; 5];
    for v in values {
        for (m, x) in mean.iter_mut().zip(v.to_array()) {
            *m += x;
        }
    }
    mean.iter_mut().for_each(|m| *m /= n);
    let mut var = [0.0; 5];
    for v in values {
        for ((s, x), m) in var.iter_mut().zip(v.to_array()).zip(mean) {
            *s += (x - m) * (x - m);
        }
    }
    let std = var.map(|s| (s / n).sqrt());
    Ok((mean, std))
}

/// Upper and lower envelope boxes for `sigma` standard deviations.
pub fn compute_sigma_envelope(
    cluster_values: &[BoxParams],
    sigma: f64,
) -> Result<SigmaEnvelope, JetError> {
    let (mean, std) = mean_std(cluster_values)?;
    let mut upper = [0.0; 5];
    let mut lower = [0.0; 5];
    for k in 0..5 {
        upper[k] = mean[k] + sigma * std[k];
        lower[k] = mean[k] - sigma * std[k];
    }
    Ok(SigmaEnvelope {
        upper: upper.into(),
        lower: lower.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_values_collapse_to_mean() {
        let v = vec![BoxParams::new(0.0, 0.0, 10.0, 20.0, 0.0); 3];
        let env = compute_sigma_envelope(&v, 1.0).unwrap();
        assert_eq!(env.upper, v[0]);
        assert_eq!(env.lower, v[0]);
    }

    #[test]
    fn empty_values_are_rejected() {
        assert_eq!(
            compute_sigma_envelope(&[], 1.0),
            Err(JetError::EmptyInput("cluster values"))
        );
    }

    #[test]
    fn spread_uses_population_std() {
        let v = vec![
            BoxParams::new(0.0, 10.0, 8.0, 20.0, 0.1),
            BoxParams::new(2.0, 10.0, 12.0, 20.0, 0.3),
        ];
        let env = compute_sigma_envelope(&v, 2.0).unwrap();
        // mean x = 1, std x = 1
        assert!((env.upper.cx - 3.0).abs() < 1e-12);
        assert!((env.lower.cx + 1.0).abs() < 1e-12);
        // no spread in y
        assert!((env.upper.cy - 10.0).abs() < 1e-12);
        // width mean 10, std 2
        assert!((env.upper.width - 14.0).abs() < 1e-12);
        assert!((env.lower.width - 6.0).abs() < 1e-12);
        assert!((env.upper.angle - 0.4).abs() < 1e-12);
    }

    #[test]
    fn lower_width_is_not_clamped() {
        let v = vec![
            BoxParams::new(0.0, 0.0, 1.0, 5.0, 0.0),
            BoxParams::new(0.0, 0.0, 9.0, 5.0, 0.0),
        ];
        let env = compute_sigma_envelope(&v, 3.0).unwrap();
        // mean 5, std 4
        assert!((env.lower.width + 7.0).abs() < 1e-12);
    }

    #[test]
    fn sigma_zero_gives_mean_box() {
        let v = vec![
            BoxParams::new(1.0, 2.0, 3.0, 4.0, 0.5),
            BoxParams::new(3.0, 4.0, 5.0, 6.0, 0.7),
        ];
        let env = compute_sigma_envelope(&v, 0.0).unwrap();
        assert_eq!(env.upper, env.lower);
        assert!((env.upper.cx - 2.0).abs() < 1e-12);
        let (p, m) = env.polygons();
        assert_eq!(p, m);
    }
}
