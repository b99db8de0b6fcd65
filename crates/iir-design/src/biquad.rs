//! Second-order section ("biquad") coefficients
//!
//! A biquad realizes the transfer function
//!
//! ```text
//!         b0 + b1*z^-1 + b2*z^-2
//! H(z) = ------------------------
//!         a0 + a1*z^-1 + a2*z^-2
//! ```
//!
//! Coefficients are stored with `a0` kept separately and the remaining
//! five pre-divided by `a0`, which is the form the per-sample recursions
//! consume. A scalar gain can be folded into the feed-forward
//! coefficients.

use crate::complex_pair::PoleZeroPair;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Coefficients of one second-order digital filter section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Biquad {
    pub(crate) a0: f64,
    /// a1/a0
    pub(crate) a1: f64,
    /// a2/a0
    pub(crate) a2: f64,
    /// b0/a0
    pub(crate) b0: f64,
    /// b1/a0
    pub(crate) b1: f64,
    /// b2/a0
    pub(crate) b2: f64,
}

impl Biquad {
    /// The pass-through section: `H(z) = 1`.
    pub fn identity() -> Self {
        Self::from_coefficients(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Build from raw (un-normalized) transfer function coefficients.
    pub fn from_coefficients(a0: f64, a1: f64, a2: f64, b0: f64, b1: f64, b2: f64) -> Self {
        Self {
            a0,
            a1: a1 / a0,
            a2: a2 / a0,
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
        }
    }

    /// Build from one pole/zero pair, choosing the first-order or
    /// second-order branch as appropriate.
    pub(crate) fn from_pole_zero_pair(pair: &PoleZeroPair) -> Self {
        if pair.is_single_pole() {
            Self::one_pole(pair.poles.first, pair.zeros.first)
        } else {
            Self::two_pole(
                pair.poles.first,
                pair.zeros.first,
                pair.poles.second,
                pair.zeros.second,
            )
        }
    }

    fn one_pole(pole: Complex64, zero: Complex64) -> Self {
        Self::from_coefficients(1.0, -pole.re, 0.0, -zero.re, 1.0, 0.0)
    }

    fn two_pole(pole1: Complex64, zero1: Complex64, pole2: Complex64, zero2: Complex64) -> Self {
        let (a1, a2) = if pole1.im != 0.0 {
            // conjugate pair: a1 = -2*Re(p), a2 = |p|^2
            (-2.0 * pole1.re, pole1.norm_sqr())
        } else {
            // two independent reals: sum and product
            (-(pole1.re + pole2.re), pole1.re * pole2.re)
        };

        let (b1, b2) = if zero1.im != 0.0 {
            (-2.0 * zero1.re, zero1.norm_sqr())
        } else {
            (-(zero1.re + zero2.re), zero1.re * zero2.re)
        };

        Self::from_coefficients(1.0, a1, a2, 1.0, b1, b2)
    }

    /// Fold a scalar gain into the feed-forward coefficients.
    pub fn apply_scale(&mut self, scale: f64) {
        self.b0 *= scale;
        self.b1 *= scale;
        self.b2 *= scale;
    }

    /// Complex response of this section alone at a normalized frequency
    /// (cycles/sample).
    pub fn response(&self, normalized_frequency: f64) -> Complex64 {
        let w = 2.0 * PI * normalized_frequency;
        let czn1 = Complex64::from_polar(1.0, -w);
        let czn2 = Complex64::from_polar(1.0, -2.0 * w);
        let top = self.b0 + self.b1 * czn1 + self.b2 * czn2;
        let bot = 1.0 + self.a1 * czn1 + self.a2 * czn2;
        top / bot
    }

    pub fn a0(&self) -> f64 {
        self.a0
    }

    pub fn a1(&self) -> f64 {
        self.a1 * self.a0
    }

    pub fn a2(&self) -> f64 {
        self.a2 * self.a0
    }

    pub fn b0(&self) -> f64 {
        self.b0 * self.a0
    }

    pub fn b1(&self) -> f64 {
        self.b1 * self.a0
    }

    pub fn b2(&self) -> f64 {
        self.b2 * self.a0
    }

    /// True when all poles are inside the unit circle.
    ///
    /// For `1 + a1*z^-1 + a2*z^-2` this is `|a2| < 1` and `|a1| < 1 + a2`.
    pub fn is_stable(&self) -> bool {
        self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex_pair::C_ZERO;

    #[test]
    fn test_identity_response_is_unity_everywhere() {
        let bq = Biquad::identity();
        for f in [0.0, 0.1, 0.25, 0.49] {
            let r = bq.response(f).norm();
            assert!((r - 1.0).abs() < 1e-12, "|H({f})| = {r}");
        }
    }

    #[test]
    fn test_normalization_by_a0() {
        let bq = Biquad::from_coefficients(2.0, 1.0, 0.5, 4.0, 2.0, 1.0);
        assert_eq!(bq.a0(), 2.0);
        assert!((bq.a1() - 1.0).abs() < 1e-15);
        assert!((bq.b0() - 4.0).abs() < 1e-15);
        // the realized transfer function uses the normalized values
        assert!((bq.b0 - 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_conjugate_pole_pair_coefficients() {
        let p = Complex64::new(-0.25, 0.5);
        let pair = PoleZeroPair::pair(p, C_ZERO, p.conj(), C_ZERO);
        let bq = Biquad::from_pole_zero_pair(&pair);
        assert!((bq.a1 - 0.5).abs() < 1e-15);
        assert!((bq.a2 - p.norm_sqr()).abs() < 1e-15);
        assert!(bq.is_stable());
    }

    #[test]
    fn test_two_real_poles_use_sum_and_product() {
        let p1 = Complex64::new(-0.2, 0.0);
        let p2 = Complex64::new(-0.6, 0.0);
        let pair = PoleZeroPair::pair(p1, C_ZERO, p2, C_ZERO);
        let bq = Biquad::from_pole_zero_pair(&pair);
        assert!((bq.a1 - 0.8).abs() < 1e-15);
        assert!((bq.a2 - 0.12).abs() < 1e-15);
    }

    #[test]
    fn test_single_pole_embeds_first_order_section() {
        let pair = PoleZeroPair::single(Complex64::new(0.5, 0.0), Complex64::new(-1.0, 0.0));
        let bq = Biquad::from_pole_zero_pair(&pair);
        assert_eq!(bq.a2, 0.0);
        assert_eq!(bq.b2, 0.0);
        assert!((bq.a1 + 0.5).abs() < 1e-15);
        // zero at -1: numerator 1 + z^-1
        assert!((bq.b0 - 1.0).abs() < 1e-15);
        assert!((bq.b1 - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_apply_scale_touches_feed_forward_only() {
        let mut bq = Biquad::from_coefficients(1.0, -0.5, 0.25, 1.0, 2.0, 1.0);
        bq.apply_scale(0.5);
        assert!((bq.b0 - 0.5).abs() < 1e-15);
        assert!((bq.b1 - 1.0).abs() < 1e-15);
        assert!((bq.b2 - 0.5).abs() < 1e-15);
        assert!((bq.a1 + 0.5).abs() < 1e-15);
        assert!((bq.a2 - 0.25).abs() < 1e-15);
    }
}
