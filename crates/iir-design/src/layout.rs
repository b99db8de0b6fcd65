//! Prototype layout store
//!
//! A [`Layout`] collects the pole/zero pairs of one filter design (analog
//! or digital) in processing order, together with the reference point
//! `(normal_w, normal_gain)` used later for cascade gain normalization.
//!
//! Capacity is fixed at construction to `ceil(max_poles / 2)` pair slots.
//! Writing past capacity is a programming error in a prototype designer or
//! frequency transform, not a recoverable condition, so it fails fast.

use crate::complex_pair::{ComplexPair, PoleZeroPair};
use num_complex::Complex64;

/// Ordered pole/zero pair storage for one filter design.
#[derive(Debug, Clone)]
pub struct Layout {
    num_poles: usize,
    pairs: Vec<PoleZeroPair>,
    capacity: usize,
    normal_w: f64,
    normal_gain: f64,
}

impl Layout {
    /// Create an empty layout with room for `max_poles` poles
    /// (`ceil(max_poles / 2)` pair slots).
    pub fn new(max_poles: usize) -> Self {
        let capacity = max_poles.div_ceil(2);
        Self {
            num_poles: 0,
            pairs: Vec::with_capacity(capacity),
            capacity,
            normal_w: 0.0,
            normal_gain: 1.0,
        }
    }

    /// Clear the stored pairs; capacity and the reference point remain.
    pub fn reset(&mut self) {
        self.num_poles = 0;
        self.pairs.clear();
    }

    /// Number of poles stored (1 per single pole, 2 per conjugate pair).
    pub fn num_poles(&self) -> usize {
        self.num_poles
    }

    /// Number of occupied pair slots.
    pub fn num_pairs(&self) -> usize {
        self.pairs.len()
    }

    /// Add a single real pole with its zero (first-order section).
    pub fn add(&mut self, pole: Complex64, zero: Complex64) {
        self.push(PoleZeroPair::single(pole, zero));
        self.num_poles += 1;
    }

    /// Add a pole/zero together with their complex conjugates.
    pub fn add_conjugate_pairs(&mut self, pole: Complex64, zero: Complex64) {
        self.push(PoleZeroPair::pair(pole, zero, pole.conj(), zero.conj()));
        self.num_poles += 2;
    }

    /// Add an explicit two-pole/two-zero pair.
    pub fn add_pair(&mut self, poles: ComplexPair, zeros: ComplexPair) {
        self.push(PoleZeroPair::pair(
            poles.first,
            zeros.first,
            poles.second,
            zeros.second,
        ));
        self.num_poles += 2;
    }

    fn push(&mut self, pair: PoleZeroPair) {
        assert!(
            self.pairs.len() < self.capacity,
            "layout capacity exceeded: all {} pair slots are in use",
            self.capacity
        );
        assert!(!pair.is_nan(), "NaN pole or zero added to layout");
        self.pairs.push(pair);
    }

    pub fn pair(&self, index: usize) -> &PoleZeroPair {
        &self.pairs[index]
    }

    /// Normalized angular reference frequency (radians/sample).
    pub fn normal_w(&self) -> f64 {
        self.normal_w
    }

    /// Target gain at the reference frequency.
    pub fn normal_gain(&self) -> f64 {
        self.normal_gain
    }

    pub fn set_normal(&mut self, w: f64, gain: f64) {
        self.normal_w = w;
        self.normal_gain = gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex_pair::C_INFINITY;

    #[test]
    fn test_pole_counting() {
        let mut layout = Layout::new(3);
        layout.add_conjugate_pairs(Complex64::new(-0.5, 0.5), C_INFINITY);
        assert_eq!(layout.num_poles(), 2);
        layout.add(Complex64::new(-1.0, 0.0), C_INFINITY);
        assert_eq!(layout.num_poles(), 3);
        assert_eq!(layout.num_pairs(), 2);
    }

    #[test]
    fn test_reset_allows_reuse() {
        let mut layout = Layout::new(4);
        layout.add_conjugate_pairs(Complex64::new(-0.5, 0.5), C_INFINITY);
        layout.set_normal(0.0, 0.5);
        layout.reset();
        assert_eq!(layout.num_poles(), 0);
        // reference point survives reset; designers overwrite it anyway
        assert_eq!(layout.normal_gain(), 0.5);
        layout.add_conjugate_pairs(Complex64::new(-0.2, 0.1), C_INFINITY);
        layout.add_conjugate_pairs(Complex64::new(-0.4, 0.2), C_INFINITY);
        assert_eq!(layout.num_poles(), 4);
    }

    #[test]
    #[should_panic(expected = "layout capacity exceeded")]
    fn test_capacity_overflow_panics() {
        let mut layout = Layout::new(2);
        layout.add_conjugate_pairs(Complex64::new(-0.5, 0.5), C_INFINITY);
        layout.add(Complex64::new(-1.0, 0.0), C_INFINITY);
    }

    #[test]
    #[should_panic(expected = "NaN pole")]
    fn test_nan_pole_panics() {
        let mut layout = Layout::new(2);
        layout.add_conjugate_pairs(Complex64::new(f64::NAN, 0.0), C_INFINITY);
    }

    #[test]
    fn test_odd_order_capacity() {
        // order 5 needs 3 slots: two conjugate pairs plus one single pole
        let mut layout = Layout::new(5);
        layout.add_conjugate_pairs(Complex64::new(-0.1, 0.9), C_INFINITY);
        layout.add_conjugate_pairs(Complex64::new(-0.6, 0.6), C_INFINITY);
        layout.add(Complex64::new(-1.0, 0.0), C_INFINITY);
        assert_eq!(layout.num_poles(), 5);
        assert_eq!(layout.num_pairs(), 3);
    }
}
