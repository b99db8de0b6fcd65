//! Butterworth filter design
//!
//! Butterworth filters have a maximally flat passband and monotonic
//! rolloff. The analog prototype places its poles uniformly on the left
//! half of the s-plane unit circle, all with zeros at infinity.
//!
//! ## Example
//!
//! ```rust
//! use iir_design::Butterworth;
//!
//! let mut designer = Butterworth::new();
//! let mut filter = designer.band_pass(2, 250.0, 50.0, 5.0).unwrap();
//! let y = filter.filter(0.0);
//! assert_eq!(y, 0.0);
//! ```

use crate::cascade::Cascade;
use crate::complex_pair::C_INFINITY;
use crate::direct_form::Topology;
use crate::layout::Layout;
use crate::transform::{
    band_pass_transform, band_stop_transform, high_pass_transform, low_pass_transform,
};
use crate::types::{check_band, check_corner, check_order, DesignResult, FilterType};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Analog lowpass prototype: poles at angles `π + (2i+1)π/(2N)` on the
/// unit circle, plus a real pole at -1 for odd orders.
#[derive(Debug, Clone)]
struct AnalogLowPass {
    layout: Layout,
    order: usize,
}

impl AnalogLowPass {
    fn new() -> Self {
        Self {
            layout: Layout::new(0),
            order: 0,
        }
    }

    fn design(&mut self, order: usize) -> &Layout {
        if self.order != order {
            self.layout = Layout::new(order);
            self.order = order;
        }
        self.layout.reset();

        let n2 = 2.0 * order as f64;
        let pairs = order / 2;
        for i in 0..pairs {
            let c = Complex64::from_polar(1.0, PI + (2 * i + 1) as f64 * PI / n2);
            self.layout.add_conjugate_pairs(c, C_INFINITY);
        }

        if order & 1 == 1 {
            self.layout.add(Complex64::new(-1.0, 0.0), C_INFINITY);
        }

        self.layout.set_normal(0.0, 1.0);
        &self.layout
    }
}

/// Butterworth filter designer.
///
/// One designer instance can produce any number of filters; each design
/// call returns an independent, runnable [`Cascade`].
#[derive(Debug, Clone)]
pub struct Butterworth {
    proto: AnalogLowPass,
}

impl Butterworth {
    pub fn new() -> Self {
        Self {
            proto: AnalogLowPass::new(),
        }
    }

    /// Lowpass filter with the default topology (Direct Form II).
    pub fn low_pass(
        &mut self,
        order: usize,
        sample_rate: f64,
        cutoff_frequency: f64,
    ) -> DesignResult<Cascade> {
        self.low_pass_with_topology(order, sample_rate, cutoff_frequency, Topology::default())
    }

    /// Lowpass filter with an explicit topology.
    pub fn low_pass_with_topology(
        &mut self,
        order: usize,
        sample_rate: f64,
        cutoff_frequency: f64,
        topology: Topology,
    ) -> DesignResult<Cascade> {
        check_order(order)?;
        check_corner(FilterType::Lowpass, sample_rate, cutoff_frequency)?;

        let analog = self.proto.design(order);
        let mut digital = Layout::new(order);
        low_pass_transform(cutoff_frequency / sample_rate, &mut digital, analog);
        Ok(Cascade::from_layout(&digital, topology))
    }

    /// Highpass filter with the default topology (Direct Form II).
    pub fn high_pass(
        &mut self,
        order: usize,
        sample_rate: f64,
        cutoff_frequency: f64,
    ) -> DesignResult<Cascade> {
        self.high_pass_with_topology(order, sample_rate, cutoff_frequency, Topology::default())
    }

    /// Highpass filter with an explicit topology.
    pub fn high_pass_with_topology(
        &mut self,
        order: usize,
        sample_rate: f64,
        cutoff_frequency: f64,
        topology: Topology,
    ) -> DesignResult<Cascade> {
        check_order(order)?;
        check_corner(FilterType::Highpass, sample_rate, cutoff_frequency)?;

        let analog = self.proto.design(order);
        let mut digital = Layout::new(order);
        high_pass_transform(cutoff_frequency / sample_rate, &mut digital, analog);
        Ok(Cascade::from_layout(&digital, topology))
    }

    /// Bandpass filter with the default topology. The realized order is
    /// twice `order`.
    pub fn band_pass(
        &mut self,
        order: usize,
        sample_rate: f64,
        center_frequency: f64,
        width_frequency: f64,
    ) -> DesignResult<Cascade> {
        self.band_pass_with_topology(
            order,
            sample_rate,
            center_frequency,
            width_frequency,
            Topology::default(),
        )
    }

    /// Bandpass filter with an explicit topology.
    pub fn band_pass_with_topology(
        &mut self,
        order: usize,
        sample_rate: f64,
        center_frequency: f64,
        width_frequency: f64,
        topology: Topology,
    ) -> DesignResult<Cascade> {
        check_order(order)?;
        check_band(
            FilterType::Bandpass,
            sample_rate,
            center_frequency,
            width_frequency,
        )?;

        let analog = self.proto.design(order);
        let mut digital = Layout::new(order * 2);
        band_pass_transform(
            center_frequency / sample_rate,
            width_frequency / sample_rate,
            &mut digital,
            analog,
        );
        Ok(Cascade::from_layout(&digital, topology))
    }

    /// Bandstop (notch) filter with the default topology. The realized
    /// order is twice `order`.
    pub fn band_stop(
        &mut self,
        order: usize,
        sample_rate: f64,
        center_frequency: f64,
        width_frequency: f64,
    ) -> DesignResult<Cascade> {
        self.band_stop_with_topology(
            order,
            sample_rate,
            center_frequency,
            width_frequency,
            Topology::default(),
        )
    }

    /// Bandstop filter with an explicit topology.
    pub fn band_stop_with_topology(
        &mut self,
        order: usize,
        sample_rate: f64,
        center_frequency: f64,
        width_frequency: f64,
        topology: Topology,
    ) -> DesignResult<Cascade> {
        check_order(order)?;
        check_band(
            FilterType::Bandstop,
            sample_rate,
            center_frequency,
            width_frequency,
        )?;

        let analog = self.proto.design(order);
        let mut digital = Layout::new(order * 2);
        band_stop_transform(
            center_frequency / sample_rate,
            width_frequency / sample_rate,
            &mut digital,
            analog,
        );
        Ok(Cascade::from_layout(&digital, topology))
    }
}

impl Default for Butterworth {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DesignError;

    /// Unit impulse at sample 10, filtered for 500 samples; returns the
    /// next output after that.
    fn settled_impulse_tail(filter: &mut Cascade) -> f64 {
        for i in 0..500 {
            let x = if i == 10 { 1.0 } else { 0.0 };
            filter.filter(x);
        }
        filter.filter(0.0)
    }

    #[test]
    fn test_low_pass_impulse_decays() {
        let mut filter = Butterworth::new().low_pass(4, 250.0, 50.0).unwrap();
        let tail = settled_impulse_tail(&mut filter);
        assert!(tail.abs() < 1e-80, "tail {tail}");
        assert!(tail.abs() != 0.0);
        assert!(!tail.is_nan());
    }

    #[test]
    fn test_high_pass_impulse_decays() {
        let mut filter = Butterworth::new().high_pass(4, 250.0, 50.0).unwrap();
        let tail = settled_impulse_tail(&mut filter);
        assert!(tail.abs() < 1e-80, "tail {tail}");
        assert!(tail.abs() != 0.0);
        assert!(!tail.is_nan());
    }

    #[test]
    fn test_band_pass_impulse_decays() {
        let mut filter = Butterworth::new().band_pass(2, 250.0, 50.0, 5.0).unwrap();
        let tail = settled_impulse_tail(&mut filter);
        assert!(tail.abs() < 1e-10, "tail {tail}");
        assert!(tail.abs() != 0.0);
        assert!(!tail.is_nan());
    }

    #[test]
    fn test_band_stop_impulse_decays() {
        let mut filter = Butterworth::new().band_stop(2, 250.0, 50.0, 5.0).unwrap();
        let tail = settled_impulse_tail(&mut filter);
        assert!(tail.abs() < 1e-10, "tail {tail}");
        assert!(tail.abs() != 0.0);
        assert!(!tail.is_nan());
    }

    #[test]
    fn test_band_stop_passes_dc_step() {
        let mut filter = Butterworth::new().band_stop(2, 250.0, 50.0, 5.0).unwrap();
        for i in 0..500 {
            let x = if i > 10 { 1.0 } else { 0.0 };
            filter.filter(x);
        }
        let out = filter.filter(1.0).abs();
        assert!((0.99999999..=1.00000001).contains(&out), "DC gain {out}");
    }

    #[test]
    fn test_low_pass_unity_dc_gain() {
        let filter = Butterworth::new().low_pass(4, 250.0, 50.0).unwrap();
        let gain = filter.response(0.0).norm();
        assert!((gain - 1.0).abs() < 1e-12, "DC gain {gain}");
    }

    #[test]
    fn test_low_pass_cutoff_is_minus_3_db() {
        let filter = Butterworth::new().low_pass(4, 250.0, 50.0).unwrap();
        let db = 20.0 * filter.response(50.0 / 250.0).norm().log10();
        assert!((db + 3.0103).abs() < 0.01, "cutoff gain {db} dB");
    }

    #[test]
    fn test_high_pass_unity_gain_at_nyquist() {
        let filter = Butterworth::new().high_pass(4, 250.0, 50.0).unwrap();
        let gain = filter.response(0.5).norm();
        assert!((gain - 1.0).abs() < 1e-12, "Nyquist gain {gain}");
    }

    #[test]
    fn test_band_pass_unity_gain_at_center() {
        let filter = Butterworth::new().band_pass(2, 250.0, 50.0, 5.0).unwrap();
        let gain = filter.response(50.0 / 250.0).norm();
        assert!((gain - 1.0).abs() < 0.01, "center gain {gain}");
    }

    #[test]
    fn test_odd_order_has_single_pole_section() {
        let filter = Butterworth::new().low_pass(5, 250.0, 30.0).unwrap();
        assert_eq!(filter.num_biquads(), 3);
        assert_eq!(filter.num_poles(), 5);
        assert!(filter.is_stable());
        let gain = filter.response(0.0).norm();
        assert!((gain - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matches_scipy_butter_2_01() {
        // scipy butter(2, 0.1): Wn is in units of Nyquist, so fc/fs = 0.05
        let sos = [[
            0.02008337, 0.04016673, 0.02008337, 1.0, -1.56101808, 0.64135154,
        ]];
        let mut reference = Cascade::from_sos(2, &sos).unwrap();
        let mut designed = Butterworth::new().low_pass(2, 250.0, 12.5).unwrap();

        let input = [-1.0, 0.5, 1.0, 0.25, -0.75, 0.0, 2.0, -0.125];
        for (n, &x) in input.iter().enumerate() {
            let a = designed.filter(x);
            let b = reference.filter(x);
            assert!((a - b).abs() < 1e-5, "sample {n}: {a} vs {b}");
        }
    }

    #[test]
    fn test_topologies_agree_on_designed_filter() {
        let mut designer = Butterworth::new();
        let mut df1 = designer
            .low_pass_with_topology(4, 250.0, 50.0, Topology::DirectFormI)
            .unwrap();
        let mut df2 = designer
            .low_pass_with_topology(4, 250.0, 50.0, Topology::DirectFormII)
            .unwrap();

        for i in 0..200 {
            let x = (i as f64 * 0.37).sin() + if i == 10 { 1.0 } else { 0.0 };
            let y1 = df1.filter(x);
            let y2 = df2.filter(x);
            assert!((y1 - y2).abs() < 1e-10, "sample {i}: {y1} vs {y2}");
        }
    }

    #[test]
    fn test_rejects_cutoff_at_or_above_nyquist() {
        let mut designer = Butterworth::new();
        assert!(designer.low_pass(4, 250.0, 125.0).is_err());
        assert!(designer.high_pass(4, 250.0, 125.0).is_err());
        assert!(designer.band_pass(2, 250.0, 125.0, 5.0).is_err());
        assert!(designer.band_stop(2, 250.0, 125.0, 5.0).is_err());
    }

    #[test]
    fn test_rejects_negative_cutoff() {
        let mut designer = Butterworth::new();
        assert!(designer.low_pass(4, 250.0, -1.0).is_err());
        assert!(designer.high_pass(4, 250.0, -1.0).is_err());
        assert!(designer.band_pass(2, 250.0, -1.0, 5.0).is_err());
        assert!(designer.band_stop(2, 250.0, -1.0, 5.0).is_err());
    }

    #[test]
    fn test_rejects_zero_order() {
        let mut designer = Butterworth::new();
        assert_eq!(
            designer.low_pass(0, 250.0, 50.0).unwrap_err(),
            DesignError::InvalidOrder(0)
        );
    }

    #[test]
    fn test_designer_reuse_across_orders() {
        let mut designer = Butterworth::new();
        for order in 1..=8 {
            let filter = designer.low_pass(order, 250.0, 40.0).unwrap();
            assert_eq!(filter.num_biquads(), order.div_ceil(2));
            assert!(filter.is_stable(), "order {order} unstable");
        }
    }
}
