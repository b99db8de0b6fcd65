//! Chebyshev Type I filter design
//!
//! Chebyshev Type I filters trade passband flatness for a steeper rolloff
//! than a Butterworth of the same order: the passband gain oscillates
//! within a user-chosen ripple (in dB), the stopband is monotonic.
//!
//! For even orders the ripple pattern starts below peak gain, so the DC
//! reference gain is `10^(-ripple/20)` rather than 1.

use crate::cascade::Cascade;
use crate::complex_pair::C_INFINITY;
use crate::direct_form::Topology;
use crate::layout::Layout;
use crate::transform::{
    band_pass_transform, band_stop_transform, high_pass_transform, low_pass_transform,
};
use crate::types::{check_band, check_corner, check_order, check_ripple, DesignResult, FilterType};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Analog lowpass prototype computed from the ripple parameter.
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

    fn design(&mut self, order: usize, ripple_db: f64) -> &Layout {
        if self.order != order {
            self.layout = Layout::new(order);
            self.order = order;
        }
        self.layout.reset();

        let eps = (10f64.powf(ripple_db / 10.0) - 1.0).sqrt();
        let v0 = (1.0 / eps).asinh() / order as f64;
        let sinh_v0 = -v0.sinh();
        let cosh_v0 = v0.cosh();

        let n2 = 2.0 * order as f64;
        let pairs = order / 2;
        for i in 0..pairs {
            let k = (2 * i + 1) as f64 - order as f64;
            let a = sinh_v0 * (k * PI / n2).cos();
            let b = cosh_v0 * (k * PI / n2).sin();
            self.layout
                .add_conjugate_pairs(Complex64::new(a, b), C_INFINITY);
        }

        if order & 1 == 1 {
            self.layout.add(Complex64::new(sinh_v0, 0.0), C_INFINITY);
            self.layout.set_normal(0.0, 1.0);
        } else {
            // even order: the ripple starts below peak gain at DC
            self.layout.set_normal(0.0, 10f64.powf(-ripple_db / 20.0));
        }
        &self.layout
    }
}

/// Chebyshev Type I filter designer.
#[derive(Debug, Clone)]
pub struct ChebyshevI {
    proto: AnalogLowPass,
}

impl ChebyshevI {
    pub fn new() -> Self {
        Self {
            proto: AnalogLowPass::new(),
        }
    }

    /// Lowpass filter. `ripple_db` is the passband ripple in decibel
    /// (a sensible value is 1 dB).
    pub fn low_pass(
        &mut self,
        order: usize,
        sample_rate: f64,
        cutoff_frequency: f64,
        ripple_db: f64,
    ) -> DesignResult<Cascade> {
        self.low_pass_with_topology(
            order,
            sample_rate,
            cutoff_frequency,
            ripple_db,
            Topology::default(),
        )
    }

    /// Lowpass filter with an explicit topology.
    pub fn low_pass_with_topology(
        &mut self,
        order: usize,
        sample_rate: f64,
        cutoff_frequency: f64,
        ripple_db: f64,
        topology: Topology,
    ) -> DesignResult<Cascade> {
        check_order(order)?;
        check_corner(FilterType::Lowpass, sample_rate, cutoff_frequency)?;
        check_ripple(ripple_db)?;

        let analog = self.proto.design(order, ripple_db);
        let mut digital = Layout::new(order);
        low_pass_transform(cutoff_frequency / sample_rate, &mut digital, analog);
        Ok(Cascade::from_layout(&digital, topology))
    }

    /// Highpass filter.
    pub fn high_pass(
        &mut self,
        order: usize,
        sample_rate: f64,
        cutoff_frequency: f64,
        ripple_db: f64,
    ) -> DesignResult<Cascade> {
        self.high_pass_with_topology(
            order,
            sample_rate,
            cutoff_frequency,
            ripple_db,
            Topology::default(),
        )
    }

    /// Highpass filter with an explicit topology.
    pub fn high_pass_with_topology(
        &mut self,
        order: usize,
        sample_rate: f64,
        cutoff_frequency: f64,
        ripple_db: f64,
        topology: Topology,
    ) -> DesignResult<Cascade> {
        check_order(order)?;
        check_corner(FilterType::Highpass, sample_rate, cutoff_frequency)?;
        check_ripple(ripple_db)?;

        let analog = self.proto.design(order, ripple_db);
        let mut digital = Layout::new(order);
        high_pass_transform(cutoff_frequency / sample_rate, &mut digital, analog);
        Ok(Cascade::from_layout(&digital, topology))
    }

    /// Bandpass filter; realized order is twice `order`.
    pub fn band_pass(
        &mut self,
        order: usize,
        sample_rate: f64,
        center_frequency: f64,
        width_frequency: f64,
        ripple_db: f64,
    ) -> DesignResult<Cascade> {
        self.band_pass_with_topology(
            order,
            sample_rate,
            center_frequency,
            width_frequency,
            ripple_db,
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
        ripple_db: f64,
        topology: Topology,
    ) -> DesignResult<Cascade> {
        check_order(order)?;
        check_band(
            FilterType::Bandpass,
            sample_rate,
            center_frequency,
            width_frequency,
        )?;
        check_ripple(ripple_db)?;

        let analog = self.proto.design(order, ripple_db);
        let mut digital = Layout::new(order * 2);
        band_pass_transform(
            center_frequency / sample_rate,
            width_frequency / sample_rate,
            &mut digital,
            analog,
        );
        Ok(Cascade::from_layout(&digital, topology))
    }

    /// Bandstop filter; realized order is twice `order`.
    pub fn band_stop(
        &mut self,
        order: usize,
        sample_rate: f64,
        center_frequency: f64,
        width_frequency: f64,
        ripple_db: f64,
    ) -> DesignResult<Cascade> {
        self.band_stop_with_topology(
            order,
            sample_rate,
            center_frequency,
            width_frequency,
            ripple_db,
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
        ripple_db: f64,
        topology: Topology,
    ) -> DesignResult<Cascade> {
        check_order(order)?;
        check_band(
            FilterType::Bandstop,
            sample_rate,
            center_frequency,
            width_frequency,
        )?;
        check_ripple(ripple_db)?;

        let analog = self.proto.design(order, ripple_db);
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

impl Default for ChebyshevI {
    fn default() -> Self {
        Self::new()
    }
}
