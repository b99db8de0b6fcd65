//! Biquad cascade: realization and per-sample runtime
//!
//! A [`Cascade`] chains second-order sections so that each section's
//! output feeds the next section's input, realizing a high-order filter
//! as a product of low-order transfer functions. It owns one coefficient
//! set and one recursion state per section, index-aligned.
//!
//! Built either from a designed [`Layout`] (with gain normalization at
//! the layout's reference frequency) or from externally supplied
//! second-order-section coefficients (installed as-is).
//!
//! A `Cascade` is not safe for concurrent sample processing: `filter`
//! mutates per-section state in place. Clone it to run independent
//! streams, or use one instance per channel.

use crate::biquad::Biquad;
use crate::direct_form::{SectionState, Topology};
use crate::layout::Layout;
use crate::types::{DesignError, DesignResult};
use num_complex::Complex64;
use std::f64::consts::PI;

/// A runnable IIR filter: cascaded biquad sections with per-section state.
#[derive(Debug, Clone)]
pub struct Cascade {
    biquads: Vec<Biquad>,
    states: Vec<SectionState>,
    topology: Topology,
    num_poles: usize,
}

impl Cascade {
    /// Realize a designed layout as a cascade.
    ///
    /// Allocates `ceil(num_poles / 2)` sections, converts each stored
    /// pole/zero pair into biquad coefficients, then scales the first
    /// section's feed-forward coefficients so that the gain at the
    /// layout's reference frequency equals the layout's reference gain.
    pub(crate) fn from_layout(layout: &Layout, topology: Topology) -> Self {
        let num_poles = layout.num_poles();
        let num_sections = num_poles.div_ceil(2);

        let biquads = (0..num_sections)
            .map(|i| Biquad::from_pole_zero_pair(layout.pair(i)))
            .collect();
        let states = vec![SectionState::new(topology); num_sections];

        let mut cascade = Self {
            biquads,
            states,
            topology,
            num_poles,
        };

        let reference = layout.normal_w() / (2.0 * PI);
        let scale = layout.normal_gain() / cascade.response(reference).norm();
        cascade.apply_scale(scale);
        cascade
    }

    /// Install externally supplied second-order sections, Direct Form II.
    ///
    /// Rows use the scipy `sos` layout `[b0, b1, b2, a0, a1, a2]`. The
    /// coefficients are trusted as-is; no gain renormalization is applied.
    /// Supplying fewer rows than `ceil(order / 2)` leaves the remaining
    /// sections as pass-throughs; supplying more is an error.
    pub fn from_sos(order: usize, coefficients: &[[f64; 6]]) -> DesignResult<Self> {
        Self::from_sos_with_topology(order, coefficients, Topology::default())
    }

    /// Install externally supplied second-order sections with an explicit
    /// topology. See [`Cascade::from_sos`].
    pub fn from_sos_with_topology(
        order: usize,
        coefficients: &[[f64; 6]],
        topology: Topology,
    ) -> DesignResult<Self> {
        if order == 0 {
            return Err(DesignError::InvalidOrder(order));
        }
        let num_sections = order.div_ceil(2);
        if coefficients.len() > num_sections {
            return Err(DesignError::TooManySections {
                order,
                max: num_sections,
                supplied: coefficients.len(),
            });
        }

        let mut biquads = Vec::with_capacity(num_sections);
        for row in coefficients {
            biquads.push(Biquad::from_coefficients(
                row[3], row[4], row[5], row[0], row[1], row[2],
            ));
        }
        biquads.resize(num_sections, Biquad::identity());

        Ok(Self {
            biquads,
            states: vec![SectionState::new(topology); num_sections],
            topology,
            num_poles: order,
        })
    }

    /// Process one sample through every section in order.
    ///
    /// Never fails for finite input; NaN or infinite samples propagate
    /// arithmetically through the recursion.
    #[inline]
    pub fn filter(&mut self, input: f64) -> f64 {
        let mut out = input;
        for (state, biquad) in self.states.iter_mut().zip(&self.biquads) {
            out = state.process(out, biquad);
        }
        out
    }

    /// Clear every section's memory; coefficients are untouched.
    pub fn reset(&mut self) {
        for state in &mut self.states {
            state.reset();
        }
    }

    /// Complex frequency response of the whole cascade at a normalized
    /// frequency (cycles/sample, 0..0.5).
    ///
    /// Read-only; independent of the run-time filter state.
    pub fn response(&self, normalized_frequency: f64) -> Complex64 {
        let w = 2.0 * PI * normalized_frequency;
        let czn1 = Complex64::from_polar(1.0, -w);
        let czn2 = Complex64::from_polar(1.0, -2.0 * w);

        let mut top = Complex64::new(1.0, 0.0);
        let mut bot = Complex64::new(1.0, 0.0);
        for stage in &self.biquads {
            top *= stage.b0 + stage.b1 * czn1 + stage.b2 * czn2;
            bot *= 1.0 + stage.a1 * czn1 + stage.a2 * czn2;
        }
        top / bot
    }

    /// Scale the overall gain by folding `scale` into the first section.
    ///
    /// Cascaded multiplication is associative, so one section is enough;
    /// spreading the factor across stages is not needed for f64 designs.
    pub(crate) fn apply_scale(&mut self, scale: f64) {
        if let Some(first) = self.biquads.first_mut() {
            first.apply_scale(scale);
        }
    }

    pub fn num_biquads(&self) -> usize {
        self.biquads.len()
    }

    pub fn biquad(&self, index: usize) -> &Biquad {
        &self.biquads[index]
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Pole count of the underlying design (declared order for custom
    /// second-order-section cascades).
    pub fn num_poles(&self) -> usize {
        self.num_poles
    }

    /// True when every section has its poles inside the unit circle.
    pub fn is_stable(&self) -> bool {
        self.biquads.iter().all(|b| b.is_stable())
    }
}
