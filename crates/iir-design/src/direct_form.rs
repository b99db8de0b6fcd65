//! Direct Form I / II per-section state
//!
//! Both forms realize the same biquad difference equation and produce
//! identical output for identical coefficients; they differ in what state
//! they carry. Direct Form I keeps explicit input/output histories and is
//! more robust against coefficient quantization; Direct Form II is the
//! canonical (minimal-state) form and the default.
//!
//! The per-section update is a pure function of
//! `(input, coefficients, prior state)`; there is no hidden global state.

use crate::biquad::Biquad;
use serde::{Deserialize, Serialize};

/// Recursion topology of a filter cascade, fixed at design time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Topology {
    /// Two-sample input and output histories per section.
    DirectFormI,
    /// Single two-value internal delay line per section.
    #[default]
    DirectFormII,
}

/// Direct Form I section state: previous two inputs and outputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectFormI {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl DirectFormI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `y = b0*x + b1*x1 + b2*x2 - a1*y1 - a2*y2`, then shift histories.
    pub fn process(&mut self, input: f64, s: &Biquad) -> f64 {
        let out = s.b0 * input + s.b1 * self.x1 + s.b2 * self.x2
            - s.a1 * self.y1
            - s.a2 * self.y2;
        self.x2 = self.x1;
        self.y2 = self.y1;
        self.x1 = input;
        self.y1 = out;
        out
    }
}

/// Direct Form II section state: two internal delay values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectFormII {
    v1: f64,
    v2: f64,
}

impl DirectFormII {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `w = x - a1*v1 - a2*v2; y = b0*w + b1*v1 + b2*v2`, then shift.
    pub fn process(&mut self, input: f64, s: &Biquad) -> f64 {
        let w = input - s.a1 * self.v1 - s.a2 * self.v2;
        let out = s.b0 * w + s.b1 * self.v1 + s.b2 * self.v2;
        self.v2 = self.v1;
        self.v1 = w;
        out
    }
}

/// Per-section state, dispatched once per sample by `match`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SectionState {
    DirectFormI(DirectFormI),
    DirectFormII(DirectFormII),
}

impl SectionState {
    pub(crate) fn new(topology: Topology) -> Self {
        match topology {
            Topology::DirectFormI => Self::DirectFormI(DirectFormI::new()),
            Topology::DirectFormII => Self::DirectFormII(DirectFormII::new()),
        }
    }

    #[inline]
    pub(crate) fn process(&mut self, input: f64, s: &Biquad) -> f64 {
        match self {
            Self::DirectFormI(state) => state.process(input, s),
            Self::DirectFormII(state) => state.process(input, s),
        }
    }

    pub(crate) fn reset(&mut self) {
        match self {
            Self::DirectFormI(state) => state.reset(),
            Self::DirectFormII(state) => state.reset(),
        }
    }
}
