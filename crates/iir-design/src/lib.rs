//! # Classical IIR Filter Design
//!
//! This crate designs and runs classical infinite-impulse-response (IIR)
//! digital filters: Butterworth, Chebyshev Type I, Bessel and Elliptic
//! analog prototypes, realized as lowpass, highpass, bandpass or bandstop
//! filters of arbitrary order.
//!
//! ## Design Pipeline
//!
//! ```text
//! family designer → analog prototype (s-plane poles/zeros)
//!                 → frequency transform (prewarp + bilinear, z-plane)
//!                 → biquad coefficients (one per pole pair)
//!                 → gain normalization at the reference frequency
//!                 → Cascade (per-sample runnable filter)
//! ```
//!
//! Every filter is realized as a cascade of second-order sections
//! ("biquads"), which keeps high-order designs numerically stable. The
//! per-section recursion runs as Direct Form I or Direct Form II,
//! selectable at design time.
//!
//! ## Example
//!
//! ```rust
//! use iir_design::Butterworth;
//!
//! // 4th-order Butterworth lowpass, 250 Hz sample rate, 50 Hz cutoff
//! let mut designer = Butterworth::new();
//! let mut filter = designer.low_pass(4, 250.0, 50.0).unwrap();
//!
//! // Process samples one at a time
//! let y = filter.filter(1.0);
//! assert!(y.is_finite());
//!
//! // Inspect the frequency response (normalized frequency, cycles/sample)
//! let dc_gain = filter.response(0.0).norm();
//! assert!((dc_gain - 1.0).abs() < 1e-12);
//! ```
//!
//! Externally computed second-order-section coefficients (e.g. from
//! scipy's `butter(..., output='sos')`) can be installed directly with
//! [`Cascade::from_sos`], bypassing the design pipeline.

pub mod bessel;
pub mod biquad;
pub mod butterworth;
pub mod cascade;
pub mod chebyshev1;
pub mod complex_pair;
pub mod direct_form;
pub mod elliptic;
pub mod layout;
pub mod transform;
pub mod types;

pub use bessel::Bessel;
pub use biquad::Biquad;
pub use butterworth::Butterworth;
pub use cascade::Cascade;
pub use chebyshev1::ChebyshevI;
pub use complex_pair::{ComplexPair, PoleZeroPair};
pub use direct_form::{DirectFormI, DirectFormII, Topology};
pub use elliptic::Elliptic;
pub use layout::Layout;
pub use types::{DesignError, DesignResult, FilterType};

/// Commonly used types, for glob imports.
pub mod prelude {
    pub use crate::{
        Bessel, Biquad, Butterworth, Cascade, ChebyshevI, DesignError, DesignResult, Elliptic,
        FilterType, Topology,
    };
}
