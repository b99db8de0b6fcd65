//! Shared types for filter design
//!
//! Defines the design-time error taxonomy and the filter-shape tag used
//! across the crate. All parameter validation happens before any prototype
//! math runs, so a failed design never leaves a partially built filter
//! behind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for design operations
pub type DesignResult<T> = Result<T, DesignError>;

/// Errors that can occur while designing a filter
///
/// All of these are raised synchronously at design (or custom-coefficient
/// setup) time. Runtime filtering never fails: non-finite samples simply
/// propagate arithmetically.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DesignError {
    #[error("invalid filter order {0}: order must be at least 1")]
    InvalidOrder(usize),

    #[error("invalid sample rate {0} Hz: sample rate must be positive and finite")]
    InvalidSampleRate(f64),

    #[error(
        "invalid {kind} frequency {frequency} Hz: must lie strictly between 0 and the Nyquist frequency {nyquist} Hz"
    )]
    FrequencyOutOfRange {
        kind: FilterType,
        frequency: f64,
        nyquist: f64,
    },

    #[error("invalid bandwidth {0} Hz: width must be positive and finite")]
    InvalidBandwidth(f64),

    #[error("invalid passband ripple {0} dB: ripple must be positive")]
    InvalidRipple(f64),

    #[error("unsupported Bessel order {0}: the pole table covers orders 1 to 24")]
    UnsupportedOrder(usize),

    #[error("elliptic pole factorization did not converge")]
    DidNotConverge,

    #[error("{supplied} coefficient rows supplied but order {order} allows at most {max} sections")]
    TooManySections {
        order: usize,
        max: usize,
        supplied: usize,
    },
}

/// Filter shape classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterType {
    /// Passes low frequencies, attenuates high
    Lowpass,
    /// Passes high frequencies, attenuates low
    Highpass,
    /// Passes a band of frequencies around a center
    Bandpass,
    /// Attenuates a band of frequencies around a center (notch)
    Bandstop,
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterType::Lowpass => "lowpass cutoff",
            FilterType::Highpass => "highpass cutoff",
            FilterType::Bandpass => "bandpass center",
            FilterType::Bandstop => "bandstop center",
        };
        f.write_str(name)
    }
}

pub(crate) fn check_order(order: usize) -> DesignResult<()> {
    if order == 0 {
        return Err(DesignError::InvalidOrder(order));
    }
    Ok(())
}

pub(crate) fn check_sample_rate(sample_rate: f64) -> DesignResult<()> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(DesignError::InvalidSampleRate(sample_rate));
    }
    Ok(())
}

/// Cutoff/center frequencies must lie strictly inside (0, Nyquist). The
/// trigonometric prewarp produces garbage (not an error) at or beyond
/// Nyquist, so this is enforced up front for every family and shape.
pub(crate) fn check_corner(kind: FilterType, sample_rate: f64, frequency: f64) -> DesignResult<()> {
    check_sample_rate(sample_rate)?;
    let nyquist = sample_rate / 2.0;
    if !frequency.is_finite() || frequency <= 0.0 || frequency >= nyquist {
        return Err(DesignError::FrequencyOutOfRange {
            kind,
            frequency,
            nyquist,
        });
    }
    Ok(())
}

pub(crate) fn check_band(
    kind: FilterType,
    sample_rate: f64,
    center: f64,
    width: f64,
) -> DesignResult<()> {
    check_corner(kind, sample_rate, center)?;
    if !width.is_finite() || width <= 0.0 {
        return Err(DesignError::InvalidBandwidth(width));
    }
    Ok(())
}

pub(crate) fn check_ripple(ripple_db: f64) -> DesignResult<()> {
    if !ripple_db.is_finite() || ripple_db <= 0.0 {
        return Err(DesignError::InvalidRipple(ripple_db));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_validation() {
        assert!(check_corner(FilterType::Lowpass, 250.0, 50.0).is_ok());
        // exactly Nyquist is rejected
        assert!(check_corner(FilterType::Lowpass, 250.0, 125.0).is_err());
        assert!(check_corner(FilterType::Lowpass, 250.0, -1.0).is_err());
        assert!(check_corner(FilterType::Lowpass, 250.0, 0.0).is_err());
        assert!(check_corner(FilterType::Lowpass, 0.0, 50.0).is_err());
    }

    #[test]
    fn test_band_validation() {
        assert!(check_band(FilterType::Bandpass, 250.0, 50.0, 5.0).is_ok());
        assert!(check_band(FilterType::Bandpass, 250.0, 50.0, 0.0).is_err());
        assert!(check_band(FilterType::Bandpass, 250.0, 130.0, 5.0).is_err());
    }

    #[test]
    fn test_error_messages_name_the_limit() {
        let err = check_corner(FilterType::Highpass, 250.0, 125.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("125"), "message should carry the frequency: {msg}");
        assert!(msg.contains("Nyquist"), "message should name Nyquist: {msg}");
    }
}
