//! Analog-to-digital frequency transforms
//!
//! Each transform maps a normalized analog lowpass prototype layout into
//! a digital z-plane layout via frequency prewarping and the bilinear
//! transform. The lowpass and highpass transforms preserve the pole
//! count; the bandpass and bandstop transforms expand every analog pole
//! and zero into two digital ones, doubling it.
//!
//! Cutoffs are normalized frequencies (cycles/sample) in (0, 0.5); the
//! facades validate them before any transform runs.

use crate::complex_pair::{ComplexPair, C_ONE};
use crate::layout::Layout;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Map an analog lowpass prototype to a digital lowpass layout.
pub fn low_pass_transform(fc: f64, digital: &mut Layout, analog: &Layout) {
    digital.reset();

    // prewarp
    let f = (PI * fc).tan();

    let transform = |c: Complex64| -> Complex64 {
        if c.is_infinite() {
            return Complex64::new(-1.0, 0.0);
        }
        // frequency scale, then bilinear transform
        let c = c * f;
        (C_ONE + c) / (C_ONE - c)
    };

    let num_poles = analog.num_poles();
    let pairs = num_poles / 2;
    for i in 0..pairs {
        let pair = analog.pair(i);
        digital.add_conjugate_pairs(transform(pair.poles.first), transform(pair.zeros.first));
    }

    if num_poles & 1 == 1 {
        let pair = analog.pair(pairs);
        digital.add(transform(pair.poles.first), transform(pair.zeros.first));
    }

    digital.set_normal(analog.normal_w(), analog.normal_gain());
}

/// Map an analog lowpass prototype to a digital highpass layout.
///
/// Mirror of the lowpass case: the prewarp inverts and the bilinear map
/// is sign-flipped, swapping passband and stopband. The reference
/// frequency flips to the opposite band edge.
pub fn high_pass_transform(fc: f64, digital: &mut Layout, analog: &Layout) {
    digital.reset();

    // prewarp
    let f = 1.0 / (PI * fc).tan();

    let transform = |c: Complex64| -> Complex64 {
        if c.is_infinite() {
            return Complex64::new(1.0, 0.0);
        }
        let c = c * f;
        -((C_ONE + c) / (C_ONE - c))
    };

    let num_poles = analog.num_poles();
    let pairs = num_poles / 2;
    for i in 0..pairs {
        let pair = analog.pair(i);
        digital.add_conjugate_pairs(transform(pair.poles.first), transform(pair.zeros.first));
    }

    if num_poles & 1 == 1 {
        let pair = analog.pair(pairs);
        digital.add(transform(pair.poles.first), transform(pair.zeros.first));
    }

    digital.set_normal(PI - analog.normal_w(), analog.normal_gain());
}

/// Band-edge angular frequencies derived from center and width, clamped
/// away from 0 and π so the bilinear map cannot diverge.
fn band_edges(fc: f64, fw: f64) -> (f64, f64) {
    let ww = 2.0 * PI * fw;
    let mut wc2 = 2.0 * PI * fc - ww / 2.0;
    let mut wc = wc2 + ww;

    if wc2 < 1e-8 {
        wc2 = 1e-8;
    }
    if wc > PI - 1e-8 {
        wc = PI - 1e-8;
    }
    (wc2, wc)
}

/// Map an analog lowpass prototype to a digital bandpass layout.
///
/// Every analog pole/zero expands into two digital ones, so the digital
/// layout carries twice the analog pole count.
pub fn band_pass_transform(fc: f64, fw: f64, digital: &mut Layout, analog: &Layout) {
    digital.reset();

    let (wc2, wc) = band_edges(fc, fw);

    let a = ((wc + wc2) * 0.5).cos() / ((wc - wc2) * 0.5).cos();
    let b = 1.0 / ((wc - wc2) * 0.5).tan();
    let a2 = a * a;
    let b2 = b * b;
    let ab_2 = 2.0 * a * b;

    let transform = |c: Complex64| -> ComplexPair {
        if c.is_infinite() {
            return ComplexPair::new(Complex64::new(-1.0, 0.0), Complex64::new(1.0, 0.0));
        }
        let c = (C_ONE + c) / (C_ONE - c); // bilinear

        // quadratic in c solved per source pole
        let mut v = c * (4.0 * (b2 * (a2 - 1.0) + 1.0));
        v += 8.0 * (b2 * (a2 - 1.0) - 1.0);
        v *= c;
        v += 4.0 * (b2 * (a2 - 1.0) + 1.0);
        let v = v.sqrt();

        let u = -v + c * ab_2 + ab_2;
        let v = v + c * ab_2 + ab_2;
        let d = c * (2.0 * (b - 1.0)) + 2.0 * (1.0 + b);

        ComplexPair::new(u / d, v / d)
    };

    let num_poles = analog.num_poles();
    let pairs = num_poles / 2;
    for i in 0..pairs {
        let pair = analog.pair(i);
        let p = transform(pair.poles.first);
        let z = transform(pair.zeros.first);
        digital.add_conjugate_pairs(p.first, z.first);
        digital.add_conjugate_pairs(p.second, z.second);
    }

    if num_poles & 1 == 1 {
        let poles = transform(analog.pair(pairs).poles.first);
        let zeros = transform(analog.pair(pairs).zeros.first);
        digital.add_pair(poles, zeros);
    }

    let wn = analog.normal_w();
    digital.set_normal(
        2.0 * (((wc + wn) * 0.5).tan() * ((wc2 + wn) * 0.5).tan()).sqrt().atan(),
        analog.normal_gain(),
    );
}

/// Map an analog lowpass prototype to a digital bandstop layout.
///
/// Doubles the pole count like the bandpass case. The reference
/// frequency flips between π and 0 depending on which side of the notch
/// carries unity gain.
pub fn band_stop_transform(fc: f64, fw: f64, digital: &mut Layout, analog: &Layout) {
    digital.reset();

    let (wc2, wc) = band_edges(fc, fw);

    let a = ((wc + wc2) * 0.5).cos() / ((wc - wc2) * 0.5).cos();
    let b = ((wc - wc2) * 0.5).tan();
    let a2 = a * a;
    let b2 = b * b;

    let transform = |c: Complex64| -> ComplexPair {
        let c = if c.is_infinite() {
            Complex64::new(-1.0, 0.0)
        } else {
            (C_ONE + c) / (C_ONE - c) // bilinear
        };

        let mut u = c * (4.0 * (b2 + a2 - 1.0));
        u += 8.0 * (b2 - a2 + 1.0);
        u *= c;
        u += 4.0 * (a2 + b2 - 1.0);
        let u = u.sqrt();

        let v = u * -0.5 + a - c * a;
        let u = u * 0.5 + a - c * a;
        let d = c * (b - 1.0) + b + 1.0;

        ComplexPair::new(u / d, v / d)
    };

    let num_poles = analog.num_poles();
    let pairs = num_poles / 2;
    for i in 0..pairs {
        let pair = analog.pair(i);
        let p = transform(pair.poles.first);
        let z = transform(pair.zeros.first);
        digital.add_conjugate_pairs(p.first, z.first);
        digital.add_conjugate_pairs(p.second, z.second);
    }

    if num_poles & 1 == 1 {
        let poles = transform(analog.pair(pairs).poles.first);
        let zeros = transform(analog.pair(pairs).zeros.first);
        digital.add_pair(poles, zeros);
    }

    // the notch flips which extreme carries unity gain
    if fc < 0.25 {
        digital.set_normal(PI, analog.normal_gain());
    } else {
        digital.set_normal(0.0, analog.normal_gain());
    }
}
