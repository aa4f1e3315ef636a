//! Standard normal distribution helpers.
//!
//! The CDF is derived from the Abramowitz & Stegun 7.1.26 rational
//! approximation of the error function (max absolute error ~1.5e-7).

use std::f64::consts::{PI, SQRT_2};

const ERF_P: f64 = 0.3275911;
const ERF_A1: f64 = 0.254829592;
const ERF_A2: f64 = -0.284496736;
const ERF_A3: f64 = 1.421413741;
const ERF_A4: f64 = -1.453152027;
const ERF_A5: f64 = 1.061405429;

/// Gauss error function, Abramowitz & Stegun formula 7.1.26.
///
/// Odd by construction: `erf(-x) == -erf(x)` for every input.
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + ERF_P * x);
    let poly = ((((ERF_A5 * t + ERF_A4) * t + ERF_A3) * t + ERF_A2) * t + ERF_A1) * t;
    let y = 1.0 - poly * (-x * x).exp();

    sign * y
}

/// Cumulative standard normal distribution, Φ(x) = ½(1 + erf(x/√2)).
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Standard normal density, φ(x) = e^(−x²/2) / √(2π).
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}
