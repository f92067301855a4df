//! # Chebyshev series evaluator
//!
//! Each coefficient row approximates a quantity over the day interval `[a, b]` by
//!
//! ```text
//! value = Σ cᵢ · cos(i·θ),   θ = acos((2t − (a + b)) / (b − a))
//! ```
//!
//! i.e. a Chebyshev expansion written in its trigonometric form. Right ascensions and
//! the sidereal quantity are tabulated unwrapped and are brought back into `[0, 24)`
//! hours after evaluation.
//!
//! ## End-of-year clamp
//!
//! When the argument runs past the end of the last interval of a year (the last UTC
//! seconds of December 31 with ΔT added), the interval end is moved to `t` for that
//! evaluation only. Tables whose neighbouring intervals share an endpoint day must list
//! the later interval first (see [`crate::coefficients`]), otherwise the clamp would
//! also engage on that day. The series is then read at θ = 0, its upper endpoint. This is a
//! known approximation of the tables' convention and is kept as is.
use log::{trace, warn};

use crate::{
    coefficients::{CoefficientStore, Quantity},
    constants::{DayOfYear, Degree, DEGRAD, HOURS_PER_DAY, RADEG},
    sunmoon_errors::SunMoonError,
    time::TimeArguments,
};

/// Interpolation angle of `t` inside `[a, b]`, in degrees within `[0, 180]`.
///
/// `t > b` moves the interval end to `t` (end-of-year clamp).
pub fn interpolation_angle(a: DayOfYear, b: DayOfYear, t: DayOfYear) -> Degree {
    let b = if t > b { t } else { b };
    let cos_theta = ((2.0 * t - (a + b)) / (b - a)).clamp(-1.0, 1.0);
    cos_theta.acos() * DEGRAD
}

/// `Σ cᵢ · cos(i·θ)` with `θ` in degrees.
pub fn chebyshev_series(theta: Degree, coefficients: &[f64]) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .map(|(i, c)| c * (i as f64 * theta * RADEG).cos())
        .sum()
}

/// Bring an hour value into `[0, 24)`.
pub fn normalize_hours(value: f64) -> f64 {
    let normalized = value.rem_euclid(HOURS_PER_DAY);
    // rem_euclid of a tiny negative value rounds up to 24.0
    if normalized >= HOURS_PER_DAY {
        0.0
    } else {
        normalized
    }
}

/// Evaluate one quantity at the given time arguments.
///
/// Arguments
/// ---------
/// * `store`: the coefficient tables
/// * `quantity`: quantity to evaluate
/// * `year`: UTC year of the instant, selects the table rows
/// * `args`: time arguments, `tm_r` is used for the sidereal quantity and `tm` otherwise
///
/// Return
/// ------
/// * The value in the quantity's unit, or [`SunMoonError::MissingCoefficients`] when no
///   row of that year contains the argument.
pub fn evaluate(
    store: &CoefficientStore,
    quantity: Quantity,
    year: i32,
    args: &TimeArguments,
) -> Result<f64, SunMoonError> {
    let t = args.for_quantity(quantity);
    let row = store
        .table(quantity)
        .find(year, t)
        .ok_or(SunMoonError::MissingCoefficients { quantity, year, t })?;

    if t > row.b {
        warn!(
            "{quantity}: argument {t} is past the last interval end {} of {year}, clamping",
            row.b
        );
    }

    let theta = interpolation_angle(row.a, row.b, t);
    let value = chebyshev_series(theta, &row.coefficients);
    trace!("{quantity}: [{}, {}] t = {t} θ = {theta} → {value}", row.a, row.b);

    Ok(if quantity.wraps_hours() {
        normalize_hours(value)
    } else {
        value
    })
}
