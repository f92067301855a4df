//! # Sexagesimal rendering
//!
//! Hour and degree values are displayed as `h m s` and `° ′ ″` triples. Seconds are
//! rounded to the millisecond (milli-arcsecond) and carried into minutes and whole units
//! when they round up to 60, so `59.9999995 s` never prints as `60.000`. An hour value
//! below 24 h that rounds up to 24 h prints as `00 h 00 m 00.000 s`.
//!
//! The `parse_*` functions read those renderings back and also report the accuracy
//! implied by the number of decimals of the seconds field.
use std::fmt;

use crate::constants::{Degree, Hour, HOURS_PER_DAY};

/// Decimals kept on the seconds field.
const SECONDS_DECIMALS: i32 = 3;

/// A value split into whole units, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sexagesimal {
    pub negative: bool,
    pub whole: u64,
    pub minutes: u8,
    pub seconds: f64,
}

impl Sexagesimal {
    /// Split `value` (hours or degrees), rounding the seconds to the millisecond.
    pub fn from_value(value: f64) -> Self {
        let scale = 10f64.powi(SECONDS_DECIMALS);
        let units_per_minute = (60.0 * scale) as u64;
        let units_per_whole = 60 * units_per_minute;

        let total = (value.abs() * 3600.0 * scale).round() as u64;
        let whole = total / units_per_whole;
        let minutes = ((total % units_per_whole) / units_per_minute) as u8;
        let seconds = (total % units_per_minute) as f64 / scale;

        Sexagesimal {
            // "-0 ° 00 ′ 00.000 ″" is not useful
            negative: value < 0.0 && total > 0,
            whole,
            minutes,
            seconds,
        }
    }

    /// Signed value in hours or degrees.
    pub fn value(&self) -> f64 {
        let magnitude = self.whole as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    fn sign(&self) -> char {
        if self.negative {
            '-'
        } else {
            ' '
        }
    }
}

/// Split an hour value into `h m s`.
///
/// A value inside `(−24, 24)` whose rounding carries up to 24 h wraps to 0 h.
pub fn hours_to_hms(hours: Hour) -> Sexagesimal {
    let hms = Sexagesimal::from_value(hours);
    if hours.abs() < HOURS_PER_DAY && hms.whole == 24 {
        Sexagesimal {
            negative: false,
            whole: 0,
            ..hms
        }
    } else {
        hms
    }
}

/// Split a degree value into `° ′ ″`.
pub fn degrees_to_dms(degrees: Degree) -> Sexagesimal {
    Sexagesimal::from_value(degrees)
}

/// Render hours as `" 00 h 24 m 08.571 s"`.
pub fn fmt_hms(hours: Hour) -> String {
    let hms = hours_to_hms(hours);
    format!(
        "{}{:02} h {:02} m {:06.3} s",
        hms.sign(),
        hms.whole,
        hms.minutes,
        hms.seconds
    )
}

/// Render degrees as `" 2  ° 36 ′ 43.208 ″"`, signed degrees left-aligned on three
/// columns.
pub fn fmt_dms(degrees: Degree) -> String {
    let dms = degrees_to_dms(degrees);
    let signed = format!("{}{}", dms.sign(), dms.whole);
    format!("{signed:<3} ° {:02} ′ {:06.3} ″", dms.minutes, dms.seconds)
}

/// Hours/degrees rendering usable directly in `format!`.
pub struct Hms(pub Hour);

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_hms(self.0))
    }
}

pub struct Dms(pub Degree);

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_dms(self.0))
    }
}

/// Estimate the accuracy of a numeric string based on its decimal precision.
///
/// Arguments
/// ---------------
/// * `field`: the seconds field (e.g. `"08.571"`)
/// * `factor`: scale applied to the accuracy (`1.0 / 3600.0` to express it in hours or degrees)
///
/// Return
/// ----------
/// * the value of one unit in the last decimal place, scaled by `factor`
fn compute_accuracy(field: &str, factor: f64) -> f64 {
    match field.find('.') {
        Some(dot_pos) => {
            let digits_after_dot = field.trim().len() - dot_pos - 1;
            10f64.powi(-(digits_after_dot as i32)) * factor
        }
        None => factor,
    }
}

/// Split a rendering into its three numeric fields, dropping unit markers.
fn numeric_fields<'a>(text: &'a str, units: &[&str]) -> Option<[&'a str; 3]> {
    let parts: Vec<&str> = text
        .split_whitespace()
        .filter(|part| !units.contains(part))
        .collect();
    match parts.as_slice() {
        [whole, minutes, seconds] => Some([*whole, *minutes, *seconds]),
        _ => None,
    }
}

fn parse_sexagesimal(text: &str, units: &[&str]) -> Option<(f64, f64)> {
    let [whole_raw, minutes_raw, seconds_raw] = numeric_fields(text, units)?;

    let negative = whole_raw.starts_with('-');
    let whole: f64 = whole_raw.trim_start_matches(['-', '+']).parse().ok()?;
    let minutes: f64 = minutes_raw.parse().ok()?;
    let seconds: f64 = seconds_raw.parse().ok()?;
    if whole < 0.0 || !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    let magnitude = whole + minutes / 60.0 + seconds / 3600.0;
    let value = if negative { -magnitude } else { magnitude };
    Some((value, compute_accuracy(seconds_raw, 1.0 / 3600.0)))
}

/// Parse a `h m s` rendering back to hours.
///
/// Arguments
/// ---------
/// * `hms`: `"HH h MM m SS.sss s"`, or the bare `"HH MM SS.sss"` form
///
/// Returns
/// -------
/// * `(hours, accuracy)` with the accuracy in hours, `None` if the text is malformed.
pub fn parse_hms_to_hours(hms: &str) -> Option<(Hour, Hour)> {
    parse_sexagesimal(hms, &["h", "m", "s"])
}

/// Parse a `° ′ ″` rendering back to degrees.
///
/// Arguments
/// ---------
/// * `dms`: `"±DD ° MM ′ SS.sss ″"`, or the bare `"±DD MM SS.sss"` form
///
/// Returns
/// -------
/// * `(degrees, accuracy)` with the accuracy in degrees, `None` if the text is malformed.
pub fn parse_dms_to_degrees(dms: &str) -> Option<(Degree, Degree)> {
    parse_sexagesimal(dms, &["°", "′", "″"])
}
