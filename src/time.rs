//! # Civil instants and time arguments
//!
//! Input instants are wall-clock readings in Japan Standard Time (UTC+9, no daylight
//! saving). The coefficient tables are indexed by the UTC calendar, so every instant
//! carries both representations:
//!
//! - `local`: the JST reading given by the user,
//! - `reference`: the same instant on the UTC clock.
//!
//! ## Overview
//!
//! - [`CivilInstant::parse`] reads `YYYYMMDD` or `YYYYMMDDHHMMSS` strings,
//! - [`CivilInstant::now`] samples the system clock, truncated to whole seconds,
//! - [`day_of_year_count`] and [`day_fraction`] give the day count `T` and fraction `F`,
//! - [`TimeArguments`] combines them with ΔT into the series arguments `tm` and `tm_r`.
//!
//! Calendar validation and the zone shift go through `hifitime`. The shift is applied on
//! the TAI scale so that leap seconds never leak into wall-clock arithmetic.
use std::fmt;

use hifitime::{Epoch, Unit};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    coefficients::Quantity,
    constants::{
        DayOfYear, Seconds, HOURS_PER_DAY, JST_MINUS_UTC, MINUTES_PER_DAY, SECONDS_PER_DAY,
    },
    sunmoon_errors::SunMoonError,
};

static INSTANT_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{8}|[0-9]{14})$").expect("valid instant regex"));

/// First JST instant covered by the built-in tables (2008-01-01 00:00:00 UTC).
pub const COVERAGE_FIRST: CivilDateTime = CivilDateTime {
    year: 2008,
    month: 1,
    day: 1,
    hour: 9,
    minute: 0,
    second: 0,
};

/// Last JST instant covered by the built-in tables (2018-12-31 23:59:59 UTC).
pub const COVERAGE_LAST: CivilDateTime = CivilDateTime {
    year: 2019,
    month: 1,
    day: 1,
    hour: 8,
    minute: 59,
    second: 59,
};

/// Calendar date and wall-clock time, to the second.
///
/// Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDateTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CivilDateTime {
    /// Build a validated date-time.
    ///
    /// Return
    /// ------
    /// * [`SunMoonError::InvalidDate`] when the fields do not name an existing calendar
    ///   second (month 13, February 30, hour 24, second 60, ...).
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, SunMoonError> {
        let civil = CivilDateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        };
        civil.to_wall_clock()?;
        Ok(civil)
    }

    /// Wall-clock reading as an epoch on the uniform TAI scale.
    fn to_wall_clock(self) -> Result<Epoch, SunMoonError> {
        if self.hour > 23 || self.minute > 59 || self.second > 59 {
            return Err(SunMoonError::InvalidDate(format!(
                "{self} is not a valid time of day"
            )));
        }

        Epoch::maybe_from_gregorian_tai(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            0,
        )
        .map_err(|_| SunMoonError::InvalidDate(format!("{self} is not a calendar date")))
    }

    fn from_wall_clock(epoch: Epoch) -> Self {
        let (year, month, day, hour, minute, second, _) = epoch.to_gregorian_tai();
        CivilDateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Shift the reading by a whole number of hours.
    fn shifted_by_hours(self, hours: i64) -> Result<Self, SunMoonError> {
        let epoch = self.to_wall_clock()?;
        Ok(Self::from_wall_clock(epoch + Unit::Hour * hours))
    }

    /// `YYYYMMDDHHMMSS` rendering, the long input form.
    pub fn compact(&self) -> String {
        format!(
            "{:04}{:02}{:02}{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// An instant given on the JST clock, together with its UTC reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilInstant {
    local: CivilDateTime,
    reference: CivilDateTime,
}

impl CivilInstant {
    /// Parse a JST instant.
    ///
    /// Arguments
    /// ---------
    /// * `input`: `YYYYMMDD` (midnight implied) or `YYYYMMDDHHMMSS`.
    ///
    /// Return
    /// ------
    /// * The instant, or [`SunMoonError::MalformedInstant`] when the text does not match
    ///   one of the two forms, [`SunMoonError::InvalidDate`] when it matches but does not
    ///   name a real date-time.
    pub fn parse(input: &str) -> Result<Self, SunMoonError> {
        if !INSTANT_FORMAT.is_match(input) {
            return Err(SunMoonError::MalformedInstant(input.to_string()));
        }

        let digits = if input.len() == 8 {
            format!("{input}000000")
        } else {
            input.to_string()
        };

        let field = |range: std::ops::Range<usize>| -> Result<u8, SunMoonError> {
            digits[range]
                .parse::<u8>()
                .map_err(|_| SunMoonError::MalformedInstant(input.to_string()))
        };
        let year = digits[0..4]
            .parse::<i32>()
            .map_err(|_| SunMoonError::MalformedInstant(input.to_string()))?;

        let local = CivilDateTime::new(
            year,
            field(4..6)?,
            field(6..8)?,
            field(8..10)?,
            field(10..12)?,
            field(12..14)?,
        )?;
        Self::from_local(local)
    }

    /// Current instant from the system clock, truncated to whole seconds.
    pub fn now() -> Result<Self, SunMoonError> {
        let (year, month, day, hour, minute, second, _) = Epoch::now()?.to_gregorian_utc();
        Self::from_utc(CivilDateTime::new(year, month, day, hour, minute, second)?)
    }

    /// Instant read on the JST clock.
    pub fn from_local(local: CivilDateTime) -> Result<Self, SunMoonError> {
        let reference = local.shifted_by_hours(-JST_MINUS_UTC)?;
        Ok(CivilInstant { local, reference })
    }

    /// Instant read on the UTC clock.
    pub fn from_utc(reference: CivilDateTime) -> Result<Self, SunMoonError> {
        let local = reference.shifted_by_hours(JST_MINUS_UTC)?;
        Ok(CivilInstant { local, reference })
    }

    /// JST reading.
    pub fn local(&self) -> &CivilDateTime {
        &self.local
    }

    /// UTC reading, used to index the coefficient tables.
    pub fn reference(&self) -> &CivilDateTime {
        &self.reference
    }

    /// Fail with [`SunMoonError::OutOfCoverage`] unless `first ≤ local ≤ last`.
    pub fn ensure_within(
        &self,
        first: &CivilDateTime,
        last: &CivilDateTime,
    ) -> Result<(), SunMoonError> {
        if *first <= self.local && self.local <= *last {
            Ok(())
        } else {
            Err(SunMoonError::OutOfCoverage {
                instant: self.local.compact(),
                first: first.compact(),
                last: last.compact(),
            })
        }
    }
}

impl fmt::Display for CivilInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} JST ({} UTC)", self.local, self.reference)
    }
}

/// Day count `T` of a date, with January 1 → 1 and December 31 → 365 or 366.
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`: a UTC calendar date
///
/// Return
/// ------
/// * `T = 30P + Q(S − Y) + P(1 − Q) + day` with `P = month − 1`, `Q = ⌊(month + 7)/10⌋`,
///   `Y = ⌊year/4 − ⌊year/4⌋ + 0.77⌋`, `S = ⌊0.55P − 0.33⌋`.
///
/// The leap-year term uses the plain divisible-by-four rule, exact over 1901–2099.
pub fn day_of_year_count(year: i32, month: u8, day: u8) -> i32 {
    let p = month as i32 - 1;
    let q = ((month as i32 + 7) as f64 / 10.0).floor() as i32;
    let quarter = year as f64 / 4.0;
    let y = (quarter - quarter.floor() + 0.77).floor() as i32;
    let s = (0.55 * p as f64 - 0.33).floor() as i32;
    30 * p + q * (s - y) + p * (1 - q) + day as i32
}

/// Fraction of the day elapsed at `hour:minute:second`.
pub fn day_fraction(hour: u8, minute: u8, second: u8) -> f64 {
    hour as f64 / HOURS_PER_DAY + minute as f64 / MINUTES_PER_DAY + second as f64 / SECONDS_PER_DAY
}

/// Series arguments of one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeArguments {
    /// Day count `T` of the UTC date
    pub day_count: i32,
    /// Fraction `F` of the UTC day
    pub day_fraction: f64,
    /// ΔT used for `tm`, in seconds
    pub delta_t: Seconds,
    /// Dynamical-time argument `T + F + ΔT/86400`
    pub tm: DayOfYear,
    /// Universal-time argument `T + F`
    pub tm_r: DayOfYear,
}

impl TimeArguments {
    pub fn new(reference: &CivilDateTime, delta_t: Seconds) -> Self {
        let day_count = day_of_year_count(reference.year, reference.month, reference.day);
        let day_fraction = day_fraction(reference.hour, reference.minute, reference.second);
        let tm_r = day_count as f64 + day_fraction;

        TimeArguments {
            day_count,
            day_fraction,
            delta_t,
            tm: tm_r + delta_t / SECONDS_PER_DAY,
            tm_r,
        }
    }

    /// Argument used to look up and evaluate a quantity.
    pub fn for_quantity(&self, quantity: Quantity) -> DayOfYear {
        if quantity.uses_universal_time() {
            self.tm_r
        } else {
            self.tm
        }
    }
}

#[cfg(test)]
mod time_test {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn civil(y: i32, mo: u8, d: u8, h: u8, mi: u8, s: u8) -> CivilDateTime {
        CivilDateTime::new(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_short_form() {
        let instant = CivilInstant::parse("20180328").unwrap();
        assert_eq!(*instant.local(), civil(2018, 3, 28, 0, 0, 0));
        assert_eq!(*instant.reference(), civil(2018, 3, 27, 15, 0, 0));
    }

    #[test]
    fn test_parse_long_form() {
        let instant = CivilInstant::parse("20180101083000").unwrap();
        assert_eq!(*instant.local(), civil(2018, 1, 1, 8, 30, 0));
        assert_eq!(*instant.reference(), civil(2017, 12, 31, 23, 30, 0));

        let instant = CivilInstant::parse("20161231235959").unwrap();
        assert_eq!(*instant.reference(), civil(2016, 12, 31, 14, 59, 59));
    }

    #[test]
    fn test_parse_malformed() {
        for input in ["2018032", "20180328000", "2018-03-28", "", " 20180328", "2018032800000a"] {
            assert_eq!(
                CivilInstant::parse(input),
                Err(SunMoonError::MalformedInstant(input.to_string())),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_parse_invalid_date() {
        for input in [
            "20181301",
            "20180230",
            "20170229",
            "20180100",
            "20180328240000",
            "20180328006000",
            "20180328000060",
        ] {
            assert!(
                matches!(CivilInstant::parse(input), Err(SunMoonError::InvalidDate(_))),
                "{input:?}"
            );
        }

        assert!(CivilInstant::parse("20160229").is_ok());
    }

    #[test]
    fn test_from_utc_crosses_year() {
        let instant = CivilInstant::from_utc(civil(2018, 12, 31, 20, 0, 0)).unwrap();
        assert_eq!(*instant.local(), civil(2019, 1, 1, 5, 0, 0));

        // shift is not disturbed by the leap second inserted at the end of 2016
        let instant = CivilInstant::from_utc(civil(2016, 12, 31, 23, 59, 59)).unwrap();
        assert_eq!(*instant.local(), civil(2017, 1, 1, 8, 59, 59));
    }

    #[test]
    fn test_coverage_bounds() {
        let first = CivilInstant::parse("20080101090000").unwrap();
        assert_eq!(*first.reference(), civil(2008, 1, 1, 0, 0, 0));
        assert!(first.ensure_within(&COVERAGE_FIRST, &COVERAGE_LAST).is_ok());

        let last = CivilInstant::parse("20190101085959").unwrap();
        assert_eq!(*last.reference(), civil(2018, 12, 31, 23, 59, 59));
        assert!(last.ensure_within(&COVERAGE_FIRST, &COVERAGE_LAST).is_ok());

        let before = CivilInstant::parse("20080101085959").unwrap();
        assert_eq!(
            before.ensure_within(&COVERAGE_FIRST, &COVERAGE_LAST),
            Err(SunMoonError::OutOfCoverage {
                instant: "20080101085959".into(),
                first: "20080101090000".into(),
                last: "20190101085959".into(),
            })
        );

        let after = CivilInstant::parse("20190101090000").unwrap();
        assert!(after.ensure_within(&COVERAGE_FIRST, &COVERAGE_LAST).is_err());
    }

    #[test]
    fn test_now_is_whole_seconds() {
        let instant = CivilInstant::now().unwrap();
        let back = CivilInstant::from_local(*instant.local()).unwrap();
        assert_eq!(instant, back);
    }

    #[test]
    fn test_day_of_year_count() {
        assert_eq!(day_of_year_count(2018, 1, 1), 1);
        assert_eq!(day_of_year_count(2016, 1, 1), 1);
        assert_eq!(day_of_year_count(2018, 2, 28), 59);
        assert_eq!(day_of_year_count(2016, 2, 29), 60);
        assert_eq!(day_of_year_count(2018, 3, 1), 60);
        assert_eq!(day_of_year_count(2016, 3, 1), 61);
        assert_eq!(day_of_year_count(2018, 3, 27), 86);
        assert_eq!(day_of_year_count(2018, 3, 28), 87);
        assert_eq!(day_of_year_count(2016, 3, 28), 88);
        assert_eq!(day_of_year_count(2018, 12, 31), 365);
        assert_eq!(day_of_year_count(2016, 12, 31), 366);
    }

    #[test]
    fn test_day_of_year_count_matches_calendar() {
        // every date of 2008..=2018 against hifitime's own calendar
        for year in 2008..=2018 {
            let jan1 = Epoch::from_gregorian_tai_at_midnight(year, 1, 1);
            let days: i64 = if year % 4 == 0 { 366 } else { 365 };
            for n in 0..days {
                let (y, m, d, ..) = (jan1 + Unit::Day * n).to_gregorian_tai();
                assert_eq!(y, year);
                assert_eq!(day_of_year_count(y, m, d), n as i32 + 1, "{y}-{m}-{d}");
            }
        }
    }

    #[test]
    fn test_day_fraction() {
        assert_eq!(day_fraction(0, 0, 0), 0.0);
        assert_eq!(day_fraction(15, 0, 0), 0.625);
        assert_abs_diff_eq!(day_fraction(23, 59, 59), 1.0 - 1.0 / 86400.0, epsilon = 1e-12);
    }

    #[test]
    fn test_time_arguments() {
        let instant = CivilInstant::parse("20180328").unwrap();
        let args = TimeArguments::new(instant.reference(), 69.0);
        assert_eq!(args.day_count, 86);
        assert_eq!(args.day_fraction, 0.625);
        assert_eq!(args.tm_r, 86.625);
        assert_abs_diff_eq!(args.tm, 86.625 + 69.0 / 86400.0, epsilon = 1e-12);

        assert_eq!(args.for_quantity(Quantity::SiderealR), args.tm_r);
        assert_eq!(args.for_quantity(Quantity::SunRa), args.tm);
        assert_eq!(args.for_quantity(Quantity::MoonHp), args.tm);
    }
}
