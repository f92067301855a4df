//! # Coefficient table store
//!
//! This module holds the **Chebyshev coefficient tables** from which every tabulated
//! quantity of the Sun and the Moon is evaluated. Each table is a list of rows tagged by
//! a reference (UTC) year and a sub-interval `[a, b]` of the time argument, carrying the
//! coefficient vector valid on that interval.
//!
//! ## Public API
//!
//! ### [`crate::coefficients::Quantity`]
//! Closed enumeration of the tabulated quantities:
//!
//! - `Quantity::SunRa` – apparent right ascension of the Sun (hours)
//! - `Quantity::SunDec` – apparent declination of the Sun (degrees)
//! - `Quantity::SunDist` – Earth–Sun distance (AU)
//! - `Quantity::MoonRa` – apparent right ascension of the Moon (hours)
//! - `Quantity::MoonDec` – apparent declination of the Moon (degrees)
//! - `Quantity::MoonHp` – equatorial horizontal parallax of the Moon (degrees)
//! - `Quantity::SiderealR` – sidereal reference `R = GAST − UT` (hours)
//! - `Quantity::Obliquity` – true obliquity of the ecliptic (degrees)
//!
//! Behavior which differs between quantities is carried by the variant itself:
//! [`Quantity::wraps_hours`] and [`Quantity::uses_universal_time`].
//!
//! ### [`crate::coefficients::CoefficientStore`]
//!
//! ```rust
//! use sunmoon::coefficients::{CoefficientStore, Quantity};
//!
//! let store = CoefficientStore::embedded().unwrap();
//! let row = store.table(Quantity::SunRa).find(2018, 86.6258).unwrap();
//! assert!(row.a <= 86.0 && 86.0 <= row.b);
//! ```
//!
//! The built-in tables cover the UTC years 2008 to 2018 and are parsed once per process.
//! Tables with the same layout can be loaded from a directory with
//! [`CoefficientStore::from_dir`].
//!
//! ## File format
//!
//! One CSV file per quantity (`sun_ra.csv`, `sun_dec.csv`, `sun_dist.csv`, `moon_ra.csv`,
//! `moon_dec.csv`, `moon_hp.csv`, `sidereal_r.csv`, `obliquity.csv`):
//!
//! ```text
//! year,a,b,coefficients
//! 2018,121,245,6.6 4.1 -0.2 0.01
//! 2018,0,122,11.7 4.0 -0.1 0.03
//! ```
//!
//! The last column holds the coefficients `c₀ … c_N`, separated by spaces.
//!
//! ## Lookup rule
//!
//! [`CoefficientTable::find`] returns the **first** row whose year matches and whose
//! interval contains `⌊t⌋`. The data is not required to be contiguous; a gap surfaces as
//! [`SunMoonError::MissingCoefficients`] at evaluation time.
//!
//! Neighbouring intervals share their endpoint day (`[0, 8]`, `[8, 16]`, ...). The
//! built-in tables list the intervals of a year latest first, so that day is read from
//! the interval it opens and `t` only runs past `b` at the very end of the year.
use std::{
    fmt,
    fs::File,
    io::Read,
    path::Path,
    sync::Arc,
};

use itertools::{Itertools, MinMaxResult};
use log::debug;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Deserializer};

use crate::sunmoon_errors::SunMoonError;

static SUN_RA_TABLE: &str = include_str!("data/sun_ra.csv");
static SUN_DEC_TABLE: &str = include_str!("data/sun_dec.csv");
static SUN_DIST_TABLE: &str = include_str!("data/sun_dist.csv");
static MOON_RA_TABLE: &str = include_str!("data/moon_ra.csv");
static MOON_DEC_TABLE: &str = include_str!("data/moon_dec.csv");
static MOON_HP_TABLE: &str = include_str!("data/moon_hp.csv");
static SIDEREAL_R_TABLE: &str = include_str!("data/sidereal_r.csv");
static OBLIQUITY_TABLE: &str = include_str!("data/obliquity.csv");

static EMBEDDED_STORE: OnceCell<Arc<CoefficientStore>> = OnceCell::new();

/// A quantity tabulated by a Chebyshev coefficient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quantity {
    SunRa,
    SunDec,
    SunDist,
    MoonRa,
    MoonDec,
    MoonHp,
    SiderealR,
    Obliquity,
}

impl Quantity {
    /// Every quantity, in evaluation order.
    pub const ALL: [Quantity; 8] = [
        Quantity::SunRa,
        Quantity::SunDec,
        Quantity::SunDist,
        Quantity::MoonRa,
        Quantity::MoonDec,
        Quantity::MoonHp,
        Quantity::SiderealR,
        Quantity::Obliquity,
    ];

    /// Whether the evaluated value is an hour angle to be normalized into `[0, 24)`.
    pub fn wraps_hours(self) -> bool {
        matches!(
            self,
            Quantity::SunRa | Quantity::MoonRa | Quantity::SiderealR
        )
    }

    /// Whether the quantity is tabulated against universal time (`tm_r`) instead of the
    /// dynamical time argument (`tm`).
    pub fn uses_universal_time(self) -> bool {
        matches!(self, Quantity::SiderealR)
    }

    /// Short label used in reports and diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Quantity::SunRa => "SUN_RA",
            Quantity::SunDec => "SUN_DEC",
            Quantity::SunDist => "SUN_DIST",
            Quantity::MoonRa => "MOON_RA",
            Quantity::MoonDec => "MOON_DEC",
            Quantity::MoonHp => "MOON_HP",
            Quantity::SiderealR => "R",
            Quantity::Obliquity => "EPS",
        }
    }

    /// Name of the CSV file holding the table of this quantity.
    pub fn file_name(self) -> &'static str {
        match self {
            Quantity::SunRa => "sun_ra.csv",
            Quantity::SunDec => "sun_dec.csv",
            Quantity::SunDist => "sun_dist.csv",
            Quantity::MoonRa => "moon_ra.csv",
            Quantity::MoonDec => "moon_dec.csv",
            Quantity::MoonHp => "moon_hp.csv",
            Quantity::SiderealR => "sidereal_r.csv",
            Quantity::Obliquity => "obliquity.csv",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn embedded_source(self) -> &'static str {
        match self {
            Quantity::SunRa => SUN_RA_TABLE,
            Quantity::SunDec => SUN_DEC_TABLE,
            Quantity::SunDist => SUN_DIST_TABLE,
            Quantity::MoonRa => MOON_RA_TABLE,
            Quantity::MoonDec => MOON_DEC_TABLE,
            Quantity::MoonHp => MOON_HP_TABLE,
            Quantity::SiderealR => SIDEREAL_R_TABLE,
            Quantity::Obliquity => OBLIQUITY_TABLE,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of a coefficient table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoefficientRow {
    /// Reference (UTC) year the row belongs to
    pub year: i32,
    /// Lower bound of the time-argument interval (days from January 0.0)
    pub a: f64,
    /// Upper bound of the time-argument interval
    pub b: f64,
    /// Chebyshev coefficients `c₀ … c_N`
    #[serde(deserialize_with = "deserialize_coefficients")]
    pub coefficients: Vec<f64>,
}

impl CoefficientRow {
    /// Whether the interval `[a, b]` contains the given whole day.
    pub fn contains_day(&self, day: f64) -> bool {
        self.a <= day && day <= self.b
    }
}

fn deserialize_coefficients<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.split_whitespace()
        .map(|value| value.parse::<f64>().map_err(serde::de::Error::custom))
        .collect()
}

/// All rows of one quantity, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    quantity: Quantity,
    rows: Vec<CoefficientRow>,
}

impl CoefficientTable {
    /// Build a table from in-memory rows.
    ///
    /// Rows go through the same checks as [`CoefficientTable::from_reader`]; the `line` of
    /// a [`SunMoonError::CoefficientParse`] is then the 1-based row position.
    pub fn new(quantity: Quantity, rows: Vec<CoefficientRow>) -> Result<Self, SunMoonError> {
        for (idx, row) in rows.iter().enumerate() {
            validate_row(quantity, idx as u64 + 1, row)?;
        }
        Ok(CoefficientTable { quantity, rows })
    }

    /// Parse a table from its CSV text.
    ///
    /// Arguments
    /// -----------------
    /// * `quantity`: the quantity the table describes.
    /// * `source`: a reader over the CSV content (`year,a,b,coefficients` header).
    ///
    /// Return
    /// ----------
    /// * The parsed table, or a [`SunMoonError`] if a record is malformed, an interval is
    ///   empty (`a >= b`), a value is not finite or a row carries no coefficient.
    pub fn from_reader<R: Read>(quantity: Quantity, source: R) -> Result<Self, SunMoonError> {
        let mut reader = csv::Reader::from_reader(source);
        let mut rows = Vec::new();

        for (idx, record) in reader.deserialize::<CoefficientRow>().enumerate() {
            let row = record?;
            // header is line 1
            let line = idx as u64 + 2;
            validate_row(quantity, line, &row)?;
            rows.push(row);
        }

        Ok(CoefficientTable { quantity, rows })
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn rows(&self) -> &[CoefficientRow] {
        &self.rows
    }

    /// Select the first row of `year` whose interval contains `⌊t⌋`.
    ///
    /// Arguments
    /// -----------------
    /// * `year`: the reference (UTC) year of the instant.
    /// * `t`: the time argument (`tm`, or `tm_r` for the sidereal reference).
    ///
    /// Return
    /// ----------
    /// * `Some(row)` on success, `None` when the table has no matching row.
    pub fn find(&self, year: i32, t: f64) -> Option<&CoefficientRow> {
        let day = t.floor();
        self.rows
            .iter()
            .find(|row| row.year == year && row.contains_day(day))
    }

    /// Inclusive span of years present in the table, `None` for an empty table.
    pub fn coverage(&self) -> Option<(i32, i32)> {
        match self.rows.iter().map(|row| row.year).minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(year) => Some((year, year)),
            MinMaxResult::MinMax(first, last) => Some((first, last)),
        }
    }
}

fn validate_row(quantity: Quantity, line: u64, row: &CoefficientRow) -> Result<(), SunMoonError> {
    let fail = |reason: String| SunMoonError::CoefficientParse {
        file: quantity.file_name().to_string(),
        line,
        reason,
    };

    if !row.a.is_finite() || !row.b.is_finite() {
        return Err(fail("interval bounds must be finite".into()));
    }
    if row.a >= row.b {
        return Err(fail(format!(
            "empty interval [{}, {}] (a must be < b)",
            row.a, row.b
        )));
    }
    if row.coefficients.is_empty() {
        return Err(fail("row carries no coefficient".into()));
    }
    if row.coefficients.iter().any(|c| !c.is_finite()) {
        return Err(fail("coefficients must be finite".into()));
    }
    Ok(())
}

/// The eight coefficient tables, one per [`Quantity`].
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientStore {
    tables: Vec<CoefficientTable>,
}

impl CoefficientStore {
    /// Shared handle over the tables shipped with the crate.
    ///
    /// The CSV sources are parsed on the first call only; later calls return the same
    /// [`Arc`].
    pub fn embedded() -> Result<Arc<CoefficientStore>, SunMoonError> {
        EMBEDDED_STORE
            .get_or_try_init(|| {
                let tables = Quantity::ALL
                    .iter()
                    .map(|&q| CoefficientTable::from_reader(q, q.embedded_source().as_bytes()))
                    .collect::<Result<Vec<_>, SunMoonError>>()?;
                let store = CoefficientStore { tables };
                debug!("built-in coefficient tables loaded: {}", store.summary());
                Ok(Arc::new(store))
            })
            .cloned()
    }

    /// Load the eight tables from `dir`, one CSV file per quantity
    /// (see [`Quantity::file_name`]).
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<CoefficientStore, SunMoonError> {
        let dir = dir.as_ref();
        let tables = Quantity::ALL
            .iter()
            .map(|&q| {
                let file = File::open(dir.join(q.file_name()))?;
                CoefficientTable::from_reader(q, file)
            })
            .collect::<Result<Vec<_>, SunMoonError>>()?;

        let store = CoefficientStore { tables };
        debug!(
            "coefficient tables loaded from {}: {}",
            dir.display(),
            store.summary()
        );
        Ok(store)
    }

    /// Build a store from tables given in any order. Every quantity must appear exactly once.
    pub fn from_tables(mut tables: Vec<CoefficientTable>) -> Result<CoefficientStore, SunMoonError> {
        tables.sort_by_key(|table| table.quantity());
        let found = tables.iter().map(|table| table.quantity()).collect_vec();
        if found != Quantity::ALL {
            return Err(SunMoonError::InvalidParameter(format!(
                "a coefficient store needs exactly one table per quantity, got [{}]",
                found.iter().join(", ")
            )));
        }
        Ok(CoefficientStore { tables })
    }

    pub fn table(&self, quantity: Quantity) -> &CoefficientTable {
        &self.tables[quantity.index()]
    }

    /// Inclusive year span of the table of `quantity`.
    pub fn coverage(&self, quantity: Quantity) -> Option<(i32, i32)> {
        self.table(quantity).coverage()
    }

    fn summary(&self) -> String {
        self.tables
            .iter()
            .map(|table| format!("{}={} rows", table.quantity(), table.rows().len()))
            .join(", ")
    }
}
