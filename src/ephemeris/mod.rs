//! # Apparent Sun and Moon ephemeris
//!
//! [`SunMoonEphemeris`] is the entry point of the crate. It owns an
//! [`EphemerisParams`] configuration and a shared handle on the coefficient tables, and
//! turns a [`CivilInstant`] into an [`EphemerisRecord`].
//!
//! ## Pipeline
//!
//! 1. Coverage check on the JST reading (when enforced),
//! 2. ΔT from the configured [`DeltaTSource`](crate::delta_t::DeltaTSource),
//! 3. time arguments `tm` / `tm_r` from the UTC reading,
//! 4. Chebyshev evaluation of the eight tabulated quantities,
//! 5. derived quantities: Greenwich hour angles and semi-diameters.
//!
//! The computation is all-or-nothing: the first missing coefficient row aborts it with
//! [`SunMoonError::MissingCoefficients`].
//!
//! ## Example
//!
//! ```rust
//! use sunmoon::ephemeris::{EphemerisParams, SunMoonEphemeris};
//! use sunmoon::time::CivilInstant;
//!
//! let ephemeris = SunMoonEphemeris::new(EphemerisParams::default()).unwrap();
//! let instant = CivilInstant::parse("20180328").unwrap();
//! let record = ephemeris.compute(&instant).unwrap();
//!
//! assert_eq!(record.time_arguments.delta_t, 69.0);
//! assert!((0.0..24.0).contains(&record.sun_ra));
//! println!("{record}");
//! ```
pub mod params;
pub mod record;

use std::sync::Arc;

use log::debug;

pub use params::{EphemerisParams, EphemerisParamsBuilder};
pub use record::EphemerisRecord;

use crate::{
    coefficients::{CoefficientStore, Quantity},
    constants::{
        ArcMin, AstronomicalUnit, Degree, Hour, ARCMIN_PER_DEG, DEGRAD, HOURS_PER_DAY,
        MOON_EARTH_RADIUS_RATIO, RADEG, SUN_SD_AT_1AU,
    },
    series::evaluate,
    sunmoon_errors::SunMoonError,
    time::{CivilInstant, TimeArguments, COVERAGE_FIRST, COVERAGE_LAST},
};

/// Greenwich hour angle `(R − RA) + 24F` in hours.
///
/// The value is not wrapped: with `R` and `RA` in `[0, 24)` it lies in `(−24, 48)`, and
/// adding or removing 24 h gives the same direction.
///
/// Arguments
/// ---------
/// * `r`: sidereal reference quantity R, hours
/// * `ra`: right ascension, hours
/// * `day_fraction`: fraction `F` of the UTC day
pub fn greenwich_hour_angle(r: Hour, ra: Hour, day_fraction: f64) -> Hour {
    (r - ra) + HOURS_PER_DAY * day_fraction
}

/// Solar semi-diameter in arcminutes, `16.02′ / distance`.
pub fn sun_semi_diameter(dist: AstronomicalUnit) -> ArcMin {
    SUN_SD_AT_1AU / dist
}

/// Lunar semi-diameter in arcminutes from the horizontal parallax in degrees.
pub fn moon_semi_diameter(hp: Degree) -> ArcMin {
    (MOON_EARTH_RADIUS_RATIO * (hp * RADEG).sin()).asin() * DEGRAD * ARCMIN_PER_DEG
}

/// Sun and Moon ephemeris engine.
///
/// Cheap to clone: the tables are shared behind an [`Arc`].
#[derive(Debug, Clone)]
pub struct SunMoonEphemeris {
    params: EphemerisParams,
    store: Arc<CoefficientStore>,
}

impl SunMoonEphemeris {
    /// Engine over the built-in tables.
    pub fn new(params: EphemerisParams) -> Result<Self, SunMoonError> {
        Ok(Self::with_store(params, CoefficientStore::embedded()?))
    }

    /// Engine over caller-provided tables, e.g. from [`CoefficientStore::from_dir`].
    pub fn with_store(params: EphemerisParams, store: Arc<CoefficientStore>) -> Self {
        SunMoonEphemeris { params, store }
    }

    pub fn params(&self) -> &EphemerisParams {
        &self.params
    }

    pub fn store(&self) -> &CoefficientStore {
        &self.store
    }

    /// Time arguments of an instant, after the coverage check.
    pub fn time_arguments(&self, instant: &CivilInstant) -> Result<TimeArguments, SunMoonError> {
        if self.params.coverage_enforced() {
            instant.ensure_within(&COVERAGE_FIRST, &COVERAGE_LAST)?;
        }

        let delta_t = self.params.delta_t_source.resolve(instant)?;
        let args = TimeArguments::new(instant.reference(), delta_t);
        debug!(
            "{instant}: T = {}, F = {}, ΔT = {} s, tm = {}, tm_r = {}",
            args.day_count, args.day_fraction, args.delta_t, args.tm, args.tm_r
        );
        Ok(args)
    }

    /// Compute the full record for one instant.
    ///
    /// Arguments
    /// ---------
    /// * `instant`: the JST instant
    ///
    /// Return
    /// ------
    /// * The record, or the first error met: [`SunMoonError::OutOfCoverage`] before any
    ///   computation, [`SunMoonError::MissingCoefficients`] during evaluation.
    pub fn compute(&self, instant: &CivilInstant) -> Result<EphemerisRecord, SunMoonError> {
        let args = self.time_arguments(instant)?;
        let year = instant.reference().year;
        let value = |quantity: Quantity| evaluate(&self.store, quantity, year, &args);

        let sun_ra = value(Quantity::SunRa)?;
        let sun_dec = value(Quantity::SunDec)?;
        let sun_dist = value(Quantity::SunDist)?;
        let moon_ra = value(Quantity::MoonRa)?;
        let moon_dec = value(Quantity::MoonDec)?;
        let moon_hp = value(Quantity::MoonHp)?;
        let r = value(Quantity::SiderealR)?;
        let eps = value(Quantity::Obliquity)?;

        Ok(EphemerisRecord {
            instant: *instant,
            time_arguments: args,
            sun_ra,
            sun_dec,
            sun_dist,
            sun_h: greenwich_hour_angle(r, sun_ra, args.day_fraction),
            sun_sd: sun_semi_diameter(sun_dist),
            moon_ra,
            moon_dec,
            moon_hp,
            moon_h: greenwich_hour_angle(r, moon_ra, args.day_fraction),
            moon_sd: moon_semi_diameter(moon_hp),
            r,
            eps,
        })
    }
}
