//! # Constants and type definitions for sunmoon
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **unit
//! aliases** used throughout the `sunmoon` library.
//!
//! ## Overview
//!
//! - Time-scale relations (TT − TAI, zone offset of the civil clock)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds)
//! - Semi-diameter constants for the Sun and the Moon
//! - Unit aliases used across the crate so that signatures document their units
//!
//! These definitions are shared by the ΔT model, the time-argument builder, the series
//! evaluator and the derived-quantity engine.

// -------------------------------------------------------------------------------------------------
// Time constants
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of minutes in a day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// Number of hours in a day
pub const HOURS_PER_DAY: f64 = 24.0;

/// TT − TAI, fixed by definition of Terrestrial Time (seconds)
pub const TT_MINUS_TAI: f64 = 32.184;

/// Offset of the civil clock (JST) with respect to UTC, in hours
pub const JST_MINUS_UTC: i64 = 9;

// -------------------------------------------------------------------------------------------------
// Angles
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Radians → degrees
pub const DEGRAD: f64 = 180.0 / std::f64::consts::PI;

/// Arcminutes in a degree
pub const ARCMIN_PER_DEG: f64 = 60.0;

// -------------------------------------------------------------------------------------------------
// Semi-diameters
// -------------------------------------------------------------------------------------------------

/// Solar semi-diameter at 1 AU, in arcminutes
pub const SUN_SD_AT_1AU: f64 = 16.02;

/// Ratio of the lunar radius to the Earth equatorial radius
pub const MOON_EARTH_RADIUS_RATIO: f64 = 0.2725;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcminutes
pub type ArcMin = f64;
/// Angle or time expressed in hours
pub type Hour = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Time difference in seconds
pub type Seconds = f64;
/// Days counted from January 0.0 of the reference year
pub type DayOfYear = f64;
