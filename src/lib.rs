//! Apparent positions of the Sun and the Moon, Greenwich hour angles, semi-diameters and
//! obliquity of the ecliptic, evaluated from yearly Chebyshev coefficient tables, with a
//! piecewise ΔT (TT − UT) model.
pub mod coefficients;
pub mod constants;
pub mod conversion;
pub mod delta_t;
pub mod ephemeris;
pub mod series;
pub mod sunmoon_errors;
pub mod time;
