use std::fmt;

use crate::{
    constants::{ArcMin, AstronomicalUnit, Degree, Hour, ARCMIN_PER_DEG},
    conversion::{Dms, Hms},
    time::{CivilInstant, TimeArguments},
};

/// Apparent Sun and Moon quantities at one instant.
///
/// Right ascensions and `r` are in `[0, 24)` hours. Hour angles are the raw
/// `R − RA + 24F` and may fall outside that range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisRecord {
    pub instant: CivilInstant,
    pub time_arguments: TimeArguments,

    pub sun_ra: Hour,
    pub sun_dec: Degree,
    pub sun_dist: AstronomicalUnit,
    /// Greenwich hour angle of the Sun
    pub sun_h: Hour,
    pub sun_sd: ArcMin,

    pub moon_ra: Hour,
    pub moon_dec: Degree,
    /// Horizontal parallax
    pub moon_hp: Degree,
    /// Greenwich hour angle of the Moon
    pub moon_h: Hour,
    pub moon_sd: ArcMin,

    /// Sidereal reference quantity R, such that the hour angle is `R − RA + 24F`
    pub r: Hour,
    /// Obliquity of the ecliptic
    pub eps: Degree,
}

impl EphemerisRecord {
    /// Values keyed by their report label, in report order.
    pub fn labelled_values(&self) -> [(&'static str, f64); 12] {
        [
            ("SUN_RA", self.sun_ra),
            ("SUN_DEC", self.sun_dec),
            ("SUN_DIST", self.sun_dist),
            ("SUN_H", self.sun_h),
            ("SUN_SD", self.sun_sd),
            ("MOON_RA", self.moon_ra),
            ("MOON_DEC", self.moon_dec),
            ("MOON_HP", self.moon_hp),
            ("MOON_H", self.moon_h),
            ("MOON_SD", self.moon_sd),
            ("R", self.r),
            ("EPS", self.eps),
        ]
    }
}

impl fmt::Display for EphemerisRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[ JST: {},  UTC: {} ]",
            self.instant.local(),
            self.instant.reference()
        )?;
        writeln!(f, "  SUN  R.A. = {:12.8} h  (= {})", self.sun_ra, Hms(self.sun_ra))?;
        writeln!(f, "  SUN  DEC. = {:12.8} °  (= {})", self.sun_dec, Dms(self.sun_dec))?;
        writeln!(f, "  SUN DIST. = {:12.8} AU", self.sun_dist)?;
        writeln!(f, "  SUN   hG. = {:12.8} h  (= {})", self.sun_h, Hms(self.sun_h))?;
        writeln!(
            f,
            "  SUN  S.D. = {:12.8} ′  (= {})",
            self.sun_sd,
            Dms(self.sun_sd / ARCMIN_PER_DEG)
        )?;
        writeln!(f, "  MOON R.A. = {:12.8} h  (= {})", self.moon_ra, Hms(self.moon_ra))?;
        writeln!(f, "  MOON DEC. = {:12.8} °  (= {})", self.moon_dec, Dms(self.moon_dec))?;
        writeln!(f, "  MOON H.P. = {:12.8} °  (= {})", self.moon_hp, Dms(self.moon_hp))?;
        writeln!(f, "  MOON  hG. = {:12.8} h  (= {})", self.moon_h, Hms(self.moon_h))?;
        writeln!(
            f,
            "  MOON S.D. = {:12.8} ′  (= {})",
            self.moon_sd,
            Dms(self.moon_sd / ARCMIN_PER_DEG)
        )?;
        writeln!(f, "         R  = {:12.8} h  (= {})", self.r, Hms(self.r))?;
        write!(f, "       EPS. = {:12.8} °  (= {})", self.eps, Dms(self.eps))?;

        if f.alternate() {
            write!(
                f,
                "\n  [ΔT = {} s, T = {}, F = {:.8}, tm = {:.8}, tm_r = {:.8}]",
                self.time_arguments.delta_t,
                self.time_arguments.day_count,
                self.time_arguments.day_fraction,
                self.time_arguments.tm,
                self.time_arguments.tm_r
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod record_test {
    use super::*;

    fn record() -> EphemerisRecord {
        let instant = CivilInstant::parse("20180328").unwrap();
        EphemerisRecord {
            instant,
            time_arguments: TimeArguments::new(instant.reference(), 69.0),
            sun_ra: 0.5,
            sun_dec: 2.5,
            sun_dist: 0.99,
            sun_h: 27.0,
            sun_sd: 16.0,
            moon_ra: 10.25,
            moon_dec: -12.5,
            moon_hp: 0.95,
            moon_h: -6.5,
            moon_sd: 15.5,
            r: 12.0,
            eps: 23.4375,
        }
    }

    #[test]
    fn test_display_layout() {
        let report = format!("{}", record());
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "[ JST: 2018-03-28 00:00:00,  UTC: 2018-03-27 15:00:00 ]");
        assert_eq!(lines[1], "  SUN  R.A. =   0.50000000 h  (=  00 h 30 m 00.000 s)");
        assert_eq!(lines[2], "  SUN  DEC. =   2.50000000 °  (=  2  ° 30 ′ 00.000 ″)");
        assert_eq!(lines[3], "  SUN DIST. =   0.99000000 AU");
        assert_eq!(lines[4], "  SUN   hG. =  27.00000000 h  (=  27 h 00 m 00.000 s)");
        assert_eq!(lines[5], "  SUN  S.D. =  16.00000000 ′  (=  0  ° 16 ′ 00.000 ″)");
        assert_eq!(lines[7], "  MOON DEC. = -12.50000000 °  (= -12 ° 30 ′ 00.000 ″)");
        assert_eq!(lines[9], "  MOON  hG. =  -6.50000000 h  (= -06 h 30 m 00.000 s)");
        assert_eq!(lines[12], "       EPS. =  23.43750000 °  (=  23 ° 26 ′ 15.000 ″)");
    }

    #[test]
    fn test_alternate_display() {
        let report = format!("{:#}", record());
        assert_eq!(report.lines().count(), 14);
        assert!(report.ends_with("tm_r = 86.62500000]"));
    }

    #[test]
    fn test_labelled_values() {
        let values = record().labelled_values();
        assert_eq!(values[0], ("SUN_RA", 0.5));
        assert_eq!(values[11], ("EPS", 23.4375));
    }
}
