use approx::assert_abs_diff_eq;
use sunmoon::ephemeris::EphemerisRecord;

/// Expected values of a record, in report order (see `EphemerisRecord::labelled_values`).
pub struct ExpectedRecord {
    pub sun_ra: f64,
    pub sun_dec: f64,
    pub sun_dist: f64,
    pub sun_h: f64,
    pub sun_sd: f64,
    pub moon_ra: f64,
    pub moon_dec: f64,
    pub moon_hp: f64,
    pub moon_h: f64,
    pub moon_sd: f64,
    pub r: f64,
    pub eps: f64,
}

pub fn assert_record_close(actual: &EphemerisRecord, expected: &ExpectedRecord, epsilon: f64) {
    assert_abs_diff_eq!(actual.sun_ra, expected.sun_ra, epsilon = epsilon);
    assert_abs_diff_eq!(actual.sun_dec, expected.sun_dec, epsilon = epsilon);
    assert_abs_diff_eq!(actual.sun_dist, expected.sun_dist, epsilon = epsilon);
    assert_abs_diff_eq!(actual.sun_h, expected.sun_h, epsilon = epsilon);
    assert_abs_diff_eq!(actual.sun_sd, expected.sun_sd, epsilon = epsilon);
    assert_abs_diff_eq!(actual.moon_ra, expected.moon_ra, epsilon = epsilon);
    assert_abs_diff_eq!(actual.moon_dec, expected.moon_dec, epsilon = epsilon);
    assert_abs_diff_eq!(actual.moon_hp, expected.moon_hp, epsilon = epsilon);
    assert_abs_diff_eq!(actual.moon_h, expected.moon_h, epsilon = epsilon);
    assert_abs_diff_eq!(actual.moon_sd, expected.moon_sd, epsilon = epsilon);
    assert_abs_diff_eq!(actual.r, expected.r, epsilon = epsilon);
    assert_abs_diff_eq!(actual.eps, expected.eps, epsilon = epsilon);
}

/// 2018-03-28 00:00:00 JST with the built-in tables and ΔT = 69 s.
pub const MARCH_28_2018: ExpectedRecord = ExpectedRecord {
    sun_ra: 0.42187669896369706,
    sun_dec: 2.7354204089159837,
    sun_dist: 0.9978789461763434,
    sun_h: 26.910919176257863,
    sun_sd: 16.054051507334812,
    moon_ra: 9.242928590307836,
    moon_dec: 16.206821453347853,
    moon_hp: 0.9893046367937137,
    moon_h: 18.089867284913726,
    moon_sd: 16.174386765182515,
    r: 12.332795875221562,
    eps: 23.43535464838468,
};

/// 2008-01-01 09:00:00 JST, first covered instant.
pub const FIRST_COVERED: ExpectedRecord = ExpectedRecord {
    sun_ra: 18.7201246670982,
    sun_dec: -23.068784519149688,
    sun_dist: 0.9833200264873256,
    sun_h: -12.051350307642076,
    sun_sd: 16.29174588991907,
    moon_ra: 12.965946773107136,
    moon_dec: -10.344731899058527,
    moon_hp: 0.9090654263783804,
    moon_h: -6.297172413651012,
    moon_sd: 14.862642429152418,
    r: 6.668774359456124,
    eps: 23.44032889325197,
};

/// 2019-01-01 08:59:59 JST, last covered instant (end-of-year clamp engaged).
pub const LAST_COVERED: ExpectedRecord = ExpectedRecord {
    sun_ra: 18.743837021000004,
    sun_dec: -23.039152253,
    sun_dist: 0.9833224435000001,
    sun_h: 11.946329713695047,
    sun_sd: 16.29170584470647,
    moon_ra: 14.766149125999998,
    moon_dec: -10.701607597000002,
    moon_hp: 0.9441584998,
    moon_h: 15.924017608695053,
    moon_sd: 15.436344709282064,
    r: 6.690444512472827,
    eps: 23.4355255629,
};

/// 2017-01-01 08:59:59 JST, last second of the leap year 2016.
pub const END_OF_2016: ExpectedRecord = ExpectedRecord {
    sun_ra: 18.77973929499999,
    sun_dec: -22.999054669,
    sun_dist: 0.9833144919999999,
    sun_h: 11.94240368567458,
    sun_sd: 16.291837586382282,
    moon_ra: 20.914911089999972,
    moon_dec: -15.338686674000067,
    moon_hp: 0.9339565625999999,
    moon_h: 9.8072318906746,
    moon_sd: 15.26956377570989,
    r: 6.722420758452347,
    eps: 23.434566076399996,
};

/// 2012-06-15 12:30:00 JST.
pub const JUNE_15_2012: ExpectedRecord = ExpectedRecord {
    sun_ra: 5.59680575847844,
    sun_dec: 23.319938480228874,
    sun_dist: 1.0157932914256038,
    sun_h: 15.491549264115015,
    sun_sd: 15.77092518254074,
    moon_ra: 2.1521751982536985,
    moon_dec: 15.803254870099652,
    moon_hp: 0.9015064802254763,
    moon_h: 18.936179824339757,
    moon_sd: 14.739067940782851,
    r: 17.588355022593454,
    eps: 23.436420085393916,
};
