use thiserror::Error;

use crate::coefficients::Quantity;

#[derive(Error, Debug)]
pub enum SunMoonError {
    #[error("Malformed instant {0:?}: expected YYYYMMDD or YYYYMMDDHHMMSS")]
    MalformedInstant(String),

    #[error("Instant {instant} is out of coverage: it should be between {first} and {last}")]
    OutOfCoverage {
        instant: String,
        first: String,
        last: String,
    },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("No {quantity} coefficients for year {year} at time argument {t}")]
    MissingCoefficients {
        quantity: Quantity,
        year: i32,
        t: f64,
    },

    #[error("Invalid ephemeris parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid coefficient table {file} at line {line}: {reason}")]
    CoefficientParse {
        file: String,
        line: u64,
        reason: String,
    },

    #[error("CSV error while reading a coefficient table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),

    #[error("Time scale error: {0}")]
    Time(#[from] hifitime::HifitimeError),
}

impl PartialEq for SunMoonError {
    fn eq(&self, other: &Self) -> bool {
        use SunMoonError::*;
        match (self, other) {
            (MalformedInstant(a), MalformedInstant(b)) => a == b,
            (
                OutOfCoverage {
                    instant: a,
                    first: fa,
                    last: la,
                },
                OutOfCoverage {
                    instant: b,
                    first: fb,
                    last: lb,
                },
            ) => a == b && fa == fb && la == lb,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (
                MissingCoefficients {
                    quantity: qa,
                    year: ya,
                    t: ta,
                },
                MissingCoefficients {
                    quantity: qb,
                    year: yb,
                    t: tb,
                },
            ) => qa == qb && ya == yb && ta == tb,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (
                CoefficientParse {
                    file: fa,
                    line: la,
                    reason: ra,
                },
                CoefficientParse {
                    file: fb,
                    line: lb,
                    reason: rb,
                },
            ) => fa == fb && la == lb && ra == rb,

            // Not comparable: equal when the variant is the same
            (Csv(_), Csv(_)) => true,
            (Io(_), Io(_)) => true,
            (Time(_), Time(_)) => true,

            _ => false,
        }
    }
}
