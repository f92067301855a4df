use std::{cmp::Ordering::*, fmt};

use crate::{delta_t::DeltaTSource, sunmoon_errors::SunMoonError};

/// Largest |UT1 − UTC| accepted, in seconds. IERS keeps DUT1 inside ±0.9 s.
pub const MAX_ABS_DUT1: f64 = 0.9;

/// Configuration of an ephemeris computation.
///
/// Fields
/// -----------------
/// * `delta_t_source`: where ΔT comes from, see [`DeltaTSource`].
/// * `enforce_coverage`: reject instants outside the window of the built-in tables
///   (2008-01-01 09:00:00 … 2019-01-01 08:59:59 JST). Always applied with
///   [`DeltaTSource::FixedTable`], whose ΔT values span the same years.
///
/// Use [`EphemerisParams::builder`] to get a validated instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisParams {
    pub delta_t_source: DeltaTSource,
    pub enforce_coverage: bool,
}

impl EphemerisParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`EphemerisParamsBuilder`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use sunmoon::delta_t::DeltaTSource;
    /// use sunmoon::ephemeris::EphemerisParams;
    ///
    /// let params = EphemerisParams::builder()
    ///     .delta_t_source(DeltaTSource::Model {
    ///         utc_minus_tai: Some(-37),
    ///         dut1: 0.1,
    ///     })
    ///     .enforce_coverage(false)
    ///     .build()
    ///     .unwrap();
    /// assert!(!params.coverage_enforced());
    /// ```
    pub fn builder() -> EphemerisParamsBuilder {
        EphemerisParamsBuilder::new()
    }

    /// Whether the coverage window applies with this configuration.
    pub fn coverage_enforced(&self) -> bool {
        self.enforce_coverage || self.delta_t_source == DeltaTSource::FixedTable
    }
}

impl Default for EphemerisParams {
    fn default() -> Self {
        EphemerisParams {
            delta_t_source: DeltaTSource::FixedTable,
            enforce_coverage: true,
        }
    }
}

/// Builder for [`EphemerisParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct EphemerisParamsBuilder {
    params: EphemerisParams,
}

impl EphemerisParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: EphemerisParams::default(),
        }
    }

    pub fn delta_t_source(mut self, v: DeltaTSource) -> Self {
        self.params.delta_t_source = v;
        self
    }
    pub fn enforce_coverage(mut self, v: bool) -> Self {
        self.params.enforce_coverage = v;
        self
    }

    /// Return true iff |x| ≤ bound and x is not NaN.
    #[inline]
    fn within(x: f64, bound: f64) -> bool {
        matches!(x.abs().partial_cmp(&bound), Some(Less) | Some(Equal))
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `dut1` finite and `|dut1| ≤ 0.9 s`.
    /// * `utc_minus_tai ≤ 0` (UTC has been behind TAI since 1972).
    ///
    /// Returns
    /// -----------------
    /// * `Ok(EphemerisParams)` or [`SunMoonError::InvalidParameter`].
    pub fn build(self) -> Result<EphemerisParams, SunMoonError> {
        let dut1 = match self.params.delta_t_source {
            DeltaTSource::FixedTable => None,
            DeltaTSource::Model {
                utc_minus_tai,
                dut1,
            } => {
                if utc_minus_tai.is_some_and(|offset| offset > 0) {
                    return Err(SunMoonError::InvalidParameter(
                        "utc_minus_tai must be <= 0".into(),
                    ));
                }
                Some(dut1)
            }
            DeltaTSource::LeapSecondModel { dut1 } => Some(dut1),
        };

        if let Some(dut1) = dut1 {
            if !Self::within(dut1, MAX_ABS_DUT1) {
                return Err(SunMoonError::InvalidParameter(format!(
                    "dut1 must be finite and within ±{MAX_ABS_DUT1} s, got {dut1}"
                )));
            }
        }

        Ok(self.params)
    }
}

impl fmt::Display for EphemerisParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Ephemeris Parameters")?;
            writeln!(f, "--------------------")?;
            writeln!(f, "  delta_t_source   = {}", self.delta_t_source)?;
            write!(
                f,
                "  enforce_coverage = {}{}",
                self.enforce_coverage,
                if self.coverage_enforced() && !self.enforce_coverage {
                    " (forced by the fixed table)"
                } else {
                    ""
                }
            )
        } else {
            write!(
                f,
                "EphemerisParams(delta_t={}, coverage={})",
                self.delta_t_source,
                self.coverage_enforced()
            )
        }
    }
}
