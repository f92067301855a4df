use std::{cmp::max, path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Parser, ValueEnum};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use sunmoon::{
    coefficients::CoefficientStore,
    delta_t::DeltaTSource,
    ephemeris::{EphemerisParams, EphemerisRecord, SunMoonEphemeris},
    sunmoon_errors::SunMoonError,
    time::CivilInstant,
};

/// Apparent positions of the Sun and the Moon for a JST instant.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Instant in JST, `YYYYMMDD` or `YYYYMMDDHHMMSS`. Defaults to now.
    instant: Option<String>,

    /// Where ΔT comes from.
    #[arg(long, value_enum, default_value_t = DeltaTChoice::Fixed)]
    delta_t: DeltaTChoice,

    /// UTC − TAI in seconds, only with `--delta-t model` (e.g. -37).
    #[arg(long, allow_negative_numbers = true)]
    utc_tai: Option<i32>,

    /// UT1 − UTC in seconds, only with the model sources. Defaults to 0.
    #[arg(long, allow_negative_numbers = true)]
    dut1: Option<f64>,

    /// Do not reject instants outside the span of the built-in tables. Not available
    /// with the fixed ΔT table.
    #[arg(long, default_value_t = false)]
    no_coverage: bool,

    /// Directory holding the eight coefficient tables (`sun_ra.csv`, ...).
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Enable debug mode. This will increase the verbosity and detail of the logs.
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Set the log level for the application.
    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,

    /// Disable colored output in the logs.
    #[arg(long, default_value_t = false)]
    no_colors: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum DeltaTChoice {
    /// Per-year table, 2008 to 2018
    Fixed,
    /// Era model with `--utc-tai` and `--dut1`
    Model,
    /// Era model with UTC − TAI from the leap-second table
    LeapSeconds,
}

impl DeltaTChoice {
    fn as_str(&self) -> &'static str {
        match self {
            DeltaTChoice::Fixed => "fixed",
            DeltaTChoice::Model => "model",
            DeltaTChoice::LeapSeconds => "leap-seconds",
        }
    }
}

impl Cli {
    fn params(&self) -> Result<EphemerisParams, SunMoonError> {
        let unused = |flag: &str| {
            SunMoonError::InvalidParameter(format!(
                "{flag} has no effect with --delta-t {}",
                self.delta_t.as_str()
            ))
        };

        let dut1 = self.dut1.unwrap_or(0.0);
        let source = match self.delta_t {
            DeltaTChoice::Fixed => {
                if self.utc_tai.is_some() {
                    return Err(unused("--utc-tai"));
                }
                if self.dut1.is_some() {
                    return Err(unused("--dut1"));
                }
                if self.no_coverage {
                    return Err(unused("--no-coverage"));
                }
                DeltaTSource::FixedTable
            }
            DeltaTChoice::Model => DeltaTSource::Model {
                utc_minus_tai: self.utc_tai,
                dut1,
            },
            DeltaTChoice::LeapSeconds => {
                if self.utc_tai.is_some() {
                    return Err(unused("--utc-tai"));
                }
                DeltaTSource::LeapSecondModel { dut1 }
            }
        };

        EphemerisParams::builder()
            .delta_t_source(source)
            .enforce_coverage(!self.no_coverage)
            .build()
    }
}

fn init_logger(cli: &Cli) {
    let log_level = if cli.debug {
        max(LevelFilter::Debug, cli.log_level)
    } else {
        cli.log_level
    };

    let mut config_builder = simplelog::ConfigBuilder::new();
    if cli.debug {
        config_builder.set_time_level(LevelFilter::Error);
        config_builder.set_time_format_rfc3339();
        config_builder.set_target_level(LevelFilter::Error);
        config_builder.set_location_level(LevelFilter::Error);
    } else {
        config_builder.set_time_level(LevelFilter::Off);
        config_builder.set_thread_level(LevelFilter::Off);
        config_builder.set_target_level(LevelFilter::Off);
        config_builder.set_location_level(LevelFilter::Off);
    }

    let color_choice = if cli.no_colors {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    // a logger already installed is not fatal for a one-shot run
    let _ = TermLogger::init(
        log_level,
        config_builder.build(),
        TerminalMode::Stderr,
        color_choice,
    );
}

fn run(cli: &Cli) -> Result<EphemerisRecord, SunMoonError> {
    let params = cli.params()?;
    log::debug!("{params:#}");

    let ephemeris = match &cli.tables {
        Some(dir) => {
            SunMoonEphemeris::with_store(params, Arc::new(CoefficientStore::from_dir(dir)?))
        }
        None => SunMoonEphemeris::new(params)?,
    };

    let instant = match &cli.instant {
        Some(text) => CivilInstant::parse(text)?,
        None => CivilInstant::now()?,
    };

    ephemeris.compute(&instant)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(&cli);
    log::debug!("Parsed arguments: {cli:?}");

    match run(&cli) {
        Ok(record) => {
            if cli.debug {
                println!("{record:#}");
            } else {
                println!("{record}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("[ERROR] {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod main_test {
    use super::*;

    fn params_from(args: &[&str]) -> Result<EphemerisParams, SunMoonError> {
        let argv = std::iter::once("sunmoon").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().params()
    }

    #[test]
    fn test_default_params() {
        assert_eq!(params_from(&["20180328"]).unwrap(), EphemerisParams::default());
    }

    #[test]
    fn test_model_params() {
        let params =
            params_from(&["--delta-t", "model", "--utc-tai", "-37", "--dut1", "-0.2"]).unwrap();
        assert_eq!(
            params.delta_t_source,
            DeltaTSource::Model {
                utc_minus_tai: Some(-37),
                dut1: -0.2
            }
        );

        let params = params_from(&["--delta-t", "leap-seconds", "--no-coverage"]).unwrap();
        assert_eq!(params.delta_t_source, DeltaTSource::LeapSecondModel { dut1: 0.0 });
        assert!(!params.enforce_coverage);
    }

    #[test]
    fn test_reject_flags_without_effect() {
        for args in [
            &["--utc-tai", "-37"][..],
            &["--dut1", "0.1"],
            &["--delta-t", "fixed", "--no-coverage"],
            &["--delta-t", "leap-seconds", "--utc-tai", "-37"],
        ] {
            assert!(
                matches!(params_from(args), Err(SunMoonError::InvalidParameter(_))),
                "{args:?}"
            );
        }

        assert_eq!(
            params_from(&["--dut1", "0.1"]),
            Err(SunMoonError::InvalidParameter(
                "--dut1 has no effect with --delta-t fixed".into()
            ))
        );
    }

    #[test]
    fn test_builder_validation_still_applies() {
        assert!(params_from(&["--delta-t", "model", "--dut1", "1.5"]).is_err());
        assert!(params_from(&["--delta-t", "model", "--utc-tai", "5"]).is_err());
    }
}
