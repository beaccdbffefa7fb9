//! Roster and parameter input.
//!
//! Everything here is plain serde data. Validation happens once, when the
//! model is built (see [`crate::model::Roster::build`]).

use crate::error::ConfigError;
use crate::milp::BigM;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Initial-position marker for an engine that starts as a spare.
pub const POOL_MARKER: &str = "POOL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSpec {
    pub id: String,
    /// [`POOL_MARKER`] or an aircraft id.
    pub initial_position: String,
    pub remaining_life: i64,
}

impl EngineSpec {
    pub fn new(id: impl Into<String>, initial_position: impl Into<String>, remaining_life: i64) -> Self {
        Self {
            id: id.into(),
            initial_position: initial_position.into(),
            remaining_life,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftSpec {
    pub id: String,
}

impl AircraftSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Model constants. Life values are in the same unit as `consumption`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub life_cap: i64,
    /// Life restored the period after a visit completes.
    pub life_reset: i64,
    /// Life charged for each period spent on an aircraft.
    pub consumption: i64,
    /// Periods a visit keeps the engine in maintenance.
    pub maint_duration: usize,
    pub min_life_to_visit: i64,
    /// Gate visit starts on `min_life_to_visit`.
    pub enforce_min_life_to_visit: bool,
    pub max_visits_per_period: usize,
    /// Periods an engine keeps its position after being mounted.
    pub min_stay: usize,
    /// Removal needs the previous period's life at or below this.
    pub removal_trigger: i64,
    pub us_life_ceiling: i64,
    /// How far below zero life may dip.
    pub life_slack: i64,
    pub big_m: BigM,
    pub sv_base_cost: f64,
    pub install_cost: f64,
    pub removal_cost: f64,
    /// Compounding cost growth applied once per `escalation_period` periods.
    pub escalation_rate: f64,
    pub escalation_period: usize,
    pub max_installs_per_period: usize,
    pub max_removals_per_period: usize,
    /// Line of Balance: minimum number of engines in the pool every period.
    pub min_pool_occupancy: Option<usize>,
}

impl Default for Params {
    fn default() -> Self {
        let consumption = 150;
        Self {
            life_cap: 5000,
            life_reset: 5000,
            consumption,
            maint_duration: 4,
            min_life_to_visit: 150,
            enforce_min_life_to_visit: false,
            max_visits_per_period: 2,
            min_stay: 3,
            removal_trigger: 5 * consumption,
            us_life_ceiling: 150,
            life_slack: 100,
            big_m: BigM::Derived,
            sv_base_cost: 1_000_000.0,
            install_cost: 10_000.0,
            removal_cost: 10_000.0,
            escalation_rate: 0.05,
            escalation_period: 12,
            max_installs_per_period: 2,
            max_removals_per_period: 2,
            min_pool_occupancy: None,
        }
    }
}

impl Params {
    /// Cost multiplier for period `t`: `(1 + rate)^(t div escalation_period)`.
    pub fn escalation(&self, t: usize) -> f64 {
        let years = t / self.escalation_period.max(1);
        (1.0 + self.escalation_rate).powi(years as i32)
    }

    pub(crate) fn validate(&self, horizon: usize, num_aircraft: usize) -> Result<(), ConfigError> {
        fn non_negative(name: &'static str, v: i64) -> Result<(), ConfigError> {
            if v < 0 {
                return Err(ConfigError::InvalidParam {
                    name,
                    requirement: "non-negative",
                    value: v.to_string(),
                });
            }
            Ok(())
        }
        fn cost(name: &'static str, v: f64) -> Result<(), ConfigError> {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::InvalidParam {
                    name,
                    requirement: "a finite non-negative number",
                    value: v.to_string(),
                });
            }
            Ok(())
        }

        non_negative("life_cap", self.life_cap)?;
        non_negative("life_reset", self.life_reset)?;
        non_negative("consumption", self.consumption)?;
        non_negative("min_life_to_visit", self.min_life_to_visit)?;
        non_negative("removal_trigger", self.removal_trigger)?;
        non_negative("us_life_ceiling", self.us_life_ceiling)?;
        non_negative("life_slack", self.life_slack)?;
        if self.life_reset > self.life_cap {
            return Err(ConfigError::InvalidParam {
                name: "life_reset",
                requirement: "at most life_cap",
                value: self.life_reset.to_string(),
            });
        }
        if self.maint_duration == 0 {
            return Err(ConfigError::InvalidParam {
                name: "maint_duration",
                requirement: "at least 1",
                value: "0".into(),
            });
        }
        if self.escalation_period == 0 {
            return Err(ConfigError::InvalidParam {
                name: "escalation_period",
                requirement: "at least 1",
                value: "0".into(),
            });
        }
        cost("sv_base_cost", self.sv_base_cost)?;
        cost("install_cost", self.install_cost)?;
        cost("removal_cost", self.removal_cost)?;
        if !self.escalation_rate.is_finite() || self.escalation_rate <= -1.0 {
            return Err(ConfigError::InvalidParam {
                name: "escalation_rate",
                requirement: "finite and above -1",
                value: self.escalation_rate.to_string(),
            });
        }
        if horizon < self.maint_duration {
            return Err(ConfigError::HorizonTooShort {
                horizon,
                duration: self.maint_duration,
            });
        }
        if let BigM::Fixed(m) = self.big_m {
            let required = self.required_big_m(num_aircraft);
            if m.is_nan() || m + 1e-9 < required {
                return Err(ConfigError::BigMTooSmall {
                    constraint: "any conditional row".into(),
                    required,
                    configured: m,
                });
            }
        }
        Ok(())
    }

    /// Largest constant any conditional row of the model can need, computed
    /// from the same column bounds the builder derives its constants from.
    pub fn required_big_m(&self, num_aircraft: usize) -> f64 {
        let low = -self.life_slack;
        let charge = self.consumption * num_aircraft.max(1) as i64;
        [
            // life_evolve_le / life_evolve_ge
            self.life_cap - low + charge,
            self.life_cap - low,
            // life_reset_ge / life_reset_le
            self.life_reset - low,
            self.life_cap - self.life_reset,
            // pool_life_nonneg, us_life_ceiling, removal_trigger
            -low,
            self.life_cap - self.us_life_ceiling,
            self.life_cap - self.removal_trigger,
            // visit_min_life
            self.min_life_to_visit - low,
        ]
        .into_iter()
        .max()
        .unwrap_or(0) as f64
    }
}

/// Solver-independent knobs handed to a [`crate::solve::SolverBackend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Wall-clock budget in seconds. Negative or NaN means no time at all,
    /// values beyond what a `Duration` holds mean no limit.
    ///
    /// Only [`crate::solve::ScipCliBackend`] stops working at the budget.
    /// [`crate::solve::MicroLpBackend`] stops waiting and reports no solution,
    /// but its worker thread runs the search to the end, so retrying after an
    /// expired budget adds another busy thread.
    pub time_limit_secs: f64,
    pub threads: Option<usize>,
    /// Let the backend print its own log.
    pub verbose: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            time_limit_secs: 1000.0,
            threads: None,
            verbose: false,
        }
    }
}

impl SolverOptions {
    pub fn with_time_limit(secs: f64) -> Self {
        Self {
            time_limit_secs: secs,
            ..Self::default()
        }
    }

    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_limit_secs.max(0.0)).unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetConfig {
    pub engines: Vec<EngineSpec>,
    pub aircraft: Vec<AircraftSpec>,
    /// Number of periods, `0..horizon`.
    pub horizon: usize,
    #[serde(default)]
    pub params: Params,
}

impl FleetConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_pretty_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Six engines across two aircraft over 65 periods.
    pub fn demo() -> Self {
        let engines = vec![
            EngineSpec::new("E1", "DEJ", 5000),
            EngineSpec::new("E2", "DEJ", 5000),
            EngineSpec::new("E3", "DVE", 5000),
            EngineSpec::new("E4", "DVE", 5000),
            EngineSpec::new("E5", POOL_MARKER, 5000),
            EngineSpec::new("E6", POOL_MARKER, 5000),
        ];
        Self {
            engines,
            aircraft: vec![AircraftSpec::new("DEJ"), AircraftSpec::new("DVE")],
            horizon: 65,
            params: Params::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_params_fall_back_to_defaults() {
        let cfg = FleetConfig::from_json_str(
            r#"{
                "engines": [{"id": "E1", "initial_position": "POOL", "remaining_life": 5000}],
                "aircraft": [],
                "horizon": 6,
                "params": {"consumption": 0, "big_m": {"fixed": 20000.0}}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.params.consumption, 0);
        assert_eq!(cfg.params.life_cap, 5000);
        assert_eq!(cfg.params.big_m, BigM::Fixed(20000.0));
        assert!(cfg.params.validate(cfg.horizon, 0).is_ok());
    }

    #[test]
    fn test_demo_round_trips_through_json() {
        let cfg = FleetConfig::demo();
        let back = FleetConfig::from_json_str(&cfg.to_pretty_json().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_escalation_compounds_per_year() {
        let p = Params::default();
        assert_eq!(p.escalation(0), 1.0);
        assert_eq!(p.escalation(11), 1.0);
        assert!((p.escalation(12) - 1.05).abs() < 1e-12);
        assert!((p.escalation(30) - 1.05 * 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_short_horizon_and_small_big_m() {
        let p = Params::default();
        assert!(matches!(
            p.validate(3, 2),
            Err(ConfigError::HorizonTooShort { horizon: 3, duration: 4 })
        ));

        let p = Params {
            big_m: BigM::Fixed(5000.0),
            ..Params::default()
        };
        assert!(matches!(p.validate(10, 2), Err(ConfigError::BigMTooSmall { .. })));

        let p = Params {
            big_m: BigM::Fixed(10_000.0),
            ..Params::default()
        };
        assert!(p.validate(10, 2).is_ok());
    }

    #[test]
    fn test_time_limit_saturates_instead_of_panicking() {
        let opts: SolverOptions = serde_json::from_str(r#"{"time_limit_secs": 1e300}"#).unwrap();
        assert_eq!(opts.time_limit(), Duration::MAX);
        assert_eq!(SolverOptions::with_time_limit(f64::INFINITY).time_limit(), Duration::MAX);
        assert_eq!(SolverOptions::with_time_limit(-3.0).time_limit(), Duration::ZERO);
        assert_eq!(SolverOptions::with_time_limit(f64::NAN).time_limit(), Duration::ZERO);
        assert_eq!(SolverOptions::with_time_limit(1.5).time_limit(), Duration::from_millis(1500));
    }

    #[test]
    fn test_validate_rejects_negative_and_inconsistent_params() {
        let p = Params {
            consumption: -1,
            ..Params::default()
        };
        assert!(matches!(
            p.validate(10, 2),
            Err(ConfigError::InvalidParam { name: "consumption", .. })
        ));

        let p = Params {
            life_reset: 6000,
            ..Params::default()
        };
        assert!(matches!(
            p.validate(10, 2),
            Err(ConfigError::InvalidParam { name: "life_reset", .. })
        ));
    }
}
