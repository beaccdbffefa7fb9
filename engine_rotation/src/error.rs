//! Error types for model construction and solving.
//!
//! Infeasibility and an exhausted time budget are solve outcomes, not errors;
//! see [`crate::solve::SolveStatus`].

use std::path::PathBuf;
use thiserror::Error;

/// Rejected input, raised while the model is being built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("engine `{engine}` starts on unknown aircraft `{aircraft}`")]
    UnknownAircraft { engine: String, aircraft: String },
    #[error("horizon of {horizon} periods is shorter than the maintenance duration of {duration}")]
    HorizonTooShort { horizon: usize, duration: usize },
    #[error("engine `{engine}` has negative initial life {life}")]
    NegativeLife { engine: String, life: i64 },
    #[error("engine `{engine}` starts with life {life} above the life cap {cap}")]
    LifeAboveCap { engine: String, life: i64, cap: i64 },
    #[error("parameter `{name}` must be {requirement}, got {value}")]
    InvalidParam {
        name: &'static str,
        requirement: &'static str,
        value: String,
    },
    #[error("duplicate engine id `{0}`")]
    DuplicateEngine(String),
    #[error("duplicate aircraft id `{0}`")]
    DuplicateAircraft(String),
    #[error("{kind} ids `{first}` and `{second}` map to the same LP name `{name}`")]
    NameCollision {
        kind: &'static str,
        first: String,
        second: String,
        name: String,
    },
    #[error("aircraft id `{0}` collides with the pool marker")]
    ReservedAircraftId(String),
    #[error("fixed big-M {configured} is below the {required} required by `{constraint}`")]
    BigMTooSmall {
        constraint: String,
        required: f64,
        configured: f64,
    },
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A candidate plan that does not fit the model it is checked against.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan has {got} engine rows, model has {expected}")]
    EngineCount { expected: usize, got: usize },
    #[error("plan row for engine `{engine}` covers {got} periods, horizon is {expected}")]
    PeriodCount {
        engine: String,
        expected: usize,
        got: usize,
    },
    #[error("plan places engine `{engine}` on aircraft index {index} at period {period}")]
    UnknownAircraft {
        engine: String,
        period: usize,
        index: usize,
    },
}

/// The backend could not produce a model outcome.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("failed to launch solver `{bin}`: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("solver `{bin}` exited with {status}")]
    Exit {
        bin: String,
        status: std::process::ExitStatus,
    },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("solution file reports unrecognised status `{0}`")]
    UnknownStatus(String),
    #[error("model is unbounded")]
    Unbounded,
    #[error("solver backend error: {0}")]
    Backend(String),
    #[error("solver worker thread terminated unexpectedly")]
    WorkerLost,
}

/// Either stage of [`crate::plan_fleet`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Solve(#[from] SolveError),
}
