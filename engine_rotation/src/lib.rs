//! Engine rotation and maintenance planning as a mixed-integer program.
//!
//! A [`FleetConfig`] is validated into a [`model::Roster`], lowered into a
//! [`FleetModel`] (columns and rows of a flat [`milp::Ilp`]), handed to a
//! [`solve::SolverBackend`] and read back as a [`model::Schedule`].

pub mod config;
pub mod error;
pub mod milp;
pub mod model;
pub mod solve;

pub use config::{AircraftSpec, EngineSpec, FleetConfig, Params, SolverOptions, POOL_MARKER};
pub use error::{ConfigError, Error, PlanError, SolveError};
pub use milp::{BigM, Ilp};
pub use model::{FleetModel, Plan, Position, Schedule};
pub use solve::{MicroLpBackend, ScipCliBackend, SolveOutcome, SolveStatus, SolverBackend};

/// Builds the model for `cfg` and solves it with `backend`.
pub fn plan_fleet(
    cfg: &FleetConfig,
    backend: &dyn SolverBackend,
    opts: &SolverOptions,
) -> Result<(FleetModel, SolveOutcome), Error> {
    let model = FleetModel::build(cfg)?;
    let outcome = solve::solve_model(&model, backend, opts)?;
    Ok((model, outcome))
}
