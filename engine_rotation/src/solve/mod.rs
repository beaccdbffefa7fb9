//! Solver adapters.
//!
//! A backend receives the closed program and a time budget and reports one of
//! four outcomes. Only failures of the backend itself are errors.

mod microlp;
mod scip;

pub use microlp::MicroLpBackend;
pub use scip::{parse_sol, ScipCliBackend, SolFile};

use crate::config::SolverOptions;
use crate::error::SolveError;
use crate::milp::{Ilp, Var};
use crate::model::{FleetModel, Schedule};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// A full column assignment and its objective value.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    values: Vec<f64>,
    objective: f64,
}

impl Solution {
    pub fn new(values: Vec<f64>, objective: f64) -> Self {
        Self { values, objective }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn value(&self, v: Var) -> f64 {
        self.values[v.index()]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal(Solution),
    /// Best incumbent when the budget ran out; not proven optimal.
    Feasible(Solution),
    /// Proven to have no feasible assignment.
    Infeasible,
    /// Budget spent without a solution or a proof of infeasibility.
    NoSolution,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal(s) => write!(f, "Optimal(objective={})", s.objective),
            SolveStatus::Feasible(s) => write!(f, "Feasible(objective={})", s.objective),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::NoSolution => write!(f, "NoSolution"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub elapsed: Duration,
    pub backend: &'static str,
}

impl SolveOutcome {
    pub fn new(status: SolveStatus, elapsed: Duration, backend: &'static str) -> Self {
        Self {
            status,
            elapsed,
            backend,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.status, SolveStatus::Optimal(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.status, SolveStatus::Infeasible)
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        self.solution().is_some()
    }

    pub fn solution(&self) -> Option<&Solution> {
        match &self.status {
            SolveStatus::Optimal(s) | SolveStatus::Feasible(s) => Some(s),
            SolveStatus::Infeasible | SolveStatus::NoSolution => None,
        }
    }

    pub fn objective(&self) -> Option<f64> {
        self.solution().map(Solution::objective)
    }

    /// Decoded timetable, when there is a solution to decode.
    pub fn schedule(&self, model: &FleetModel) -> Option<Schedule> {
        self.solution().map(|s| Schedule::decode(model, s.values()))
    }
}

pub trait SolverBackend {
    fn name(&self) -> &'static str;

    fn solve(&self, ilp: &Ilp, opts: &SolverOptions) -> Result<SolveOutcome, SolveError>;
}

/// Runs `backend` on the model's program and logs the outcome.
pub fn solve_model(
    model: &FleetModel,
    backend: &dyn SolverBackend,
    opts: &SolverOptions,
) -> Result<SolveOutcome, SolveError> {
    let ilp = model.ilp();
    info!(
        backend = backend.name(),
        columns = ilp.num_vars(),
        rows = ilp.num_constraints(),
        time_limit_secs = opts.time_limit_secs,
        "solving fleet model"
    );
    let outcome = backend.solve(ilp, opts)?;
    match &outcome.status {
        SolveStatus::Optimal(s) | SolveStatus::Feasible(s) => info!(
            status = %outcome.status,
            objective = s.objective(),
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "solve finished"
        ),
        SolveStatus::Infeasible => info!(elapsed_ms = outcome.elapsed.as_millis() as u64, "model is infeasible"),
        SolveStatus::NoSolution => warn!(
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "time budget spent without a solution"
        ),
    }
    Ok(outcome)
}
