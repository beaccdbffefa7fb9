use crate::config::SolverOptions;
use crate::error::SolveError;
use crate::milp::{Ilp, LinearExpr, ObjSense, Sense, VarKind};
use crate::solve::{Solution, SolveOutcome, SolveStatus, SolverBackend};
use good_lp::{
    default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution as _,
    SolverModel, Variable,
};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;
use tracing::{debug, warn};

/// Pure-Rust branch and bound through `good_lp`.
///
/// The solve runs on a worker thread so the caller can stop waiting once the
/// budget is spent. microlp keeps no incumbent to hand back, so an expired
/// budget is always [`SolveStatus::NoSolution`]; the worker is detached and
/// finishes on its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct MicroLpBackend;

impl SolverBackend for MicroLpBackend {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, ilp: &Ilp, opts: &SolverOptions) -> Result<SolveOutcome, SolveError> {
        if opts.threads.is_some() {
            debug!("microlp is single-threaded, ignoring thread count");
        }
        let job = ilp.clone();
        let (tx, rx) = mpsc::channel();
        let started = Instant::now();
        thread::Builder::new()
            .name("microlp-solve".into())
            .spawn(move || {
                let _ = tx.send(run_job(&job));
            })
            .map_err(|e| SolveError::Backend(format!("failed to start solver thread: {e}")))?;

        let status = match rx.recv_timeout(opts.time_limit()) {
            Ok(result) => result?,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    time_limit_secs = opts.time_limit_secs,
                    "microlp did not finish within the budget"
                );
                SolveStatus::NoSolution
            }
            Err(RecvTimeoutError::Disconnected) => return Err(SolveError::WorkerLost),
        };
        Ok(SolveOutcome::new(status, started.elapsed(), self.name()))
    }
}

fn expression(expr: &LinearExpr, cols: &[Variable]) -> Expression {
    expr.terms()
        .fold(Expression::from(expr.constant()), |acc, (v, c)| acc + c * cols[v.index()])
}

fn run_job(ilp: &Ilp) -> Result<SolveStatus, SolveError> {
    let mut vars = ProblemVariables::new();
    let cols: Vec<Variable> = ilp
        .vars()
        .iter()
        .map(|info| {
            let def = variable().name(info.name.clone());
            let def = match info.kind {
                VarKind::Binary => def.binary(),
                VarKind::Integer => def.integer().min(info.lb).max(info.ub),
                VarKind::Continuous => def.min(info.lb).max(info.ub),
            };
            vars.add(def)
        })
        .collect();

    let objective = expression(ilp.objective(), &cols);
    let mut problem = match ilp.sense() {
        ObjSense::Minimize => vars.minimise(objective),
        ObjSense::Maximize => vars.maximise(objective),
    }
    .using(default_solver);

    for c in ilp.constraints() {
        let lhs = expression(&c.expr, &cols);
        let row = match c.sense {
            Sense::Le => lhs.leq(c.rhs),
            Sense::Ge => lhs.geq(c.rhs),
            Sense::Eq => lhs.eq(c.rhs),
        };
        problem.add_constraint(row);
    }

    match problem.solve() {
        Ok(solution) => {
            let values: Vec<f64> = cols.iter().map(|v| solution.value(*v)).collect();
            let objective = ilp.evaluate_objective(&values);
            Ok(SolveStatus::Optimal(Solution::new(values, objective)))
        }
        Err(ResolutionError::Infeasible) => Ok(SolveStatus::Infeasible),
        Err(ResolutionError::Unbounded) => Err(SolveError::Unbounded),
        Err(e) => Err(SolveError::Backend(e.to_string())),
    }
}
