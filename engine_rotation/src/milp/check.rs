use crate::milp::linear::{Ilp, VarKind};

/// A row or column bound broken by an assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    Row { name: String, lhs: f64, rhs: f64 },
    Bound { name: String, value: f64, lb: f64, ub: f64 },
    Integrality { name: String, value: f64 },
}

impl Violation {
    pub fn name(&self) -> &str {
        match self {
            Violation::Row { name, .. }
            | Violation::Bound { name, .. }
            | Violation::Integrality { name, .. } => name,
        }
    }
}

impl Ilp {
    /// Every row, bound and integrality requirement `values` breaks, in model order.
    ///
    /// `values` is indexed by column; a short slice is a caller bug and panics.
    pub fn violations(&self, values: &[f64], tol: f64) -> Vec<Violation> {
        let mut out = vec![];
        for (info, &value) in self.vars.iter().zip(values) {
            if value < info.lb - tol || value > info.ub + tol {
                out.push(Violation::Bound {
                    name: info.name.clone(),
                    value,
                    lb: info.lb,
                    ub: info.ub,
                });
            }
            if info.kind != VarKind::Continuous && (value - value.round()).abs() > tol {
                out.push(Violation::Integrality {
                    name: info.name.clone(),
                    value,
                });
            }
        }
        for c in &self.constraints {
            if !c.is_satisfied(values, tol) {
                out.push(Violation::Row {
                    name: c.name.clone(),
                    lhs: c.expr.eval(values),
                    rhs: c.rhs,
                });
            }
        }
        out
    }

    pub fn is_feasible(&self, values: &[f64], tol: f64) -> bool {
        values.len() == self.vars.len() && self.violations(values, tol).is_empty()
    }

    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.objective.eval(values)
    }
}
