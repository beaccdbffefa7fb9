//! Linearizations of the logical building blocks used by the fleet model.
//!
//! Operands are affine expressions over boolean columns whose values are
//! known to lie in `{0, 1}`; nothing here checks that.

use crate::error::ConfigError;
use crate::milp::linear::{Ilp, LinearExpr, Sense, Var};
use serde::{Deserialize, Serialize};

/// How the constant of a conditional row is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BigM {
    /// Smallest constant that deactivates the row, taken from the column bounds of that row.
    #[default]
    Derived,
    /// One constant for every conditional row. Rejected when smaller than a row needs.
    Fixed(f64),
}

impl BigM {
    fn resolve(self, row: &str, required: f64) -> Result<f64, ConfigError> {
        match self {
            BigM::Derived => Ok(required),
            BigM::Fixed(m) if m + 1e-9 >= required => Ok(m),
            BigM::Fixed(m) => Err(ConfigError::BigMTooSmall {
                constraint: row.to_string(),
                required,
                configured: m,
            }),
        }
    }
}

/// What a guard expression can still be, given the column bounds.
enum Guard {
    Never,
    Always,
    Conditional,
}

impl Ilp {
    fn guard(&self, when: &LinearExpr) -> Guard {
        let (lo, hi) = self.activity_bounds(when);
        if hi <= 1e-9 {
            Guard::Never
        } else if lo >= 1.0 - 1e-9 {
            Guard::Always
        } else {
            Guard::Conditional
        }
    }

    /// `z = x AND y`: `z <= x`, `z <= y`, `z >= x + y - 1`.
    pub fn and_of(&mut self, name: &str, z: Var, x: &LinearExpr, y: &LinearExpr) {
        self.le(format!("{name}__le_a"), z.into(), x);
        self.le(format!("{name}__le_b"), z.into(), y);
        let both = x.clone().add(y).plus_const(-1.0);
        self.ge(format!("{name}__ge"), z.into(), &both);
    }

    /// `a + b <= 1`.
    pub fn at_most_one(&mut self, name: impl Into<String>, a: &LinearExpr, b: &LinearExpr) {
        self.add_constraint(name, a.clone().add(b), Sense::Le, 1.0);
    }

    /// `when = 1  =>  expr <= rhs`, posted as `expr <= rhs + M * (1 - when)`.
    ///
    /// Returns whether a row was posted; a row the bounds already imply is skipped.
    pub fn implies_le(
        &mut self,
        name: &str,
        when: &LinearExpr,
        expr: LinearExpr,
        rhs: f64,
        big_m: BigM,
    ) -> Result<bool, ConfigError> {
        let (_, hi) = self.activity_bounds(&expr);
        let required = hi - rhs;
        if required <= 1e-9 {
            return Ok(false);
        }
        match self.guard(when) {
            Guard::Never => Ok(false),
            Guard::Always => {
                self.add_constraint(name, expr, Sense::Le, rhs);
                Ok(true)
            }
            Guard::Conditional => {
                let m = big_m.resolve(name, required)?;
                let row = expr.add(&when.scale(m));
                self.add_constraint(name, row, Sense::Le, rhs + m);
                Ok(true)
            }
        }
    }

    /// `when = 1  =>  expr >= rhs`, posted as `expr >= rhs - M * (1 - when)`.
    pub fn implies_ge(
        &mut self,
        name: &str,
        when: &LinearExpr,
        expr: LinearExpr,
        rhs: f64,
        big_m: BigM,
    ) -> Result<bool, ConfigError> {
        let (lo, _) = self.activity_bounds(&expr);
        let required = rhs - lo;
        if required <= 1e-9 {
            return Ok(false);
        }
        match self.guard(when) {
            Guard::Never => Ok(false),
            Guard::Always => {
                self.add_constraint(name, expr, Sense::Ge, rhs);
                Ok(true)
            }
            Guard::Conditional => {
                let m = big_m.resolve(name, required)?;
                let row = expr.sub(&when.scale(m));
                self.add_constraint(name, row, Sense::Ge, rhs - m);
                Ok(true)
            }
        }
    }
}
