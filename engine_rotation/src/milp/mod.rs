//! Flat mixed-integer program: columns, rows, objective, LP export and assignment checks.

mod check;
mod emit;
mod linear;
mod logic;

pub(crate) use linear::sanitize;
pub use check::Violation;
pub use linear::{Constraint, Ilp, LinearExpr, ObjSense, Sense, Var, VarInfo, VarKind};
pub use logic::BigM;
