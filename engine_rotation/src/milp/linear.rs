use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column handle into an [`Ilp`]. Only the `Ilp` that issued it can resolve it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(pub(crate) usize);

impl Var {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Binary,
    Integer,
    Continuous,
}

#[derive(Clone, Debug)]
pub struct VarInfo {
    pub name: String,
    pub kind: VarKind,
    pub lb: f64,
    pub ub: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    pub(crate) terms: BTreeMap<Var, f64>,
    pub(crate) constant: f64,
}

impl LinearExpr {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_const(v: f64) -> Self {
        let mut e = Self::zero();
        e.constant = v;
        e
    }

    pub fn from_var(v: Var, c: f64) -> Self {
        let mut e = Self::zero();
        e.add_term(v, c);
        e
    }

    /// `1 - v`, the complement of a boolean column.
    pub fn not(v: Var) -> Self {
        let mut e = Self::from_const(1.0);
        e.add_term(v, -1.0);
        e
    }

    pub fn sum<I: IntoIterator<Item = Var>>(vars: I) -> Self {
        let mut e = Self::zero();
        for v in vars {
            e.add_term(v, 1.0);
        }
        e
    }

    pub fn add_term(&mut self, v: Var, c: f64) {
        if c == 0.0 {
            return;
        }
        let slot = self.terms.entry(v).or_insert(0.0);
        *slot += c;
        if slot.abs() <= 1e-12 {
            self.terms.remove(&v);
        }
    }

    pub fn add_inplace(&mut self, other: &LinearExpr) {
        self.constant += other.constant;
        for (v, c) in other.terms.iter() {
            self.add_term(*v, *c);
        }
    }

    pub fn sub_inplace(&mut self, other: &LinearExpr) {
        self.constant -= other.constant;
        for (v, c) in other.terms.iter() {
            self.add_term(*v, -*c);
        }
    }

    pub fn add(mut self, other: &LinearExpr) -> LinearExpr {
        self.add_inplace(other);
        self
    }

    pub fn sub(mut self, other: &LinearExpr) -> LinearExpr {
        self.sub_inplace(other);
        self
    }

    pub fn plus_const(mut self, k: f64) -> LinearExpr {
        self.constant += k;
        self
    }

    pub fn scale(&self, k: f64) -> LinearExpr {
        let mut e = Self::from_const(self.constant * k);
        for (v, c) in self.terms.iter() {
            e.add_term(*v, c * k);
        }
        e
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn terms(&self) -> impl Iterator<Item = (Var, f64)> + '_ {
        self.terms.iter().map(|(v, c)| (*v, *c))
    }

    pub fn coefficient(&self, v: Var) -> f64 {
        self.terms.get(&v).copied().unwrap_or(0.0)
    }

    /// Value of the expression under a full column assignment.
    pub fn eval(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, (v, c)| acc + c * values[v.0])
    }
}

impl From<Var> for LinearExpr {
    fn from(v: Var) -> Self {
        LinearExpr::from_var(v, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjSense {
    Minimize,
    Maximize,
}

/// `expr <sense> rhs`, with every constant folded into `rhs`.
#[derive(Clone, Debug)]
pub struct Constraint {
    pub name: String,
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl Constraint {
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.expr.eval(values);
        match self.sense {
            Sense::Le => lhs <= self.rhs + tol,
            Sense::Ge => lhs >= self.rhs - tol,
            Sense::Eq => (lhs - self.rhs).abs() <= tol,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Ilp {
    pub(crate) vars: Vec<VarInfo>,
    pub(crate) objective: LinearExpr,
    pub(crate) sense: ObjSense,
    pub(crate) constraints: Vec<Constraint>,
}

impl Default for Ilp {
    fn default() -> Self {
        Self::new()
    }
}

impl Ilp {
    pub fn new() -> Self {
        Self {
            vars: vec![],
            objective: LinearExpr::zero(),
            sense: ObjSense::Minimize,
            constraints: vec![],
        }
    }

    pub fn add_var(&mut self, name: impl Into<String>, kind: VarKind, lb: f64, ub: f64) -> Var {
        let v = Var(self.vars.len());
        self.vars.push(VarInfo {
            name: sanitize(&name.into()),
            kind,
            lb,
            ub,
        });
        v
    }

    pub fn binary(&mut self, name: impl Into<String>) -> Var {
        self.add_var(name, VarKind::Binary, 0.0, 1.0)
    }

    pub fn integer(&mut self, name: impl Into<String>, lb: f64, ub: f64) -> Var {
        self.add_var(name, VarKind::Integer, lb, ub)
    }

    /// Posts `expr <sense> rhs`. The expression constant moves to the right-hand side.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        sense: Sense,
        rhs: f64,
    ) {
        let mut expr = expr;
        let rhs = rhs - expr.constant;
        expr.constant = 0.0;
        self.constraints.push(Constraint {
            name: sanitize(&name.into()),
            expr,
            sense,
            rhs,
        });
    }

    pub fn le(&mut self, name: impl Into<String>, lhs: LinearExpr, rhs: &LinearExpr) {
        self.add_constraint(name, lhs.sub(rhs), Sense::Le, 0.0);
    }

    pub fn ge(&mut self, name: impl Into<String>, lhs: LinearExpr, rhs: &LinearExpr) {
        self.add_constraint(name, lhs.sub(rhs), Sense::Ge, 0.0);
    }

    pub fn eq(&mut self, name: impl Into<String>, lhs: LinearExpr, rhs: &LinearExpr) {
        self.add_constraint(name, lhs.sub(rhs), Sense::Eq, 0.0);
    }

    pub fn fix(&mut self, name: impl Into<String>, v: Var, value: f64) {
        self.add_constraint(name, LinearExpr::from_var(v, 1.0), Sense::Eq, value);
    }

    pub fn set_objective(&mut self, expr: LinearExpr, sense: ObjSense) {
        self.objective = expr;
        self.sense = sense;
    }

    pub fn vars(&self) -> &[VarInfo] {
        &self.vars
    }

    pub fn var(&self, v: Var) -> &VarInfo {
        &self.vars[v.0]
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn sense(&self) -> ObjSense {
        self.sense
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Smallest and largest value `expr` can take over the column bounds.
    pub fn activity_bounds(&self, expr: &LinearExpr) -> (f64, f64) {
        let mut lo = expr.constant;
        let mut hi = expr.constant;
        for (v, c) in expr.terms() {
            let info = &self.vars[v.0];
            if c > 0.0 {
                lo += c * info.lb;
                hi += c * info.ub;
            } else {
                lo += c * info.ub;
                hi += c * info.lb;
            }
        }
        (lo, hi)
    }
}

/// LP identifiers only allow a conservative character set.
pub(crate) fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
