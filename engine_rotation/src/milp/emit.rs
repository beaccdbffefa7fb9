use crate::milp::linear::{Ilp, LinearExpr, ObjSense, Sense, VarKind};
use std::fmt::Write as _;
use std::path::Path;

/// Terms per physical line; long rows are wrapped so LP readers with line limits accept them.
const TERMS_PER_LINE: usize = 8;

impl Ilp {
    /// CPLEX-LP rendering of the model, readable by SCIP, CBC and HiGHS.
    ///
    /// The objective constant is dropped since it does not move the optimum.
    pub fn to_lp_string(&self) -> String {
        let mut out = String::new();
        match self.sense {
            ObjSense::Minimize => out.push_str("Minimize\n obj: "),
            ObjSense::Maximize => out.push_str("Maximize\n obj: "),
        }
        out.push_str(&self.fmt_lin(&self.objective));
        out.push('\n');

        out.push_str("Subject To\n");
        for c in &self.constraints {
            let _ = writeln!(
                out,
                " {}: {} {} {}",
                c.name,
                self.fmt_lin(&c.expr),
                c.sense.lp_token(),
                fmt_num(c.rhs)
            );
        }

        out.push_str("Bounds\n");
        for v in self.vars.iter().filter(|v| v.kind != VarKind::Binary) {
            let _ = writeln!(out, " {} <= {} <= {}", fmt_bound(v.lb), v.name, fmt_bound(v.ub));
        }

        let generals: Vec<&str> = self
            .vars
            .iter()
            .filter(|v| v.kind == VarKind::Integer)
            .map(|v| v.name.as_str())
            .collect();
        if !generals.is_empty() {
            out.push_str("General\n");
            for g in generals {
                let _ = writeln!(out, " {}", g);
            }
        }

        out.push_str("Binary\n");
        for v in self.vars.iter().filter(|v| v.kind == VarKind::Binary) {
            let _ = writeln!(out, " {}", v.name);
        }
        out.push_str("End\n");
        out
    }

    pub fn write_lp(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_lp_string())
    }

    fn fmt_lin(&self, e: &LinearExpr) -> String {
        let mut parts: Vec<String> = vec![];
        for (v, c) in e.terms() {
            let name = &self.vars[v.0].name;
            if (c - 1.0).abs() < 1e-12 {
                parts.push(format!("+1 {}", name));
            } else if (c + 1.0).abs() < 1e-12 {
                parts.push(format!("-1 {}", name));
            } else {
                parts.push(format!("{} {}", fmt_coef(c), name));
            }
        }
        if parts.is_empty() {
            return "0".to_string();
        }
        parts
            .chunks(TERMS_PER_LINE)
            .map(|chunk| chunk.join(" "))
            .collect::<Vec<_>>()
            .join("\n   ")
    }
}

impl Sense {
    fn lp_token(self) -> &'static str {
        match self {
            Sense::Le => "<=",
            Sense::Ge => ">=",
            Sense::Eq => "=",
        }
    }
}

/// Integral values print without a fraction; `signed` forces a leading `+`.
fn fmt_value(v: f64, signed: bool) -> String {
    let integral = (v - v.round()).abs() < 1e-9;
    match (integral, signed) {
        (true, false) => format!("{}", v.round() as i64),
        (true, true) => format!("{:+}", v.round() as i64),
        (false, false) => format!("{:.6}", v),
        (false, true) => format!("{:+.6}", v),
    }
}

fn fmt_num(v: f64) -> String {
    fmt_value(v, false)
}

fn fmt_coef(v: f64) -> String {
    fmt_value(v, true)
}

fn fmt_bound(v: f64) -> String {
    if v == f64::INFINITY {
        "+inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        fmt_num(v)
    }
}
