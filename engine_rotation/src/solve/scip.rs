use crate::config::SolverOptions;
use crate::error::SolveError;
use crate::milp::Ilp;
use crate::solve::{Solution, SolveOutcome, SolveStatus, SolverBackend};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

static RUN_ID: AtomicUsize = AtomicUsize::new(0);

/// Drives an external `scip` executable through its interactive shell.
///
/// The program is written as an LP file, solved under `set limits time`, and
/// read back from the `.sol` file SCIP writes.
#[derive(Clone, Debug)]
pub struct ScipCliBackend {
    pub bin: String,
    /// Where the LP and solution files go.
    pub work_dir: PathBuf,
    pub keep_files: bool,
}

impl Default for ScipCliBackend {
    fn default() -> Self {
        Self {
            bin: std::env::var("SCIP_BIN").unwrap_or_else(|_| "scip".to_string()),
            work_dir: std::env::temp_dir(),
            keep_files: false,
        }
    }
}

impl ScipCliBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    fn script(&self, lp: &Path, sol: &Path, opts: &SolverOptions) -> String {
        let mut cmds = format!("set limits time {}\n", opts.time_limit().as_secs_f64());
        if let Some(n) = opts.threads {
            cmds.push_str(&format!("set lp threads {n}\n"));
        }
        if !opts.verbose {
            cmds.push_str("set display verblevel 0\n");
        }
        cmds.push_str(&format!(
            "read {}\nset write printzeros TRUE\noptimize\nwrite solution {}\nquit\n",
            lp.display(),
            sol.display()
        ));
        cmds
    }

    fn run(&self, lp: &Path, sol: &Path, opts: &SolverOptions) -> Result<String, SolveError> {
        let output = if opts.verbose { Stdio::inherit() } else { Stdio::piped() };
        let mut child = Command::new(&self.bin)
            .stdin(Stdio::piped())
            .stdout(output)
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SolveError::Spawn {
                bin: self.bin.clone(),
                source,
            })?;

        let cmds = self.script(lp, sol, opts);
        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(cmds.as_bytes())
                .map_err(|source| SolveError::Spawn {
                    bin: self.bin.clone(),
                    source,
                })?;
        }

        let out = child.wait_with_output().map_err(|source| SolveError::Spawn {
            bin: self.bin.clone(),
            source,
        })?;
        if !out.status.success() {
            warn!(
                bin = %self.bin,
                status = %out.status,
                stderr = %String::from_utf8_lossy(&out.stderr),
                "scip exited with an error"
            );
            return Err(SolveError::Exit {
                bin: self.bin.clone(),
                status: out.status,
            });
        }

        std::fs::read_to_string(sol).map_err(|source| SolveError::Io {
            path: sol.to_path_buf(),
            source,
        })
    }
}

impl SolverBackend for ScipCliBackend {
    fn name(&self) -> &'static str {
        "scip"
    }

    fn solve(&self, ilp: &Ilp, opts: &SolverOptions) -> Result<SolveOutcome, SolveError> {
        let stem = format!(
            "engine_rotation_{}_{}",
            std::process::id(),
            RUN_ID.fetch_add(1, Ordering::Relaxed)
        );
        let lp = self.work_dir.join(format!("{stem}.lp"));
        let sol = self.work_dir.join(format!("{stem}.sol"));
        ilp.write_lp(&lp).map_err(|source| SolveError::Io {
            path: lp.clone(),
            source,
        })?;
        debug!(lp = %lp.display(), "wrote LP for scip");

        let started = Instant::now();
        let result = self.run(&lp, &sol, opts);
        let elapsed = started.elapsed();
        if !self.keep_files {
            let _ = std::fs::remove_file(&lp);
            let _ = std::fs::remove_file(&sol);
        }

        let status = parse_sol(&result?).into_status(ilp)?;
        Ok(SolveOutcome::new(status, elapsed, self.name()))
    }
}

/// Contents of a SCIP `.sol` file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolFile {
    /// Text after `solution status:`.
    pub status: Option<String>,
    pub objective: Option<f64>,
    pub values: HashMap<String, f64>,
}

impl SolFile {
    /// Maps the SCIP status line onto a [`SolveStatus`].
    ///
    /// Columns missing from the file are zero, which is what SCIP omits
    /// without `printzeros`.
    pub fn into_status(self, ilp: &Ilp) -> Result<SolveStatus, SolveError> {
        let Some(status) = self.status else {
            return Err(SolveError::UnknownStatus(String::new()));
        };
        let lower = status.to_ascii_lowercase();
        let has_solution = self.objective.is_some() && !lower.contains("no solution");
        let solution = || {
            let values: Vec<f64> = ilp
                .vars()
                .iter()
                .map(|v| self.values.get(&v.name).copied().unwrap_or(0.0))
                .collect();
            let objective = ilp.evaluate_objective(&values);
            Solution::new(values, objective)
        };

        if lower.contains("infeasible") {
            Ok(SolveStatus::Infeasible)
        } else if lower.contains("unbounded") {
            Err(SolveError::Unbounded)
        } else if lower.contains("optimal") {
            if has_solution {
                Ok(SolveStatus::Optimal(solution()))
            } else {
                Err(SolveError::UnknownStatus(status))
            }
        } else if ["time limit", "gap limit", "user interrupt", "node limit", "memory limit", "solution limit"]
            .iter()
            .any(|s| lower.contains(s))
        {
            if has_solution {
                Ok(SolveStatus::Feasible(solution()))
            } else {
                Ok(SolveStatus::NoSolution)
            }
        } else {
            Err(SolveError::UnknownStatus(status))
        }
    }
}

/// Parses a SCIP `.sol` file: status line, objective line and `<name> <value>` rows.
pub fn parse_sol(text: &str) -> SolFile {
    let mut sol = SolFile::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("solution status:") {
            sol.status = Some(rest.trim().to_string());
            continue;
        }
        if let Some(rest) = line
            .strip_prefix("objective value:")
            .or_else(|| line.strip_prefix("objective value ="))
        {
            sol.objective = rest.trim().parse().ok();
            continue;
        }
        if line.starts_with("no solution") {
            continue;
        }

        let mut it = line.split_whitespace();
        let Some(name) = it.next() else { continue };
        let Some(val) = it.next() else { continue };
        if let Ok(v) = val.parse::<f64>() {
            sol.values.insert(name.to_string(), v);
        }
    }
    sol
}
