use crate::model::{FleetModel, Position};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// One engine in one period of a decoded solution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period: usize,
    pub position: Position,
    pub state_code: usize,
    /// `POOL`, `AC_<id>`, `US` or `SV`.
    pub label: String,
    pub life: i64,
    pub sv_start: bool,
    pub install: bool,
    pub removal: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineSchedule {
    pub engine: String,
    pub periods: Vec<PeriodRecord>,
}

/// A maintenance visit, `start..end`. `end` is cut at the horizon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub engine: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Install,
    Removal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineEvent {
    pub engine: String,
    pub period: usize,
    pub kind: EventKind,
    /// Aircraft mounted to, or removed from.
    pub aircraft: String,
}

/// Per-engine timetable read back from a column assignment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub horizon: usize,
    pub maint_duration: usize,
    pub aircraft: Vec<String>,
    pub engines: Vec<EngineSchedule>,
}

impl Schedule {
    /// Reads positions, life and indicators of every engine out of `values`.
    ///
    /// Indicators are rounded at one half. A period whose position indicators
    /// are all below one half takes the largest one.
    pub fn decode(model: &FleetModel, values: &[f64]) -> Self {
        let roster = model.roster();
        let num_aircraft = roster.num_aircraft();
        let on = |v: crate::milp::Var| values[v.index()] > 0.5;

        let engines = (0..model.num_engines())
            .map(|e| {
                let periods = (0..model.horizon())
                    .map(|t| {
                        let position = roster
                            .positions()
                            .max_by(|a, b| {
                                let va = values[model.pos(e, t, *a).index()];
                                let vb = values[model.pos(e, t, *b).index()];
                                va.total_cmp(&vb)
                            })
                            .unwrap_or(Position::Pool);
                        PeriodRecord {
                            period: t,
                            position,
                            state_code: position.code(num_aircraft),
                            label: roster.label(position),
                            life: values[model.life(e, t).index()].round() as i64,
                            sv_start: on(model.sv_start(e, t)),
                            install: model.install(e, t).is_some_and(on),
                            removal: model.removal(e, t).is_some_and(on),
                        }
                    })
                    .collect();
                EngineSchedule {
                    engine: model.engine_id(e).to_string(),
                    periods,
                }
            })
            .collect();

        Self {
            horizon: model.horizon(),
            maint_duration: roster.params().maint_duration,
            aircraft: roster.aircraft().to_vec(),
            engines,
        }
    }

    pub fn engine(&self, id: &str) -> Option<&EngineSchedule> {
        self.engines.iter().find(|e| e.engine == id)
    }

    /// Visits in engine order, then by start period.
    pub fn visits(&self) -> Vec<Visit> {
        self.engines
            .iter()
            .flat_map(|e| {
                e.periods.iter().filter(|r| r.sv_start).map(|r| Visit {
                    engine: e.engine.clone(),
                    start: r.period,
                    end: (r.period + self.maint_duration).min(self.horizon),
                })
            })
            .collect()
    }

    /// Installs and removals sorted by period.
    pub fn events(&self) -> Vec<EngineEvent> {
        let mut out = vec![];
        for e in &self.engines {
            for pair in e.periods.windows(2) {
                let (before, now) = (&pair[0], &pair[1]);
                if now.install {
                    out.push(EngineEvent {
                        engine: e.engine.clone(),
                        period: now.period,
                        kind: EventKind::Install,
                        aircraft: self.aircraft_of(now.position),
                    });
                }
                if now.removal {
                    out.push(EngineEvent {
                        engine: e.engine.clone(),
                        period: now.period,
                        kind: EventKind::Removal,
                        aircraft: self.aircraft_of(before.position),
                    });
                }
            }
        }
        out.sort_by_key(|ev| ev.period);
        out
    }

    fn aircraft_of(&self, p: Position) -> String {
        match p {
            Position::Aircraft(a) => self.aircraft.get(a).cloned().unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Engines in the pool, per period (the Line of Balance series).
    pub fn pool_occupancy(&self) -> Vec<usize> {
        (0..self.horizon)
            .map(|t| {
                self.engines
                    .iter()
                    .filter(|e| e.periods[t].position == Position::Pool)
                    .count()
            })
            .collect()
    }

    /// Plain-text table, one line per engine and period, followed by the visit list.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<8} {:>6} {:<10} {:>7}  events", "engine", "period", "position", "life");
        for e in &self.engines {
            for r in &e.periods {
                let mut flags = vec![];
                if r.sv_start {
                    flags.push("sv_start");
                }
                if r.install {
                    flags.push("install");
                }
                if r.removal {
                    flags.push("removal");
                }
                let _ = writeln!(
                    out,
                    "{:<8} {:>6} {:<10} {:>7}  {}",
                    e.engine,
                    r.period,
                    r.label,
                    r.life,
                    flags.join(",")
                );
            }
        }
        let visits = self.visits();
        let _ = writeln!(out, "\nvisits: {}", visits.len());
        for v in visits {
            let _ = writeln!(out, "  {} SV t={}..{}", v.engine, v.start, v.end);
        }
        out
    }
}
