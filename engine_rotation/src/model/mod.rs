//! The fleet rotation model.
//!
//! Building is two-phase: `declare` creates every column for the
//! whole horizon, then each component posts its rows in dependency order
//! (state, life, maintenance, events, objective). Components only read
//! columns declared in the first phase.

mod events;
mod life;
mod maintenance;
mod objective;
mod plan;
mod position;
#[cfg(test)]
mod properties;
mod roster;
mod schedule;
mod state;

pub use plan::Plan;
pub use position::Position;
pub use roster::{Engine, Roster};
pub use schedule::{EngineEvent, EngineSchedule, EventKind, PeriodRecord, Schedule, Visit};

use crate::config::FleetConfig;
use crate::error::ConfigError;
use crate::milp::{Ilp, LinearExpr, Var};
use tracing::debug;

/// Column handles, indexed `[engine][period]`.
#[derive(Clone, Debug, Default)]
pub(crate) struct Vars {
    /// One indicator per position, `[engine][period][state code]`.
    pos: Vec<Vec<Vec<Var>>>,
    life: Vec<Vec<Var>>,
    sv_start: Vec<Vec<Var>>,
    /// Period 0 has no event columns; slot `t - 1` holds period `t`.
    install: Vec<Vec<Var>>,
    removal: Vec<Vec<Var>>,
}

/// A closed model: the roster it was built from, its column handles and the program.
#[derive(Clone, Debug)]
pub struct FleetModel {
    roster: Roster,
    vars: Vars,
    ilp: Ilp,
}

impl FleetModel {
    pub fn build(cfg: &FleetConfig) -> Result<Self, ConfigError> {
        Self::from_roster(Roster::build(cfg)?)
    }

    pub fn from_roster(roster: Roster) -> Result<Self, ConfigError> {
        let mut model = Self {
            roster,
            vars: Vars::default(),
            ilp: Ilp::new(),
        };
        model.declare();
        debug!(
            engines = model.roster.engines.len(),
            aircraft = model.roster.num_aircraft(),
            horizon = model.roster.horizon,
            columns = model.ilp.num_vars(),
            "declared fleet columns"
        );

        model.post_state_rules();
        model.trace_rows("state transitions");
        model.post_life_rules()?;
        model.trace_rows("life dynamics");
        model.post_maintenance_rules()?;
        model.trace_rows("maintenance windows");
        model.post_event_rules();
        model.trace_rows("install/removal events");
        model.assemble_objective();
        Ok(model)
    }

    fn trace_rows(&self, component: &str) {
        debug!(component, rows = self.ilp.num_constraints(), "posted");
    }

    fn declare(&mut self) {
        let n = self.roster.horizon;
        let params = self.roster.params.clone();
        let positions: Vec<Position> = self.roster.positions().collect();
        let labels: Vec<String> = positions.iter().map(|p| self.roster.label(*p)).collect();

        for e in 0..self.roster.engines.len() {
            let id = self.roster.engines[e].id.clone();
            let mut pos = Vec::with_capacity(n);
            let mut life = Vec::with_capacity(n);
            let mut start = Vec::with_capacity(n);
            let mut install = Vec::with_capacity(n.saturating_sub(1));
            let mut removal = Vec::with_capacity(n.saturating_sub(1));
            for t in 0..n {
                pos.push(
                    labels
                        .iter()
                        .map(|l| self.ilp.binary(format!("pos__{id}__t{t}__{l}")))
                        .collect(),
                );
                life.push(self.ilp.integer(
                    format!("life__{id}__t{t}"),
                    -params.life_slack as f64,
                    params.life_cap as f64,
                ));
                start.push(self.ilp.binary(format!("sv_start__{id}__t{t}")));
                if t > 0 {
                    install.push(self.ilp.binary(format!("install__{id}__t{t}")));
                    removal.push(self.ilp.binary(format!("removal__{id}__t{t}")));
                }
            }
            self.vars.pos.push(pos);
            self.vars.life.push(life);
            self.vars.sv_start.push(start);
            self.vars.install.push(install);
            self.vars.removal.push(removal);
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ilp(&self) -> &Ilp {
        &self.ilp
    }

    pub fn into_ilp(self) -> Ilp {
        self.ilp
    }

    pub fn num_engines(&self) -> usize {
        self.roster.engines.len()
    }

    pub fn horizon(&self) -> usize {
        self.roster.horizon
    }

    /// Indicator of engine `e` being at `p` during period `t`.
    pub fn pos(&self, e: usize, t: usize, p: Position) -> Var {
        self.vars.pos[e][t][p.code(self.roster.num_aircraft())]
    }

    pub fn life(&self, e: usize, t: usize) -> Var {
        self.vars.life[e][t]
    }

    pub fn sv_start(&self, e: usize, t: usize) -> Var {
        self.vars.sv_start[e][t]
    }

    /// End-of-visit indicator: the start `maint_duration` periods earlier, zero before that.
    pub fn sv_end(&self, e: usize, t: usize) -> LinearExpr {
        let d = self.roster.params.maint_duration;
        if t >= d {
            self.vars.sv_start[e][t - d].into()
        } else {
            LinearExpr::zero()
        }
    }

    pub fn install(&self, e: usize, t: usize) -> Option<Var> {
        t.checked_sub(1).map(|i| self.vars.install[e][i])
    }

    pub fn removal(&self, e: usize, t: usize) -> Option<Var> {
        t.checked_sub(1).map(|i| self.vars.removal[e][i])
    }

    /// Sum of the aircraft indicators; one exactly when the engine is mounted.
    pub fn flying(&self, e: usize, t: usize) -> LinearExpr {
        let a = self.roster.num_aircraft();
        LinearExpr::sum(self.vars.pos[e][t][1..=a].iter().copied())
    }

    pub(crate) fn engine_id(&self, e: usize) -> &str {
        &self.roster.engines[e].id
    }

    pub(crate) fn aircraft_id(&self, a: usize) -> &str {
        &self.roster.aircraft[a]
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::config::Params;

    #[test]
    fn test_column_layout() {
        let m = FleetModel::build(&one_aircraft(5, Params::default())).unwrap();
        // per engine and period: 4 positions, life, start; events from period 1
        assert_eq!(m.ilp().num_vars(), 3 * 5 * 6 + 3 * 4 * 2);
        assert_eq!(m.ilp().var(m.pos(0, 2, Position::Aircraft(0))).name, "pos__E1__t2__AC_AC1");
        assert_eq!(m.ilp().var(m.life(2, 4)).name, "life__E3__t4");
        assert!(m.install(0, 0).is_none());
        assert_eq!(m.ilp().var(m.removal(1, 3).unwrap()).name, "removal__E2__t3");
        assert_eq!(m.ilp().var(m.life(0, 0)).lb, -100.0);
    }

    #[test]
    fn test_end_indicator_is_offset_start() {
        let m = FleetModel::build(&one_aircraft(6, Params::default())).unwrap();
        assert!(m.sv_end(0, 3).is_constant());
        assert_eq!(m.sv_end(0, 5), LinearExpr::from(m.sv_start(0, 1)));
    }

    #[test]
    fn test_lp_export_names_rows_by_engine_and_period() {
        let m = FleetModel::build(&one_aircraft(6, short_params())).unwrap();
        let lp = m.ilp().to_lp_string();
        assert!(lp.contains(" init_position__E3: +1 pos__E3__t0__POOL = 1\n"));
        assert!(lp.contains(" life_evolve_ge__E1__t1:"));
        assert!(lp.contains(" aircraft_slots__AC1__t5:"));
        assert!(lp.contains("General\n life__E1__t0\n"));
    }

    #[test]
    fn test_every_column_has_its_own_name() {
        let mut cfg = one_aircraft(6, short_params());
        cfg.engines[0].id = "E-1".into();
        cfg.engines[1].id = "E_2".into();
        let m = FleetModel::build(&cfg).unwrap();
        let names: std::collections::HashSet<&str> =
            m.ilp().vars().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names.len(), m.ilp().num_vars());

        cfg.engines[1].id = "E.1".into();
        assert!(matches!(
            FleetModel::build(&cfg),
            Err(ConfigError::NameCollision { .. })
        ));
    }

    #[test]
    fn test_build_rejects_bad_roster_before_posting() {
        let mut cfg = one_aircraft(6, Params::default());
        cfg.engines[0].initial_position = "AC9".into();
        assert!(matches!(
            FleetModel::build(&cfg),
            Err(ConfigError::UnknownAircraft { .. })
        ));
    }
}
