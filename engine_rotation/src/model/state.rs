use crate::milp::{LinearExpr, Sense};
use crate::model::{FleetModel, Position};

/// Mounted engines each aircraft carries in every period.
const ENGINES_PER_AIRCRAFT: usize = 2;

impl FleetModel {
    /// Position exclusivity, initial anchor, slot demand, minimum stay,
    /// forbidden one-step moves and the optional Line of Balance.
    pub(crate) fn post_state_rules(&mut self) {
        let n = self.horizon();
        let num_aircraft = self.roster.num_aircraft();
        let min_stay = self.roster.params.min_stay;

        for e in 0..self.num_engines() {
            let id = self.engine_id(e).to_string();
            let start = self.roster.engines[e].clone();

            for t in 0..n {
                let all = LinearExpr::sum(self.vars.pos[e][t].iter().copied());
                self.ilp
                    .add_constraint(format!("one_position__{id}__t{t}"), all, Sense::Eq, 1.0);
            }

            let anchor = self.pos(e, 0, start.initial);
            self.ilp.fix(format!("init_position__{id}"), anchor, 1.0);
            let life0 = self.life(e, 0);
            self.ilp
                .fix(format!("init_life__{id}"), life0, start.initial_life as f64);

            // mounted at period 0: hold the slot for the first stay window
            if start.initial.is_mounted() {
                for k in (1..=min_stay).filter(|k| *k < n) {
                    let v = self.pos(e, k, start.initial);
                    self.ilp.fix(format!("min_stay_init__{id}__t{k}"), v, 1.0);
                }
            }

            for t in 1..n {
                let Some(install) = self.install(e, t) else {
                    continue;
                };
                for k in (1..=min_stay).filter(|k| t + k < n) {
                    for a in 0..num_aircraft {
                        let now = self.pos(e, t, Position::Aircraft(a));
                        let later = self.pos(e, t + k, Position::Aircraft(a));
                        // install[t] and pos[t] = a  =>  pos[t+k] = a
                        let premise = LinearExpr::sum([now, install]).plus_const(-1.0);
                        let ac = self.aircraft_id(a).to_string();
                        self.ilp.ge(
                            format!("min_stay__{id}__t{t}__k{k}__{ac}"),
                            later.into(),
                            &premise,
                        );
                    }
                }
            }

            for t in 1..n {
                for a1 in 0..num_aircraft {
                    for a2 in (0..num_aircraft).filter(|a2| *a2 != a1) {
                        let before = LinearExpr::from(self.pos(e, t - 1, Position::Aircraft(a1)));
                        let after = LinearExpr::from(self.pos(e, t, Position::Aircraft(a2)));
                        let name = format!(
                            "no_swap__{id}__t{t}__{}__{}",
                            self.aircraft_id(a1),
                            self.aircraft_id(a2)
                        );
                        self.ilp.at_most_one(name, &before, &after);
                    }
                }
                for a in 0..num_aircraft {
                    let before = LinearExpr::from(self.pos(e, t - 1, Position::Unscheduled));
                    let after = LinearExpr::from(self.pos(e, t, Position::Aircraft(a)));
                    let name = format!("no_us_mount__{id}__t{t}__{}", self.aircraft_id(a));
                    self.ilp.at_most_one(name, &before, &after);
                }
            }
        }

        for t in 0..n {
            for a in 0..num_aircraft {
                let mounted = LinearExpr::sum(
                    (0..self.num_engines()).map(|e| self.pos(e, t, Position::Aircraft(a))),
                );
                let name = format!("aircraft_slots__{}__t{t}", self.aircraft_id(a));
                self.ilp
                    .add_constraint(name, mounted, Sense::Eq, ENGINES_PER_AIRCRAFT as f64);
            }
        }

        if let Some(min_pool) = self.roster.params.min_pool_occupancy {
            for t in 0..n {
                let spares =
                    LinearExpr::sum((0..self.num_engines()).map(|e| self.pos(e, t, Position::Pool)));
                self.ilp.add_constraint(
                    format!("line_of_balance__t{t}"),
                    spares,
                    Sense::Ge,
                    min_pool as f64,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{AircraftSpec, EngineSpec, FleetConfig, Params, POOL_MARKER};
    use crate::model::testing::*;
    use crate::model::{FleetModel, Plan, Position};

    fn violated(m: &FleetModel, plan: &Plan) -> Vec<String> {
        let values = m.encode_plan(plan).unwrap();
        m.ilp()
            .violations(&values, 1e-6)
            .into_iter()
            .map(|v| v.name().to_string())
            .collect()
    }

    fn two_aircraft(horizon: usize) -> FleetConfig {
        FleetConfig {
            engines: vec![
                EngineSpec::new("E1", "A", 5000),
                EngineSpec::new("E2", "A", 5000),
                EngineSpec::new("E3", "B", 5000),
                EngineSpec::new("E4", "B", 5000),
                EngineSpec::new("E5", POOL_MARKER, 5000),
            ],
            aircraft: vec![AircraftSpec::new("A"), AircraftSpec::new("B")],
            horizon,
            params: Params {
                min_stay: 1,
                ..Params::default()
            },
        }
    }

    #[test]
    fn test_holding_initial_positions_passes_state_rows() {
        let m = FleetModel::build(&one_aircraft(5, short_params())).unwrap();
        assert!(violated(&m, &Plan::hold_initial(m.roster())).is_empty());
    }

    #[test]
    fn test_missing_engine_on_aircraft_breaks_slot_demand() {
        let m = FleetModel::build(&one_aircraft(4, short_params())).unwrap();
        let mut plan = Plan::hold_initial(m.roster());
        plan.positions[2] = vec![Position::Pool; 4];
        plan.positions[1][3] = Position::Pool;
        let v = violated(&m, &plan);
        assert!(v.contains(&"aircraft_slots__AC1__t3".to_string()), "{v:?}");
    }

    #[test]
    fn test_initial_mount_must_stay() {
        let m = FleetModel::build(&one_aircraft(6, short_params())).unwrap();
        let mut plan = Plan::hold_initial(m.roster());
        // swap E1 out for the spare at period 2, inside the stay window
        for t in 2..6 {
            plan.positions[0][t] = Position::Pool;
            plan.positions[2][t] = Position::Aircraft(0);
        }
        let v = violated(&m, &plan);
        assert!(v.contains(&"min_stay_init__E1__t2".to_string()), "{v:?}");
    }

    #[test]
    fn test_installed_engine_must_stay() {
        let mut params = short_params();
        params.removal_trigger = 1000;
        let m = FleetModel::build(&one_aircraft(7, params)).unwrap();
        let mut plan = Plan::hold_initial(m.roster());
        // E3 replaces E1 at t=3 and leaves again at t=4
        plan.positions[0][3] = Position::Pool;
        plan.positions[2][3] = Position::Aircraft(0);
        let v = violated(&m, &plan);
        assert!(v.contains(&"min_stay__E3__t3__k1__AC1".to_string()), "{v:?}");

        // staying through the window clears every stay row
        for t in 3..7 {
            plan.positions[0][t] = Position::Pool;
            plan.positions[2][t] = Position::Aircraft(0);
        }
        let v = violated(&m, &plan);
        assert!(v.iter().all(|n| !n.starts_with("min_stay")), "{v:?}");
    }

    #[test]
    fn test_aircraft_to_aircraft_swap_is_forbidden() {
        let m = FleetModel::build(&two_aircraft(4)).unwrap();
        let mut plan = Plan::hold_initial(m.roster());
        // E2 moves from A to B and E3 from B to A in one step
        for t in 2..4 {
            plan.positions[1][t] = Position::Aircraft(1);
            plan.positions[2][t] = Position::Aircraft(0);
        }
        let v = violated(&m, &plan);
        assert!(v.contains(&"no_swap__E2__t2__A__B".to_string()), "{v:?}");
        assert!(v.contains(&"no_swap__E3__t2__B__A".to_string()), "{v:?}");
        assert!(v.iter().all(|n| !n.starts_with("aircraft_slots")), "{v:?}");
    }

    #[test]
    fn test_us_to_aircraft_is_forbidden() {
        let mut params = short_params();
        params.us_life_ceiling = 1000;
        params.removal_trigger = 1000;
        let m = FleetModel::build(&one_aircraft(6, params)).unwrap();
        let mut plan = Plan::hold_initial(m.roster());
        plan.positions[2][1] = Position::Unscheduled;
        plan.positions[2][2] = Position::Unscheduled;
        for t in 3..6 {
            plan.positions[2][t] = Position::Aircraft(0);
            plan.positions[0][t] = Position::Pool;
        }
        let v = violated(&m, &plan);
        assert!(v.contains(&"no_us_mount__E3__t3__AC1".to_string()), "{v:?}");
    }

    #[test]
    fn test_line_of_balance_only_when_configured() {
        let m = FleetModel::build(&one_aircraft(4, short_params())).unwrap();
        assert!(m
            .ilp()
            .constraints()
            .iter()
            .all(|c| !c.name.starts_with("line_of_balance")));

        let mut params = short_params();
        params.min_pool_occupancy = Some(2);
        let m = FleetModel::build(&one_aircraft(4, params)).unwrap();
        let v = violated(&m, &Plan::hold_initial(m.roster()));
        assert_eq!(v.len(), 4, "{v:?}");
        assert!(v.iter().all(|n| n.starts_with("line_of_balance")));
    }
}
