use crate::milp::{LinearExpr, Sense};
use crate::model::{FleetModel, Position};

impl FleetModel {
    /// Install and removal indicators as ANDs over consecutive periods, plus the
    /// fleet-wide per-period caps.
    pub(crate) fn post_event_rules(&mut self) {
        let n = self.horizon();
        let max_installs = self.roster.params.max_installs_per_period as f64;
        let max_removals = self.roster.params.max_removals_per_period as f64;

        for e in 0..self.num_engines() {
            let id = self.engine_id(e).to_string();
            for t in 1..n {
                let (Some(install), Some(removal)) = (self.install(e, t), self.removal(e, t)) else {
                    continue;
                };
                let was_pool = LinearExpr::from(self.pos(e, t - 1, Position::Pool));
                let was_flying = self.flying(e, t - 1);
                let flying = self.flying(e, t);
                let grounded = LinearExpr::from_const(1.0).sub(&flying);

                self.ilp
                    .and_of(&format!("install_def__{id}__t{t}"), install, &was_pool, &flying);
                self.ilp
                    .and_of(&format!("removal_def__{id}__t{t}"), removal, &was_flying, &grounded);
            }
        }

        for t in 1..n {
            let installs = LinearExpr::sum((0..self.num_engines()).filter_map(|e| self.install(e, t)));
            self.ilp
                .add_constraint(format!("install_capacity__t{t}"), installs, Sense::Le, max_installs);
            let removals = LinearExpr::sum((0..self.num_engines()).filter_map(|e| self.removal(e, t)));
            self.ilp
                .add_constraint(format!("removal_capacity__t{t}"), removals, Sense::Le, max_removals);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{EngineSpec, POOL_MARKER};
    use crate::model::testing::*;
    use crate::model::{FleetModel, Plan, Position};

    #[test]
    fn test_event_indicators_follow_transitions() {
        let m = FleetModel::build(&one_aircraft(12, short_params())).unwrap();
        let values = m.encode_plan(&visit_cycle_plan(&m)).unwrap();
        let at = |v: Option<crate::milp::Var>| values[v.unwrap().index()];
        assert_eq!(at(m.install(2, 8)), 1.0);
        assert_eq!(at(m.removal(0, 8)), 1.0);
        // maintenance to pool is neither
        assert_eq!(at(m.install(0, 10)), 0.0);
        assert_eq!(at(m.removal(0, 10)), 0.0);
        assert_eq!(at(m.removal(1, 8)), 0.0);
    }

    #[test]
    fn test_event_definitions_hold_both_ways() {
        let m = FleetModel::build(&one_aircraft(12, short_params())).unwrap();
        let base = m.encode_plan(&visit_cycle_plan(&m)).unwrap();

        // an install that did not happen
        let mut values = base.clone();
        values[m.install(1, 5).unwrap().index()] = 1.0;
        let v = m.ilp().violations(&values, 1e-6);
        assert!(v.iter().any(|v| v.name() == "install_def__E2__t5__le_a"));

        // a removal that did happen but is not flagged
        let mut values = base;
        values[m.removal(0, 8).unwrap().index()] = 0.0;
        let v = m.ilp().violations(&values, 1e-6);
        assert!(v.iter().any(|v| v.name() == "removal_def__E1__t8__ge"));
    }

    #[test]
    fn test_install_capacity() {
        let mut params = short_params();
        params.max_installs_per_period = 1;
        params.removal_trigger = 1000;
        params.min_stay = 1;
        let mut cfg = one_aircraft(5, params);
        cfg.engines.push(EngineSpec::new("E4", POOL_MARKER, 1000));
        let m = FleetModel::build(&cfg).unwrap();

        let mut plan = Plan::hold_initial(m.roster());
        plan.set(0, 3..5, Position::Pool);
        plan.set(1, 3..5, Position::Pool);
        plan.set(2, 3..5, Position::Aircraft(0));
        plan.set(3, 3..5, Position::Aircraft(0));
        let names: Vec<String> = m
            .ilp()
            .violations(&m.encode_plan(&plan).unwrap(), 1e-6)
            .into_iter()
            .map(|v| v.name().to_string())
            .collect();
        assert_eq!(names, vec!["install_capacity__t3"]);
    }
}
