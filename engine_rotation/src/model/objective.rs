use crate::milp::{LinearExpr, ObjSense};
use crate::model::FleetModel;

impl FleetModel {
    /// Escalated visit, install and removal cost. Events only exist from period 1.
    pub(crate) fn assemble_objective(&mut self) {
        let p = &self.roster.params;
        let mut obj = LinearExpr::zero();
        for e in 0..self.num_engines() {
            for t in 0..self.horizon() {
                let f = p.escalation(t);
                obj.add_term(self.sv_start(e, t), f * p.sv_base_cost);
                if let Some(install) = self.install(e, t) {
                    obj.add_term(install, f * p.install_cost);
                }
                if let Some(removal) = self.removal(e, t) {
                    obj.add_term(removal, f * p.removal_cost);
                }
            }
        }
        self.ilp.set_objective(obj, ObjSense::Minimize);
    }

    /// Objective value of an assignment.
    pub fn cost_of(&self, values: &[f64]) -> f64 {
        self.ilp.evaluate_objective(values)
    }
}
