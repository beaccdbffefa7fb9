use crate::error::ConfigError;
use crate::milp::{LinearExpr, Sense};
use crate::model::{FleetModel, Position};

impl FleetModel {
    /// Visit windows: coverage, non-overlap, backing start, origin and capacity.
    ///
    /// Windows that would run past the horizon are truncated to it.
    pub(crate) fn post_maintenance_rules(&mut self) -> Result<(), ConfigError> {
        let n = self.horizon();
        let p = self.roster.params.clone();
        let d = p.maint_duration;

        for e in 0..self.num_engines() {
            let id = self.engine_id(e).to_string();
            let start0 = self.sv_start(e, 0);
            self.ilp.fix(format!("no_visit_at_start__{id}"), start0, 0.0);

            for t in 0..n {
                let start = self.sv_start(e, t);
                let window = t..(t + d).min(n);
                let len = window.len();

                let maint = LinearExpr::sum(window.clone().map(|k| self.pos(e, k, Position::Maintenance)));
                self.ilp.ge(
                    format!("visit_cover__{id}__t{t}"),
                    maint,
                    &LinearExpr::from_var(start, len as f64),
                );

                if len >= 2 {
                    let starts = LinearExpr::sum(window.map(|k| self.sv_start(e, k)));
                    self.ilp
                        .add_constraint(format!("visit_no_overlap__{id}__t{t}"), starts, Sense::Le, 1.0);
                }

                let backing = LinearExpr::sum((t.saturating_sub(d - 1)..=t).map(|k| self.sv_start(e, k)));
                let here = self.pos(e, t, Position::Maintenance);
                self.ilp
                    .le(format!("visit_backed__{id}__t{t}"), here.into(), &backing);

                if t >= 1 {
                    let origin = self
                        .flying(e, t - 1)
                        .add(&self.pos(e, t - 1, Position::Unscheduled).into());
                    self.ilp
                        .le(format!("visit_origin__{id}__t{t}"), start.into(), &origin);

                    if p.enforce_min_life_to_visit {
                        let prev = self.life(e, t - 1);
                        self.ilp.implies_ge(
                            &format!("visit_min_life__{id}__t{t}"),
                            &start.into(),
                            prev.into(),
                            p.min_life_to_visit as f64,
                            p.big_m,
                        )?;
                    }
                }
            }
        }

        for t in 0..n {
            let starts = LinearExpr::sum((0..self.num_engines()).map(|e| self.sv_start(e, t)));
            self.ilp.add_constraint(
                format!("visit_capacity__t{t}"),
                starts,
                Sense::Le,
                p.max_visits_per_period as f64,
            );
        }
        Ok(())
    }
}
