use crate::error::ConfigError;
use crate::milp::LinearExpr;
use crate::model::{FleetModel, Position};

impl FleetModel {
    /// Consumption while flying, reset one period after a visit ends, and the
    /// position-dependent life limits.
    pub(crate) fn post_life_rules(&mut self) -> Result<(), ConfigError> {
        let n = self.horizon();
        let p = self.roster.params.clone();

        for e in 0..self.num_engines() {
            let id = self.engine_id(e).to_string();

            for t in 0..n.saturating_sub(1) {
                let next = t + 1;
                let end = self.sv_end(e, next);
                let running = LinearExpr::from_const(1.0).sub(&end);

                // life[t+1] - life[t] + c * flying[t]
                let delta = LinearExpr::from(self.life(e, next))
                    .sub(&self.life(e, t).into())
                    .add(&self.flying(e, t).scale(p.consumption as f64));
                self.ilp.implies_le(
                    &format!("life_evolve_le__{id}__t{next}"),
                    &running,
                    delta.clone(),
                    0.0,
                    p.big_m,
                )?;
                self.ilp.implies_ge(
                    &format!("life_evolve_ge__{id}__t{next}"),
                    &running,
                    delta,
                    0.0,
                    p.big_m,
                )?;

                let reset = self.life(e, next);
                self.ilp.implies_ge(
                    &format!("life_reset_ge__{id}__t{next}"),
                    &end,
                    reset.into(),
                    p.life_reset as f64,
                    p.big_m,
                )?;
                self.ilp.implies_le(
                    &format!("life_reset_le__{id}__t{next}"),
                    &end,
                    reset.into(),
                    p.life_reset as f64,
                    p.big_m,
                )?;
            }

            for t in 0..n {
                let life = self.life(e, t);
                let pool = self.pos(e, t, Position::Pool);
                self.ilp.implies_ge(
                    &format!("pool_life_nonneg__{id}__t{t}"),
                    &pool.into(),
                    life.into(),
                    0.0,
                    p.big_m,
                )?;
                let us = self.pos(e, t, Position::Unscheduled);
                self.ilp.implies_le(
                    &format!("us_life_ceiling__{id}__t{t}"),
                    &us.into(),
                    life.into(),
                    p.us_life_ceiling as f64,
                    p.big_m,
                )?;
            }

            for t in 1..n {
                let Some(removal) = self.removal(e, t) else {
                    continue;
                };
                let prev = self.life(e, t - 1);
                self.ilp.implies_le(
                    &format!("removal_trigger__{id}__t{t}"),
                    &removal.into(),
                    prev.into(),
                    p.removal_trigger as f64,
                    p.big_m,
                )?;
            }
        }
        Ok(())
    }
}
