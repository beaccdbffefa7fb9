use crate::error::PlanError;
use crate::model::{FleetModel, Position, Roster};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A hand-made timetable: one position per engine and period, in roster order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub positions: Vec<Vec<Position>>,
}

impl Plan {
    pub fn new(positions: Vec<Vec<Position>>) -> Self {
        Self { positions }
    }

    /// Every engine stays where it starts for the whole horizon.
    pub fn hold_initial(roster: &Roster) -> Self {
        let positions = roster
            .engines()
            .iter()
            .map(|e| vec![e.initial; roster.horizon()])
            .collect();
        Self { positions }
    }

    /// Puts `engine` at `position` for `periods`, clamped to the plan length.
    pub fn set(&mut self, engine: usize, periods: Range<usize>, position: Position) {
        let row = &mut self.positions[engine];
        let end = periods.end.min(row.len());
        for slot in &mut row[periods.start.min(end)..end] {
            *slot = position;
        }
    }
}

impl FleetModel {
    /// Full column assignment implied by `plan`.
    ///
    /// Visit starts are read off maintenance runs (a run longer than the visit
    /// duration is back-to-back visits), life is simulated from the initial
    /// value, and events follow from adjacent positions. The result can be
    /// checked with [`crate::milp::Ilp::violations`] or priced with
    /// [`FleetModel::cost_of`].
    pub fn encode_plan(&self, plan: &Plan) -> Result<Vec<f64>, PlanError> {
        let n = self.horizon();
        let num_aircraft = self.roster.num_aircraft();
        if plan.positions.len() != self.num_engines() {
            return Err(PlanError::EngineCount {
                expected: self.num_engines(),
                got: plan.positions.len(),
            });
        }

        let p = &self.roster.params;
        let d = p.maint_duration;
        let mut values = vec![0.0; self.ilp.num_vars()];

        for (e, row) in plan.positions.iter().enumerate() {
            let id = self.engine_id(e);
            if row.len() != n {
                return Err(PlanError::PeriodCount {
                    engine: id.to_string(),
                    expected: n,
                    got: row.len(),
                });
            }
            if let Some((period, index)) = row.iter().enumerate().find_map(|(t, pos)| match pos {
                Position::Aircraft(a) if *a >= num_aircraft => Some((t, *a)),
                _ => None,
            }) {
                return Err(PlanError::UnknownAircraft {
                    engine: id.to_string(),
                    period,
                    index,
                });
            }

            let mut starts = vec![false; n];
            let mut run = 0;
            for (t, pos) in row.iter().enumerate() {
                if *pos == Position::Maintenance {
                    starts[t] = run % d == 0;
                    run += 1;
                } else {
                    run = 0;
                }
            }

            let mut life = self.roster.engines[e].initial_life;
            for t in 0..n {
                if t > 0 {
                    life = if t >= d && starts[t - d] {
                        p.life_reset
                    } else if row[t - 1].is_mounted() {
                        life - p.consumption
                    } else {
                        life
                    };
                }
                values[self.pos(e, t, row[t]).index()] = 1.0;
                values[self.life(e, t).index()] = life as f64;
                if starts[t] {
                    values[self.sv_start(e, t).index()] = 1.0;
                }
                if let (Some(install), Some(removal)) = (self.install(e, t), self.removal(e, t)) {
                    let (before, now) = (row[t - 1], row[t]);
                    if before == Position::Pool && now.is_mounted() {
                        values[install.index()] = 1.0;
                    }
                    if before.is_mounted() && !now.is_mounted() {
                        values[removal.index()] = 1.0;
                    }
                }
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::*;

    #[test]
    fn test_shape_errors() {
        let m = FleetModel::build(&one_aircraft(5, short_params())).unwrap();
        let mut plan = Plan::hold_initial(m.roster());
        plan.positions.pop();
        assert!(matches!(
            m.encode_plan(&plan),
            Err(PlanError::EngineCount { expected: 3, got: 2 })
        ));

        let mut plan = Plan::hold_initial(m.roster());
        plan.positions[1].push(Position::Pool);
        assert!(matches!(
            m.encode_plan(&plan),
            Err(PlanError::PeriodCount { got: 6, .. })
        ));

        let mut plan = Plan::hold_initial(m.roster());
        plan.set(2, 3..5, Position::Aircraft(4));
        assert!(matches!(
            m.encode_plan(&plan),
            Err(PlanError::UnknownAircraft { period: 3, index: 4, .. })
        ));
    }

    #[test]
    fn test_long_maintenance_run_is_back_to_back_visits() {
        let m = FleetModel::build(&one_aircraft(10, short_params())).unwrap();
        let mut plan = Plan::hold_initial(m.roster());
        plan.set(2, 1..2, Position::Unscheduled);
        plan.set(2, 2..7, Position::Maintenance);
        let values = m.encode_plan(&plan).unwrap();
        let starts: Vec<usize> = (0..10)
            .filter(|t| values[m.sv_start(2, *t).index()] == 1.0)
            .collect();
        assert_eq!(starts, vec![2, 4, 6]);
    }

    #[test]
    fn test_set_clamps_to_horizon() {
        let m = FleetModel::build(&one_aircraft(4, short_params())).unwrap();
        let mut plan = Plan::hold_initial(m.roster());
        plan.set(0, 2..99, Position::Pool);
        plan.set(1, 7..9, Position::Pool);
        assert_eq!(plan.positions[0][3], Position::Pool);
        assert_eq!(plan.positions[1], vec![Position::Aircraft(0); 4]);
    }
}
