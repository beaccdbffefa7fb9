//! Checker properties over arbitrary timetables.

use crate::config::{AircraftSpec, EngineSpec, FleetConfig, POOL_MARKER};
use crate::model::testing::short_params;
use crate::model::{FleetModel, Plan, Position, Schedule};
use proptest::prelude::*;

const HORIZON: usize = 8;
const ENGINES: usize = 5;
const AIRCRAFT: usize = 2;

fn model() -> FleetModel {
    let mut params = short_params();
    params.min_stay = 1;
    let cfg = FleetConfig {
        engines: vec![
            EngineSpec::new("E1", "A", 1000),
            EngineSpec::new("E2", "A", 1000),
            EngineSpec::new("E3", "B", 1000),
            EngineSpec::new("E4", "B", 1000),
            EngineSpec::new("E5", POOL_MARKER, 1000),
        ],
        aircraft: vec![AircraftSpec::new("A"), AircraftSpec::new("B")],
        horizon: HORIZON,
        params,
    };
    FleetModel::build(&cfg).expect("valid fleet")
}

fn plans() -> impl Strategy<Value = Plan> {
    let code = 0..Position::count(AIRCRAFT);
    prop::collection::vec(prop::collection::vec(code, HORIZON), ENGINES).prop_map(|rows| {
        Plan::new(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|c| Position::from_code(c, AIRCRAFT).unwrap_or(Position::Pool))
                        .collect()
                })
                .collect(),
        )
    })
}

fn violated(m: &FleetModel, plan: &Plan) -> Vec<String> {
    let values = m.encode_plan(plan).expect("plan fits the model");
    m.ilp()
        .violations(&values, 1e-6)
        .into_iter()
        .map(|v| v.name().to_string())
        .collect()
}

fn any_step(plan: &Plan, bad: impl Fn(Position, Position) -> bool) -> bool {
    plan.positions
        .iter()
        .any(|row| row.windows(2).any(|w| bad(w[0], w[1])))
}

proptest! {
    #[test]
    fn prop_derived_columns_satisfy_their_definitions(plan in plans()) {
        let m = model();
        let v = violated(&m, &plan);
        let derived = [
            "one_position", "install_def", "removal_def", "life_evolve", "life_reset",
            "visit_no_overlap", "visit_backed",
        ];
        for name in &v {
            prop_assert!(!derived.iter().any(|d| name.starts_with(d)), "{name}");
        }
    }

    #[test]
    fn prop_swaps_are_always_caught(plan in plans()) {
        let m = model();
        let v = violated(&m, &plan);
        let swap = any_step(&plan, |a, b| matches!((a, b), (Position::Aircraft(x), Position::Aircraft(y)) if x != y));
        prop_assert_eq!(swap, v.iter().any(|n| n.starts_with("no_swap")));
        let us_mount = any_step(&plan, |a, b| a == Position::Unscheduled && b.is_mounted());
        prop_assert_eq!(us_mount, v.iter().any(|n| n.starts_with("no_us_mount")));
    }

    #[test]
    fn prop_slot_rows_match_mount_counts(plan in plans()) {
        let m = model();
        let v = violated(&m, &plan);
        let short = (0..HORIZON).any(|t| {
            (0..AIRCRAFT).any(|a| {
                plan.positions.iter().filter(|row| row[t] == Position::Aircraft(a)).count() != 2
            })
        });
        prop_assert_eq!(short, v.iter().any(|n| n.starts_with("aircraft_slots")));
    }

    #[test]
    fn prop_decoded_plan_prices_like_the_objective(plan in plans()) {
        let m = model();
        let values = m.encode_plan(&plan).expect("plan fits the model");
        let schedule = Schedule::decode(&m, &values);
        for (row, engine) in plan.positions.iter().zip(&schedule.engines) {
            let decoded: Vec<Position> = engine.periods.iter().map(|r| r.position).collect();
            prop_assert_eq!(row, &decoded);
        }

        let p = m.roster().params();
        let by_hand: f64 = schedule.visits().iter().map(|v| p.escalation(v.start) * p.sv_base_cost).sum::<f64>()
            + schedule.events().iter().map(|e| {
                let unit = match e.kind {
                    crate::model::EventKind::Install => p.install_cost,
                    crate::model::EventKind::Removal => p.removal_cost,
                };
                p.escalation(e.period) * unit
            }).sum::<f64>();
        prop_assert!((m.cost_of(&values) - by_hand).abs() < 1e-6);
    }
}
