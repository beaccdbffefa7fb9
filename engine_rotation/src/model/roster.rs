use crate::config::{FleetConfig, Params, POOL_MARKER};
use crate::error::ConfigError;
use crate::milp::sanitize;
use crate::model::position::Position;
use std::collections::{HashMap, HashSet};

/// An engine with its start position resolved against the aircraft list.
#[derive(Clone, Debug, PartialEq)]
pub struct Engine {
    pub id: String,
    pub initial: Position,
    pub initial_life: i64,
}

/// Validated build-time environment: roster, horizon and constants.
#[derive(Clone, Debug)]
pub struct Roster {
    pub(crate) engines: Vec<Engine>,
    pub(crate) aircraft: Vec<String>,
    /// aircraft id -> roster index
    pub(crate) aircraft_index: HashMap<String, usize>,
    pub(crate) horizon: usize,
    pub(crate) params: Params,
}

impl Roster {
    /// Resolves and checks a configuration. Nothing is declared on failure.
    pub fn build(cfg: &FleetConfig) -> Result<Self, ConfigError> {
        cfg.params.validate(cfg.horizon, cfg.aircraft.len())?;

        let mut aircraft_index = HashMap::new();
        for (i, a) in cfg.aircraft.iter().enumerate() {
            if a.id == POOL_MARKER {
                return Err(ConfigError::ReservedAircraftId(a.id.clone()));
            }
            if aircraft_index.insert(a.id.clone(), i).is_some() {
                return Err(ConfigError::DuplicateAircraft(a.id.clone()));
            }
        }

        distinct_lp_names("aircraft", cfg.aircraft.iter().map(|a| a.id.as_str()))?;

        let mut seen = HashSet::new();
        let mut engines = Vec::with_capacity(cfg.engines.len());
        for e in &cfg.engines {
            if !seen.insert(e.id.as_str()) {
                return Err(ConfigError::DuplicateEngine(e.id.clone()));
            }
            let initial = if e.initial_position == POOL_MARKER {
                Position::Pool
            } else {
                let idx = aircraft_index.get(&e.initial_position).ok_or_else(|| {
                    ConfigError::UnknownAircraft {
                        engine: e.id.clone(),
                        aircraft: e.initial_position.clone(),
                    }
                })?;
                Position::Aircraft(*idx)
            };
            if e.remaining_life < 0 {
                return Err(ConfigError::NegativeLife {
                    engine: e.id.clone(),
                    life: e.remaining_life,
                });
            }
            if e.remaining_life > cfg.params.life_cap {
                return Err(ConfigError::LifeAboveCap {
                    engine: e.id.clone(),
                    life: e.remaining_life,
                    cap: cfg.params.life_cap,
                });
            }
            engines.push(Engine {
                id: e.id.clone(),
                initial,
                initial_life: e.remaining_life,
            });
        }

        distinct_lp_names("engine", engines.iter().map(|e| e.id.as_str()))?;

        Ok(Self {
            engines,
            aircraft: cfg.aircraft.iter().map(|a| a.id.clone()).collect(),
            aircraft_index,
            horizon: cfg.horizon,
            params: cfg.params.clone(),
        })
    }

    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    pub fn aircraft(&self) -> &[String] {
        &self.aircraft
    }

    pub fn num_aircraft(&self) -> usize {
        self.aircraft.len()
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn aircraft_position(&self, id: &str) -> Option<Position> {
        self.aircraft_index.get(id).map(|i| Position::Aircraft(*i))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> {
        Position::all(self.num_aircraft())
    }

    /// Presentation label: `POOL`, `AC_<id>`, `US` or `SV`.
    pub fn label(&self, p: Position) -> String {
        match p {
            Position::Pool => "POOL".to_string(),
            Position::Aircraft(a) => match self.aircraft.get(a) {
                Some(id) => format!("AC_{id}"),
                None => format!("AC_{}", a + 1),
            },
            Position::Unscheduled => "US".to_string(),
            Position::Maintenance => "SV".to_string(),
        }
    }
}

/// Ids end up in column and row names, so two ids must not sanitize alike.
fn distinct_lp_names<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut by_name: HashMap<String, &str> = HashMap::new();
    for id in ids {
        let name = sanitize(id);
        if let Some(first) = by_name.insert(name.clone(), id) {
            return Err(ConfigError::NameCollision {
                kind,
                first: first.to_string(),
                second: id.to_string(),
                name,
            });
        }
    }
    Ok(())
}
