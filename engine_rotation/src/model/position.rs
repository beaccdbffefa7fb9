use serde::{Deserialize, Serialize};

/// Where an engine is during one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    Pool,
    /// Mounted on the aircraft at this roster index.
    Aircraft(usize),
    /// Unmounted, outside the pool, with a reduced life ceiling.
    Unscheduled,
    /// In a scheduled visit.
    Maintenance,
}

impl Position {
    /// Every position of a fleet with `num_aircraft` aircraft, ordered by state code.
    pub fn all(num_aircraft: usize) -> impl Iterator<Item = Position> {
        std::iter::once(Position::Pool)
            .chain((0..num_aircraft).map(Position::Aircraft))
            .chain([Position::Unscheduled, Position::Maintenance])
    }

    pub fn count(num_aircraft: usize) -> usize {
        num_aircraft + 3
    }

    /// Integer state code: `0` pool, `1..=A` aircraft, `A+1` US, `A+2` maintenance.
    pub fn code(self, num_aircraft: usize) -> usize {
        match self {
            Position::Pool => 0,
            Position::Aircraft(a) => a + 1,
            Position::Unscheduled => num_aircraft + 1,
            Position::Maintenance => num_aircraft + 2,
        }
    }

    pub fn from_code(code: usize, num_aircraft: usize) -> Option<Position> {
        match code {
            0 => Some(Position::Pool),
            c if c <= num_aircraft => Some(Position::Aircraft(c - 1)),
            c if c == num_aircraft + 1 => Some(Position::Unscheduled),
            c if c == num_aircraft + 2 => Some(Position::Maintenance),
            _ => None,
        }
    }

    pub fn is_mounted(self) -> bool {
        matches!(self, Position::Aircraft(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_enumeration_order() {
        let all: Vec<Position> = Position::all(2).collect();
        assert_eq!(all.len(), Position::count(2));
        for (i, p) in all.iter().enumerate() {
            assert_eq!(p.code(2), i);
            assert_eq!(Position::from_code(i, 2), Some(*p));
        }
        assert_eq!(Position::from_code(5, 2), None);
    }

    #[test]
    fn test_no_aircraft_fleet() {
        assert_eq!(Position::Unscheduled.code(0), 1);
        assert_eq!(Position::from_code(2, 0), Some(Position::Maintenance));
    }
}
