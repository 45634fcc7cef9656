use crate::catalog::{Catalog, DayPhaseDef, DAY_PHASES};
use crate::entities::PlayerState;

/// Hours covered by one day-cycle phase.
pub const HOURS_PER_PHASE: u64 = 4;

/// Index into the day cycle for an hour counter.
pub fn phase_index(hour: u64) -> usize {
    ((hour / HOURS_PER_PHASE) % DAY_PHASES as u64) as usize
}

#[derive(Debug, Clone, Copy)]
pub struct TimeEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> TimeEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Move the clock forward. Zero is treated as one hour so the counter
    /// always strictly increases. Returns the new hour.
    pub fn advance(&self, state: &mut PlayerState, hours: u64) -> u64 {
        let hours = hours.max(1);
        state.environment.hour = state.environment.hour.saturating_add(hours);
        state.environment.hour
    }

    pub fn phase(&self, state: &PlayerState) -> Option<&'a DayPhaseDef> {
        self.catalog.day_cycle.get(phase_index(state.environment.hour))
    }

    pub fn describe(&self, state: &PlayerState) -> String {
        match self.phase(state) {
            Some(phase) => format!("Time: {} - {}", phase.name, phase.effect),
            None => format!("Time: hour {}", state.environment.hour),
        }
    }
}
