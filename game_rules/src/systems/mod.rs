//! Subsystem engines.
//!
//! Each engine borrows the read-only [`Catalog`] and exposes validated
//! operations on one slice of a [`PlayerState`](crate::PlayerState) that
//! the caller passes in by `&mut`. Engines never hold on to player state.

mod achievements;
mod combat;
mod companions;
mod inventory;
mod magic;
mod random_events;
mod stats;
mod time;
mod weather;

pub use achievements::*;
pub use combat::*;
pub use companions::*;
pub use inventory::*;
pub use magic::*;
pub use random_events::*;
pub use stats::*;
pub use time::*;
pub use weather::*;

use crate::catalog::Catalog;

/// Hands out engines bound to one catalog.
#[derive(Debug, Clone, Copy)]
pub struct GameSystems<'a> {
    catalog: &'a Catalog,
}

impl<'a> GameSystems<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn inventory(&self) -> InventoryEngine<'a> {
        InventoryEngine::new(self.catalog)
    }

    pub fn stats(&self) -> StatsEngine<'a> {
        StatsEngine::new(self.catalog)
    }

    pub fn magic(&self) -> MagicEngine<'a> {
        MagicEngine::new(self.catalog)
    }

    pub fn achievements(&self) -> AchievementEngine<'a> {
        AchievementEngine::new(self.catalog)
    }

    pub fn companions(&self) -> CompanionEngine<'a> {
        CompanionEngine::new(self.catalog)
    }

    pub fn weather(&self) -> WeatherEngine<'a> {
        WeatherEngine::new(self.catalog)
    }

    pub fn time(&self) -> TimeEngine<'a> {
        TimeEngine::new(self.catalog)
    }

    pub fn combat(&self) -> CombatEngine {
        CombatEngine
    }

    pub fn events(&self) -> RandomEventEngine<'a> {
        RandomEventEngine::new(self.catalog)
    }
}
