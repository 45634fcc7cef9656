use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{Catalog, RandomEventDef};

/// Draws random encounters. Depends only on the random source.
#[derive(Debug, Clone, Copy)]
pub struct RandomEventEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> RandomEventEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// With the catalog's event chance, pick one event uniformly.
    pub fn maybe_trigger<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'a RandomEventDef> {
        let chance = self.catalog.progression.random_event_chance.clamp(0.0, 1.0);
        if !rng.gen_bool(chance) {
            return None;
        }
        let event = self.catalog.random_events.choose(rng)?;
        tracing::debug!(event = %event.id, "random event");
        Some(event)
    }
}
