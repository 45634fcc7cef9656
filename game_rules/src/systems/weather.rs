use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{Catalog, WeatherDef};
use crate::entities::PlayerState;

#[derive(Debug, Clone, Copy)]
pub struct WeatherEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> WeatherEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Pick a new weather uniformly. The current weather may come up again.
    pub fn change<R: Rng + ?Sized>(&self, state: &mut PlayerState, rng: &mut R) -> Option<&'a WeatherDef> {
        let next = self.catalog.weather.choose(rng)?;
        state.environment.weather = next.id.clone();
        tracing::debug!(weather = %next.id, "weather changed");
        Some(next)
    }

    /// Roll the catalog's change chance, changing the weather on success.
    pub fn maybe_change<R: Rng + ?Sized>(
        &self,
        state: &mut PlayerState,
        rng: &mut R,
    ) -> Option<&'a WeatherDef> {
        if rng.gen_bool(self.catalog.progression.weather_change_chance.clamp(0.0, 1.0)) {
            self.change(state, rng)
        } else {
            None
        }
    }

    pub fn current(&self, state: &PlayerState) -> Option<&'a WeatherDef> {
        self.catalog.weather_def(&state.environment.weather)
    }

    pub fn describe(&self, state: &PlayerState) -> String {
        match self.current(state) {
            Some(def) => format!("Weather: {} ({})", def.description, def.effect),
            None => format!("Weather: {}", state.environment.weather),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_change_picks_catalog_weather() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &catalog);
        let engine = WeatherEngine::new(&catalog);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let picked = engine.change(&mut player, &mut rng).unwrap();
            assert_eq!(player.environment.weather, picked.id);
            assert!(catalog.weather_def(&picked.id).is_some());
        }
    }

    #[test]
    fn test_describe() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &catalog);
        let engine = WeatherEngine::new(&catalog);

        assert_eq!(engine.describe(&player), "Weather: Clear skies (normal)");

        player.environment.weather = "mystical".into();
        assert_eq!(engine.describe(&player), "Weather: Mystical aurora (magic_regeneration)");
    }
}
