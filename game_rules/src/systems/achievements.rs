use crate::catalog::Catalog;
use crate::entities::PlayerState;
use crate::error::{RulesError, RulesResult};

/// Announcement produced the first time an achievement unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl std::fmt::Display for Announcement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Achievement Unlocked: {} - {}", self.name, self.description)
    }
}

/// Threshold achievements, checked after every player action.
const MILESTONES: &[(&str, fn(&PlayerState) -> bool)] = &[
    ("level_master", |s| s.vitals.level() >= 5),
    ("spell_caster", |s| s.counters.spells_cast >= 10),
    ("warrior", |s| s.counters.battles_won >= 10),
    ("collector", |s| s.inventory.distinct() >= 10),
    ("explorer", |s| s.counters.locations_visited.len() >= 5),
    ("wise_one", |s| s.counters.wisdom_choices >= 5),
];

/// Unlocks achievements, each at most once.
#[derive(Debug, Clone, Copy)]
pub struct AchievementEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> AchievementEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Unlock an achievement. Returns the announcement the first time and
    /// `None` on every later call.
    pub fn unlock(&self, state: &mut PlayerState, id: &str) -> RulesResult<Option<Announcement>> {
        let def = self
            .catalog
            .achievement(id)
            .ok_or_else(|| RulesError::UnknownAchievement(id.to_string()))?;

        if !state.achievements.insert(id.to_string()) {
            return Ok(None);
        }
        tracing::info!(achievement = id, "achievement unlocked");

        Ok(Some(Announcement {
            id: def.id.clone(),
            name: def.name.clone(),
            description: def.description.clone(),
        }))
    }

    /// Unlock every threshold achievement the player now qualifies for.
    pub fn check_milestones(&self, state: &mut PlayerState) -> Vec<Announcement> {
        let mut announcements = Vec::new();
        for (id, reached) in MILESTONES {
            if state.has_achievement(id) || !reached(state) {
                continue;
            }
            match self.unlock(state, id) {
                Ok(Some(announcement)) => announcements.push(announcement),
                Ok(None) => {}
                Err(err) => tracing::warn!(%err, "milestone missing from catalog"),
            }
        }
        announcements
    }

    /// Unlocked achievements in catalog display order.
    pub fn unlocked<'s>(&'s self, state: &'s PlayerState) -> impl Iterator<Item = &'a str> + 's {
        self.catalog
            .achievements
            .iter()
            .filter(move |a| state.has_achievement(&a.id))
            .map(|a| a.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Catalog, PlayerState) {
        let catalog = Catalog::builtin().unwrap();
        let player = PlayerState::new("Tester", &catalog);
        (catalog, player)
    }

    #[test]
    fn test_unlock_announces_once() {
        let (catalog, mut player) = setup();
        let engine = AchievementEngine::new(&catalog);

        let first = engine.unlock(&mut player, "beast_friend").unwrap();
        let second = engine.unlock(&mut player, "beast_friend").unwrap();

        assert_eq!(
            first.unwrap().to_string(),
            "Achievement Unlocked: Beast Friend - Befriend a magical creature"
        );
        assert!(second.is_none());
        assert_eq!(player.achievements.iter().filter(|a| *a == "beast_friend").count(), 1);
    }

    #[test]
    fn test_unknown_achievement() {
        let (catalog, mut player) = setup();
        let engine = AchievementEngine::new(&catalog);

        assert_eq!(
            engine.unlock(&mut player, "dragon_slayer"),
            Err(RulesError::UnknownAchievement("dragon_slayer".into()))
        );
        assert!(player.achievements.is_empty());
    }

    #[test]
    fn test_milestones() {
        let (catalog, mut player) = setup();
        let engine = AchievementEngine::new(&catalog);

        assert!(engine.check_milestones(&mut player).is_empty());

        player.counters.spells_cast = 10;
        player.counters.wisdom_choices = 5;
        for place in ["forest", "cave", "library", "nexus", "crossroads"] {
            player.counters.visit(place);
        }

        let ids: Vec<String> = engine
            .check_milestones(&mut player)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["spell_caster", "explorer", "wise_one"]);

        assert!(engine.check_milestones(&mut player).is_empty());
    }

    #[test]
    fn test_unlocked_in_display_order() {
        let (catalog, mut player) = setup();
        let engine = AchievementEngine::new(&catalog);
        engine.unlock(&mut player, "peacemaker").unwrap();
        engine.unlock(&mut player, "first_steps").unwrap();

        let names: Vec<&str> = engine.unlocked(&player).collect();
        assert_eq!(names, vec!["First Steps", "Peacemaker"]);
    }
}
