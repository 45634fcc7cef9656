//! The player aggregate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Attributes, CompanionRecord, Inventory, SessionCounters, SessionId, Spellbook, Vitals};
use crate::catalog::Catalog;
use crate::world_state::{Environment, Flags};

/// Name used when the player leaves the prompt blank.
pub const DEFAULT_PLAYER_NAME: &str = "Adventurer";

/// Everything that changes during a journey.
///
/// A session owns exactly one of these and lends it to engines and scenes
/// by `&mut`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub session_id: SessionId,
    pub name: String,
    pub vitals: Vitals,
    pub attributes: Attributes,
    pub inventory: Inventory,
    pub spellbook: Spellbook,
    pub companions: Vec<CompanionRecord>,
    pub achievements: BTreeSet<String>,
    pub environment: Environment,
    pub flags: Flags,
    pub counters: SessionCounters,
    /// Narrative mementos. Not catalog items and not capacity-bounded.
    pub keepsakes: Vec<String>,
}

impl PlayerState {
    /// Start a new journey with the catalog's starting grant.
    pub fn new(name: &str, catalog: &Catalog) -> Self {
        let progression = &catalog.progression;

        let mut inventory = Inventory::new();
        for grant in &progression.starting_items {
            inventory.put(&grant.item, grant.quantity);
        }

        let mut spellbook = Spellbook::new();
        spellbook.insert(&progression.starting_spell);

        Self {
            session_id: SessionId::new(),
            name: normalize_name(name),
            vitals: Vitals::new(progression.starting_health, progression.starting_mana),
            attributes: Attributes::uniform(progression.base_attribute),
            inventory,
            spellbook,
            companions: Vec::new(),
            achievements: BTreeSet::new(),
            environment: Environment::new(
                catalog
                    .weather
                    .first()
                    .map(|w| w.id.as_str())
                    .unwrap_or(crate::world_state::DEFAULT_WEATHER),
                progression.start_hour,
            ),
            flags: Flags::new(),
            counters: SessionCounters::default(),
            keepsakes: Vec::new(),
        }
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.contains(item)
    }

    pub fn knows_spell(&self, spell: &str) -> bool {
        self.spellbook.knows(spell)
    }

    pub fn has_companion(&self, id: &str) -> bool {
        self.companions.iter().any(|c| c.id == id)
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.contains(id)
    }

    /// Add a keepsake unless it is already held. Returns true if added.
    pub fn add_keepsake(&mut self, keepsake: &str) -> bool {
        if self.keepsakes.iter().any(|k| k == keepsake) {
            return false;
        }
        self.keepsakes.push(keepsake.to_string());
        true
    }
}

/// Trim the name, falling back to [`DEFAULT_PLAYER_NAME`] when blank.
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_defaults() {
        let catalog = Catalog::builtin().unwrap();
        let player = PlayerState::new("Lyra", &catalog);

        assert_eq!(player.name, "Lyra");
        assert_eq!(player.vitals.level(), 1);
        assert_eq!(player.vitals.health(), 100);
        assert_eq!(player.vitals.mana(), 50);
        assert_eq!(player.attributes, Attributes::uniform(10));
        assert_eq!(player.inventory.quantity("healing_potion"), 2);
        assert!(player.knows_spell("heal"));
        assert_eq!(player.spellbook.len(), 1);
        assert_eq!(player.environment, Environment::new("clear", 0));
        assert!(player.achievements.is_empty());
    }

    #[test]
    fn test_blank_name_uses_default() {
        let catalog = Catalog::builtin().unwrap();

        assert_eq!(PlayerState::new("   ", &catalog).name, DEFAULT_PLAYER_NAME);
        assert_eq!(PlayerState::new("  Kai ", &catalog).name, "Kai");
    }

    #[test]
    fn test_keepsakes_deduplicate() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Lyra", &catalog);

        assert!(player.add_keepsake("Fairy Blessing"));
        assert!(!player.add_keepsake("Fairy Blessing"));
        assert_eq!(player.keepsakes.len(), 1);
    }

    #[test]
    fn test_player_state_json_round_trip() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Lyra", &catalog);
        player.flags.set("crystal_power", "balanced");
        player.counters.visit("forest");

        let json = serde_json::to_string(&player).unwrap();
        let back: PlayerState = serde_json::from_str(&json).unwrap();

        assert_eq!(back, player);
    }
}
