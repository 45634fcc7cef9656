//! The on-disk save record.
//!
//! Every field carries a serde default so records written by older versions
//! still load; anything they lack falls back to a new-game value.

use chrono::{DateTime, Utc};
use game_rules::{
    Attributes, CompanionRecord, Environment, Flags, Inventory, PlayerState, SessionCounters,
    SessionId, Spellbook, Vitals, DEFAULT_PLAYER_NAME,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::session::StoryPosition;

/// Current record layout.
pub const FORMAT_VERSION: u32 = 3;

const DEFAULT_MAX_HEALTH: u32 = 100;
const DEFAULT_MAX_MANA: u32 = 50;

fn default_name() -> String {
    DEFAULT_PLAYER_NAME.to_string()
}

fn default_level() -> u32 {
    1
}

fn default_max_health() -> u32 {
    DEFAULT_MAX_HEALTH
}

fn default_max_mana() -> u32 {
    DEFAULT_MAX_MANA
}

/// A full snapshot of one journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Records without a version predate versioning.
    #[serde(default)]
    pub version: u32,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    #[serde(default = "SessionId::nil")]
    pub session_id: SessionId,
    #[serde(default = "default_name")]
    pub player_name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: u32,
    /// Missing means full.
    #[serde(default)]
    pub health: Option<u32>,
    #[serde(default = "default_max_health")]
    pub max_health: u32,
    /// Missing means full.
    #[serde(default)]
    pub mana: Option<u32>,
    #[serde(default = "default_max_mana")]
    pub max_mana: u32,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub spellbook: Spellbook,
    #[serde(default)]
    pub companions: Vec<CompanionRecord>,
    #[serde(default)]
    pub achievements: BTreeSet<String>,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub counters: SessionCounters,
    #[serde(default)]
    pub keepsakes: Vec<String>,
    #[serde(default)]
    pub position: StoryPosition,
}

impl SaveRecord {
    pub fn capture(state: &PlayerState, position: StoryPosition, saved_at: DateTime<Utc>) -> Self {
        Self {
            version: FORMAT_VERSION,
            saved_at,
            session_id: state.session_id,
            player_name: state.name.clone(),
            level: state.vitals.level(),
            experience: state.vitals.experience(),
            health: Some(state.vitals.health()),
            max_health: state.vitals.max_health(),
            mana: Some(state.vitals.mana()),
            max_mana: state.vitals.max_mana(),
            attributes: state.attributes,
            inventory: state.inventory.clone(),
            spellbook: state.spellbook.clone(),
            companions: state.companions.clone(),
            achievements: state.achievements.clone(),
            environment: state.environment.clone(),
            flags: state.flags.clone(),
            counters: state.counters.clone(),
            keepsakes: state.keepsakes.clone(),
            position,
        }
    }

    /// Rebuild the player, repairing values a hand-edited file may have
    /// pushed out of range.
    pub fn restore(self) -> (PlayerState, StoryPosition) {
        let mut inventory = self.inventory;
        inventory.normalize();
        let mut spellbook = self.spellbook;
        spellbook.normalize();

        let vitals = Vitals::from_parts(
            self.level,
            self.experience,
            self.health.unwrap_or(self.max_health),
            self.max_health,
            self.mana.unwrap_or(self.max_mana),
            self.max_mana,
        );

        let state = PlayerState {
            session_id: self.session_id,
            name: game_rules::normalize_name(&self.player_name),
            vitals,
            attributes: self.attributes,
            inventory,
            spellbook,
            companions: self.companions,
            achievements: self.achievements,
            environment: self.environment,
            flags: self.flags,
            counters: self.counters,
            keepsakes: self.keepsakes,
        };
        (state, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneId;
    use game_rules::Catalog;

    #[test]
    fn test_capture_restore_keeps_every_field() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Rowan", &catalog);
        player.vitals.damage(35);
        player.flags.set("crystal_power", "balanced");
        player.add_keepsake("Crystal Harmony");
        player.counters.visit("crystal_caves");

        let record = SaveRecord::capture(&player, StoryPosition::At(SceneId::Cave), Utc::now());
        let (restored, position) = record.restore();

        assert_eq!(restored, player);
        assert_eq!(position, StoryPosition::At(SceneId::Cave));
    }

    #[test]
    fn test_old_record_fills_defaults() {
        let json = r#"{
            "player_name": "Old Timer",
            "max_health": 120,
            "attributes": { "strength": 14 },
            "inventory": { "healing_potion": 3, "shadow_gem": 0 },
            "spellbook": ["heal", "heal", "shield"]
        }"#;

        let record: SaveRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.version, 0);
        assert_eq!(record.session_id, SessionId::nil());

        let (state, position) = record.restore();
        assert_eq!(state.name, "Old Timer");
        assert_eq!(state.vitals.level(), 1);
        assert_eq!(state.vitals.health(), 120);
        assert_eq!(state.vitals.mana(), 50);
        assert_eq!(state.attributes.strength, 14);
        assert_eq!(state.attributes.intelligence, 10);
        assert_eq!(state.attributes.agility, 10);
        assert_eq!(state.attributes.luck, 10);
        assert_eq!(state.inventory.distinct(), 1);
        assert_eq!(state.spellbook.len(), 2);
        assert_eq!(state.environment.weather, "clear");
        assert_eq!(position, StoryPosition::default());
    }

    #[test]
    fn test_out_of_range_health_is_clamped() {
        let json = r#"{ "health": 500, "max_health": 100, "level": 0 }"#;
        let record: SaveRecord = serde_json::from_str(json).unwrap();
        let (state, _) = record.restore();

        assert_eq!(state.vitals.health(), 100);
        assert_eq!(state.vitals.level(), 1);
        assert!(state.vitals.is_consistent());
    }
}
