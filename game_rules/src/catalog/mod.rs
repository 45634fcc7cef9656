//! Static game data: items, spells, achievements, companions, environment
//! and progression constants.
//!
//! The built-in catalog is embedded at compile time and parsed once at
//! startup. It is read-only afterwards; recruiting a companion clones its
//! template out of the catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CatalogError;
use crate::mechanics::{EventKind, ItemEffect, ItemKind, Rarity, SpellEffect};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.toml");

/// Number of phases in a day cycle.
pub const DAY_PHASES: usize = 6;

/// Tunable progression constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    pub experience_per_level: u32,
    pub health_per_level: u32,
    pub mana_per_level: u32,
    pub attribute_bonus: u32,
    pub inventory_capacity: usize,
    pub max_companions: usize,
    pub random_event_chance: f64,
    pub weather_change_chance: f64,
    pub start_hour: u64,
    pub starting_health: u32,
    pub starting_mana: u32,
    pub base_attribute: u32,
    pub starting_spell: String,
    pub heal_spell_amount: u32,
    #[serde(default)]
    pub starting_items: Vec<StartingItem>,
}

/// One entry of the new-game item grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartingItem {
    pub item: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    pub kind: ItemKind,
    pub effect: ItemEffect,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellDef {
    pub name: String,
    pub cost: u32,
    pub effect: SpellEffect,
    pub description: String,
    /// Rare spells are never handed out by "learn a random common spell"
    /// rewards.
    #[serde(default)]
    pub rare: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// A companion as it appears in the catalog. The party holds clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionTemplate {
    pub name: String,
    pub role: String,
    pub ability: String,
    pub loyalty: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherDef {
    pub id: String,
    pub description: String,
    pub effect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPhaseDef {
    pub name: String,
    pub effect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomEventDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: EventKind,
    pub rarity: Rarity,
}

/// The full static catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub progression: Progression,
    pub items: BTreeMap<String, ItemDef>,
    pub spells: BTreeMap<String, SpellDef>,
    pub achievements: Vec<AchievementDef>,
    pub companions: BTreeMap<String, CompanionTemplate>,
    pub weather: Vec<WeatherDef>,
    pub day_cycle: Vec<DayPhaseDef>,
    pub random_events: Vec<RandomEventDef>,
}

impl Catalog {
    /// Parse and validate the catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog document.
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(source)?;
        catalog.validate()?;
        tracing::debug!(
            items = catalog.items.len(),
            spells = catalog.spells.len(),
            achievements = catalog.achievements.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let progression = &self.progression;

        if self.weather.is_empty() {
            return Err(CatalogError::Invalid("weather catalog is empty".into()));
        }
        if self.random_events.is_empty() {
            return Err(CatalogError::Invalid("random event catalog is empty".into()));
        }
        if self.day_cycle.len() != DAY_PHASES {
            return Err(CatalogError::Invalid(format!(
                "day cycle must have {} phases, found {}",
                DAY_PHASES,
                self.day_cycle.len()
            )));
        }
        if progression.inventory_capacity == 0 {
            return Err(CatalogError::Invalid("inventory capacity must be positive".into()));
        }
        if progression.experience_per_level == 0 {
            return Err(CatalogError::Invalid("experience per level must be positive".into()));
        }
        if !self.spells.contains_key(&progression.starting_spell) {
            return Err(CatalogError::Invalid(format!(
                "starting spell '{}' is not in the spell catalog",
                progression.starting_spell
            )));
        }
        for grant in &progression.starting_items {
            if !self.items.contains_key(&grant.item) {
                return Err(CatalogError::Invalid(format!(
                    "starting item '{}' is not in the item catalog",
                    grant.item
                )));
            }
            if grant.quantity == 0 {
                return Err(CatalogError::Invalid(format!(
                    "starting item '{}' has zero quantity",
                    grant.item
                )));
            }
        }
        if progression.starting_items.len() > progression.inventory_capacity {
            return Err(CatalogError::Invalid(
                "starting items exceed inventory capacity".into(),
            ));
        }

        Ok(())
    }

    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn spell(&self, id: &str) -> Option<&SpellDef> {
        self.spells.get(id)
    }

    pub fn achievement(&self, id: &str) -> Option<&AchievementDef> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn companion(&self, id: &str) -> Option<&CompanionTemplate> {
        self.companions.get(id)
    }

    pub fn weather_def(&self, id: &str) -> Option<&WeatherDef> {
        self.weather.iter().find(|w| w.id == id)
    }

    /// Ids of all spells that ordinary rewards may teach.
    pub fn common_spells(&self) -> impl Iterator<Item = &str> {
        self.spells
            .iter()
            .filter(|(_, spell)| !spell.rare)
            .map(|(id, _)| id.as_str())
    }

    /// Display name for an item id, falling back to the id itself.
    pub fn item_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.items.get(id).map(|i| i.name.as_str()).unwrap_or(id)
    }

    /// Display name for a spell id, falling back to the id itself.
    pub fn spell_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.spells.get(id).map(|s| s.name.as_str()).unwrap_or(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();

        assert_eq!(catalog.items.len(), 8);
        assert_eq!(catalog.spells.len(), 10);
        assert_eq!(catalog.achievements.len(), 10);
        assert_eq!(catalog.companions.len(), 4);
        assert_eq!(catalog.weather.len(), 6);
        assert_eq!(catalog.day_cycle.len(), DAY_PHASES);
        assert_eq!(catalog.random_events.len(), 5);
        assert_eq!(catalog.progression.inventory_capacity, 10);
    }

    #[test]
    fn test_item_effects_parse() {
        let catalog = Catalog::builtin().unwrap();

        assert_eq!(
            catalog.item("healing_potion").unwrap().effect,
            ItemEffect::Heal { amount: 50 }
        );
        assert_eq!(catalog.item("ancient_key").unwrap().effect, ItemEffect::Unlock);
        assert_eq!(catalog.item("wisdom_scroll").unwrap().kind, ItemKind::Consumable);
    }

    #[test]
    fn test_common_spells_exclude_rare() {
        let catalog = Catalog::builtin().unwrap();
        let common: Vec<&str> = catalog.common_spells().collect();

        assert_eq!(common, vec!["fireball", "heal", "insight", "shield", "teleport"]);
    }

    #[test]
    fn test_achievement_order_preserved() {
        let catalog = Catalog::builtin().unwrap();

        assert_eq!(catalog.achievements[0].id, "first_steps");
        assert_eq!(catalog.achievements[9].id, "peacemaker");
        assert_eq!(catalog.achievement("warrior").unwrap().name, "Warrior");
    }

    #[test]
    fn test_invalid_day_cycle_rejected() {
        let source = BUILTIN_CATALOG.replacen(
            "[[day_cycle]]\nname = \"Dawn\"\neffect = \"Peaceful energy, magic regeneration\"\n",
            "",
            1,
        );

        let err = Catalog::from_toml_str(&source).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn test_unknown_starting_spell_rejected() {
        let source = BUILTIN_CATALOG.replacen(
            "starting_spell = \"heal\"",
            "starting_spell = \"meteor\"",
            1,
        );

        let err = Catalog::from_toml_str(&source).unwrap_err();
        assert!(err.to_string().contains("meteor"));
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let err = Catalog::from_toml_str("progression = 3").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_display_name_fallback() {
        let catalog = Catalog::builtin().unwrap();

        assert_eq!(catalog.item_name("fairy_dust"), "Fairy Dust");
        assert_eq!(catalog.item_name("mystery"), "mystery");
        assert_eq!(catalog.spell_name("shield"), "Magic Shield");
    }
}
