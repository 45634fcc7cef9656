//! Game mechanics: attributes, item and spell effects, event kinds.

use serde::{Deserialize, Serialize};

/// The four trainable attributes of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Strength,
    Intelligence,
    Agility,
    Luck,
}

impl Attribute {
    /// All attributes in display order.
    pub const ALL: [Attribute; 4] = [
        Attribute::Strength,
        Attribute::Intelligence,
        Attribute::Agility,
        Attribute::Luck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Strength => "Strength",
            Attribute::Intelligence => "Intelligence",
            Attribute::Agility => "Agility",
            Attribute::Luck => "Luck",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Broad item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Consumable,
    Artifact,
    Key,
    Equipment,
    Material,
}

/// What happens when an item is used.
///
/// Only the first three effects are active; the rest are passive properties
/// that scenes may check for but that cannot be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemEffect {
    Heal { amount: u32 },
    ManaBoost { amount: u32 },
    Experience { amount: u32 },
    Unlock,
    Stealth,
    FireResistance,
    MagicEnhancement,
    DarkMagic,
}

impl ItemEffect {
    /// Whether using the item does anything.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ItemEffect::Heal { .. } | ItemEffect::ManaBoost { .. } | ItemEffect::Experience { .. }
        )
    }
}

/// Narrative effect tag returned by a successful cast.
///
/// Magic only gates knowledge and mana; the caller applies the effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellEffect {
    RestoreHealth,
    FireDamage,
    Protection,
    RevealSecrets,
    InstantTravel,
    GroupEnhancement,
    TemporalFreeze,
    RawMagic,
    CreativePower,
    TimeControl,
}

/// Random event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Trade,
    Blessing,
    Choice,
    Magic,
    MagicChaos,
}

/// How often an event is expected to show up. Informational only; the draw
/// itself is uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_item_effects() {
        assert!(ItemEffect::Heal { amount: 50 }.is_active());
        assert!(ItemEffect::Experience { amount: 100 }.is_active());
        assert!(!ItemEffect::Unlock.is_active());
        assert!(!ItemEffect::DarkMagic.is_active());
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(Attribute::Luck.to_string(), "Luck");
        assert_eq!(Attribute::ALL.len(), 4);
    }
}
