//! Component definitions for the player aggregate.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::CompanionTemplate;
use crate::mechanics::Attribute;

/// Level, experience, health and mana.
///
/// Fields are private so that `health <= max_health` and `mana <= max_mana`
/// hold after every call; each mutator clamps before returning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    #[serde(default = "one")]
    level: u32,
    #[serde(default)]
    experience: u32,
    #[serde(default)]
    health: u32,
    #[serde(default)]
    max_health: u32,
    #[serde(default)]
    mana: u32,
    #[serde(default)]
    max_mana: u32,
}

fn one() -> u32 {
    1
}

impl Vitals {
    /// Fresh level-1 vitals, fully restored.
    pub fn new(max_health: u32, max_mana: u32) -> Self {
        Self {
            level: 1,
            experience: 0,
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
        }
    }

    /// Rebuild vitals from stored values, repairing anything out of range.
    pub fn from_parts(
        level: u32,
        experience: u32,
        health: u32,
        max_health: u32,
        mana: u32,
        max_mana: u32,
    ) -> Self {
        let mut vitals = Self {
            level: level.max(1),
            experience,
            health,
            max_health,
            mana,
            max_mana,
        };
        vitals.clamp();
        vitals
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Whether the bounds invariant currently holds.
    pub fn is_consistent(&self) -> bool {
        self.level >= 1 && self.health <= self.max_health && self.mana <= self.max_mana
    }

    /// Restore health, returning how much was actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    /// Take damage, stopping at zero. Returns the damage actually taken.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.health);
        self.health -= taken;
        taken
    }

    /// Restore mana, returning how much was actually restored.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let before = self.mana;
        self.mana = self.mana.saturating_add(amount).min(self.max_mana);
        self.mana - before
    }

    /// Spend mana if enough is available. Nothing is debited otherwise.
    pub fn spend_mana(&mut self, amount: u32) -> bool {
        if self.mana < amount {
            return false;
        }
        self.mana -= amount;
        true
    }

    pub fn restore_full(&mut self) {
        self.health = self.max_health;
        self.mana = self.max_mana;
    }

    /// Raise max health. Current health is left where it is.
    pub fn raise_max_health(&mut self, amount: u32) {
        self.max_health = self.max_health.saturating_add(amount);
    }

    /// Raise max mana. Current mana is left where it is.
    pub fn raise_max_mana(&mut self, amount: u32) {
        self.max_mana = self.max_mana.saturating_add(amount);
    }

    pub(crate) fn add_experience(&mut self, amount: u32) {
        self.experience = self.experience.saturating_add(amount);
    }

    pub(crate) fn level_up(&mut self, health_gain: u32, mana_gain: u32) {
        self.level += 1;
        self.raise_max_health(health_gain);
        self.raise_max_mana(mana_gain);
        self.restore_full();
    }

    fn clamp(&mut self) {
        self.health = self.health.min(self.max_health);
        self.mana = self.mana.min(self.max_mana);
    }
}

/// The four attributes. Unbounded above. Missing fields load at the base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub strength: u32,
    pub intelligence: u32,
    pub agility: u32,
    pub luck: u32,
}

impl Attributes {
    /// All attributes set to the same base value.
    pub fn uniform(base: u32) -> Self {
        Self {
            strength: base,
            intelligence: base,
            agility: base,
            luck: base,
        }
    }

    pub fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Intelligence => self.intelligence,
            Attribute::Agility => self.agility,
            Attribute::Luck => self.luck,
        }
    }

    fn slot(&mut self, attribute: Attribute) -> &mut u32 {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Agility => &mut self.agility,
            Attribute::Luck => &mut self.luck,
        }
    }

    /// Add to one attribute, returning the new value.
    pub fn add(&mut self, attribute: Attribute, amount: u32) -> u32 {
        let slot = self.slot(attribute);
        *slot = slot.saturating_add(amount);
        *slot
    }

    pub fn add_all(&mut self, amount: u32) {
        for attribute in Attribute::ALL {
            self.add(attribute, amount);
        }
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::uniform(10)
    }
}

/// Item id to quantity. Present keys always hold a quantity of at least 1.
///
/// Capacity is a catalog constant, so it is enforced by the inventory
/// engine rather than stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored counts, dropping zero entries.
    pub fn from_counts<I, K>(counts: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        let items = counts
            .into_iter()
            .filter(|(_, qty)| *qty > 0)
            .map(|(id, qty)| (id.into(), qty))
            .collect();
        Self { items }
    }

    pub fn quantity(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    /// Number of distinct item ids held.
    pub fn distinct(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(id, qty)| (id.as_str(), *qty))
    }

    /// Drop entries that a hand-edited save may have left at zero.
    pub fn normalize(&mut self) {
        self.items.retain(|_, qty| *qty > 0);
    }

    pub(crate) fn put(&mut self, item: &str, quantity: u32) {
        let slot = self.items.entry(item.to_string()).or_insert(0);
        *slot = slot.saturating_add(quantity);
    }

    /// Caller must have checked the held quantity.
    pub(crate) fn take(&mut self, item: &str, quantity: u32) {
        if let Some(held) = self.items.get_mut(item) {
            *held = held.saturating_sub(quantity);
            if *held == 0 {
                self.items.remove(item);
            }
        }
    }
}

/// Known spells with set semantics, kept in learning order for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Spellbook {
    spells: Vec<String>,
}

impl Spellbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn knows(&self, spell: &str) -> bool {
        self.spells.iter().any(|s| s == spell)
    }

    /// Add a spell. Returns false if it was already known.
    pub fn insert(&mut self, spell: &str) -> bool {
        if self.knows(spell) {
            return false;
        }
        self.spells.push(spell.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.spells.iter().map(String::as_str)
    }

    /// Remove duplicates a hand-edited save may contain, keeping the first.
    pub fn normalize(&mut self) {
        let mut seen = BTreeSet::new();
        self.spells.retain(|s| seen.insert(s.clone()));
    }
}

impl<S: AsRef<str>> FromIterator<S> for Spellbook {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut book = Spellbook::new();
        for spell in iter {
            book.insert(spell.as_ref());
        }
        book
    }
}

/// A recruited companion. Owns its own copy of the template data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionRecord {
    pub id: String,
    pub name: String,
    pub role: String,
    pub ability: String,
    pub loyalty: u32,
}

impl CompanionRecord {
    pub fn from_template(id: &str, template: &CompanionTemplate) -> Self {
        let template = template.clone();
        Self {
            id: id.to_string(),
            name: template.name,
            role: template.role,
            ability: template.ability,
            loyalty: template.loyalty,
        }
    }
}

/// Counters that feed achievement thresholds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    #[serde(default)]
    pub battles_won: u32,
    #[serde(default)]
    pub spells_cast: u32,
    #[serde(default)]
    pub wisdom_choices: u32,
    #[serde(default)]
    pub locations_visited: BTreeSet<String>,
}

impl SessionCounters {
    /// Record a location. Returns true the first time it is seen.
    pub fn visit(&mut self, location: &str) -> bool {
        self.locations_visited.insert(location.to_string())
    }
}
