use rand::Rng;

use super::{ExperienceGain, StatsEngine};
use crate::catalog::Catalog;
use crate::entities::PlayerState;
use crate::error::{RulesError, RulesResult};
use crate::mechanics::ItemEffect;

/// Result of a successful [`InventoryEngine::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAdded {
    pub item: String,
    pub name: String,
    pub quantity: u32,
    pub description: String,
}

impl std::fmt::Display for ItemAdded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Added {}x {}: {}", self.quantity, self.name, self.description)
    }
}

/// What using an item did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemUse {
    Healed(u32),
    ManaBoosted { max_mana: u32 },
    Experience(ExperienceGain),
}

/// Adds, removes and consumes catalog items.
#[derive(Debug, Clone, Copy)]
pub struct InventoryEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> InventoryEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn capacity(&self) -> usize {
        self.catalog.progression.inventory_capacity
    }

    /// Add `quantity` of an item.
    ///
    /// Capacity counts distinct ids, so topping up a held item always
    /// succeeds while a new id fails once the inventory is full.
    pub fn add(&self, state: &mut PlayerState, item: &str, quantity: u32) -> RulesResult<ItemAdded> {
        if quantity == 0 {
            return Err(RulesError::ZeroQuantity);
        }
        let def = self
            .catalog
            .item(item)
            .ok_or_else(|| RulesError::UnknownItem(item.to_string()))?;

        let capacity = self.capacity();
        if !state.inventory.contains(item) && state.inventory.distinct() >= capacity {
            return Err(RulesError::CapacityExceeded {
                item: item.to_string(),
                capacity,
            });
        }

        state.inventory.put(item, quantity);
        tracing::debug!(item, quantity, "item added");

        Ok(ItemAdded {
            item: item.to_string(),
            name: def.name.clone(),
            quantity,
            description: def.description.clone(),
        })
    }

    /// Remove `quantity` of an item, deleting the entry when it reaches zero.
    /// Returns the quantity left.
    pub fn remove(&self, state: &mut PlayerState, item: &str, quantity: u32) -> RulesResult<u32> {
        if quantity == 0 {
            return Err(RulesError::ZeroQuantity);
        }
        let held = state.inventory.quantity(item);
        if held < quantity {
            return Err(RulesError::InsufficientQuantity {
                item: item.to_string(),
                held,
                requested: quantity,
            });
        }

        state.inventory.take(item, quantity);
        Ok(held - quantity)
    }

    /// Consume one unit of an item and apply its effect.
    ///
    /// Passive items fail with [`RulesError::ItemNotUsable`] and stay in the
    /// inventory.
    pub fn use_item<R: Rng + ?Sized>(
        &self,
        state: &mut PlayerState,
        rng: &mut R,
        item: &str,
    ) -> RulesResult<ItemUse> {
        let def = self
            .catalog
            .item(item)
            .ok_or_else(|| RulesError::UnknownItem(item.to_string()))?;
        if !def.effect.is_active() {
            return Err(RulesError::ItemNotUsable(def.name.clone()));
        }

        self.remove(state, item, 1)?;

        let used = match def.effect {
            ItemEffect::Heal { amount } => ItemUse::Healed(state.vitals.heal(amount)),
            ItemEffect::ManaBoost { amount } => {
                state.vitals.raise_max_mana(amount);
                state.vitals.restore_mana(u32::MAX);
                ItemUse::ManaBoosted {
                    max_mana: state.vitals.max_mana(),
                }
            }
            ItemEffect::Experience { amount } => {
                ItemUse::Experience(StatsEngine::new(self.catalog).gain_experience(state, rng, amount))
            }
            _ => return Err(RulesError::ItemNotUsable(def.name.clone())),
        };

        tracing::debug!(item, "item used");
        Ok(used)
    }
}
