//! Error types for rules operations and catalog loading.

use thiserror::Error;

/// Failures of subsystem engine operations.
///
/// None of these are fatal: the calling scene reports them and lets the
/// player pick another branch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("Inventory is full! ({capacity} different items)")]
    CapacityExceeded { item: String, capacity: usize },

    #[error("Not enough {item}: holding {held}, need {requested}")]
    InsufficientQuantity {
        item: String,
        held: u32,
        requested: u32,
    },

    #[error("You don't know the spell '{0}'")]
    UnknownSpell(String),

    #[error("Not enough mana to cast {spell}: costs {cost}, have {available}")]
    InsufficientMana {
        spell: String,
        cost: u32,
        available: u32,
    },

    #[error("No such item '{0}'")]
    UnknownItem(String),

    #[error("No such companion '{0}'")]
    UnknownCompanion(String),

    #[error("No such achievement '{0}'")]
    UnknownAchievement(String),

    #[error("{0} cannot be used like that")]
    ItemNotUsable(String),

    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// Problems with the static catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid catalog: {0}")]
    Invalid(String),
}

pub type RulesResult<T> = Result<T, RulesError>;
