use crate::catalog::Catalog;
use crate::entities::PlayerState;
use crate::error::{RulesError, RulesResult};
use crate::mechanics::SpellEffect;

/// Outcome of [`MagicEngine::learn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnOutcome {
    Learned,
    AlreadyKnown,
}

/// A successful cast. The caller applies the effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastResult {
    pub spell: String,
    pub name: String,
    pub effect: SpellEffect,
    pub cost: u32,
}

/// Spell knowledge and mana gate.
#[derive(Debug, Clone, Copy)]
pub struct MagicEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> MagicEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Learn a spell. Learning a known spell is a successful no-op.
    pub fn learn(&self, state: &mut PlayerState, spell: &str) -> RulesResult<LearnOutcome> {
        if self.catalog.spell(spell).is_none() {
            return Err(RulesError::UnknownSpell(spell.to_string()));
        }
        if state.spellbook.insert(spell) {
            tracing::debug!(spell, "spell learned");
            Ok(LearnOutcome::Learned)
        } else {
            Ok(LearnOutcome::AlreadyKnown)
        }
    }

    /// Cast a known spell, debiting its cost.
    ///
    /// Both failure cases are checked before any mana moves.
    pub fn cast(&self, state: &mut PlayerState, spell: &str) -> RulesResult<CastResult> {
        let def = match self.catalog.spell(spell) {
            Some(def) if state.spellbook.knows(spell) => def,
            _ => return Err(RulesError::UnknownSpell(spell.to_string())),
        };

        if !state.vitals.spend_mana(def.cost) {
            return Err(RulesError::InsufficientMana {
                spell: def.name.clone(),
                cost: def.cost,
                available: state.vitals.mana(),
            });
        }
        state.counters.spells_cast += 1;
        tracing::debug!(spell, cost = def.cost, "spell cast");

        Ok(CastResult {
            spell: spell.to_string(),
            name: def.name.clone(),
            effect: def.effect,
            cost: def.cost,
        })
    }

    /// Common spells the player does not know yet, in catalog order.
    pub fn unknown_common<'s>(&'s self, state: &'s PlayerState) -> impl Iterator<Item = &'a str> + 's {
        self.catalog
            .common_spells()
            .filter(move |spell| !state.knows_spell(spell))
    }
}
