use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::Catalog;
use crate::entities::PlayerState;
use crate::mechanics::Attribute;

/// Details of a level-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub new_level: u32,
    pub attribute: Attribute,
    pub attribute_value: u32,
}

impl std::fmt::Display for LevelUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LEVEL UP! You are now level {}! {} increased to {}",
            self.new_level, self.attribute, self.attribute_value
        )
    }
}

/// Result of [`StatsEngine::gain_experience`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceGain {
    pub amount: u32,
    pub level_up: Option<LevelUp>,
}

impl std::fmt::Display for ExperienceGain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.level_up {
            Some(level_up) => write!(f, "{}", level_up),
            None => write!(f, "Gained {} experience", self.amount),
        }
    }
}

/// Experience, levelling and attribute grants.
#[derive(Debug, Clone, Copy)]
pub struct StatsEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> StatsEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Experience needed to leave the current level.
    pub fn threshold(&self, state: &PlayerState) -> u32 {
        state
            .vitals
            .level()
            .saturating_mul(self.catalog.progression.experience_per_level)
    }

    /// Add experience and level up at most once.
    ///
    /// Experience is cumulative. Crossing `level * experience_per_level`
    /// raises the level by exactly one even when the new total would also
    /// clear the next threshold; the next gain picks up the rest.
    pub fn gain_experience<R: Rng + ?Sized>(
        &self,
        state: &mut PlayerState,
        rng: &mut R,
        amount: u32,
    ) -> ExperienceGain {
        state.vitals.add_experience(amount);

        if state.vitals.experience() < self.threshold(state) {
            return ExperienceGain {
                amount,
                level_up: None,
            };
        }

        let progression = &self.catalog.progression;
        state
            .vitals
            .level_up(progression.health_per_level, progression.mana_per_level);

        let attribute = Attribute::ALL
            .choose(rng)
            .copied()
            .unwrap_or(Attribute::Strength);
        let attribute_value = state.attributes.add(attribute, progression.attribute_bonus);

        tracing::info!(
            level = state.vitals.level(),
            %attribute,
            attribute_value,
            "level up"
        );

        ExperienceGain {
            amount,
            level_up: Some(LevelUp {
                new_level: state.vitals.level(),
                attribute,
                attribute_value,
            }),
        }
    }

    /// Grant attribute points directly. Returns the new value.
    pub fn boost(&self, state: &mut PlayerState, attribute: Attribute, amount: u32) -> u32 {
        state.attributes.add(attribute, amount)
    }

    /// Grant the same amount to every attribute.
    pub fn boost_all(&self, state: &mut PlayerState, amount: u32) {
        state.attributes.add_all(amount);
    }
}
