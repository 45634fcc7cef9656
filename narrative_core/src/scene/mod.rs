//! Scene definitions.
//!
//! A scene is immutable data: a title, a prompt and a list of choices. Each
//! choice declares every outcome it may emit and carries an effect function
//! that mutates the player through a [`SceneContext`] and returns exactly
//! one of those outcomes.

mod boss;
mod cave;
mod crossroads;
mod forest;
mod intro;
mod library;
mod nexus;
mod treasure;

use game_rules::{Attribute, GameSystems, PlayerState};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// Identifies a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneId {
    Intro,
    Forest,
    FairyGlade,
    HiddenEntrance,
    AncientGrove,
    BabblingBrook,
    Cave,
    CrystalHall,
    CrystalPassage,
    AncientSymbols,
    UndergroundLake,
    TreasureChamber,
    ChamberDetails,
    RiddleOfWisdom,
    RiddleOfCourage,
    RiddleOfMystery,
    BossPeaceful,
    MysticalLibrary,
    OwlGuardian,
    TimeNexus,
    NexusDragon,
    NexusFirstMage,
    NexusAlterHistory,
    Crossroads,
    CrossroadsGathering,
    CrossroadsConversation,
}

impl SceneId {
    /// The broader location a scene belongs to, for exploration tracking.
    pub fn location(&self) -> &'static str {
        match self {
            SceneId::Intro => "village",
            SceneId::Forest
            | SceneId::FairyGlade
            | SceneId::HiddenEntrance
            | SceneId::AncientGrove
            | SceneId::BabblingBrook => "enchanted_forest",
            SceneId::Cave
            | SceneId::CrystalHall
            | SceneId::CrystalPassage
            | SceneId::AncientSymbols
            | SceneId::UndergroundLake => "crystal_caves",
            SceneId::TreasureChamber
            | SceneId::ChamberDetails
            | SceneId::RiddleOfWisdom
            | SceneId::RiddleOfCourage
            | SceneId::RiddleOfMystery => "treasure_chamber",
            SceneId::BossPeaceful => "shadow_lair",
            SceneId::MysticalLibrary | SceneId::OwlGuardian => "mystical_library",
            SceneId::TimeNexus
            | SceneId::NexusDragon
            | SceneId::NexusFirstMage
            | SceneId::NexusAlterHistory => "time_nexus",
            SceneId::Crossroads
            | SceneId::CrossroadsGathering
            | SceneId::CrossroadsConversation => "adventurers_crossroads",
        }
    }
}

/// Effect phase of a choice.
pub type Effect = fn(&mut SceneContext<'_>) -> Outcome;

/// One labelled option of a scene.
#[derive(Clone)]
pub struct Choice {
    pub label: &'static str,
    /// The closed set of outcomes `effect` may return.
    pub emits: &'static [Outcome],
    pub effect: Effect,
}

impl Choice {
    pub const fn new(label: &'static str, emits: &'static [Outcome], effect: Effect) -> Self {
        Self { label, emits, effect }
    }
}

impl std::fmt::Debug for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Choice")
            .field("label", &self.label)
            .field("emits", &self.emits)
            .finish()
    }
}

/// An immutable scene node.
#[derive(Debug, Clone)]
pub struct Scene {
    pub id: SceneId,
    pub title: &'static str,
    pub prompt: &'static str,
    pub choices: Vec<Choice>,
}

impl Scene {
    pub fn new(id: SceneId, title: &'static str, prompt: &'static str) -> Self {
        Self {
            id,
            title,
            prompt,
            choices: Vec::new(),
        }
    }

    pub fn choice(mut self, label: &'static str, emits: &'static [Outcome], effect: Effect) -> Self {
        self.choices.push(Choice::new(label, emits, effect));
        self
    }

    pub fn labels(&self) -> Vec<String> {
        self.choices.iter().map(|c| c.label.to_string()).collect()
    }
}

/// Every scene in the game.
pub fn all_scenes() -> Vec<Scene> {
    let mut scenes = Vec::new();
    scenes.extend(intro::scenes());
    scenes.extend(forest::scenes());
    scenes.extend(cave::scenes());
    scenes.extend(treasure::scenes());
    scenes.extend(boss::scenes());
    scenes.extend(library::scenes());
    scenes.extend(nexus::scenes());
    scenes.extend(crossroads::scenes());
    scenes
}

/// What an effect function can touch.
///
/// Subsystem failures are never fatal here: helpers turn them into notices
/// for the player and carry on.
pub struct SceneContext<'a> {
    pub state: &'a mut PlayerState,
    pub systems: GameSystems<'a>,
    pub rng: &'a mut dyn RngCore,
    notices: Vec<String>,
}

impl<'a> SceneContext<'a> {
    pub fn new(state: &'a mut PlayerState, systems: GameSystems<'a>, rng: &'a mut dyn RngCore) -> Self {
        Self {
            state,
            systems,
            rng,
            notices: Vec::new(),
        }
    }

    /// Queue a line for the player.
    pub fn say(&mut self, text: impl Into<String>) {
        self.notices.push(text.into());
    }

    pub fn into_notices(self) -> Vec<String> {
        self.notices
    }

    pub fn set_flag(&mut self, key: &str) {
        self.state.flags.set(key, true);
    }

    pub fn set_flag_value(&mut self, key: &str, value: impl Into<game_rules::FlagValue>) {
        self.state.flags.set(key, value);
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.state.flags.is_set(key)
    }

    pub fn keep(&mut self, keepsake: &str) {
        if self.state.add_keepsake(keepsake) {
            self.say(format!("Keepsake: {}", keepsake));
        }
    }

    /// Count a wisdom-based choice.
    pub fn wisdom(&mut self) {
        self.state.counters.wisdom_choices += 1;
    }

    pub fn grant_item(&mut self, item: &str, quantity: u32) -> bool {
        match self.systems.inventory().add(self.state, item, quantity) {
            Ok(added) => {
                self.say(added.to_string());
                true
            }
            Err(err) => {
                tracing::warn!(item, %err, "item grant failed");
                self.say(err.to_string());
                false
            }
        }
    }

    pub fn gain_xp(&mut self, amount: u32) {
        let gain = self
            .systems
            .stats()
            .gain_experience(self.state, &mut *self.rng, amount);
        self.say(gain.to_string());
    }

    /// Learn a spell. Returns true if it was new.
    pub fn learn(&mut self, spell: &str) -> bool {
        match self.systems.magic().learn(self.state, spell) {
            Ok(game_rules::LearnOutcome::Learned) => {
                let name = self.systems.catalog().spell_name(spell).to_string();
                self.say(format!("Learned {}!", name));
                true
            }
            Ok(game_rules::LearnOutcome::AlreadyKnown) => false,
            Err(err) => {
                tracing::warn!(spell, %err, "learn failed");
                self.say(err.to_string());
                false
            }
        }
    }

    pub fn unlock(&mut self, achievement: &str) {
        match self.systems.achievements().unlock(self.state, achievement) {
            Ok(Some(announcement)) => self.say(announcement.to_string()),
            Ok(None) => {}
            Err(err) => tracing::warn!(achievement, %err, "unlock failed"),
        }
    }

    pub fn recruit(&mut self, companion: &str) -> bool {
        match self.systems.companions().recruit(self.state, companion) {
            Ok(outcome) => {
                let joined = outcome.joined();
                self.say(outcome.to_string());
                joined
            }
            Err(err) => {
                tracing::warn!(companion, %err, "recruit failed");
                self.say(err.to_string());
                false
            }
        }
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        self.state.vitals.heal(amount)
    }

    pub fn heal_full(&mut self) {
        self.state.vitals.restore_full();
    }

    pub fn damage(&mut self, amount: u32) -> u32 {
        let taken = self.state.vitals.damage(amount);
        self.say(format!("You lose {} health.", taken));
        taken
    }

    pub fn boost(&mut self, attribute: Attribute, amount: u32) {
        let value = self.systems.stats().boost(self.state, attribute, amount);
        self.say(format!("{} +{} (now {})", attribute, amount, value));
    }

    pub fn boost_all(&mut self, amount: u32) {
        self.systems.stats().boost_all(self.state, amount);
        self.say(format!("All attributes +{}", amount));
    }

    pub fn raise_max_health(&mut self, amount: u32) {
        self.state.vitals.raise_max_health(amount);
        self.say(format!("Max health +{}", amount));
    }

    pub fn raise_max_mana(&mut self, amount: u32) {
        self.state.vitals.raise_max_mana(amount);
        self.say(format!("Max mana +{}", amount));
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform index below `n`. `n` must be positive.
    pub fn roll(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n.max(1))
    }

    pub fn pick<'t, T>(&mut self, options: &'t [T]) -> Option<&'t T> {
        options.choose(&mut *self.rng)
    }

    /// `amount` distinct indexes below `len`, in random order.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut *self.rng, len, amount.min(len)).into_vec()
    }

    /// Common spells not yet known, in catalog order.
    pub fn unknown_common_spells(&self) -> Vec<String> {
        self.systems
            .magic()
            .unknown_common(self.state)
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use game_rules::Catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Run one choice effect against a fresh or given player.
    pub fn run_effect(
        catalog: &Catalog,
        state: &mut PlayerState,
        seed: u64,
        effect: Effect,
    ) -> (Outcome, Vec<String>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = SceneContext::new(state, GameSystems::new(catalog), &mut rng);
        let outcome = effect(&mut ctx);
        (outcome, ctx.into_notices())
    }

    /// Find a choice by label prefix.
    pub fn choice(scene: &Scene, label_prefix: &str) -> Choice {
        scene
            .choices
            .iter()
            .find(|c| c.label.starts_with(label_prefix))
            .cloned()
            .unwrap_or_else(|| panic!("no choice starting with '{}'", label_prefix))
    }

    pub fn scene(id: SceneId) -> Scene {
        all_scenes()
            .into_iter()
            .find(|s| s.id == id)
            .unwrap_or_else(|| panic!("no scene {:?}", id))
    }
}
