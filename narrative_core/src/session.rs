//! The adventure loop.
//!
//! A [`Session`] owns everything one journey needs: the player, the catalog,
//! the engine, the random source, the save store and the current story
//! position. Between scenes the player picks from the adventure menu.

use game_rules::{
    Catalog, EventKind, GameSystems, ItemUse, PlayerState, RandomEventDef, SpellEffect,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::endings::FinalSummary;
use crate::engine::{NarrativeEngine, Step};
use crate::error::NarrativeResult;
use crate::graph::EXCURSIONS;
use crate::io::{ask, Input, Pacing, Presentation};
use crate::outcome::Outcome;
use crate::persistence::SaveStore;
use crate::scene::SceneId;

/// Experience granted for pressing on with the story.
const STORY_STEP_EXPERIENCE: std::ops::RangeInclusive<u32> = 10..=30;
/// Experience granted by a blessing event.
const BLESSING_EXPERIENCE: u32 = 50;
const DEFAULT_SLOT: &str = "quicksave";

/// Where a journey stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryPosition {
    At(SceneId),
    Concluded(Outcome),
}

impl Default for StoryPosition {
    fn default() -> Self {
        StoryPosition::At(SceneId::Intro)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Continue,
    ViewCharacter,
    UseItem,
    CastSpell,
    Explore,
    Save,
    Load,
    Delete,
    Quit,
}

const MENU: &[(MenuAction, &str)] = &[
    (MenuAction::Continue, "Continue the story"),
    (MenuAction::ViewCharacter, "View character"),
    (MenuAction::UseItem, "Use an item"),
    (MenuAction::CastSpell, "Cast a spell"),
    (MenuAction::Explore, "Explore a side location"),
    (MenuAction::Save, "Save the game"),
    (MenuAction::Load, "Load a game"),
    (MenuAction::Delete, "Delete a save"),
    (MenuAction::Quit, "Quit"),
];

fn excursion_flag(id: SceneId) -> &'static str {
    match id {
        SceneId::MysticalLibrary => "visited_library",
        SceneId::TimeNexus => "visited_time_nexus",
        _ => "visited_crossroads",
    }
}

fn excursion_label(id: SceneId) -> &'static str {
    match id {
        SceneId::MysticalLibrary => "The Mystical Library",
        SceneId::TimeNexus => "The Time Nexus",
        _ => "The Crossroads of Destiny",
    }
}

pub struct Session {
    state: PlayerState,
    catalog: Catalog,
    engine: NarrativeEngine,
    rng: StdRng,
    position: StoryPosition,
    store: SaveStore,
}

impl Session {
    /// Start a new journey with an entropy-seeded random source.
    pub fn new(name: &str, catalog: Catalog, store: SaveStore) -> NarrativeResult<Self> {
        Self::build(name, catalog, store, StdRng::from_entropy())
    }

    /// Start a new journey whose random branches replay for a given seed.
    pub fn with_seed(
        name: &str,
        catalog: Catalog,
        store: SaveStore,
        seed: u64,
    ) -> NarrativeResult<Self> {
        Self::build(name, catalog, store, StdRng::seed_from_u64(seed))
    }

    fn build(name: &str, catalog: Catalog, store: SaveStore, rng: StdRng) -> NarrativeResult<Self> {
        let engine = NarrativeEngine::standard()?;
        let mut state = PlayerState::new(name, &catalog);
        if let Err(err) = GameSystems::new(&catalog)
            .achievements()
            .unlock(&mut state, "first_steps")
        {
            tracing::warn!(%err, "unlock failed");
        }
        tracing::info!(player = %state.name, session = %state.session_id, "journey started");

        Ok(Self {
            state,
            catalog,
            engine,
            rng,
            position: StoryPosition::default(),
            store,
        })
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn position(&self) -> StoryPosition {
        self.position
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    /// Run the adventure until the story concludes or the player quits.
    ///
    /// Returns the final summary of a concluded story, or `None` on quit.
    pub fn run(
        &mut self,
        presentation: &mut dyn Presentation,
        input: &mut dyn Input,
    ) -> NarrativeResult<Option<FinalSummary>> {
        loop {
            if let StoryPosition::Concluded(token) = self.position {
                let summary =
                    self.engine
                        .conclude(token, &mut self.state, &self.catalog, presentation)?;
                return Ok(Some(summary));
            }

            presentation.present(&self.status_line(), Some(Pacing::Instant));
            self.random_event(presentation);

            let labels: Vec<String> = MENU.iter().map(|(_, label)| label.to_string()).collect();
            let (action, _) = MENU[ask(presentation, input, "Choose your action", &labels)?];

            match action {
                MenuAction::Continue => self.continue_story(presentation, input)?,
                MenuAction::ViewCharacter => {
                    presentation.present(&self.character_sheet(), Some(Pacing::Instant))
                }
                MenuAction::UseItem => self.use_item(presentation, input)?,
                MenuAction::CastSpell => self.cast_spell(presentation, input)?,
                MenuAction::Explore => self.explore(presentation, input)?,
                MenuAction::Save => self.save(presentation, input),
                MenuAction::Load => self.load(presentation, input),
                MenuAction::Delete => self.delete(presentation, input),
                MenuAction::Quit => {
                    tracing::info!(player = %self.state.name, "journey abandoned");
                    return Ok(None);
                }
            }

            self.check_milestones(presentation);
        }
    }

    fn status_line(&self) -> String {
        let systems = GameSystems::new(&self.catalog);
        let vitals = &self.state.vitals;
        format!(
            "{} | Level {} | Health {}/{} | Mana {}/{}\n{}\n{}",
            self.state.name,
            vitals.level(),
            vitals.health(),
            vitals.max_health(),
            vitals.mana(),
            vitals.max_mana(),
            systems.weather().describe(&self.state),
            systems.time().describe(&self.state),
        )
    }

    fn check_milestones(&mut self, presentation: &mut dyn Presentation) {
        let systems = GameSystems::new(&self.catalog);
        for announcement in systems.achievements().check_milestones(&mut self.state) {
            presentation.present(&announcement.to_string(), Some(Pacing::Dramatic));
        }
    }

    fn random_event(&mut self, presentation: &mut dyn Presentation) {
        let systems = GameSystems::new(&self.catalog);
        let Some(event) = systems.events().maybe_trigger(&mut self.rng) else {
            return;
        };
        presentation.present(&event.name, Some(Pacing::Dramatic));
        presentation.present(&event.description, Some(Pacing::Narration));

        for notice in apply_event(event, &mut self.state, systems, &mut self.rng) {
            presentation.present(&notice, Some(Pacing::Narration));
        }
    }

    fn continue_story(
        &mut self,
        presentation: &mut dyn Presentation,
        input: &mut dyn Input,
    ) -> NarrativeResult<()> {
        let StoryPosition::At(scene) = self.position else {
            return Ok(());
        };

        let systems = GameSystems::new(&self.catalog);
        systems.time().advance(&mut self.state, 1);
        if let Some(weather) = systems.weather().maybe_change(&mut self.state, &mut self.rng) {
            presentation.present(
                &format!("The weather turns: {}.", weather.description),
                Some(Pacing::Narration),
            );
        }
        let amount = self.rng.gen_range(STORY_STEP_EXPERIENCE);
        let gain = systems
            .stats()
            .gain_experience(&mut self.state, &mut self.rng, amount);
        presentation.present(&gain.to_string(), Some(Pacing::Instant));

        let step = self.engine.play_scene(
            scene,
            &mut self.state,
            &self.catalog,
            &mut self.rng,
            presentation,
            input,
        )?;
        match step {
            Step::Continue(next) => self.position = StoryPosition::At(next),
            Step::Concluded(token) => self.position = StoryPosition::Concluded(token),
            // Only excursions return, and they are never on the main path.
            Step::Returned => {}
        }
        Ok(())
    }

    fn character_sheet(&self) -> String {
        let systems = GameSystems::new(&self.catalog);
        let state = &self.state;
        let vitals = &state.vitals;
        let attrs = &state.attributes;

        let mut lines = vec![
            format!("{} (Level {})", state.name, vitals.level()),
            format!(
                "Experience: {}/{}",
                vitals.experience(),
                systems.stats().threshold(state)
            ),
            format!("Health: {}/{}", vitals.health(), vitals.max_health()),
            format!("Mana: {}/{}", vitals.mana(), vitals.max_mana()),
            format!(
                "Strength {} | Intelligence {} | Agility {} | Luck {}",
                attrs.strength, attrs.intelligence, attrs.agility, attrs.luck
            ),
        ];

        if state.inventory.is_empty() {
            lines.push("Inventory: empty".to_string());
        } else {
            lines.push("Inventory:".to_string());
            for (item, quantity) in state.inventory.iter() {
                lines.push(format!("  {} x{}", self.catalog.item_name(item), quantity));
            }
        }

        let spells: Vec<&str> = state
            .spellbook
            .iter()
            .map(|spell| self.catalog.spell_name(spell))
            .collect();
        lines.push(format!("Spells: {}", list_or_none(&spells)));

        let companions: Vec<&str> = state.companions.iter().map(|c| c.name.as_str()).collect();
        lines.push(format!("Companions: {}", list_or_none(&companions)));

        let achievements: Vec<&str> = systems.achievements().unlocked(state).collect();
        lines.push(format!("Achievements: {}", list_or_none(&achievements)));

        lines.join("\n")
    }

    fn use_item(
        &mut self,
        presentation: &mut dyn Presentation,
        input: &mut dyn Input,
    ) -> NarrativeResult<()> {
        let held: Vec<(String, u32)> = self
            .state
            .inventory
            .iter()
            .map(|(item, quantity)| (item.to_string(), quantity))
            .collect();
        if held.is_empty() {
            presentation.present("Your pack is empty.", Some(Pacing::Instant));
            return Ok(());
        }

        let mut labels: Vec<String> = held
            .iter()
            .map(|(item, quantity)| format!("{} x{}", self.catalog.item_name(item), quantity))
            .collect();
        labels.push("Cancel".to_string());
        let index = ask(presentation, input, "Which item?", &labels)?;
        let Some((item, _)) = held.get(index) else {
            return Ok(());
        };

        let systems = GameSystems::new(&self.catalog);
        let message = match systems
            .inventory()
            .use_item(&mut self.state, &mut self.rng, item)
        {
            Ok(ItemUse::Healed(amount)) => format!("Restored {} health.", amount),
            Ok(ItemUse::ManaBoosted { max_mana }) => {
                format!("Maximum mana rises to {} and your mana is full.", max_mana)
            }
            Ok(ItemUse::Experience(gain)) => gain.to_string(),
            Err(err) => {
                tracing::warn!(item = %item, %err, "item use refused");
                err.to_string()
            }
        };
        presentation.present(&message, Some(Pacing::Narration));
        Ok(())
    }

    fn cast_spell(
        &mut self,
        presentation: &mut dyn Presentation,
        input: &mut dyn Input,
    ) -> NarrativeResult<()> {
        let known: Vec<String> = self.state.spellbook.iter().map(str::to_string).collect();
        if known.is_empty() {
            presentation.present("You don't know any spells yet.", Some(Pacing::Instant));
            return Ok(());
        }

        let mut labels: Vec<String> = known
            .iter()
            .map(|spell| match self.catalog.spell(spell) {
                Some(def) => format!("{} (cost {} mana)", def.name, def.cost),
                None => spell.clone(),
            })
            .collect();
        labels.push("Cancel".to_string());
        let index = ask(presentation, input, "Which spell?", &labels)?;
        let Some(spell) = known.get(index) else {
            return Ok(());
        };

        let systems = GameSystems::new(&self.catalog);
        match systems.magic().cast(&mut self.state, spell) {
            Ok(cast) => {
                presentation.present(
                    &format!("You cast {} for {} mana.", cast.name, cast.cost),
                    Some(Pacing::Narration),
                );
                if cast.effect == SpellEffect::RestoreHealth {
                    let healed = self
                        .state
                        .vitals
                        .heal(self.catalog.progression.heal_spell_amount);
                    presentation.present(
                        &format!("Restored {} health.", healed),
                        Some(Pacing::Narration),
                    );
                }
            }
            Err(err) => {
                tracing::warn!(spell = %spell, %err, "cast refused");
                presentation.present(&err.to_string(), Some(Pacing::Instant));
            }
        }
        Ok(())
    }

    fn explore(
        &mut self,
        presentation: &mut dyn Presentation,
        input: &mut dyn Input,
    ) -> NarrativeResult<()> {
        let open: Vec<SceneId> = EXCURSIONS
            .iter()
            .copied()
            .filter(|id| !self.state.flags.is_set(excursion_flag(*id)))
            .collect();
        if open.is_empty() {
            presentation.present(
                "You have already explored every side path.",
                Some(Pacing::Instant),
            );
            return Ok(());
        }

        let mut labels: Vec<String> = open.iter().map(|id| excursion_label(*id).to_string()).collect();
        labels.push("Go back".to_string());
        let index = ask(presentation, input, "Where will you go?", &labels)?;
        let Some(&excursion) = open.get(index) else {
            return Ok(());
        };

        let step = self.engine.play_from(
            excursion,
            &mut self.state,
            &self.catalog,
            &mut self.rng,
            presentation,
            input,
        )?;
        self.state.flags.set(excursion_flag(excursion), true);
        if let Step::Concluded(token) = step {
            self.position = StoryPosition::Concluded(token);
        }
        Ok(())
    }

    fn save(&mut self, presentation: &mut dyn Presentation, input: &mut dyn Input) {
        let Some(slot) = read_slot(input, "Save name (empty for quicksave)") else {
            return;
        };
        let message = match self.store.save(&slot, &self.state, self.position) {
            Ok(summary) => format!("Game saved to '{}'.", summary.slot),
            Err(err) => {
                tracing::warn!(slot = %slot, %err, "save failed");
                format!("Could not save: {}", err)
            }
        };
        presentation.present(&message, Some(Pacing::Instant));
    }

    fn load(&mut self, presentation: &mut dyn Presentation, input: &mut dyn Input) {
        if !self.show_saves(presentation) {
            return;
        }
        let Some(slot) = read_slot(input, "Load which save?") else {
            return;
        };
        match self.store.load(&slot) {
            Ok((state, position)) => {
                self.state = state;
                self.position = position;
                presentation.present(
                    &format!("Welcome back, {}.", self.state.name),
                    Some(Pacing::Narration),
                );
            }
            Err(err) => {
                tracing::warn!(slot = %slot, %err, "load failed");
                presentation.present(&format!("Could not load: {}", err), Some(Pacing::Instant));
            }
        }
    }

    fn delete(&mut self, presentation: &mut dyn Presentation, input: &mut dyn Input) {
        if !self.show_saves(presentation) {
            return;
        }
        let Some(slot) = read_slot(input, "Delete which save?") else {
            return;
        };
        let message = match self.store.delete(&slot) {
            Ok(()) => format!("Deleted '{}'.", slot),
            Err(err) => {
                tracing::warn!(slot = %slot, %err, "delete failed");
                format!("Could not delete: {}", err)
            }
        };
        presentation.present(&message, Some(Pacing::Instant));
    }

    /// List saved games. False when there is nothing to pick from.
    fn show_saves(&self, presentation: &mut dyn Presentation) -> bool {
        match self.store.list() {
            Ok(slots) if slots.is_empty() => {
                presentation.present("There are no saved games.", Some(Pacing::Instant));
                false
            }
            Ok(slots) => {
                let listing = slots
                    .iter()
                    .map(|s| {
                        format!(
                            "  {} - {} (level {}, {})",
                            s.slot,
                            s.player_name,
                            s.level,
                            s.saved_at.format("%Y-%m-%d %H:%M")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                presentation.present(&listing, Some(Pacing::Instant));
                true
            }
            Err(err) => {
                tracing::warn!(%err, "could not list saves");
                true
            }
        }
    }
}

fn read_slot(input: &mut dyn Input, prompt: &str) -> Option<String> {
    let line = input.read_line(prompt)?;
    let slot = line.trim();
    Some(if slot.is_empty() {
        DEFAULT_SLOT.to_string()
    } else {
        slot.to_string()
    })
}

fn list_or_none(names: &[&str]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// Apply the mechanical side of a random event and describe it.
fn apply_event<R: Rng + ?Sized>(
    event: &RandomEventDef,
    state: &mut PlayerState,
    systems: GameSystems<'_>,
    rng: &mut R,
) -> Vec<String> {
    match event.kind {
        EventKind::Blessing => {
            let message = match rng.gen_range(0..3) {
                0 => {
                    state.vitals.heal(u32::MAX);
                    "Your health is fully restored!".to_string()
                }
                1 => {
                    state.vitals.restore_mana(u32::MAX);
                    "Your mana is fully restored!".to_string()
                }
                _ => systems
                    .stats()
                    .gain_experience(state, rng, BLESSING_EXPERIENCE)
                    .to_string(),
            };
            vec![message]
        }
        EventKind::Trade => match systems.inventory().add(state, "magic_crystal", 1) {
            Ok(added) => vec!["The merchant offers you a rare item!".to_string(), added.to_string()],
            Err(err) => {
                tracing::warn!(%err, "trade declined");
                vec![format!("The merchant has nothing you can carry: {}", err)]
            }
        },
        EventKind::Choice | EventKind::Magic | EventKind::MagicChaos => Vec::new(),
    }
}
