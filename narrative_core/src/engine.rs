//! The narrative state machine.
//!
//! One call to [`NarrativeEngine::play_scene`] renders a scene, waits for a
//! valid choice, runs its effect and follows the transition table to the
//! next state.

use game_rules::{Catalog, GameSystems, PlayerState};
use rand::RngCore;

use crate::dispatcher::{self, Resolution};
use crate::endings::{EndingCatalog, FinalSummary};
use crate::error::{NarrativeError, NarrativeResult};
use crate::graph::{SceneGraph, Transition};
use crate::io::{ask, Input, Pacing, Presentation};
use crate::outcome::Outcome;
use crate::scene::{SceneContext, SceneId};

/// Where the story stands after a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue(SceneId),
    Concluded(Outcome),
    /// A side excursion finished.
    Returned,
}

#[derive(Debug, Clone)]
pub struct NarrativeEngine {
    graph: SceneGraph,
    endings: EndingCatalog,
}

impl NarrativeEngine {
    /// Build an engine, rejecting graphs with unrouted outcomes.
    pub fn new(graph: SceneGraph, endings: EndingCatalog) -> NarrativeResult<Self> {
        graph.validate(&endings)?;
        Ok(Self { graph, endings })
    }

    pub fn standard() -> NarrativeResult<Self> {
        Self::new(SceneGraph::standard(), EndingCatalog::standard())
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn endings(&self) -> &EndingCatalog {
        &self.endings
    }

    /// Play one scene to completion and work out where the story goes next.
    ///
    /// The effect runs against a draft of the player. The draft replaces
    /// `state` only once the outcome is one the choice declares, so a failed
    /// scene leaves the player untouched.
    pub fn play_scene(
        &self,
        id: SceneId,
        state: &mut PlayerState,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
        presentation: &mut dyn Presentation,
        input: &mut dyn Input,
    ) -> NarrativeResult<Step> {
        let scene = self.graph.scene(id)?;
        tracing::debug!(scene = ?id, "entering scene");

        presentation.present(scene.title, Some(Pacing::Dramatic));
        presentation.present(scene.prompt, Some(Pacing::Narration));

        let index = ask(presentation, input, "What do you choose?", &scene.labels())?;
        let choice = &scene.choices[index];

        let mut draft = state.clone();
        draft.counters.visit(id.location());
        let systems = GameSystems::new(catalog);
        let mut ctx = SceneContext::new(&mut draft, systems, &mut *rng);
        let outcome = (choice.effect)(&mut ctx);
        let notices = ctx.into_notices();

        if !choice.emits.contains(&outcome) {
            tracing::error!(scene = ?id, choice = choice.label, %outcome, "undeclared outcome");
            return Err(NarrativeError::UndeclaredOutcome {
                scene: id,
                choice: choice.label.to_string(),
                outcome,
            });
        }

        *state = draft;
        for notice in notices {
            presentation.present(&notice, Some(Pacing::Narration));
        }
        self.follow(id, outcome, state, rng)
    }

    /// Resolve the transition for `outcome` emitted by `from`.
    pub fn follow(
        &self,
        from: SceneId,
        outcome: Outcome,
        state: &PlayerState,
        rng: &mut dyn RngCore,
    ) -> NarrativeResult<Step> {
        let step = match self.graph.next(from, outcome)? {
            Transition::Scene(next) => Step::Continue(next),
            Transition::Ending(token) => {
                self.endings.get(token)?;
                Step::Concluded(token)
            }
            Transition::Return => Step::Returned,
            Transition::Resolve => match dispatcher::resolve(state, rng) {
                Resolution::Scene(next) => Step::Continue(next),
                Resolution::Outcome(token) => {
                    self.endings.get(token)?;
                    Step::Concluded(token)
                }
            },
        };
        tracing::debug!(from = ?from, %outcome, ?step, "transition");
        Ok(step)
    }

    /// Apply the ending, present it, and return the final summary.
    pub fn conclude(
        &self,
        token: Outcome,
        state: &mut PlayerState,
        catalog: &Catalog,
        presentation: &mut dyn Presentation,
    ) -> NarrativeResult<FinalSummary> {
        let systems = GameSystems::new(catalog);
        let ending = self.endings.get(token)?;
        presentation.present(ending.title, Some(Pacing::Dramatic));
        presentation.present(ending.narration, Some(Pacing::Narration));

        for notice in self.endings.settle(token, state, systems)? {
            presentation.present(&notice, Some(Pacing::Instant));
        }

        let summary = self.endings.summary(token, state, systems)?;
        presentation.present(&summary.to_text(), Some(Pacing::Instant));
        Ok(summary)
    }

    /// Play from `start` until the story concludes or an excursion returns.
    pub fn play_from(
        &self,
        start: SceneId,
        state: &mut PlayerState,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
        presentation: &mut dyn Presentation,
        input: &mut dyn Input,
    ) -> NarrativeResult<Step> {
        let mut current = start;
        loop {
            match self.play_scene(current, state, catalog, rng, presentation, input)? {
                Step::Continue(next) => current = next,
                done => return Ok(done),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::testing::{Script, Transcript};
    use crate::scene::Scene;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (Catalog, PlayerState, NarrativeEngine, StdRng) {
        let catalog = Catalog::builtin().unwrap();
        let player = PlayerState::new("Tester", &catalog);
        (catalog, player, NarrativeEngine::standard().unwrap(), StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_invalid_input_retried_in_place() {
        let (catalog, mut player, engine, mut rng) = setup();
        let mut out = Transcript::default();
        let mut input = Script::new(["seven", "0", "9", "1"]);

        let step = engine
            .play_scene(SceneId::Intro, &mut player, &catalog, &mut rng, &mut out, &mut input)
            .unwrap();

        assert_eq!(step, Step::Continue(SceneId::Forest));
        assert_eq!(input.remaining(), 0);
        let retries = out.lines.iter().filter(|l| l.starts_with("Please enter")).count();
        assert_eq!(retries, 3);
    }

    #[test]
    fn test_closed_input_stops_scene() {
        let (catalog, mut player, engine, mut rng) = setup();
        let mut out = Transcript::default();
        let mut input = Script::new(Vec::<String>::new());

        let err = engine
            .play_scene(SceneId::Intro, &mut player, &catalog, &mut rng, &mut out, &mut input)
            .unwrap_err();
        assert!(matches!(err, NarrativeError::InputClosed));
    }

    #[test]
    fn test_rest_concludes_immediately() {
        let (catalog, mut player, engine, mut rng) = setup();
        player.vitals.damage(50);
        let mut out = Transcript::default();
        let mut input = Script::new(["3"]);

        let step = engine
            .play_scene(SceneId::Intro, &mut player, &catalog, &mut rng, &mut out, &mut input)
            .unwrap();

        assert_eq!(step, Step::Concluded(Outcome::Rest));
        assert_eq!(player.vitals.health(), 100);
        assert!(player.counters.locations_visited.contains("village"));
    }

    #[test]
    fn test_peace_ritual_leads_to_peaceful_ending() {
        let (catalog, mut player, engine, mut rng) = setup();
        let mut out = Transcript::default();
        // Cave, Ancient Symbols, peace ritual.
        let mut input = Script::new(["2", "2", "3"]);

        let step = engine
            .play_from(SceneId::Intro, &mut player, &catalog, &mut rng, &mut out, &mut input)
            .unwrap();

        assert_eq!(step, Step::Concluded(Outcome::Peaceful));
        assert!(player.flags.is_set("knows_peace_ritual"));
    }

    #[test]
    fn test_guardian_history_enters_words_of_compassion() {
        let (catalog, mut player, engine, mut rng) = setup();
        let mut out = Transcript::default();
        // Cave, Ancient Symbols, history, then a compassionate word.
        let mut input = Script::new(["2", "2", "2", "1"]);

        let step = engine
            .play_from(SceneId::Intro, &mut player, &catalog, &mut rng, &mut out, &mut input)
            .unwrap();

        assert_eq!(step, Step::Concluded(Outcome::PeacefulVictory));
        assert!(out.contains("Words of Compassion"));
        assert!(player.counters.locations_visited.contains("shadow_lair"));
    }

    #[test]
    fn test_conclude_presents_summary() {
        let (catalog, mut player, engine, _) = setup();
        let mut out = Transcript::default();

        let summary = engine
            .conclude(Outcome::PeacefulVictory, &mut player, &catalog, &mut out)
            .unwrap();

        assert_eq!(summary.epithet, "LEGENDARY PEACEMAKER");
        assert!(player.has_achievement("peacemaker"));
        assert!(out.contains("Final Title: LEGENDARY PEACEMAKER"));
    }

    fn wander_off(ctx: &mut SceneContext<'_>) -> Outcome {
        ctx.set_flag("wandered");
        ctx.damage(30);
        ctx.grant_item("fairy_dust", 1);
        Outcome::Rest
    }

    #[test]
    fn test_undeclared_outcome_leaves_player_untouched() {
        let (catalog, mut player, _, mut rng) = setup();
        let mut graph = SceneGraph::standard();
        graph.add_scene(
            Scene::new(SceneId::Intro, "Village Gate", "A path leads away.")
                .choice("Wander off", &[Outcome::Forest], wander_off),
        );
        let engine = NarrativeEngine::new(graph, EndingCatalog::standard()).unwrap();
        let before = player.clone();
        let mut out = Transcript::default();

        let err = engine
            .play_scene(SceneId::Intro, &mut player, &catalog, &mut rng, &mut out, &mut Script::new(["1"]))
            .unwrap_err();

        assert!(matches!(
            err,
            NarrativeError::UndeclaredOutcome { scene: SceneId::Intro, outcome: Outcome::Rest, .. }
        ));
        assert_eq!(player, before);
        assert!(!out.contains("You lose 30 health."));
    }

    #[test]
    fn test_excursion_returns() {
        let (catalog, mut player, engine, mut rng) = setup();
        let mut out = Transcript::default();
        let mut input = Script::new(["2", "3"]);

        let step = engine
            .play_from(SceneId::MysticalLibrary, &mut player, &catalog, &mut rng, &mut out, &mut input)
            .unwrap();

        assert_eq!(step, Step::Returned);
        assert!(player.counters.locations_visited.contains("mystical_library"));
    }
}
