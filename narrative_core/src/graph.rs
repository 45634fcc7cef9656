//! The scene graph: scene nodes plus an explicit transition table keyed by
//! `(scene, outcome)`.

use std::collections::BTreeMap;

use crate::endings::EndingCatalog;
use crate::error::{NarrativeError, NarrativeResult};
use crate::outcome::Outcome;
use crate::scene::{all_scenes, Scene, SceneId};

/// Where an outcome leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Play another scene.
    Scene(SceneId),
    /// The story is over.
    Ending(Outcome),
    /// Hand the decision to the resolution dispatcher.
    Resolve,
    /// Leave a side excursion and go back to the journey.
    Return,
}

/// Scenes that are entered from the adventure menu rather than the story.
pub const EXCURSIONS: [SceneId; 3] = [
    SceneId::MysticalLibrary,
    SceneId::TimeNexus,
    SceneId::Crossroads,
];

#[derive(Debug, Clone)]
pub struct SceneGraph {
    scenes: BTreeMap<SceneId, Scene>,
    transitions: BTreeMap<(SceneId, Outcome), Transition>,
}

impl SceneGraph {
    /// The full game graph.
    pub fn standard() -> Self {
        let scenes = all_scenes().into_iter().map(|s| (s.id, s)).collect();
        let mut graph = Self {
            scenes,
            transitions: BTreeMap::new(),
        };
        graph.route_story();
        graph.route_treasure();
        graph.route_excursions();
        graph
    }

    /// Derived routes: outcomes that mean the same thing wherever they are
    /// emitted get the same transition for every scene that declares them.
    fn route_story(&mut self) {
        let global = [
            (Outcome::Forest, Transition::Scene(SceneId::Forest)),
            (Outcome::Cave, Transition::Scene(SceneId::Cave)),
            (Outcome::FairyGlade, Transition::Scene(SceneId::FairyGlade)),
            (Outcome::AncientGrove, Transition::Scene(SceneId::AncientGrove)),
            (Outcome::BabblingBrook, Transition::Scene(SceneId::BabblingBrook)),
            (Outcome::HiddenEntrance, Transition::Scene(SceneId::HiddenEntrance)),
            (Outcome::CrystalHall, Transition::Scene(SceneId::CrystalHall)),
            (Outcome::CrystalPassage, Transition::Scene(SceneId::CrystalPassage)),
            (Outcome::AncientSymbols, Transition::Scene(SceneId::AncientSymbols)),
            (Outcome::UndergroundLake, Transition::Scene(SceneId::UndergroundLake)),
            (Outcome::TreasureChamber, Transition::Scene(SceneId::TreasureChamber)),
            (Outcome::Rest, Transition::Ending(Outcome::Rest)),
            (Outcome::Peaceful, Transition::Ending(Outcome::Peaceful)),
            (Outcome::Boss, Transition::Resolve),
            (Outcome::PeacefulVictory, Transition::Ending(Outcome::PeacefulVictory)),
        ];
        self.route_everywhere(&global);
    }

    fn route_treasure(&mut self) {
        let exits = [
            (Outcome::ChamberDetails, Transition::Scene(SceneId::ChamberDetails)),
            (Outcome::RiddleTrial, Transition::Scene(SceneId::RiddleOfWisdom)),
            (Outcome::TreasureMaster, Transition::Resolve),
            (Outcome::PartialTreasure, Transition::Resolve),
            (Outcome::AncientKnowledge, Transition::Resolve),
            (Outcome::SecretGarden, Transition::Ending(Outcome::SecretGarden)),
            (Outcome::HiddenArtifacts, Transition::Ending(Outcome::HiddenArtifacts)),
            (Outcome::TheftFailed, Transition::Ending(Outcome::TheftFailed)),
            (Outcome::MinorTheft, Transition::Ending(Outcome::MinorTheft)),
            (Outcome::Cursed, Transition::Ending(Outcome::Cursed)),
            (Outcome::WiseRestraint, Transition::Ending(Outcome::WiseRestraint)),
        ];
        self.route_everywhere(&exits);

        let riddles = [
            (SceneId::RiddleOfWisdom, Some(SceneId::RiddleOfCourage)),
            (SceneId::RiddleOfCourage, Some(SceneId::RiddleOfMystery)),
            (SceneId::RiddleOfMystery, None),
        ];
        for (riddle, next) in riddles {
            self.route(riddle, Outcome::RiddleRetry, Transition::Scene(riddle));
            if let Some(next) = next {
                self.route(riddle, Outcome::RiddleSolved, Transition::Scene(next));
            }
        }
    }

    fn route_excursions(&mut self) {
        self.route(
            SceneId::MysticalLibrary,
            Outcome::OwlGuardian,
            Transition::Scene(SceneId::OwlGuardian),
        );
        self.route(
            SceneId::TimeNexus,
            Outcome::PastDragon,
            Transition::Scene(SceneId::NexusDragon),
        );
        self.route(
            SceneId::TimeNexus,
            Outcome::PastFirstMage,
            Transition::Scene(SceneId::NexusFirstMage),
        );
        self.route(
            SceneId::TimeNexus,
            Outcome::AlterHistory,
            Transition::Scene(SceneId::NexusAlterHistory),
        );
        self.route(
            SceneId::Crossroads,
            Outcome::AdventurersGathered,
            Transition::Scene(SceneId::CrossroadsGathering),
        );
        self.route(
            SceneId::CrossroadsGathering,
            Outcome::AdventurerBefriended,
            Transition::Scene(SceneId::CrossroadsConversation),
        );

        let returns = [
            Outcome::LibraryStudied,
            Outcome::OwlEncountered,
            Outcome::SecretsDiscovered,
            Outcome::DragonBlessed,
            Outcome::FirstMageMet,
            Outcome::FutureGlimpsed,
            Outcome::HistoryAltered,
            Outcome::TemporalEnergyAbsorbed,
            Outcome::WisdomShared,
            Outcome::SuppliesTraded,
            Outcome::TrainingReceived,
            Outcome::CollaborationCompleted,
            Outcome::DuelFought,
            Outcome::SpiritCommunion,
        ];
        let routes: Vec<_> = returns.iter().map(|o| (*o, Transition::Return)).collect();
        self.route_everywhere(&routes);
    }

    /// Route each outcome for every scene that declares it.
    fn route_everywhere(&mut self, routes: &[(Outcome, Transition)]) {
        let mut pending = Vec::new();
        for scene in self.scenes.values() {
            for choice in &scene.choices {
                for emitted in choice.emits {
                    if let Some((_, to)) = routes.iter().find(|(o, _)| o == emitted) {
                        pending.push((scene.id, *emitted, *to));
                    }
                }
            }
        }
        for (scene, outcome, to) in pending {
            self.route(scene, outcome, to);
        }
    }

    /// Insert a scene, replacing any scene with the same id. Its outcomes
    /// still need routes before the graph validates.
    pub fn add_scene(&mut self, scene: Scene) {
        self.scenes.insert(scene.id, scene);
    }

    pub fn route(&mut self, scene: SceneId, outcome: Outcome, to: Transition) {
        self.transitions.insert((scene, outcome), to);
    }

    pub fn scene(&self, id: SceneId) -> NarrativeResult<&Scene> {
        self.scenes.get(&id).ok_or(NarrativeError::UnknownScene(id))
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    /// Look up the transition for `outcome` emitted by `from`.
    pub fn next(&self, from: SceneId, outcome: Outcome) -> NarrativeResult<Transition> {
        self.transitions
            .get(&(from, outcome))
            .copied()
            .ok_or(NarrativeError::UnroutableOutcome {
                scene: from,
                outcome,
            })
    }

    /// Check the whole graph: every declared outcome is routed, every
    /// target scene exists, and every ending has a catalog entry.
    pub fn validate(&self, endings: &EndingCatalog) -> NarrativeResult<()> {
        for scene in self.scenes.values() {
            for choice in &scene.choices {
                for outcome in choice.emits {
                    match self.next(scene.id, *outcome)? {
                        Transition::Scene(target) => {
                            self.scene(target)?;
                        }
                        Transition::Ending(token) => {
                            endings.get(token)?;
                        }
                        Transition::Resolve | Transition::Return => {}
                    }
                }
            }
        }
        tracing::debug!(
            scenes = self.scenes.len(),
            transitions = self.transitions.len(),
            "scene graph validated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_graph_is_valid() {
        let graph = SceneGraph::standard();
        graph.validate(&EndingCatalog::standard()).unwrap();
    }

    #[test]
    fn test_intro_routes() {
        let graph = SceneGraph::standard();
        assert_eq!(
            graph.next(SceneId::Intro, Outcome::Forest).unwrap(),
            Transition::Scene(SceneId::Forest)
        );
        assert_eq!(
            graph.next(SceneId::Intro, Outcome::Rest).unwrap(),
            Transition::Ending(Outcome::Rest)
        );
    }

    #[test]
    fn test_riddles_chain_and_retry_in_place() {
        let graph = SceneGraph::standard();
        assert_eq!(
            graph.next(SceneId::RiddleOfWisdom, Outcome::RiddleSolved).unwrap(),
            Transition::Scene(SceneId::RiddleOfCourage)
        );
        assert_eq!(
            graph.next(SceneId::RiddleOfMystery, Outcome::RiddleRetry).unwrap(),
            Transition::Scene(SceneId::RiddleOfMystery)
        );
        assert_eq!(
            graph.next(SceneId::RiddleOfMystery, Outcome::TreasureMaster).unwrap(),
            Transition::Resolve
        );
    }

    #[test]
    fn test_unrouted_token_is_rejected() {
        let graph = SceneGraph::standard();
        let err = graph.next(SceneId::Intro, Outcome::Cursed).unwrap_err();
        assert!(matches!(
            err,
            NarrativeError::UnroutableOutcome {
                scene: SceneId::Intro,
                outcome: Outcome::Cursed
            }
        ));
    }

    #[test]
    fn test_excursions_return() {
        let graph = SceneGraph::standard();
        assert_eq!(
            graph.next(SceneId::OwlGuardian, Outcome::OwlEncountered).unwrap(),
            Transition::Return
        );
        assert_eq!(
            graph.next(SceneId::TimeNexus, Outcome::PastDragon).unwrap(),
            Transition::Scene(SceneId::NexusDragon)
        );
        assert_eq!(
            graph.next(SceneId::TimeNexus, Outcome::AlterHistory).unwrap(),
            Transition::Scene(SceneId::NexusAlterHistory)
        );
        assert_eq!(
            graph.next(SceneId::NexusAlterHistory, Outcome::HistoryAltered).unwrap(),
            Transition::Return
        );
        for id in EXCURSIONS {
            assert!(graph.scene(id).is_ok());
        }
    }

    #[test]
    fn test_validation_catches_missing_route() {
        let mut graph = SceneGraph::standard();
        graph.transitions.remove(&(SceneId::Cave, Outcome::CrystalHall));
        assert!(graph.validate(&EndingCatalog::standard()).is_err());
    }
}
