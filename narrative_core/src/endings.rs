//! Terminal narrative payloads and the final summary.

use std::collections::BTreeMap;
use std::fmt;

use game_rules::{GameSystems, PlayerState};

use crate::error::{NarrativeError, NarrativeResult};
use crate::outcome::Outcome;

/// A terminal ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ending {
    pub token: Outcome,
    pub title: &'static str,
    /// The title shown in the final summary.
    pub epithet: &'static str,
    pub honour: &'static str,
    pub narration: &'static str,
}

const PATHFINDER_TITLE: &str = "The Unique Path";
const PATHFINDER_EPITHET: &str = "UNIQUE PATHFINDER";
const PATHFINDER_HONOUR: &str = "The best path is often the one you make yourself.";

/// Flags worth a line in the final summary.
pub const HIGHLIGHTS: &[(&str, &str)] = &[
    ("has_fairy_blessing", "Blessed by the Fairies"),
    ("passed_wolf_trial", "Passed the Wolf's Trial"),
    ("crystal_power", "Mastered Crystal Power"),
    ("knows_guardian_history", "Learned Ancient History"),
    ("inner_peace", "Achieved Inner Peace"),
    ("treasure_master", "Master of Ancient Riddles"),
    ("found_secret_garden", "Discovered the Secret Garden"),
    ("infinite_wisdom", "Gained Infinite Wisdom"),
    ("has_destiny_compass", "Bearer of the Destiny Compass"),
    ("knows_complete_history", "Scholar of Ancient Lore"),
];

/// Shown when no highlight flag is set.
pub const NO_HIGHLIGHTS: &str = "Forged Your Own Path";

/// Maps ending tokens to their payloads.
#[derive(Debug, Clone)]
pub struct EndingCatalog {
    endings: BTreeMap<Outcome, Ending>,
}

impl EndingCatalog {
    pub fn standard() -> Self {
        let rows = [
            (
                Outcome::PeacefulVictory,
                "The Peacemaker",
                "LEGENDARY PEACEMAKER",
                "True heroes heal rather than harm.",
                "The Shadow Guardian, freed at last, fades into light.",
            ),
            (
                Outcome::PowerVictory,
                "The Power Master",
                "MASTER OF MYSTICAL POWER",
                "True power lies in knowing how to use it wisely.",
                "Balanced crystal power restores harmony to the Guardian.",
            ),
            (
                Outcome::NatureVictory,
                "Nature's Champion",
                "CHAMPION OF NATURE",
                "Life finds a way, and you are its guide.",
                "The fairy blessing turns shadow back into living light.",
            ),
            (
                Outcome::StrengthVictory,
                "The Proven Warrior",
                "PROVEN WARRIOR",
                "Courage is not the absence of fear, but action in spite of it.",
                "The strength of the wolf carries you through the battle.",
            ),
            (
                Outcome::WisdomVictory,
                "The Sage of Ages",
                "SAGE OF AGES",
                "The pen is mightier than the sword, and wisdom mightier than both.",
                "Ancient knowledge binds the Guardian without a single blow.",
            ),
            (
                Outcome::CombatVictory,
                "The Valiant Hero",
                "VALIANT HERO",
                "Heroes are made, not born, in moments of greatest trial.",
                "After a fierce battle, the Shadow Guardian falls.",
            ),
            (
                Outcome::HardVictory,
                "The Scarred Champion",
                "SCARRED CHAMPION",
                "Victory is sweetest when it costs us something precious.",
                "You win, wounded and weary, but you win.",
            ),
            (
                Outcome::HonorableDefeat,
                "The Honorable Fallen",
                "HONORABLE WARRIOR",
                "It is better to fail with honor than to succeed without it.",
                "The Guardian prevails, yet it honours your courage and lets you go.",
            ),
            (
                Outcome::Peaceful,
                "The Peacekeeper",
                "KEEPER OF PEACE",
                "The greatest victory is the battle not fought.",
                "You choose a quiet path, and the realm is calmer for it.",
            ),
            (
                Outcome::Rest,
                "The Contemplative Sage",
                "CONTEMPLATIVE SAGE",
                "In stillness, all answers are found.",
                "You rest in the village and find the answers you needed within.",
            ),
            (
                Outcome::TreasureMaster,
                "The Riddle Master",
                "MASTER OF ANCIENT RIDDLES",
                "True wealth lies in the treasures of the mind.",
                "Every riddle answered, the chamber yields its greatest treasure.",
            ),
            (
                Outcome::SecretGarden,
                "The Garden Keeper",
                "KEEPER OF THE SECRET GARDEN",
                "In tending to beauty, we become beautiful ourselves.",
                "You stay to tend the hidden garden beneath the mountain.",
            ),
            (
                Outcome::AncientKnowledge,
                "The Ancient Scholar",
                "KEEPER OF ANCIENT KNOWLEDGE",
                "Knowledge preserved is wisdom shared across the ages.",
                "The murals' secrets become your life's work.",
            ),
            (
                Outcome::WiseRestraint,
                "The Destiny Walker",
                "BEARER OF THE DESTINY COMPASS",
                "The greatest treasure is knowing your true purpose.",
                "You leave the gold behind and follow the compass instead.",
            ),
            (
                Outcome::HiddenArtifacts,
                PATHFINDER_TITLE,
                PATHFINDER_EPITHET,
                PATHFINDER_HONOUR,
                "Laden with hidden artifacts, you slip away to chart your own course.",
            ),
            (
                Outcome::TheftFailed,
                PATHFINDER_TITLE,
                PATHFINDER_EPITHET,
                PATHFINDER_HONOUR,
                "Empty-handed but wiser, you walk out into the daylight.",
            ),
            (
                Outcome::MinorTheft,
                PATHFINDER_TITLE,
                PATHFINDER_EPITHET,
                PATHFINDER_HONOUR,
                "A few coins richer, you vanish before anyone notices.",
            ),
            (
                Outcome::Cursed,
                PATHFINDER_TITLE,
                PATHFINDER_EPITHET,
                PATHFINDER_HONOUR,
                "Marked by greed, you set out to find a way to lift the curse.",
            ),
        ];

        let endings = rows
            .into_iter()
            .map(|(token, title, epithet, honour, narration)| {
                (
                    token,
                    Ending {
                        token,
                        title,
                        epithet,
                        honour,
                        narration,
                    },
                )
            })
            .collect();
        Self { endings }
    }

    pub fn get(&self, token: Outcome) -> NarrativeResult<&Ending> {
        self.endings
            .get(&token)
            .ok_or(NarrativeError::UnknownEnding(token))
    }

    pub fn len(&self) -> usize {
        self.endings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endings.is_empty()
    }

    /// Apply the lasting effects of reaching `token`. Returns notices for
    /// the player.
    pub fn settle(
        &self,
        token: Outcome,
        state: &mut PlayerState,
        systems: GameSystems<'_>,
    ) -> NarrativeResult<Vec<String>> {
        let ending = self.get(token)?;
        let mut notices = Vec::new();

        match token {
            Outcome::PeacefulVictory => {
                if let Ok(Some(announcement)) = systems.achievements().unlock(state, "peacemaker") {
                    notices.push(announcement.to_string());
                }
            }
            Outcome::CombatVictory | Outcome::HardVictory => {
                state.counters.battles_won += 1;
            }
            _ => {}
        }
        notices.extend(
            systems
                .achievements()
                .check_milestones(state)
                .into_iter()
                .map(|a| a.to_string()),
        );

        tracing::info!(ending = %token, title = ending.title, "story concluded");
        Ok(notices)
    }

    /// Build the closing summary for `state`.
    pub fn summary(&self, token: Outcome, state: &PlayerState, systems: GameSystems<'_>) -> NarrativeResult<FinalSummary> {
        let ending = self.get(token)?;
        let mut highlights: Vec<String> = HIGHLIGHTS
            .iter()
            .filter(|(flag, _)| state.flags.is_set(flag))
            .map(|(_, line)| line.to_string())
            .collect();
        if highlights.is_empty() {
            highlights.push(NO_HIGHLIGHTS.to_string());
        }

        Ok(FinalSummary {
            name: state.name.clone(),
            title: ending.title.to_string(),
            epithet: ending.epithet.to_string(),
            honour: ending.honour.to_string(),
            level: state.vitals.level(),
            health: state.vitals.health(),
            max_health: state.vitals.max_health(),
            mana: state.vitals.mana(),
            max_mana: state.vitals.max_mana(),
            keepsakes: state.keepsakes.clone(),
            highlights,
            achievements: systems
                .achievements()
                .unlocked(state)
                .map(str::to_string)
                .collect(),
        })
    }
}

/// The closing statistics screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalSummary {
    pub name: String,
    pub title: String,
    pub epithet: String,
    pub honour: String,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub keepsakes: Vec<String>,
    pub highlights: Vec<String>,
    pub achievements: Vec<String>,
}

impl FinalSummary {
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FinalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.title)?;
        writeln!(f, "\"{}\"", self.honour)?;
        writeln!(f)?;
        writeln!(f, "Hero: {}", self.name)?;
        writeln!(f, "Final Title: {}", self.epithet)?;
        writeln!(f, "Level: {}", self.level)?;
        writeln!(f, "Health: {}/{}", self.health, self.max_health)?;
        writeln!(f, "Mana: {}/{}", self.mana, self.max_mana)?;

        writeln!(f, "Keepsakes:")?;
        if self.keepsakes.is_empty() {
            writeln!(f, "  no keepsakes")?;
        }
        for keepsake in &self.keepsakes {
            writeln!(f, "  - {}", keepsake)?;
        }

        writeln!(f, "Journey Highlights:")?;
        for line in &self.highlights {
            writeln!(f, "  * {}", line)?;
        }

        write!(f, "Achievements ({}):", self.achievements.len())?;
        for name in &self.achievements {
            write!(f, "\n  + {}", name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_rules::Catalog;

    #[test]
    fn test_every_ending_token_resolves() {
        let catalog = EndingCatalog::standard();
        assert_eq!(catalog.len(), 18);
        assert_eq!(catalog.get(Outcome::Rest).unwrap().epithet, "CONTEMPLATIVE SAGE");
        assert!(matches!(
            catalog.get(Outcome::Forest),
            Err(NarrativeError::UnknownEnding(Outcome::Forest))
        ));
    }

    #[test]
    fn test_peaceful_victory_unlocks_peacemaker() {
        let rules = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &rules);
        let endings = EndingCatalog::standard();

        let notices = endings
            .settle(Outcome::PeacefulVictory, &mut player, GameSystems::new(&rules))
            .unwrap();

        assert!(player.has_achievement("peacemaker"));
        assert!(notices[0].contains("Peacemaker"));
    }

    #[test]
    fn test_combat_victory_counts_battle() {
        let rules = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &rules);
        let endings = EndingCatalog::standard();

        endings
            .settle(Outcome::HardVictory, &mut player, GameSystems::new(&rules))
            .unwrap();
        endings
            .settle(Outcome::WisdomVictory, &mut player, GameSystems::new(&rules))
            .unwrap();

        assert_eq!(player.counters.battles_won, 1);
    }

    #[test]
    fn test_summary_without_keepsakes_or_highlights() {
        let rules = Catalog::builtin().unwrap();
        let player = PlayerState::new("Mira", &rules);
        let endings = EndingCatalog::standard();

        let text = endings
            .summary(Outcome::Rest, &player, GameSystems::new(&rules))
            .unwrap()
            .to_text();

        assert!(text.contains("Hero: Mira"));
        assert!(text.contains("Final Title: CONTEMPLATIVE SAGE"));
        assert!(text.contains("no keepsakes"));
        assert!(text.contains(NO_HIGHLIGHTS));
    }

    #[test]
    fn test_summary_lists_highlights_in_order() {
        let rules = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Mira", &rules);
        player.flags.set("inner_peace", true);
        player.flags.set("crystal_power", "balanced");
        player.add_keepsake("Destiny Compass");

        let summary = EndingCatalog::standard()
            .summary(Outcome::Peaceful, &player, GameSystems::new(&rules))
            .unwrap();

        assert_eq!(
            summary.highlights,
            vec!["Mastered Crystal Power".to_string(), "Achieved Inner Peace".to_string()]
        );
        assert_eq!(summary.keepsakes, vec!["Destiny Compass".to_string()]);
    }
}
