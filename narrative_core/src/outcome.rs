//! Outcome tokens: the closed vocabulary scenes and the dispatcher emit.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! outcomes {
    ($($variant:ident => $token:literal,)+) => {
        /// A symbolic outcome. The graph router and the ending catalog agree
        /// on this set; anything outside it cannot be expressed.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Outcome {
            $(#[serde(rename = $token)] $variant,)+
        }

        impl Outcome {
            /// Every token, in declaration order.
            pub const ALL: &'static [Outcome] = &[$(Outcome::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Outcome::$variant => $token,)+
                }
            }
        }

        impl FromStr for Outcome {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok(Outcome::$variant),)+
                    other => Err(UnknownToken(other.to_string())),
                }
            }
        }
    };
}

outcomes! {
    // Navigation
    Forest => "forest",
    Cave => "cave",
    Rest => "rest",
    FairyGlade => "fairy_glade",
    AncientGrove => "ancient_grove",
    BabblingBrook => "babbling_brook",
    HiddenEntrance => "hidden_entrance",
    CrystalHall => "crystal_hall",
    CrystalPassage => "crystal_passage",
    AncientSymbols => "ancient_symbols",
    UndergroundLake => "underground_lake",
    TreasureChamber => "treasure_chamber",
    ChamberDetails => "chamber_details",
    RiddleTrial => "riddle_trial",
    Boss => "boss",
    Peaceful => "peaceful",

    // Treasure chamber exits
    RiddleSolved => "riddle_solved",
    RiddleRetry => "riddle_retry",
    TreasureMaster => "treasure_master",
    PartialTreasure => "partial_treasure",
    SecretGarden => "secret_garden",
    AncientKnowledge => "ancient_knowledge",
    HiddenArtifacts => "hidden_artifacts",
    TheftFailed => "theft_failed",
    MinorTheft => "minor_theft",
    Cursed => "cursed",
    WiseRestraint => "wise_restraint",

    // Climactic encounter
    PeacefulVictory => "peaceful_victory",
    PowerVictory => "power_victory",
    NatureVictory => "nature_victory",
    StrengthVictory => "strength_victory",
    WisdomVictory => "wisdom_victory",
    CombatVictory => "combat_victory",
    HardVictory => "hard_victory",
    HonorableDefeat => "honorable_defeat",

    // Side excursions
    OwlGuardian => "owl_guardian",
    LibraryStudied => "library_studied",
    OwlEncountered => "owl_encountered",
    SecretsDiscovered => "secrets_discovered",
    PastDragon => "past_dragon",
    PastFirstMage => "past_first_mage",
    DragonBlessed => "dragon_blessed",
    FirstMageMet => "first_mage_met",
    FutureGlimpsed => "future_glimpsed",
    AlterHistory => "alter_history",
    HistoryAltered => "history_altered",
    TemporalEnergyAbsorbed => "temporal_energy_absorbed",
    AdventurersGathered => "adventurers_gathered",
    AdventurerBefriended => "adventurer_befriended",
    WisdomShared => "wisdom_shared",
    SuppliesTraded => "supplies_traded",
    TrainingReceived => "training_received",
    CollaborationCompleted => "collaboration_completed",
    DuelFought => "duel_fought",
    SpiritCommunion => "spirit_communion",
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is not part of the token vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown outcome token '{0}'")]
pub struct UnknownToken(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_strings_round_trip() {
        for outcome in Outcome::ALL {
            assert_eq!(outcome.as_str().parse::<Outcome>().unwrap(), *outcome);
        }
    }

    #[test]
    fn test_unknown_token_rejected() {
        let err = "victory_dance".parse::<Outcome>().unwrap_err();
        assert_eq!(err, UnknownToken("victory_dance".into()));
    }

    #[test]
    fn test_serde_uses_token_names() {
        let json = serde_json::to_string(&Outcome::PeacefulVictory).unwrap();
        assert_eq!(json, "\"peaceful_victory\"");

        let back: Outcome = serde_json::from_str("\"wise_restraint\"").unwrap();
        assert_eq!(back, Outcome::WiseRestraint);
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for outcome in Outcome::ALL {
            assert!(seen.insert(outcome.as_str()), "duplicate {}", outcome);
        }
    }
}
