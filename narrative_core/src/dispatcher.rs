//! Resolution dispatcher for the climactic encounter.
//!
//! Precedence lives in ordered tables of named predicates. The first tier
//! whose predicate holds wins, whatever later tiers would have said.

use game_rules::{Flags, PlayerState};
use rand::Rng;

use crate::outcome::Outcome;
use crate::scene::SceneId;

/// Flags that show the player understands the Guardian.
pub const UNDERSTANDING_FLAGS: &[&str] = &["knows_peace_ritual", "saw_true_self", "knows_guardian_history"];
/// Flags that show the player carries a source of power.
pub const POWER_FLAGS: &[&str] = &["has_fairy_blessing", "crystal_power", "passed_wolf_trial"];
/// Flags that show the player gathered wisdom.
pub const WISDOM_FLAGS: &[&str] = &["has_fairy_wisdom", "studied_crystal", "knows_binding_spell"];

/// Health at or above which direct combat is a clean victory.
pub const CLEAN_VICTORY_HEALTH: u32 = 80;
/// Health at or above which direct combat is at worst a costly victory.
pub const COSTLY_VICTORY_HEALTH: u32 = 50;

/// Encounter paths, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossPath {
    Peaceful,
    Power,
    Wisdom,
    DirectCombat,
}

/// One row of a decision table.
#[derive(Clone, Copy)]
pub struct Tier<T> {
    pub name: &'static str,
    pub applies: fn(&Flags) -> bool,
    pub then: T,
}

fn any_set(flags: &Flags, keys: &[&str]) -> bool {
    keys.iter().any(|k| flags.is_set(k))
}

fn understands_guardian(flags: &Flags) -> bool {
    any_set(flags, UNDERSTANDING_FLAGS)
}

fn carries_power(flags: &Flags) -> bool {
    any_set(flags, POWER_FLAGS)
}

fn gathered_wisdom(flags: &Flags) -> bool {
    any_set(flags, WISDOM_FLAGS)
}

fn always(_: &Flags) -> bool {
    true
}

fn balanced_crystal(flags: &Flags) -> bool {
    flags.get_str("crystal_power") == Some("balanced")
}

fn fairy_blessed(flags: &Flags) -> bool {
    flags.is_set("has_fairy_blessing")
}

fn proven_by_wolf(flags: &Flags) -> bool {
    flags.is_set("passed_wolf_trial")
}

pub const BOSS_TIERS: &[Tier<BossPath>] = &[
    Tier {
        name: "understanding",
        applies: understands_guardian,
        then: BossPath::Peaceful,
    },
    Tier {
        name: "power",
        applies: carries_power,
        then: BossPath::Power,
    },
    Tier {
        name: "wisdom",
        applies: gathered_wisdom,
        then: BossPath::Wisdom,
    },
    Tier {
        name: "direct_combat",
        applies: always,
        then: BossPath::DirectCombat,
    },
];

/// Sub-dispatch of the power path. An uncontrolled power source ends in a
/// costly struggle.
pub const POWER_TIERS: &[Tier<Outcome>] = &[
    Tier {
        name: "balanced_crystal",
        applies: balanced_crystal,
        then: Outcome::PowerVictory,
    },
    Tier {
        name: "fairy_blessing",
        applies: fairy_blessed,
        then: Outcome::NatureVictory,
    },
    Tier {
        name: "wolf_trial",
        applies: proven_by_wolf,
        then: Outcome::StrengthVictory,
    },
    Tier {
        name: "power_struggle",
        applies: always,
        then: Outcome::HardVictory,
    },
];

/// First matching row of `tiers`.
pub fn first_match<'t, T>(tiers: &'t [Tier<T>], flags: &Flags) -> Option<&'t Tier<T>> {
    tiers.iter().find(|tier| (tier.applies)(flags))
}

/// What the dispatcher decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Continue in a scene, which will emit the final token itself.
    Scene(SceneId),
    Outcome(Outcome),
}

pub fn select_path(flags: &Flags) -> BossPath {
    first_match(BOSS_TIERS, flags)
        .map(|tier| tier.then)
        .unwrap_or(BossPath::DirectCombat)
}

/// Decide how the encounter with the Shadow Guardian plays out.
pub fn resolve<R: Rng + ?Sized>(state: &PlayerState, rng: &mut R) -> Resolution {
    let path = select_path(&state.flags);
    tracing::debug!(?path, "boss tier selected");

    match path {
        BossPath::Peaceful => Resolution::Scene(SceneId::BossPeaceful),
        BossPath::Power => {
            let outcome = first_match(POWER_TIERS, &state.flags)
                .map(|tier| tier.then)
                .unwrap_or(Outcome::HardVictory);
            Resolution::Outcome(outcome)
        }
        BossPath::Wisdom => Resolution::Outcome(Outcome::WisdomVictory),
        BossPath::DirectCombat => Resolution::Outcome(direct_combat(state.vitals.health(), rng)),
    }
}

fn direct_combat<R: Rng + ?Sized>(health: u32, rng: &mut R) -> Outcome {
    let coin = rng.gen_bool(0.5);
    if health >= CLEAN_VICTORY_HEALTH {
        Outcome::CombatVictory
    } else if health >= COSTLY_VICTORY_HEALTH {
        if coin {
            Outcome::CombatVictory
        } else {
            Outcome::HardVictory
        }
    } else if coin {
        Outcome::HardVictory
    } else {
        Outcome::HonorableDefeat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_rules::Catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flags(keys: &[(&str, &str)]) -> Flags {
        let mut flags = Flags::new();
        for (key, value) in keys {
            if value.is_empty() {
                flags.set(*key, true);
            } else {
                flags.set(*key, *value);
            }
        }
        flags
    }

    #[test]
    fn test_understanding_beats_power() {
        let both = flags(&[("knows_peace_ritual", ""), ("has_fairy_blessing", "")]);
        assert_eq!(select_path(&both), BossPath::Peaceful);
    }

    #[test]
    fn test_power_beats_wisdom() {
        let both = flags(&[("studied_crystal", ""), ("passed_wolf_trial", "")]);
        assert_eq!(select_path(&both), BossPath::Power);
    }

    #[test]
    fn test_no_flags_means_direct_combat() {
        assert_eq!(select_path(&Flags::new()), BossPath::DirectCombat);
    }

    #[test]
    fn test_false_flag_does_not_count() {
        let mut off = Flags::new();
        off.set("knows_peace_ritual", false);
        off.set("knows_binding_spell", true);
        assert_eq!(select_path(&off), BossPath::Wisdom);
    }

    #[test]
    fn test_power_sub_dispatch_order() {
        let balanced = flags(&[("crystal_power", "balanced"), ("has_fairy_blessing", "")]);
        assert_eq!(first_match(POWER_TIERS, &balanced).unwrap().then, Outcome::PowerVictory);

        let blessed = flags(&[("crystal_power", "corrupted"), ("has_fairy_blessing", ""), ("passed_wolf_trial", "")]);
        assert_eq!(first_match(POWER_TIERS, &blessed).unwrap().then, Outcome::NatureVictory);

        let wolf = flags(&[("passed_wolf_trial", "")]);
        assert_eq!(first_match(POWER_TIERS, &wolf).unwrap().then, Outcome::StrengthVictory);

        let wild = flags(&[("crystal_power", "overwhelming")]);
        assert_eq!(first_match(POWER_TIERS, &wild).unwrap().name, "power_struggle");
    }

    #[test]
    fn test_peaceful_path_enters_scene() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &catalog);
        player.flags.set("saw_true_self", true);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(resolve(&player, &mut rng), Resolution::Scene(SceneId::BossPeaceful));
    }

    #[test]
    fn test_direct_combat_by_health() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            assert_eq!(direct_combat(100, &mut rng), Outcome::CombatVictory);
            let mid = direct_combat(60, &mut rng);
            assert!(matches!(mid, Outcome::CombatVictory | Outcome::HardVictory));
            let low = direct_combat(20, &mut rng);
            assert!(matches!(low, Outcome::HardVictory | Outcome::HonorableDefeat));
        }
    }
}
