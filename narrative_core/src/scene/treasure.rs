//! The Hidden Treasure Chamber: a nested machine of riddles, details and
//! temptations. Every exit is routed by the outer graph.

use super::{Scene, SceneContext, SceneId};
use crate::outcome::Outcome;

/// Misses allowed per riddle before the trial ends with the lesser reward.
pub const RIDDLE_ATTEMPTS: i64 = 2;

const MISSES_FLAG: &str = "riddle_misses";

const WRONG: &[Outcome] = &[Outcome::RiddleRetry, Outcome::PartialTreasure];

pub(super) fn scenes() -> Vec<Scene> {
    vec![
        Scene::new(
            SceneId::TreasureChamber,
            "The Hidden Treasure Chamber",
            "Three orbs float above a pedestal of gold.",
        )
        .choice("Attempt the riddle trial", &[Outcome::RiddleTrial], begin_trial)
        .choice("Examine the chamber", &[Outcome::ChamberDetails], |_| {
            Outcome::ChamberDetails
        })
        .choice(
            "Try to take the treasure",
            &[Outcome::TheftFailed, Outcome::MinorTheft, Outcome::Cursed],
            attempt_theft,
        )
        .choice("Leave the treasure untouched", &[Outcome::WiseRestraint], leave_chamber),
        Scene::new(
            SceneId::ChamberDetails,
            "The Chamber's Secrets",
            "Looking closer, you notice more than gold.",
        )
        .choice("Follow the scent of flowers", &[Outcome::SecretGarden], secret_garden)
        .choice("Study the murals", &[Outcome::AncientKnowledge], study_murals)
        .choice("Search the hidden compartments", &[Outcome::HiddenArtifacts], search_compartments)
        .choice("Return and take the riddle trial", &[Outcome::RiddleTrial], begin_trial),
        Scene::new(
            SceneId::RiddleOfWisdom,
            "The First Riddle",
            "I have cities but no houses, forests but no trees, water but no fish. What am I?",
        )
        .choice("A painting", WRONG, wrong_answer)
        .choice("A map", &[Outcome::RiddleSolved], solve_riddle)
        .choice("A dream", WRONG, wrong_answer)
        .choice("A book", WRONG, wrong_answer),
        Scene::new(
            SceneId::RiddleOfCourage,
            "The Second Riddle",
            "The more you take from me, the bigger I become. What am I?",
        )
        .choice("A hole", &[Outcome::RiddleSolved], solve_riddle)
        .choice("A shadow", WRONG, wrong_answer)
        .choice("A secret", WRONG, wrong_answer)
        .choice("A wound", WRONG, wrong_answer),
        Scene::new(
            SceneId::RiddleOfMystery,
            "The Final Riddle",
            "I speak without a mouth and hear without ears. What am I?",
        )
        .choice("A ghost", WRONG, wrong_answer)
        .choice("An echo", &[Outcome::TreasureMaster], solve_final_riddle)
        .choice("The wind", WRONG, wrong_answer)
        .choice("A memory", WRONG, wrong_answer),
    ]
}

fn begin_trial(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.state.flags.remove(MISSES_FLAG);
    ctx.set_flag("examined_chamber");
    ctx.say("The orbs glow. Answer wisely; each riddle allows two attempts.");
    Outcome::RiddleTrial
}

fn solve_riddle(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.state.flags.remove(MISSES_FLAG);
    ctx.wisdom();
    ctx.say("Correct! The orb glows brilliantly.");
    Outcome::RiddleSolved
}

fn solve_final_riddle(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.state.flags.remove(MISSES_FLAG);
    ctx.wisdom();
    ctx.say("All three orbs merge into a single crystal of rainbow light.");
    for keepsake in [
        "Orb of Infinite Wisdom",
        "Master Key",
        "Scroll of Ancient Secrets",
        "1000 Gold Coins",
    ] {
        ctx.keep(keepsake);
    }
    ctx.heal(50);
    ctx.set_flag("treasure_master");
    ctx.set_flag("has_master_key");
    ctx.set_flag("infinite_wisdom");
    ctx.unlock("treasure_hunter");
    Outcome::TreasureMaster
}

fn wrong_answer(ctx: &mut SceneContext<'_>) -> Outcome {
    let misses = ctx.state.flags.increment(MISSES_FLAG, 1);
    if misses < RIDDLE_ATTEMPTS {
        ctx.say("Not quite right. Think carefully about the clues.");
        return Outcome::RiddleRetry;
    }

    ctx.state.flags.remove(MISSES_FLAG);
    ctx.say("Incorrect. The orbs dim, but the chamber offers a lesser reward.");
    for keepsake in ["Precious Gems", "Silver Key", "Hint Scroll", "200 Gold Coins"] {
        ctx.keep(keepsake);
    }
    ctx.heal(20);
    ctx.set_flag("found_treasure");
    Outcome::PartialTreasure
}

fn attempt_theft(ctx: &mut SceneContext<'_>) -> Outcome {
    match ctx.roll(3) {
        0 => {
            ctx.set_flag("attempted_theft");
            ctx.say("Magical barriers push you back. You leave empty-handed.");
            Outcome::TheftFailed
        }
        1 => {
            ctx.keep("Handful of Gold");
            ctx.set_flag("minor_theft");
            ctx.say("You grab a few coins before the protections wake.");
            Outcome::MinorTheft
        }
        _ => {
            ctx.set_flag("cursed_by_greed");
            ctx.say("A curse of greed settles on your shoulders.");
            ctx.damage(10);
            Outcome::Cursed
        }
    }
}

fn leave_chamber(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.keep("Destiny Compass");
    ctx.set_flag("showed_restraint");
    ctx.set_flag("has_destiny_compass");
    ctx.wisdom();
    Outcome::WiseRestraint
}

fn secret_garden(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.heal_full();
    ctx.keep("Crystal Spring Water");
    ctx.keep("Nature's Blessing");
    ctx.set_flag("found_secret_garden");
    ctx.set_flag("inner_peace");
    Outcome::SecretGarden
}

fn study_murals(ctx: &mut SceneContext<'_>) -> Outcome {
    for keepsake in ["Ancient History", "Secret Paths Map", "Protection Spells"] {
        ctx.keep(keepsake);
    }
    ctx.set_flag("knows_complete_history");
    ctx.set_flag("knows_secret_paths");
    ctx.set_flag("knows_prophecy");
    ctx.wisdom();
    Outcome::AncientKnowledge
}

fn search_compartments(ctx: &mut SceneContext<'_>) -> Outcome {
    for keepsake in [
        "Master Lockpicks",
        "Cloak of Stealth",
        "Treasure Compass",
        "Ring of Languages",
        "Enchanted Coins",
    ] {
        ctx.keep(keepsake);
    }
    ctx.set_flag("has_artifacts");
    ctx.set_flag("can_pick_locks");
    ctx.set_flag("has_stealth");
    ctx.unlock("treasure_hunter");
    Outcome::HiddenArtifacts
}

#[cfg(test)]
mod tests {
    use super::super::testing::{choice, run_effect, scene};
    use super::*;
    use game_rules::{Catalog, PlayerState};

    #[test]
    fn test_second_miss_ends_with_partial_treasure() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &catalog);
        player.vitals.damage(40);
        let riddle = scene(SceneId::RiddleOfCourage);
        let wrong = choice(&riddle, "A shadow").effect;

        assert_eq!(run_effect(&catalog, &mut player, 1, wrong).0, Outcome::RiddleRetry);
        assert_eq!(run_effect(&catalog, &mut player, 1, wrong).0, Outcome::PartialTreasure);

        assert!(player.flags.is_set("found_treasure"));
        assert!(player.flags.get("riddle_misses").is_none());
        assert_eq!(player.vitals.health(), 80);
    }

    #[test]
    fn test_correct_answer_clears_misses() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &catalog);
        let riddle = scene(SceneId::RiddleOfWisdom);

        run_effect(&catalog, &mut player, 1, choice(&riddle, "A book").effect);
        let (outcome, _) = run_effect(&catalog, &mut player, 1, choice(&riddle, "A map").effect);

        assert_eq!(outcome, Outcome::RiddleSolved);
        assert!(player.flags.get("riddle_misses").is_none());
        assert_eq!(player.counters.wisdom_choices, 1);
    }

    #[test]
    fn test_final_riddle_grants_master_treasure() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &catalog);
        let riddle = scene(SceneId::RiddleOfMystery);

        let (outcome, notices) =
            run_effect(&catalog, &mut player, 1, choice(&riddle, "An echo").effect);

        assert_eq!(outcome, Outcome::TreasureMaster);
        assert!(player.flags.is_set("treasure_master"));
        assert!(player.keepsakes.contains(&"Master Key".to_string()));
        assert!(player.has_achievement("treasure_hunter"));
        assert!(notices.iter().any(|n| n.contains("Treasure Hunter")));
    }

    #[test]
    fn test_theft_outcomes_are_declared() {
        let catalog = Catalog::builtin().unwrap();
        let chamber = scene(SceneId::TreasureChamber);
        let theft = choice(&chamber, "Try to take");

        for seed in 0..15 {
            let mut player = PlayerState::new("Tester", &catalog);
            let (outcome, _) = run_effect(&catalog, &mut player, seed, theft.effect);
            assert!(theft.emits.contains(&outcome));
            if outcome == Outcome::Cursed {
                assert_eq!(player.vitals.health(), 90);
            }
        }
    }
}
