//! The Crystal Caves.

use super::{Scene, SceneContext, SceneId};
use crate::outcome::Outcome;

pub(super) fn scenes() -> Vec<Scene> {
    vec![
        Scene::new(
            SceneId::Cave,
            "The Crystal Caves",
            "The tunnels branch three ways.",
        )
        .choice("Enter the Crystal Hall", &[Outcome::CrystalHall], |_| {
            Outcome::CrystalHall
        })
        .choice("Examine the Ancient Symbols", &[Outcome::AncientSymbols], |_| {
            Outcome::AncientSymbols
        })
        .choice("Follow the sound of water", &[Outcome::UndergroundLake], |_| {
            Outcome::UndergroundLake
        }),
        Scene::new(
            SceneId::CrystalHall,
            "The Crystal Hall",
            "A great crystal pulses with raw power.",
        )
        .choice("Touch the crystal", &[Outcome::Boss], touch_crystal)
        .choice("Study the crystal's patterns", &[Outcome::Boss], study_crystal)
        .choice("Explore the passage behind it", &[Outcome::CrystalPassage], |_| {
            Outcome::CrystalPassage
        })
        .choice("Resist the temptation", &[Outcome::Peaceful], resist_temptation),
        Scene::new(
            SceneId::CrystalPassage,
            "The Crystal Passage",
            "Crystals line a narrow passage, humming softly.",
        )
        .choice("Follow the glowing crystals", &[Outcome::TreasureChamber], follow_crystals)
        .choice("Listen to the crystal song", &[Outcome::TreasureChamber], crystal_song)
        .choice("Return to the Crystal Hall", &[Outcome::CrystalHall], |_| {
            Outcome::CrystalHall
        }),
        Scene::new(
            SceneId::AncientSymbols,
            "The Ancient Symbols",
            "Carvings cover the wall, telling the Guardian's story.",
        )
        .choice("Decipher the binding spell", &[Outcome::Boss], binding_spell)
        .choice("Read the Guardian's history", &[Outcome::Boss], guardian_history)
        .choice("Learn the peace ritual", &[Outcome::Peaceful], peace_ritual),
        Scene::new(
            SceneId::UndergroundLake,
            "The Underground Lake",
            "A still lake reflects a shrine on its far shore.",
        )
        .choice("Visit the shrine", &[Outcome::Boss], visit_shrine)
        .choice("Drink the sacred water", &[Outcome::Boss], sacred_water)
        .choice("Gaze at your reflection", &[Outcome::Peaceful], reflect),
    ]
}

fn touch_crystal(ctx: &mut SceneContext<'_>) -> Outcome {
    match ctx.roll(3) {
        0 => {
            ctx.set_flag_value("crystal_power", "overwhelming");
            ctx.keep("Crystal Power");
            ctx.say("Overwhelming power surges through you.");
        }
        1 => {
            ctx.set_flag_value("crystal_power", "balanced");
            ctx.keep("Balanced Crystal Power");
            ctx.say("The crystal's power settles into perfect balance.");
        }
        _ => {
            ctx.set_flag_value("crystal_power", "corrupted");
            ctx.say("Dark energy twists the crystal's gift.");
            ctx.damage(30);
        }
    }
    Outcome::Boss
}

fn study_crystal(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("studied_crystal");
    ctx.keep("Crystal Knowledge");
    ctx.wisdom();
    Outcome::Boss
}

fn resist_temptation(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("resisted_temptation");
    ctx.wisdom();
    Outcome::Peaceful
}

fn follow_crystals(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("found_via_crystals");
    Outcome::TreasureChamber
}

fn crystal_song(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("heard_crystal_song");
    ctx.keep("Crystal Harmony");
    Outcome::TreasureChamber
}

fn binding_spell(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("knows_binding_spell");
    ctx.keep("Binding Spell");
    Outcome::Boss
}

fn guardian_history(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("knows_guardian_history");
    ctx.keep("Guardian's History");
    ctx.wisdom();
    Outcome::Boss
}

fn peace_ritual(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("knows_peace_ritual");
    ctx.keep("Peace Ritual");
    ctx.wisdom();
    Outcome::Peaceful
}

fn visit_shrine(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("visited_shrine");
    ctx.keep("Shrine Blessing");
    Outcome::Boss
}

fn sacred_water(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.heal_full();
    ctx.set_flag("drank_sacred_water");
    ctx.keep("Sacred Water");
    ctx.say("The sacred water restores you completely.");
    Outcome::Boss
}

fn reflect(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("saw_true_self");
    ctx.wisdom();
    Outcome::Peaceful
}

#[cfg(test)]
mod tests {
    use super::super::testing::{choice, run_effect, scene};
    use super::*;
    use game_rules::{Catalog, PlayerState};
    use std::collections::BTreeSet;

    #[test]
    fn test_touch_crystal_outcomes() {
        let catalog = Catalog::builtin().unwrap();
        let hall = scene(SceneId::CrystalHall);
        let touch = choice(&hall, "Touch").effect;

        let mut seen = BTreeSet::new();
        for seed in 0..30 {
            let mut player = PlayerState::new("Tester", &catalog);
            run_effect(&catalog, &mut player, seed, touch);

            let power = player.flags.get_str("crystal_power").unwrap().to_string();
            if power == "corrupted" {
                assert_eq!(player.vitals.health(), 70);
            } else {
                assert_eq!(player.vitals.health(), 100);
            }
            seen.insert(power);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_sacred_water_full_heal() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &catalog);
        player.vitals.damage(70);
        let lake = scene(SceneId::UndergroundLake);

        let (outcome, _) = run_effect(&catalog, &mut player, 1, choice(&lake, "Drink").effect);

        assert_eq!(outcome, Outcome::Boss);
        assert_eq!(player.vitals.health(), 100);
        assert!(player.flags.is_set("drank_sacred_water"));
    }
}
