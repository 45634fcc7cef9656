//! The Mystical Library, a side excursion. Every exit returns the player to
//! wherever they left the main story.

use game_rules::Attribute;

use super::{Scene, SceneContext, SceneId};
use crate::outcome::Outcome;

const STUDY_SPELLS: [&str; 4] = ["fireball", "shield", "insight", "teleport"];
const TOME_SPELLS: [&str; 2] = ["teleport", "insight"];

const OWL: &[Outcome] = &[Outcome::OwlEncountered];

pub(super) fn scenes() -> Vec<Scene> {
    vec![
        Scene::new(
            SceneId::MysticalLibrary,
            "The Mystical Library",
            "Towering shelves hold tomes that whisper in forgotten tongues.",
        )
        .choice("Study the ancient tomes", &[Outcome::LibraryStudied], study_tomes)
        .choice("Speak with the owl guardian", &[Outcome::OwlGuardian], |ctx| {
            ctx.say("Great amber eyes open on the highest shelf.");
            Outcome::OwlGuardian
        })
        .choice("Search for hidden secrets", &[Outcome::SecretsDiscovered], search_secrets),
        Scene::new(
            SceneId::OwlGuardian,
            "The Owl Guardian",
            "\"Few seek me out,\" the owl hoots. \"What do you ask of me?\"",
        )
        .choice("Ask to travel together", OWL, befriend_owl)
        .choice("Ask for the library's wisdom", OWL, owl_wisdom)
        .choice("Simply thank the guardian", OWL, thank_owl),
    ]
}

fn study_tomes(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("You lose yourself among the pages.");
    let mut learned = 0;
    for spell in STUDY_SPELLS {
        if !ctx.state.knows_spell(spell) && ctx.chance(0.6) && ctx.learn(spell) {
            learned += 1;
        }
    }
    if learned == 0 {
        ctx.say("The spells elude you, but the reading is not wasted.");
    }

    ctx.gain_xp(75);
    ctx.boost(Attribute::Intelligence, 3);
    ctx.grant_item("wisdom_scroll", 1);
    if learned >= 2 {
        ctx.unlock("spell_caster");
    }
    ctx.set_flag("studied_library");
    ctx.wisdom();
    Outcome::LibraryStudied
}

fn befriend_owl(ctx: &mut SceneContext<'_>) -> Outcome {
    if ctx.recruit("ancient_owl") {
        ctx.unlock("beast_friend");
    }
    ctx.boost(Attribute::Intelligence, 5);
    Outcome::OwlEncountered
}

fn owl_wisdom(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("The owl shares centuries of quiet observation.");
    ctx.gain_xp(100);
    ctx.boost(Attribute::Luck, 3);
    ctx.wisdom();
    Outcome::OwlEncountered
}

fn thank_owl(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("The owl blinks slowly, pleased by your courtesy.");
    ctx.gain_xp(50);
    Outcome::OwlEncountered
}

/// Three independent discoveries, the first of them luck-scaled.
fn search_secrets(ctx: &mut SceneContext<'_>) -> Outcome {
    let passage_chance = (0.4 + f64::from(ctx.state.attributes.luck) * 0.02).min(0.8);
    let mut discoveries = 0;

    if ctx.chance(passage_chance) {
        discoveries += 1;
        ctx.say("A bookcase swings aside, revealing a secret passage.");
        ctx.grant_item("ancient_key", 1);
        ctx.grant_item("shadow_gem", 1);
        ctx.unlock("treasure_hunter");
    }

    if ctx.chance(0.6) {
        discoveries += 1;
        ctx.say("A hidden tome falls open at your feet.");
        if let Some(spell) = TOME_SPELLS.iter().find(|s| !ctx.state.knows_spell(s)) {
            ctx.learn(spell);
        }
    }

    if ctx.chance(0.4) {
        discoveries += 1;
        ctx.say("Behind loose stones lies a cache of artifacts.");
        ctx.grant_item("magic_crystal", 1);
        ctx.grant_item("fairy_dust", 1);
    }

    if discoveries == 0 {
        ctx.say("You find nothing, though the search sharpens your reflexes.");
        ctx.boost(Attribute::Agility, 2);
    }

    ctx.gain_xp(60 + 20 * discoveries);
    Outcome::SecretsDiscovered
}

#[cfg(test)]
mod tests {
    use super::super::testing::{choice, run_effect, scene};
    use super::*;
    use game_rules::{Catalog, PlayerState};

    #[test]
    fn test_study_always_rewards() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &catalog);
        let library = scene(SceneId::MysticalLibrary);

        let (outcome, _) = run_effect(&catalog, &mut player, 3, choice(&library, "Study").effect);

        assert_eq!(outcome, Outcome::LibraryStudied);
        assert_eq!(player.attributes.intelligence, 13);
        assert!(player.has_item("wisdom_scroll"));
        assert!(player.vitals.experience() >= 75);
    }

    #[test]
    fn test_study_learns_only_listed_spells() {
        let catalog = Catalog::builtin().unwrap();
        let library = scene(SceneId::MysticalLibrary);

        for seed in 0..10 {
            let mut player = PlayerState::new("Tester", &catalog);
            run_effect(&catalog, &mut player, seed, choice(&library, "Study").effect);
            for spell in player.spellbook.iter() {
                assert!(spell == "heal" || STUDY_SPELLS.contains(&spell), "{}", spell);
            }
            if player.spellbook.len() >= 3 {
                assert!(player.has_achievement("spell_caster"));
            }
        }
    }

    #[test]
    fn test_owl_joins_party() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &catalog);
        let owl = scene(SceneId::OwlGuardian);

        let (outcome, notices) =
            run_effect(&catalog, &mut player, 1, choice(&owl, "Ask to travel").effect);

        assert_eq!(outcome, Outcome::OwlEncountered);
        assert!(player.has_companion("ancient_owl"));
        assert!(player.has_achievement("beast_friend"));
        assert!(notices.iter().any(|n| n.contains("Ancient Owl joins your party")));
    }

    #[test]
    fn test_search_experience_scales_with_discoveries() {
        let catalog = Catalog::builtin().unwrap();
        let library = scene(SceneId::MysticalLibrary);

        for seed in 0..10 {
            let mut player = PlayerState::new("Tester", &catalog);
            let (outcome, _) =
                run_effect(&catalog, &mut player, seed, choice(&library, "Search").effect);

            assert_eq!(outcome, Outcome::SecretsDiscovered);
            let xp = player.vitals.experience();
            assert!((60..=120).contains(&xp) && xp % 20 == 0, "xp {}", xp);
            if xp == 60 {
                assert_eq!(player.attributes.agility, 12);
            }
        }
    }
}
