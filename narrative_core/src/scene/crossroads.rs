//! The Adventurer's Crossroads, where echoes of other heroes linger.
//!
//! Three heroes are drawn when the player walks into the firelight. Their
//! roster indexes and levels are kept in flags so the follow-up scenes meet
//! the same people: the first can be befriended, the second joins a shared
//! task and the third answers a challenge.

use game_rules::{Attribute, Opponent};

use super::{Scene, SceneContext, SceneId};
use crate::outcome::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Mage,
    Warrior,
    Rogue,
    Scholar,
    TreasureHunter,
}

impl Class {
    fn supplies(self) -> [&'static str; 2] {
        match self {
            Class::Mage => ["magic_crystal", "wisdom_scroll"],
            Class::Warrior => ["healing_potion", "dragon_scale"],
            Class::Rogue => ["elven_cloak", "ancient_key"],
            Class::Scholar => ["wisdom_scroll", "fairy_dust"],
            Class::TreasureHunter => ["healing_potion", "magic_crystal"],
        }
    }

    /// The attribute shared tasks and contests with this class lean on.
    fn discipline(self) -> Attribute {
        match self {
            Class::Mage | Class::Scholar => Attribute::Intelligence,
            Class::Warrior => Attribute::Strength,
            Class::Rogue => Attribute::Agility,
            Class::TreasureHunter => Attribute::Luck,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Class::Mage => "Mage",
            Class::Warrior => "Warrior",
            Class::Rogue => "Rogue",
            Class::Scholar => "Scholar",
            Class::TreasureHunter => "Treasure Hunter",
        }
    }

    fn greeting(self) -> &'static str {
        match self {
            Class::Mage => "\"Magic is like a river. It flows best when you guide it gently.\"",
            Class::Warrior => "\"Every scar tells a story, and every victory teaches humility.\"",
            Class::Rogue => "\"Most people don't notice me until I want them to. You have good instincts.\"",
            Class::Scholar => "\"Knowledge is the only treasure that multiplies when shared.\"",
            Class::TreasureHunter => "\"The real treasure is the adventure. The gold doesn't hurt either.\"",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Adventurer {
    name: &'static str,
    class: Class,
    specialty: &'static str,
    min_level: u32,
    max_level: u32,
}

const ADVENTURERS: &[Adventurer] = &[
    Adventurer {
        name: "Lyra the Spellweaver",
        class: Class::Mage,
        specialty: "Elemental Magic",
        min_level: 3,
        max_level: 8,
    },
    Adventurer {
        name: "Thorne Ironshield",
        class: Class::Warrior,
        specialty: "Combat Mastery",
        min_level: 4,
        max_level: 9,
    },
    Adventurer {
        name: "Whisper Shadowstep",
        class: Class::Rogue,
        specialty: "Stealth & Agility",
        min_level: 2,
        max_level: 7,
    },
    Adventurer {
        name: "Sage Moonwhisper",
        class: Class::Scholar,
        specialty: "Ancient Knowledge",
        min_level: 5,
        max_level: 10,
    },
    Adventurer {
        name: "Lucky Goldleaf",
        class: Class::TreasureHunter,
        specialty: "Fortune & Discovery",
        min_level: 3,
        max_level: 6,
    },
];

/// How the player meets each of the three drawn heroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Friendly,
    Collaborative,
    Challenge,
}

impl Role {
    const ALL: [Role; 3] = [Role::Friendly, Role::Collaborative, Role::Challenge];

    fn flag(self) -> &'static str {
        match self {
            Role::Friendly => "crossroads_friendly",
            Role::Collaborative => "crossroads_collaborative",
            Role::Challenge => "crossroads_challenge",
        }
    }

    fn level_flag(self) -> &'static str {
        match self {
            Role::Friendly => "crossroads_friendly_level",
            Role::Collaborative => "crossroads_collaborative_level",
            Role::Challenge => "crossroads_challenge_level",
        }
    }
}

/// Health restored after losing a sparring match.
const SPARRING_RECOVERY: u32 = 10;

const BEFRIENDED: &[Outcome] = &[Outcome::AdventurerBefriended];

pub(super) fn scenes() -> Vec<Scene> {
    vec![
        Scene::new(
            SceneId::Crossroads,
            "The Adventurer's Crossroads",
            "Spectral campfires flicker where the paths of many heroes meet.",
        )
        .choice(
            "Walk among the gathered heroes",
            &[Outcome::AdventurersGathered],
            gather,
        )
        .choice("Commune with the Crossroads Spirit", &[Outcome::SpiritCommunion], commune),
        Scene::new(
            SceneId::CrossroadsGathering,
            "Around the Campfires",
            "Three echoes of other heroes look up as you approach.",
        )
        .choice("Approach the first hero", BEFRIENDED, approach)
        .choice(
            "Team up with the second hero",
            &[Outcome::CollaborationCompleted],
            collaborate,
        )
        .choice("Challenge the third hero", &[Outcome::DuelFought], challenge),
        Scene::new(
            SceneId::CrossroadsConversation,
            "A Friendly Fire",
            "The hero offers to share what the road has taught them.",
        )
        .choice(
            "Learn from their experiences",
            &[Outcome::WisdomShared],
            learn_from,
        )
        .choice("Ask for practical advice", &[Outcome::SuppliesTraded], trade)
        .choice("Request training", &[Outcome::TrainingReceived], train),
    ]
}

/// Draw three distinct heroes, roll their levels and remember them.
fn gather(ctx: &mut SceneContext<'_>) -> Outcome {
    let drawn = ctx.sample_indices(ADVENTURERS.len(), Role::ALL.len());
    for (position, (role, index)) in Role::ALL.into_iter().zip(drawn).enumerate() {
        let adventurer = ADVENTURERS[index];
        let span = (adventurer.max_level - adventurer.min_level) as usize + 1;
        let level = adventurer.min_level + ctx.roll(span) as u32;
        ctx.set_flag_value(role.flag(), index as i64);
        ctx.set_flag_value(role.level_flag(), i64::from(level));
        ctx.say(format!(
            "{}. {} (level {} {}, {})",
            position + 1,
            adventurer.name,
            level,
            adventurer.class.title(),
            adventurer.specialty
        ));
    }
    Outcome::AdventurersGathered
}

/// The hero drawn for `role`. A journey that never gathered meets the
/// roster in order at minimum level.
fn encountered(ctx: &SceneContext<'_>, role: Role) -> (Adventurer, u32) {
    let fallback = Role::ALL.iter().position(|r| *r == role).unwrap_or(0);
    let adventurer = ctx
        .state
        .flags
        .get_int(role.flag())
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| ADVENTURERS.get(i))
        .copied()
        .unwrap_or(ADVENTURERS[fallback]);
    let level = ctx
        .state
        .flags
        .get_int(role.level_flag())
        .and_then(|l| u32::try_from(l).ok())
        .unwrap_or(adventurer.min_level);
    (adventurer, level)
}

fn approach(ctx: &mut SceneContext<'_>) -> Outcome {
    let (adventurer, _) = encountered(ctx, Role::Friendly);
    ctx.say(format!("{} greets you warmly:", adventurer.name));
    ctx.say(adventurer.class.greeting());
    Outcome::AdventurerBefriended
}

fn learn_from(ctx: &mut SceneContext<'_>) -> Outcome {
    let (adventurer, level) = encountered(ctx, Role::Friendly);
    ctx.say(format!("{} shares tales of their adventures.", adventurer.name));
    ctx.gain_xp(level * 25);
    Outcome::WisdomShared
}

fn trade(ctx: &mut SceneContext<'_>) -> Outcome {
    let (adventurer, _) = encountered(ctx, Role::Friendly);
    for item in adventurer.class.supplies() {
        ctx.grant_item(item, 1);
    }
    Outcome::SuppliesTraded
}

fn train(ctx: &mut SceneContext<'_>) -> Outcome {
    let (adventurer, _) = encountered(ctx, Role::Friendly);
    ctx.say(format!("{} puts you through your paces.", adventurer.name));
    match adventurer.class {
        Class::Mage => {
            ctx.boost(Attribute::Intelligence, 5);
            ctx.raise_max_mana(15);
        }
        Class::Warrior => {
            ctx.boost(Attribute::Strength, 5);
            ctx.raise_max_health(20);
        }
        Class::Rogue => {
            ctx.boost(Attribute::Agility, 5);
            ctx.boost(Attribute::Luck, 3);
        }
        Class::Scholar => ctx.boost(Attribute::Intelligence, 7),
        Class::TreasureHunter => ctx.boost(Attribute::Luck, 8),
    }
    Outcome::TrainingReceived
}

fn collaborate(ctx: &mut SceneContext<'_>) -> Outcome {
    let (adventurer, _) = encountered(ctx, Role::Collaborative);
    let discipline = adventurer.class.discipline();
    ctx.say(format!(
        "{} suggests a task too hard for one hero alone.",
        adventurer.name
    ));

    let skill = f64::from(ctx.state.attributes.get(discipline));
    let success = (0.5 + skill * 0.02).min(0.9);
    if ctx.chance(success) {
        ctx.say("Together you achieve something remarkable!");
        match adventurer.class {
            Class::Mage => {
                ctx.raise_max_mana(30);
                ctx.state.vitals.restore_mana(u32::MAX);
                ctx.boost(Attribute::Intelligence, 8);
                ctx.learn("harmony_spell");
            }
            Class::Warrior => {
                ctx.boost(Attribute::Strength, 8);
                ctx.raise_max_health(30);
                ctx.heal_full();
            }
            Class::Rogue => {
                ctx.boost(Attribute::Agility, 8);
                ctx.grant_item("shadow_gem", 1);
            }
            Class::Scholar => {
                ctx.boost(Attribute::Intelligence, 6);
                ctx.gain_xp(150);
                ctx.grant_item("wisdom_scroll", 1);
            }
            Class::TreasureHunter => {
                ctx.boost(Attribute::Luck, 8);
                ctx.grant_item("magic_crystal", 1);
                ctx.grant_item("dragon_scale", 1);
            }
        }
    } else {
        ctx.say("The attempt goes awry, but you learn from it.");
        ctx.boost(discipline, 3);
        if adventurer.class == Class::Mage {
            ctx.raise_max_mana(10);
        }
    }
    ctx.set_flag("collaborated_at_crossroads");
    Outcome::CollaborationCompleted
}

fn challenge(ctx: &mut SceneContext<'_>) -> Outcome {
    let (adventurer, level) = encountered(ctx, Role::Challenge);
    ctx.say(format!(
        "{} grins and accepts your challenge.",
        adventurer.name
    ));
    if adventurer.class == Class::Warrior {
        spar(ctx, adventurer, level);
    } else {
        contest(ctx, adventurer, level);
    }
    Outcome::DuelFought
}

/// A real fight, resolved turn by turn.
fn spar(ctx: &mut SceneContext<'_>, adventurer: Adventurer, level: u32) {
    let mut opponent = Opponent::sparring(adventurer.name, level);
    let combat = ctx.systems.combat();
    let report = combat.duel(ctx.state, &mut *ctx.rng, &mut opponent);

    if report.won {
        ctx.say(format!(
            "You best {} in {} rounds!",
            adventurer.name, report.rounds
        ));
        ctx.gain_xp(100);
        ctx.boost(Attribute::Strength, 3);
    } else {
        ctx.say(format!(
            "{} proves the stronger fighter and helps you back up.",
            adventurer.name
        ));
        ctx.heal(SPARRING_RECOVERY);
        ctx.gain_xp(40);
    }
}

/// A single comparison: the player's discipline plus a fifth of their mana
/// against the hero's level x 8 plus 10 to 30.
fn contest(ctx: &mut SceneContext<'_>, adventurer: Adventurer, level: u32) {
    let discipline = adventurer.class.discipline();
    let power = ctx.state.attributes.get(discipline) + ctx.state.vitals.mana() / 5;
    let opposition = level * 8 + 10 + ctx.roll(21) as u32;

    if power > opposition {
        ctx.say(format!("Victory! You outmatch {}.", adventurer.name));
        ctx.gain_xp(150);
        if adventurer.class == Class::Mage {
            let spell = ["fireball", "shield", "insight"]
                .into_iter()
                .find(|s| !ctx.state.knows_spell(s));
            if let Some(spell) = spell {
                ctx.learn(spell);
            }
        }
        ctx.boost(discipline, 6);
    } else {
        ctx.say(format!(
            "{} proves a formidable opponent, and you learn from the loss.",
            adventurer.name
        ));
        ctx.gain_xp(75);
        ctx.boost(discipline, 3);
    }
}

fn commune(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("The collective wisdom of countless heroes flows through you.");
    ctx.boost_all(4);
    ctx.raise_max_health(25);
    ctx.raise_max_mana(25);
    ctx.heal_full();

    for spell in ctx.unknown_common_spells().into_iter().take(3) {
        ctx.learn(&spell);
    }
    ctx.gain_xp(300);
    for item in ["shadow_gem", "dragon_scale", "fairy_dust"] {
        ctx.grant_item(item, 1);
    }
    for achievement in ["explorer", "wise_one", "collector"] {
        ctx.unlock(achievement);
    }
    ctx.set_flag("communed_with_spirit");
    Outcome::SpiritCommunion
}

#[cfg(test)]
mod tests {
    use super::super::testing::{choice, run_effect, scene};
    use super::*;
    use game_rules::{Catalog, PlayerState};
    use std::collections::BTreeSet;

    fn roster_index(class: Class) -> i64 {
        ADVENTURERS.iter().position(|a| a.class == class).unwrap() as i64
    }

    /// A player who has already met `class` in `role` at `level`.
    fn met(catalog: &Catalog, role: Role, class: Class, level: i64) -> PlayerState {
        let mut player = PlayerState::new("Tester", catalog);
        player.flags.set(role.flag(), roster_index(class));
        player.flags.set(role.level_flag(), level);
        player
    }

    #[test]
    fn test_gathering_draws_three_distinct_heroes() {
        let catalog = Catalog::builtin().unwrap();
        let crossroads = scene(SceneId::Crossroads);

        for seed in 0..20 {
            let mut player = PlayerState::new("Tester", &catalog);
            let (outcome, notices) =
                run_effect(&catalog, &mut player, seed, choice(&crossroads, "Walk").effect);

            assert_eq!(outcome, Outcome::AdventurersGathered);
            assert_eq!(notices.len(), 3);
            let drawn: BTreeSet<i64> = Role::ALL
                .iter()
                .map(|r| player.flags.get_int(r.flag()).unwrap())
                .collect();
            assert_eq!(drawn.len(), 3);

            for role in Role::ALL {
                let adventurer = ADVENTURERS[player.flags.get_int(role.flag()).unwrap() as usize];
                let level = player.flags.get_int(role.level_flag()).unwrap() as u32;
                assert!((adventurer.min_level..=adventurer.max_level).contains(&level));
            }
        }
    }

    #[test]
    fn test_approach_names_the_drawn_hero() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = met(&catalog, Role::Friendly, Class::Rogue, 4);
        let gathering = scene(SceneId::CrossroadsGathering);

        let (outcome, notices) =
            run_effect(&catalog, &mut player, 1, choice(&gathering, "Approach").effect);

        assert_eq!(outcome, Outcome::AdventurerBefriended);
        assert!(notices[0].contains("Whisper Shadowstep"));
    }

    #[test]
    fn test_learning_scales_with_level() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = met(&catalog, Role::Friendly, Class::Scholar, 3);
        let conversation = scene(SceneId::CrossroadsConversation);

        run_effect(&catalog, &mut player, 2, choice(&conversation, "Learn").effect);
        assert_eq!(player.vitals.experience(), 75);
    }

    #[test]
    fn test_advice_grants_class_supplies() {
        let catalog = Catalog::builtin().unwrap();
        let conversation = scene(SceneId::CrossroadsConversation);

        for adventurer in ADVENTURERS {
            let mut player = met(&catalog, Role::Friendly, adventurer.class, 3);
            run_effect(&catalog, &mut player, 0, choice(&conversation, "Ask").effect);
            for item in adventurer.class.supplies() {
                assert!(player.has_item(item), "{} from {}", item, adventurer.name);
            }
        }
    }

    #[test]
    fn test_training_depends_on_class() {
        let catalog = Catalog::builtin().unwrap();
        let conversation = scene(SceneId::CrossroadsConversation);
        let train = choice(&conversation, "Request").effect;

        let mut warrior = met(&catalog, Role::Friendly, Class::Warrior, 5);
        let (outcome, _) = run_effect(&catalog, &mut warrior, 0, train);
        assert_eq!(outcome, Outcome::TrainingReceived);
        assert_eq!(warrior.attributes.strength, 15);
        assert_eq!(warrior.vitals.max_health(), 120);

        let mut hunter = met(&catalog, Role::Friendly, Class::TreasureHunter, 5);
        run_effect(&catalog, &mut hunter, 0, train);
        assert_eq!(hunter.attributes.luck, 18);
        assert_eq!(hunter.attributes.strength, 10);
    }

    #[test]
    fn test_magical_collaboration() {
        let catalog = Catalog::builtin().unwrap();
        let gathering = scene(SceneId::CrossroadsGathering);
        let team_up = choice(&gathering, "Team up").effect;

        for seed in 0..20 {
            let mut player = met(&catalog, Role::Collaborative, Class::Mage, 6);
            let (outcome, _) = run_effect(&catalog, &mut player, seed, team_up);

            assert_eq!(outcome, Outcome::CollaborationCompleted);
            if player.knows_spell("harmony_spell") {
                assert_eq!(player.vitals.max_mana(), 80);
                assert_eq!(player.vitals.mana(), 80);
                assert_eq!(player.attributes.intelligence, 18);
            } else {
                assert_eq!(player.vitals.max_mana(), 60);
                assert_eq!(player.attributes.intelligence, 13);
            }
        }
    }

    #[test]
    fn test_magical_duel_compares_power() {
        let catalog = Catalog::builtin().unwrap();
        let gathering = scene(SceneId::CrossroadsGathering);
        let duel = choice(&gathering, "Challenge").effect;

        // 100 + 50 / 5 beats the best roll of a level 8 mage (94).
        let mut strong = met(&catalog, Role::Challenge, Class::Mage, 8);
        strong.attributes.intelligence = 100;
        run_effect(&catalog, &mut strong, 4, duel);
        assert!(strong.attributes.intelligence >= 106);
        assert!(strong.knows_spell("fireball"));

        // 10 + 50 / 5 never beats a level 3 mage (at least 34).
        let mut weak = met(&catalog, Role::Challenge, Class::Mage, 3);
        let (outcome, _) = run_effect(&catalog, &mut weak, 4, duel);
        assert_eq!(outcome, Outcome::DuelFought);
        assert_eq!(weak.attributes.intelligence, 13);
        assert_eq!(weak.vitals.experience(), 75);
        assert!(!weak.knows_spell("fireball"));
    }

    #[test]
    fn test_sparring_never_leaves_player_defeated() {
        let catalog = Catalog::builtin().unwrap();
        let gathering = scene(SceneId::CrossroadsGathering);

        for seed in 0..20 {
            let mut player = met(&catalog, Role::Challenge, Class::Warrior, 9);
            player.vitals.damage(85);
            let (outcome, _) =
                run_effect(&catalog, &mut player, seed, choice(&gathering, "Challenge").effect);

            assert_eq!(outcome, Outcome::DuelFought);
            assert!(!player.vitals.is_defeated());
        }
    }

    #[test]
    fn test_spirit_communion() {
        let catalog = Catalog::builtin().unwrap();
        let mut player = PlayerState::new("Tester", &catalog);
        let crossroads = scene(SceneId::Crossroads);

        run_effect(&catalog, &mut player, 9, choice(&crossroads, "Commune").effect);

        assert_eq!(player.spellbook.len(), 4);
        assert!(player.has_item("shadow_gem"));
        assert!(player.has_achievement("explorer"));
        assert!(player.has_achievement("collector"));
        assert_eq!(player.vitals.level(), 2);
        assert_eq!(player.vitals.health(), player.vitals.max_health());
    }
}
