//! The Time Nexus, a side excursion where the rewards are large and a few
//! of them come at a price.

use game_rules::Attribute;

use super::{Scene, SceneContext, SceneId};
use crate::outcome::Outcome;

const DRAGON: &[Outcome] = &[Outcome::DragonBlessed];
const FIRST_MAGE: &[Outcome] = &[Outcome::FirstMageMet];
const ALTERED: &[Outcome] = &[Outcome::HistoryAltered];

pub(super) fn scenes() -> Vec<Scene> {
    vec![
        Scene::new(
            SceneId::TimeNexus,
            "The Time Nexus",
            "Past, present and future swirl together in ribbons of light.",
        )
        .choice(
            "Journey to the distant past",
            &[Outcome::PastDragon, Outcome::PastFirstMage],
            journey_to_past,
        )
        .choice("Glimpse the future", &[Outcome::FutureGlimpsed], glimpse_future)
        .choice("Alter a moment of history", &[Outcome::AlterHistory], consider_history)
        .choice(
            "Absorb the temporal energy",
            &[Outcome::TemporalEnergyAbsorbed],
            absorb_energy,
        ),
        Scene::new(
            SceneId::NexusDragon,
            "The Age of Dragons",
            "An ancient dragon regards you with eyes older than mountains.",
        )
        .choice("Ask for the dragon's strength", DRAGON, dragon_strength)
        .choice("Ask for the dragon's magic", DRAGON, dragon_magic)
        .choice("Ask for the dragon's memories", DRAGON, dragon_memories),
        Scene::new(
            SceneId::NexusFirstMage,
            "The First Mage",
            "A robed figure looks up from the very first spellbook.",
        )
        .choice("Learn the fundamental spells", FIRST_MAGE, mage_fundamentals)
        .choice("Discuss the ethics of magic", FIRST_MAGE, mage_ethics)
        .choice("Ask about the source of power", FIRST_MAGE, mage_source),
        Scene::new(
            SceneId::NexusAlterHistory,
            "A Moment Revisited",
            "You can change one thing from your adventure so far.",
        )
        .choice("Prevent a past injury", ALTERED, prevent_injury)
        .choice("Make a better first impression", ALTERED, better_impression)
        .choice("Study harder in the past", ALTERED, study_harder)
        .choice("Be more careful with resources", ALTERED, careful_with_resources),
    ]
}

fn journey_to_past(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("The currents of time pull you backwards.");
    if ctx.chance(0.5) {
        Outcome::PastDragon
    } else {
        Outcome::PastFirstMage
    }
}

fn meet_dragon(ctx: &mut SceneContext<'_>) {
    ctx.grant_item("dragon_scale", 1);
    ctx.set_flag("met_ancient_dragon");
}

fn dragon_strength(ctx: &mut SceneContext<'_>) -> Outcome {
    meet_dragon(ctx);
    ctx.boost_all(10);
    ctx.raise_max_health(50);
    ctx.raise_max_mana(30);
    ctx.heal_full();
    Outcome::DragonBlessed
}

fn dragon_magic(ctx: &mut SceneContext<'_>) -> Outcome {
    meet_dragon(ctx);
    for spell in ["teleport", "insight", "time_stop"] {
        ctx.learn(spell);
    }
    Outcome::DragonBlessed
}

fn dragon_memories(ctx: &mut SceneContext<'_>) -> Outcome {
    meet_dragon(ctx);
    ctx.gain_xp(500);
    ctx.boost(Attribute::Luck, 15);
    ctx.wisdom();
    Outcome::DragonBlessed
}

fn mage_fundamentals(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("met_first_mage");
    for spell in ctx.unknown_common_spells() {
        ctx.learn(&spell);
    }
    ctx.boost(Attribute::Intelligence, 20);
    Outcome::FirstMageMet
}

fn mage_ethics(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("met_first_mage");
    ctx.say("\"Magic is a responsibility before it is a power.\"");
    ctx.unlock("peacemaker");
    ctx.gain_xp(300);
    ctx.unlock("wise_one");
    ctx.wisdom();
    Outcome::FirstMageMet
}

fn mage_source(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("met_first_mage");
    ctx.raise_max_mana(50);
    ctx.state.vitals.restore_mana(u32::MAX);
    ctx.learn("primal_force");
    Outcome::FirstMageMet
}

fn glimpse_future(ctx: &mut SceneContext<'_>) -> Outcome {
    match ctx.roll(4) {
        0 => {
            ctx.say("You see yourself as a seasoned hero and learn from it.");
            ctx.boost_all(5);
        }
        1 => {
            ctx.say("You see a world remade by art and magic.");
            ctx.learn("artistic_magic");
            ctx.boost(Attribute::Intelligence, 8);
            ctx.boost(Attribute::Luck, 7);
        }
        2 => {
            ctx.say("You see the shadows that will one day need you.");
            ctx.grant_item("shadow_gem", 1);
            ctx.learn("teleport");
            ctx.gain_xp(400);
        }
        _ => {
            ctx.say("You see the library of every mage yet to be born.");
            ctx.boost(Attribute::Intelligence, 25);
            ctx.raise_max_mana(100);
            ctx.state.vitals.restore_mana(u32::MAX);
            for spell in ctx.unknown_common_spells() {
                ctx.learn(&spell);
            }
        }
    }
    ctx.set_flag("saw_future");
    Outcome::FutureGlimpsed
}

fn consider_history(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("You focus on a moment from your own past. The nexus will hold the paradox steady.");
    Outcome::AlterHistory
}

/// The toll every change to history takes.
fn pay_toll(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("Changing time takes its toll.");
    ctx.damage(10);
    ctx.raise_max_mana(20);
    ctx.state.vitals.restore_mana(20);
    ctx.set_flag("altered_history");
    Outcome::HistoryAltered
}

fn prevent_injury(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("You undo an old wound before it ever happens.");
    ctx.heal_full();
    ctx.raise_max_health(25);
    pay_toll(ctx)
}

fn better_impression(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("You guide a lost fairy home, and she remembers.");
    ctx.boost(Attribute::Luck, 10);
    if ctx.state.companions.len() < 2 {
        ctx.recruit("fairy_guide");
    }
    pay_toll(ctx)
}

fn study_harder(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("You relive a lesson and finally understand it.");
    ctx.gain_xp(200);
    let spell = ["shield", "insight", "fireball"]
        .into_iter()
        .find(|s| !ctx.state.knows_spell(s));
    if let Some(spell) = spell {
        ctx.learn(spell);
    }
    pay_toll(ctx)
}

fn careful_with_resources(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("Supplies you never lost appear in your pack.");
    for item in ["healing_potion", "magic_crystal", "fairy_dust"] {
        ctx.grant_item(item, 1);
    }
    pay_toll(ctx)
}

fn absorb_energy(ctx: &mut SceneContext<'_>) -> Outcome {
    let success = (0.3 + f64::from(ctx.state.attributes.luck) * 0.02).min(0.8);
    if ctx.chance(success) {
        ctx.say("Time itself bends to your will!");
        ctx.raise_max_health(50);
        ctx.raise_max_mana(75);
        ctx.heal_full();
        ctx.boost_all(8);
        ctx.learn("temporal_mastery");
        ctx.gain_xp(1000);
        ctx.set_flag("temporal_master");
    } else {
        ctx.say("The energy is too wild and sears through you.");
        ctx.damage(30);
        ctx.raise_max_mana(25);
        ctx.boost(Attribute::Intelligence, 5);
        ctx.learn("insight");
    }
    Outcome::TemporalEnergyAbsorbed
}
