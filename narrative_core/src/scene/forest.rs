//! The Enchanted Forest and its three encounters.

use super::{Scene, SceneContext, SceneId};
use crate::outcome::Outcome;

pub(super) fn scenes() -> Vec<Scene> {
    vec![
        Scene::new(
            SceneId::Forest,
            "The Enchanted Forest",
            "Three paths wind between the trees.",
        )
        .choice("Follow the lights to the Fairy Glade", &[Outcome::FairyGlade], |_| {
            Outcome::FairyGlade
        })
        .choice("Seek the Ancient Grove", &[Outcome::AncientGrove], |_| {
            Outcome::AncientGrove
        })
        .choice("Rest by the Babbling Brook", &[Outcome::BabblingBrook], |_| {
            Outcome::BabblingBrook
        }),
        Scene::new(
            SceneId::FairyGlade,
            "The Fairy Glade",
            "The fairy queen regards you with ancient eyes.",
        )
        .choice("Ask for her blessing", &[Outcome::Boss], fairy_blessing)
        .choice("Ask for her wisdom", &[Outcome::Boss], fairy_wisdom)
        .choice("Investigate the glinting light", &[Outcome::HiddenEntrance], |_| {
            Outcome::HiddenEntrance
        })
        .choice("Politely decline and leave", &[Outcome::Peaceful], decline_fairies),
        Scene::new(
            SceneId::HiddenEntrance,
            "The Hidden Entrance",
            "A crystalline key lies embedded in the roots. What do you do with it?",
        )
        .choice("Use the key on the hidden door", &[Outcome::TreasureChamber], use_key)
        .choice("Give the key to the fairy queen", &[Outcome::Boss], gift_key)
        .choice("Keep the key for later", &[Outcome::Boss], keep_key),
        Scene::new(
            SceneId::AncientGrove,
            "The Ancient Grove",
            "A spirit wolf watches you from between the standing stones.",
        )
        .choice("Accept the wolf's trial of strength", &[Outcome::Boss], wolf_trial)
        .choice("Help the wounded spirit wolf", &[Outcome::Boss], help_wolf)
        .choice("Leave the grove in peace", &[Outcome::Peaceful], |_| Outcome::Peaceful),
        Scene::new(
            SceneId::BabblingBrook,
            "The Babbling Brook",
            "The water sings of things to come.",
        )
        .choice("Gaze into the water for visions", &[Outcome::Boss], visions)
        .choice("Gather the healing flowers", &[Outcome::Boss], gather_flowers)
        .choice("Drink and find stillness", &[Outcome::Peaceful], drink_brook),
    ]
}

fn fairy_blessing(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("has_fairy_blessing");
    ctx.keep("Fairy Blessing");
    ctx.say("The fairies surround you with sparkling light.");
    Outcome::Boss
}

fn fairy_wisdom(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("has_fairy_wisdom");
    ctx.wisdom();
    ctx.say("The queen whispers the Guardian's weakness.");
    Outcome::Boss
}

fn decline_fairies(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("You thank the fairies and walk your own road.");
    Outcome::Peaceful
}

fn use_key(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("A doorway of pure light opens before you.");
    Outcome::TreasureChamber
}

fn gift_key(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("gave_key_to_fairy");
    ctx.keep("Fairy Queen's Eternal Gratitude");
    ctx.wisdom();
    Outcome::Boss
}

fn keep_key(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("has_treasure_key");
    ctx.keep("Crystal Key of Treasures");
    Outcome::Boss
}

fn wolf_trial(ctx: &mut SceneContext<'_>) -> Outcome {
    if ctx.chance(0.5) {
        ctx.set_flag("passed_wolf_trial");
        ctx.keep("Ancient Strength");
        ctx.say("The wolf bows its head. You have proven your strength.");
    } else {
        ctx.say("The trial overwhelms you, but you press on.");
        ctx.damage(20);
    }
    Outcome::Boss
}

fn help_wolf(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("helped_spirit_wolf");
    ctx.keep("Wolf's Gratitude");
    Outcome::Boss
}

fn visions(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("saw_future_visions");
    ctx.wisdom();
    Outcome::Boss
}

fn gather_flowers(ctx: &mut SceneContext<'_>) -> Outcome {
    let healed = ctx.heal(30);
    ctx.keep("Healing Flowers");
    ctx.say(format!("The flowers restore {} health.", healed));
    Outcome::Boss
}

fn drink_brook(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("inner_peace");
    ctx.wisdom();
    Outcome::Peaceful
}
