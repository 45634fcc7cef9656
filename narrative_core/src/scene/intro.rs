use super::{Scene, SceneContext, SceneId};
use crate::outcome::Outcome;

pub(super) fn scenes() -> Vec<Scene> {
    vec![Scene::new(
        SceneId::Intro,
        "The Village of Eldermere",
        "A shadow has fallen over the realm. Where will you begin?",
    )
    .choice("Enter the Enchanted Forest", &[Outcome::Forest], enter_forest)
    .choice("Descend into the Crystal Caves", &[Outcome::Cave], enter_cave)
    .choice("Rest at the village inn", &[Outcome::Rest], rest)]
}

fn enter_forest(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("You step beneath the ancient boughs.");
    Outcome::Forest
}

fn enter_cave(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("Crystal light glimmers from the cave mouth.");
    Outcome::Cave
}

fn rest(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.heal_full();
    Outcome::Rest
}
