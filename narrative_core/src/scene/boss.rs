use super::{Scene, SceneContext, SceneId};
use crate::outcome::Outcome;

const PEACE: &[Outcome] = &[Outcome::PeacefulVictory];

pub(super) fn scenes() -> Vec<Scene> {
    vec![Scene::new(
        SceneId::BossPeaceful,
        "Words of Compassion",
        "The Shadow Guardian pauses, waiting. What do you say?",
    )
    .choice("\"You have been alone for so long...\"", PEACE, empathy)
    .choice("\"I offer you friendship, not battle.\"", PEACE, friendship)
    .choice("\"Your vigil can end. You can find peace.\"", PEACE, promise_of_peace)]
}

fn empathy(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("The Guardian's shadows soften as it feels understood.");
    free_guardian(ctx)
}

fn friendship(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("The Guardian stares at your offered hand, then takes it.");
    free_guardian(ctx)
}

fn promise_of_peace(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.say("\"Peace...\" the Guardian breathes. \"Can it truly be possible?\"");
    free_guardian(ctx)
}

fn free_guardian(ctx: &mut SceneContext<'_>) -> Outcome {
    ctx.set_flag("guardian_freed");
    ctx.keep("Guardian's Gratitude");
    ctx.wisdom();
    Outcome::PeacefulVictory
}
