//! Turning an engine update into staged render steps.
//!
//! A plan is a list of steps, each scheduled at an offset from the moment the
//! update was emitted. Planning is pure; the presenter does the waiting.

use std::time::Duration;

use crate::calculator::{AnimationIntent, Update};
use crate::presentation::effects::{Effect, EffectSet};

/// Which display line a step touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Current,
    Previous,
}

/// What a step does.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SetText(Target, String),
    Animate(Target, Effect),
}

/// One render step, `at` after the update was emitted.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub at: Duration,
    pub action: Action,
}

impl Step {
    fn now(action: Action) -> Self {
        Self::after(Duration::ZERO, action)
    }

    fn after(at: Duration, action: Action) -> Self {
        Self { at, action }
    }
}

/// Steps that render `update`, ordered by `at`.
pub fn plan(update: &Update, effects: &EffectSet) -> Vec<Step> {
    use Action::{Animate, SetText};
    use Target::{Current, Previous};

    let current = || SetText(Current, update.current.clone());
    let previous = || SetText(Previous, update.previous.clone());

    match update.intent {
        AnimationIntent::DigitEnter => vec![
            Step::now(current()),
            Step::now(Animate(Current, effects.digit_enter.clone())),
        ],
        AnimationIntent::DigitDelete => {
            let swap = effects.delete_swap_delay;
            vec![
                Step::now(Animate(Current, effects.digit_delete.clone())),
                Step::after(swap, current()),
                Step::after(swap, Animate(Current, effects.digit_delete_finished.clone())),
            ]
        }
        AnimationIntent::Operator => {
            let swap = effects.swap_delay;
            vec![
                Step::now(Animate(Current, effects.current_fade_out_up.clone())),
                Step::after(swap, previous()),
                Step::after(swap, Animate(Previous, effects.operator_slide_up.clone())),
                Step::after(swap, current()),
                Step::after(swap, Animate(Current, effects.current_fade_in_up.clone())),
            ]
        }
        AnimationIntent::Result => {
            let swap = effects.swap_delay;
            vec![
                Step::now(Animate(Previous, effects.previous_fade_out_up.clone())),
                Step::after(swap, previous()),
                Step::after(swap, current()),
                Step::after(swap, Animate(Current, effects.result_enter.clone())),
            ]
        }
        AnimationIntent::Reset => vec![
            Step::now(current()),
            Step::now(previous()),
            Step::now(Animate(Current, effects.reset.clone())),
        ],
        AnimationIntent::None => Vec::new(),
    }
}

/// Steps that show `update` as-is, without animation.
pub fn immediate(update: &Update) -> Vec<Step> {
    vec![
        Step::now(Action::SetText(Target::Current, update.current.clone())),
        Step::now(Action::SetText(Target::Previous, update.previous.clone())),
    ]
}
