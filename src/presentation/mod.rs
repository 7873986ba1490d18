//! Rendering calculator updates with staged, cancellable animations.

pub mod effects;
pub mod plan;
mod presenter;

pub use effects::{Easing, Effect, EffectSet};
pub use plan::{Action, Step, Target, immediate, plan};
pub use presenter::{Presenter, Surface};
