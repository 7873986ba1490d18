//! Drives a [`Surface`] from calculator inputs.
//!
//! The presenter owns the calculator. Every input is applied synchronously;
//! the resulting plan is rendered on a tokio task so staged swaps can wait
//! without blocking the next input. A newer update always supersedes an
//! in-flight plan, and the superseded update's text is written out first so
//! the surface never lags behind or shows stale text.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace, warn};

use crate::calculator::{AnimationIntent, Calculator, Update};
use crate::error::CalcError;
use crate::input::Input;
use crate::presentation::effects::{Effect, EffectSet};
use crate::presentation::plan::{Action, Step, Target, immediate, plan};

/// Something that can show the two display lines.
pub trait Surface: Send + Sync + 'static {
    fn set_text(&self, target: Target, text: &str);
    fn animate(&self, target: Target, effect: &Effect);
    /// Show a user-facing notice, such as a division by zero.
    fn notify(&self, message: &str);
}

pub struct Presenter {
    calculator: Calculator,
    surface: Arc<dyn Surface>,
    effects: EffectSet,
    /// Generation of the latest plan. Steps of older plans are dropped.
    generation: Arc<Mutex<u64>>,
    in_flight: Option<JoinHandle<()>>,
    /// Last update handed to the surface.
    shown: Update,
}

impl Presenter {
    /// Create a presenter and show the initial display.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(surface: Arc<dyn Surface>, effects: EffectSet) -> Self {
        let calculator = Calculator::new();
        let shown = calculator.snapshot(AnimationIntent::None);
        for step in immediate(&shown) {
            apply(surface.as_ref(), &step.action);
        }

        Self {
            calculator,
            surface,
            effects,
            generation: Arc::new(Mutex::new(0)),
            in_flight: None,
            shown,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Apply one input and start rendering its update.
    ///
    /// Arithmetic failures are shown to the user and the reset state is
    /// rendered before the error is returned.
    pub fn handle(&mut self, input: Input) -> Result<AnimationIntent, CalcError> {
        match self.calculator.dispatch(input) {
            Ok(update) => {
                let intent = update.intent;
                self.render(update);
                Ok(intent)
            }
            Err(err) => {
                warn!(%err, ?input, "calculation failed");
                self.surface.notify(&err.to_string());
                self.render(self.calculator.snapshot(AnimationIntent::Reset));
                Err(err)
            }
        }
    }

    /// Wait for the in-flight plan, if any, to finish.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.in_flight.take()
            && let Err(err) = handle.await
            && !err.is_cancelled()
        {
            warn!(%err, "render task failed");
        }
    }

    fn render(&mut self, update: Update) {
        if update.intent == AnimationIntent::None {
            trace!("nothing to render");
            return;
        }

        let steps = plan(&update, &self.effects);
        let split = steps
            .iter()
            .position(|step| !step.at.is_zero())
            .unwrap_or(steps.len());
        let (now, later): (Vec<Step>, Vec<Step>) = {
            let mut steps = steps;
            let later = steps.split_off(split);
            (steps, later)
        };

        let generation = {
            let mut generation = lock(&self.generation);
            *generation += 1;

            if let Some(handle) = self.in_flight.take()
                && !handle.is_finished()
            {
                handle.abort();
                debug!(intent = self.shown.intent.label(), "superseding in-flight render");
                self.surface.set_text(Target::Current, &self.shown.current);
                self.surface.set_text(Target::Previous, &self.shown.previous);
            }

            for step in &now {
                apply(self.surface.as_ref(), &step.action);
            }
            *generation
        };

        trace!(intent = update.intent.label(), generation, "rendering");
        self.shown = update;

        if later.is_empty() {
            return;
        }

        let surface = Arc::clone(&self.surface);
        let gate = Arc::clone(&self.generation);
        let start = Instant::now();
        self.in_flight = Some(tokio::spawn(async move {
            for step in later {
                sleep_until(start + step.at).await;
                let latest = lock(&gate);
                if *latest != generation {
                    trace!(generation, "plan superseded");
                    return;
                }
                apply(surface.as_ref(), &step.action);
            }
        }));
    }
}

fn apply(surface: &dyn Surface, action: &Action) {
    match action {
        Action::SetText(target, text) => surface.set_text(*target, text),
        Action::Animate(target, effect) => surface.animate(*target, effect),
    }
}

fn lock(generation: &Mutex<u64>) -> MutexGuard<'_, u64> {
    generation.lock().unwrap_or_else(PoisonError::into_inner)
}
