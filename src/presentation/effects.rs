//! Animation parameters for display transitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Easing curve of an effect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    EaseIn,
    EaseOut,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier(f32, f32, f32, f32),
}

/// One visual effect played on a display line.
///
/// Each animated property is a `(from, to)` pair; `None` leaves it alone.
/// Offsets are in pixels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Effect {
    pub name: &'static str,
    pub opacity: Option<(f32, f32)>,
    pub x: Option<(f32, f32)>,
    pub y: Option<(f32, f32)>,
    pub scale: Option<(f32, f32)>,
    pub duration: Duration,
    pub easing: Easing,
}

impl Effect {
    const fn new(name: &'static str, duration_ms: u64, easing: Easing) -> Self {
        Self {
            name,
            opacity: None,
            x: None,
            y: None,
            scale: None,
            duration: Duration::from_millis(duration_ms),
            easing,
        }
    }

    const fn opacity(mut self, from: f32, to: f32) -> Self {
        self.opacity = Some((from, to));
        self
    }

    const fn x(mut self, from: f32, to: f32) -> Self {
        self.x = Some((from, to));
        self
    }

    const fn y(mut self, from: f32, to: f32) -> Self {
        self.y = Some((from, to));
        self
    }

    const fn scale(mut self, from: f32, to: f32) -> Self {
        self.scale = Some((from, to));
        self
    }

    /// Whether playing this effect takes any time.
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }
}

/// The full set of effects, plus the delays between staged text swaps.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectSet {
    pub digit_enter: Effect,
    pub digit_delete: Effect,
    pub digit_delete_finished: Effect,
    pub operator_slide_up: Effect,
    pub current_fade_out_up: Effect,
    pub current_fade_in_up: Effect,
    pub result_enter: Effect,
    pub previous_fade_out_up: Effect,
    pub reset: Effect,
    /// Wait before the new text replaces a deleted digit.
    pub delete_swap_delay: Duration,
    /// Wait before the new text appears after an operator or result.
    pub swap_delay: Duration,
}

impl Default for EffectSet {
    fn default() -> Self {
        Self::new(false)
    }
}

impl EffectSet {
    /// Build the effects. With `reduced_motion` every duration and delay is zero.
    pub fn new(reduced_motion: bool) -> Self {
        let set = Self {
            digit_enter: Effect::new("digit-enter", 150, Easing::EaseOut).x(5.0, 0.0),
            digit_delete: Effect::new("digit-delete", 150, Easing::EaseIn).x(0.0, 5.0),
            digit_delete_finished: Effect::new("digit-delete-finished", 100, Easing::EaseOut)
                .x(5.0, 0.0),
            operator_slide_up: Effect::new("operator-slide-up", 200, Easing::EaseOut)
                .opacity(0.0, 1.0)
                .y(20.0, 0.0),
            current_fade_out_up: Effect::new("current-fade-out-up", 200, Easing::EaseIn)
                .opacity(1.0, 0.0)
                .y(0.0, -20.0),
            current_fade_in_up: Effect::new("current-fade-in-up", 200, Easing::EaseOut)
                .opacity(0.0, 1.0)
                .y(20.0, 0.0),
            result_enter: Effect::new(
                "result-enter",
                300,
                Easing::CubicBezier(0.4, 0.0, 0.2, 1.0),
            )
            .opacity(0.0, 1.0)
            .y(20.0, 0.0)
            .scale(0.85, 1.0),
            previous_fade_out_up: Effect::new("previous-fade-out-up", 200, Easing::EaseIn)
                .opacity(1.0, 0.0)
                .y(0.0, -15.0),
            reset: Effect::new("reset", 150, Easing::EaseOut)
                .opacity(0.0, 1.0)
                .scale(0.0, 1.0),
            delete_swap_delay: Duration::from_millis(150),
            swap_delay: Duration::from_millis(100),
        };

        if reduced_motion { set.instant() } else { set }
    }

    /// Same effects with all timing removed.
    fn instant(mut self) -> Self {
        for effect in [
            &mut self.digit_enter,
            &mut self.digit_delete,
            &mut self.digit_delete_finished,
            &mut self.operator_slide_up,
            &mut self.current_fade_out_up,
            &mut self.current_fade_in_up,
            &mut self.result_enter,
            &mut self.previous_fade_out_up,
            &mut self.reset,
        ] {
            effect.duration = Duration::ZERO;
        }
        self.delete_swap_delay = Duration::ZERO;
        self.swap_delay = Duration::ZERO;
        self
    }
}
