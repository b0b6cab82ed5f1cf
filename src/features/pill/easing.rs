use super::backward::Crossfade;
use crate::gfx::anim::exp_approach;
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasingParams {
    /// Exponential approach rate, per second.
    pub rate: f32,
    /// A backward gap larger than this snaps instead of easing.
    pub snap_back_threshold: f32,
    /// Gaps smaller than this settle onto the target.
    pub settle_epsilon: f32,
    /// Longest step a single tick accounts for, in seconds.
    pub max_dt: f32,
    /// Crossfade speed, fade units per second.
    pub crossfade_rate: f32,
}

impl Default for EasingParams {
    fn default() -> Self {
        Self {
            rate: 12.0,
            snap_back_threshold: 0.3,
            settle_epsilon: 0.001,
            max_dt: 0.05,
            crossfade_rate: 2.5,
        }
    }
}

/// Displayed and target progress, both kept in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    pub displayed: f32,
    pub target: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Eased,
    Settled,
    SnappedBack,
}

pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct EasingLoop {
    params: EasingParams,
    state: AnimationState,
    crossfade: Option<Crossfade>,
}

impl EasingLoop {
    pub fn new(params: EasingParams) -> Self {
        Self {
            params,
            state: AnimationState::default(),
            crossfade: None,
        }
    }

    pub fn params(&self) -> &EasingParams {
        &self.params
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn displayed(&self) -> f32 {
        self.state.displayed
    }

    pub fn target(&self) -> f32 {
        self.state.target
    }

    pub fn crossfade(&self) -> Option<&Crossfade> {
        self.crossfade.as_ref()
    }

    pub fn set_target(&mut self, progress: f32) {
        self.state.target = clamp_unit(progress);
    }

    /// Moves both displayed and target to `progress` with no easing.
    pub fn snap_to(&mut self, progress: f32) {
        let p = clamp_unit(progress);
        self.state = AnimationState {
            displayed: p,
            target: p,
        };
    }

    /// Replaces any running crossfade.
    pub fn begin_crossfade(&mut self, crossfade: Crossfade) {
        self.crossfade = Some(crossfade);
    }

    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        let elapsed = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        // Only position easing is capped; the crossfade runs on real time.
        let dt = elapsed.min(self.params.max_dt);

        if let Some(cf) = self.crossfade.as_mut() {
            if cf.advance(elapsed * self.params.crossfade_rate) {
                debug!("Crossfade complete");
                self.crossfade = None;
            }
        }

        let AnimationState { displayed, target } = self.state;
        let diff = target - displayed;

        if diff < -self.params.snap_back_threshold {
            trace!("Snapping back from {:.3} to {:.3}", displayed, target);
            self.state.displayed = target;
            return TickOutcome::SnappedBack;
        }
        if diff.abs() < self.params.settle_epsilon {
            self.state.displayed = target;
            return TickOutcome::Settled;
        }

        let eased = displayed + diff * exp_approach(self.params.rate, dt);
        self.state.displayed = clamp_unit(eased);
        TickOutcome::Eased
    }
}
