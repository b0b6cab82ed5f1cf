//! Backward day navigation.
//!
//! Stepping from day N back into day N-1 makes progress jump from near 0 to
//! near 1. That jump is not forward motion, so the pill snaps to the new
//! position and fades its colours in from the start-of-track colours.

use crate::gfx::color::Rgb;
use log::info;

/// Fades within this distance of 1 count as finished.
const FADE_EPSILON: f32 = 1e-4;

/// Track and marker colour pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandColors {
    pub track: Rgb,
    pub marker: Rgb,
}

impl BandColors {
    pub fn mix(self, other: BandColors, w: f32) -> BandColors {
        BandColors {
            track: self.track.mix(other.track, w),
            marker: self.marker.mix(other.marker, w),
        }
    }
}

/// One-shot blend from colours frozen at the jump towards the live colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossfade {
    from: BandColors,
    fade: f32,
}

impl Crossfade {
    pub fn new(from: BandColors) -> Self {
        Self { from, fade: 0.0 }
    }

    pub fn fade(&self) -> f32 {
        self.fade
    }

    pub fn from_colors(&self) -> BandColors {
        self.from
    }

    /// Returns `true` once the fade has reached 1.
    pub fn advance(&mut self, amount: f32) -> bool {
        if amount > 0.0 {
            self.fade = (self.fade + amount).min(1.0);
        }
        if self.fade >= 1.0 - FADE_EPSILON {
            self.fade = 1.0;
        }
        self.fade >= 1.0
    }

    pub fn blend(&self, live: BandColors) -> BandColors {
        self.from.mix(live, self.fade)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayChange {
    First,
    Same,
    Forward,
    Backward,
}

/// Watches the day index and reports backward steps.
#[derive(Debug, Clone, Default)]
pub struct DayBackwardTransition {
    previous_day: Option<u32>,
}

impl DayBackwardTransition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_day(&self) -> Option<u32> {
        self.previous_day
    }

    pub fn observe(&mut self, day: u32) -> DayChange {
        let change = match self.previous_day {
            None => DayChange::First,
            Some(prev) if day < prev => DayChange::Backward,
            Some(prev) if day > prev => DayChange::Forward,
            Some(_) => DayChange::Same,
        };
        if change == DayChange::Backward {
            info!(
                "Day went back from {} to {}, starting crossfade",
                self.previous_day.unwrap_or_default(),
                day
            );
        }
        self.previous_day = Some(day);
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(v: u8) -> BandColors {
        BandColors {
            track: Rgb::new(v, v, v),
            marker: Rgb::new(v, 0, v),
        }
    }

    #[test]
    fn only_a_decrease_is_backward() {
        let mut days = DayBackwardTransition::new();
        assert_eq!(days.observe(3), DayChange::First);
        assert_eq!(days.observe(3), DayChange::Same);
        assert_eq!(days.observe(4), DayChange::Forward);
        assert_eq!(days.observe(2), DayChange::Backward);
        assert_eq!(days.previous_day(), Some(2));
        assert_eq!(days.observe(9), DayChange::Forward);
    }

    #[test]
    fn fade_starts_at_zero_and_caps_at_one() {
        let mut cf = Crossfade::new(colors(0));
        assert_eq!(cf.fade(), 0.0);
        assert!(!cf.advance(0.5));
        assert!(!cf.advance(-3.0));
        assert_eq!(cf.fade(), 0.5);
        assert!(cf.advance(0.8));
        assert_eq!(cf.fade(), 1.0);
    }

    #[test]
    fn fine_grained_steps_still_finish() {
        let mut cf = Crossfade::new(colors(0));
        let mut done = false;
        for _ in 0..400 {
            done = cf.advance(0.001 * 2.5);
        }
        assert!(done);
    }

    #[test]
    fn blend_moves_from_frozen_to_live() {
        let mut cf = Crossfade::new(colors(0));
        assert_eq!(cf.blend(colors(200)), colors(0));
        cf.advance(0.5);
        assert_eq!(cf.blend(colors(200)), colors(100));
        cf.advance(0.5);
        assert_eq!(cf.blend(colors(200)), colors(200));
    }
}
