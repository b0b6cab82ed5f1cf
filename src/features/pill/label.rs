//! Day / distance label with an exit-then-enter swap.
//!
//! A day change fades the current text out while lifting it, swaps in the
//! new text, then fades it in from below. The enter fade is applied in two
//! commits on consecutive frames: first the hidden start style, then the
//! resting style, so the fade always replays from the start.

use crate::gfx::anim::{lerp, Timeline};
use crate::scheduler::{TimerHandle, TimerQueue};
use log::{debug, trace};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPhase {
    Idle,
    Exiting,
    Entering,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub day: u32,
    pub distance: String,
}

impl Label {
    pub fn new(day: u32, distance: impl Into<String>) -> Self {
        Self {
            day,
            distance: distance.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelTimings {
    pub exit: Duration,
    pub enter: Duration,
    /// Vertical travel of the text during a swap, in px.
    pub travel: f32,
}

impl Default for LabelTimings {
    fn default() -> Self {
        Self {
            exit: Duration::from_millis(240),
            enter: Duration::from_millis(280),
            travel: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub opacity: f32,
    pub offset_y: f32,
}

impl LabelStyle {
    pub const REST: LabelStyle = LabelStyle {
        opacity: 1.0,
        offset_y: 0.0,
    };

    fn lerp(self, other: LabelStyle, t: f32) -> LabelStyle {
        LabelStyle {
            opacity: lerp(self.opacity, other.opacity, t),
            offset_y: lerp(self.offset_y, other.offset_y, t),
        }
    }
}

/// What the host should render for the label this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelView<'a> {
    pub day: u32,
    pub distance: &'a str,
    pub phase: TextPhase,
    pub style: LabelStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelTimer {
    ExitDone,
    EnterDone,
}

#[derive(Debug)]
pub struct LabelTransition {
    timings: LabelTimings,
    phase: TextPhase,
    displayed: Label,
    incoming: Option<Label>,
    live_day: u32,
    timers: TimerQueue<LabelTimer>,
    pending: Option<TimerHandle>,
    anim_from: LabelStyle,
    anim_to: LabelStyle,
    timeline: Timeline,
    queued_commit: Option<LabelStyle>,
}

impl LabelTransition {
    pub fn new(initial: Label, timings: LabelTimings) -> Self {
        let mut timeline = Timeline::new(0.0);
        timeline.start(0.0);
        Self {
            timings,
            phase: TextPhase::Idle,
            live_day: initial.day,
            displayed: initial,
            incoming: None,
            timers: TimerQueue::new(),
            pending: None,
            anim_from: LabelStyle::REST,
            anim_to: LabelStyle::REST,
            timeline,
            queued_commit: None,
        }
    }

    pub fn phase(&self) -> TextPhase {
        self.phase
    }

    pub fn displayed(&self) -> &Label {
        &self.displayed
    }

    pub fn has_pending_timer(&self) -> bool {
        self.pending.is_some_and(|h| self.timers.is_pending(h))
    }

    pub fn style(&self) -> LabelStyle {
        self.anim_from.lerp(self.anim_to, self.timeline.eased_progress())
    }

    pub fn view(&self) -> LabelView<'_> {
        LabelView {
            day: self.displayed.day,
            distance: &self.displayed.distance,
            phase: self.phase,
            style: self.style(),
        }
    }

    /// Feeds the latest host props.
    pub fn update(&mut self, day: u32, distance: &str) {
        if day != self.live_day {
            self.live_day = day;
            self.begin_exit(Label::new(day, distance));
            return;
        }

        match self.phase {
            TextPhase::Idle | TextPhase::Entering => {
                if self.displayed.distance != distance {
                    self.displayed.distance = distance.to_string();
                }
            }
            TextPhase::Exiting => {
                if let Some(incoming) = self.incoming.as_mut() {
                    incoming.distance = distance.to_string();
                }
            }
        }
    }

    fn now_secs(&self) -> f32 {
        self.timers.now().as_secs_f32()
    }

    fn animate_to(&mut self, to: LabelStyle, duration: Duration) {
        let now = self.now_secs();
        self.anim_from = self.style();
        self.anim_to = to;
        self.timeline = Timeline::new(duration.as_secs_f32());
        self.timeline.start(now);
    }

    fn commit(&mut self, style: LabelStyle) {
        let now = self.now_secs();
        self.anim_from = style;
        self.anim_to = style;
        self.timeline = Timeline::new(0.0);
        self.timeline.start(now);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            if self.timers.cancel(handle) {
                trace!("Cancelled label timer {:?}", handle);
            }
        }
        self.queued_commit = None;
    }

    fn begin_exit(&mut self, next: Label) {
        self.cancel_pending();
        debug!(
            "Label exit: day {} -> {} ({:?})",
            self.displayed.day, next.day, self.phase
        );
        self.phase = TextPhase::Exiting;
        self.incoming = Some(next);
        self.animate_to(
            LabelStyle {
                opacity: 0.0,
                offset_y: -self.timings.travel,
            },
            self.timings.exit,
        );
        self.pending = Some(self.timers.schedule(self.timings.exit, LabelTimer::ExitDone));
    }

    /// Advances the label clock, firing any timers that come due.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.timers.now() + elapsed;
        while let Some((handle, timer)) = self.timers.pop_due(until) {
            self.fire(handle, timer);
        }
        self.timers.finish_advance(until);
        let now = self.now_secs();
        self.timeline.update(now);
    }

    fn fire(&mut self, handle: TimerHandle, timer: LabelTimer) {
        let expected = match timer {
            LabelTimer::ExitDone => TextPhase::Exiting,
            LabelTimer::EnterDone => TextPhase::Entering,
        };
        if self.pending != Some(handle) || self.phase != expected {
            debug!("Dropping stale label timer {:?} in {:?}", timer, self.phase);
            return;
        }
        self.pending = None;

        match timer {
            LabelTimer::ExitDone => {
                if let Some(next) = self.incoming.take() {
                    self.displayed = next;
                }
                self.phase = TextPhase::Entering;
                debug!("Label enter: day {}", self.displayed.day);
                self.commit(LabelStyle {
                    opacity: 0.0,
                    offset_y: self.timings.travel,
                });
                self.queued_commit = Some(LabelStyle::REST);
                let handle = self.timers.schedule(self.timings.enter, LabelTimer::EnterDone);
                self.pending = Some(handle);
            }
            LabelTimer::EnterDone => {
                self.phase = TextPhase::Idle;
                self.queued_commit = None;
                self.commit(LabelStyle::REST);
                debug!("Label idle: day {}", self.displayed.day);
            }
        }
    }

    /// Second half of the enter commit; call once at the start of each frame.
    /// Returns `true` when the resting style was applied.
    pub fn on_frame(&mut self) -> bool {
        match self.queued_commit.take() {
            Some(style) => {
                let remaining = self.remaining_enter();
                self.animate_to(style, remaining);
                true
            }
            None => false,
        }
    }

    fn remaining_enter(&self) -> Duration {
        // The enter fade must end when the enter timer does.
        self.timings.enter.saturating_sub(self.since_enter_start())
    }

    fn since_enter_start(&self) -> Duration {
        let started = self.timeline.start_time;
        Duration::from_secs_f32((self.now_secs() - started).max(0.0))
    }

    /// Cancels every pending timer. The label keeps its last state.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.pending = None;
        self.queued_commit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn label() -> LabelTransition {
        LabelTransition::new(Label::new(1, "3.2 km"), LabelTimings::default())
    }

    #[test]
    fn day_change_runs_exit_then_enter() {
        let mut l = label();
        l.update(2, "5.0 km");
        assert_eq!(l.phase(), TextPhase::Exiting);
        assert_eq!(l.displayed(), &Label::new(1, "3.2 km"));

        l.advance(ms(239));
        assert_eq!(l.phase(), TextPhase::Exiting);
        assert_eq!(l.displayed().day, 1);

        l.advance(ms(1));
        assert_eq!(l.phase(), TextPhase::Entering);
        assert_eq!(l.displayed(), &Label::new(2, "5.0 km"));

        l.advance(ms(279));
        assert_eq!(l.phase(), TextPhase::Entering);
        l.advance(ms(1));
        assert_eq!(l.phase(), TextPhase::Idle);
        assert!(!l.has_pending_timer());
    }

    #[test]
    fn distance_only_update_while_idle_is_immediate() {
        let mut l = label();
        l.update(1, "3.4 km");
        assert_eq!(l.phase(), TextPhase::Idle);
        assert_eq!(l.displayed().distance, "3.4 km");
        assert!(!l.has_pending_timer());
    }

    #[test]
    fn distance_while_exiting_lands_with_the_swap() {
        let mut l = label();
        l.update(2, "5.0 km");
        l.update(2, "5.1 km");
        assert_eq!(l.displayed().distance, "3.2 km");
        l.advance(ms(240));
        assert_eq!(l.displayed(), &Label::new(2, "5.1 km"));
    }

    #[test]
    fn rapid_day_changes_restart_the_exit() {
        let mut l = label();
        l.update(2, "a");
        l.advance(ms(200));
        l.update(3, "b");
        // The first exit timer would have fired here.
        l.advance(ms(100));
        assert_eq!(l.phase(), TextPhase::Exiting);
        assert_eq!(l.displayed().day, 1);
        l.advance(ms(140));
        assert_eq!(l.phase(), TextPhase::Entering);
        assert_eq!(l.displayed(), &Label::new(3, "b"));
    }

    #[test]
    fn day_change_while_entering_cancels_enter_timer() {
        let mut l = label();
        l.update(2, "a");
        l.advance(ms(240));
        assert_eq!(l.phase(), TextPhase::Entering);
        l.advance(ms(100));
        l.update(3, "b");
        assert_eq!(l.phase(), TextPhase::Exiting);
        // The old enter timer was due 180ms from here.
        l.advance(ms(200));
        assert_eq!(l.phase(), TextPhase::Exiting);
        assert_eq!(l.displayed().day, 2);
        l.advance(ms(40));
        assert_eq!(l.phase(), TextPhase::Entering);
        assert_eq!(l.displayed().day, 3);
    }

    #[test]
    fn going_back_to_the_displayed_day_still_swaps() {
        let mut l = label();
        l.update(2, "a");
        l.advance(ms(100));
        l.update(1, "c");
        l.advance(ms(240));
        assert_eq!(l.displayed(), &Label::new(1, "c"));
    }

    #[test]
    fn exit_fades_out_and_lifts() {
        let mut l = label();
        assert_eq!(l.style(), LabelStyle::REST);
        l.update(2, "a");
        l.advance(ms(120));
        let mid = l.style();
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.offset_y < 0.0);
        l.advance(ms(119));
        assert!(l.style().opacity < 0.01);
    }

    #[test]
    fn enter_commits_hidden_then_rest_on_next_frame() {
        let mut l = label();
        l.update(2, "a");
        l.advance(ms(240));
        let hidden = l.style();
        assert_eq!(hidden.opacity, 0.0);
        assert!(hidden.offset_y > 0.0);

        // No frame yet: stays hidden even as time passes.
        l.advance(ms(16));
        assert_eq!(l.style().opacity, 0.0);

        assert!(l.on_frame());
        assert!(!l.on_frame());
        l.advance(ms(132));
        let mid = l.style();
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0, "{mid:?}");
        assert!(mid.offset_y > 0.0);

        l.advance(ms(132));
        assert_eq!(l.phase(), TextPhase::Idle);
        assert_eq!(l.style(), LabelStyle::REST);
    }

    #[test]
    fn teardown_cancels_timers() {
        let mut l = label();
        l.update(2, "a");
        l.teardown();
        assert!(!l.has_pending_timer());
        l.advance(ms(1000));
        assert_eq!(l.phase(), TextPhase::Exiting);
        assert_eq!(l.displayed().day, 1);
    }
}
