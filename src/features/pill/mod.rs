pub mod backward;
pub mod easing;
pub mod label;

use crate::gfx::{
    color::Palette,
    draw::Surface,
    math::Vec2,
    path::{PathMeasure, SampleTable, DEFAULT_SAMPLE_SPACING, LOOKUP_CEILING},
};
use crate::scheduler::FrameLoop;
use backward::{BandColors, Crossfade, DayBackwardTransition, DayChange};
use easing::{clamp_unit, EasingLoop, EasingParams};
use label::{Label, LabelTimings, LabelTransition, LabelView};
use log::{debug, info, trace, warn};
use std::time::Duration;

/// Host inputs for one update.
#[derive(Debug, Clone, PartialEq)]
pub struct PillProps {
    pub day: u32,
    pub distance: String,
    pub progress: f32,
}

impl PillProps {
    pub fn new(day: u32, distance: impl Into<String>, progress: f32) -> Self {
        Self {
            day,
            distance: distance.into(),
            progress,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PillStyle {
    pub track: Palette,
    pub marker: Palette,
    pub stroke_width: f32,
    pub marker_radius: f32,
    pub marker_stroke_width: f32,
    /// Nothing is drawn until progress passes this value.
    pub render_threshold: f32,
    pub sample_spacing: f32,
}

impl Default for PillStyle {
    fn default() -> Self {
        Self {
            track: Palette::TRACK,
            marker: Palette::MARKER,
            stroke_width: 3.0,
            marker_radius: 4.5,
            marker_stroke_width: 2.0,
            render_threshold: 0.003,
            sample_spacing: DEFAULT_SAMPLE_SPACING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerState {
    pub pos: Vec2,
    pub colors: BandColors,
}

/// Pill-shaped progress indicator.
///
/// The stroke follows the raw host progress while the marker follows the
/// eased value, so during easing the two can briefly disagree.
#[derive(Debug)]
pub struct ProgressPill {
    style: PillStyle,
    samples: Option<SampleTable>,
    easing: EasingLoop,
    days: DayBackwardTransition,
    label: LabelTransition,
    progress: f32,
    frame_loop: FrameLoop,
}

impl ProgressPill {
    pub fn new(
        initial: PillProps,
        style: PillStyle,
        params: EasingParams,
        timings: LabelTimings,
    ) -> Self {
        let mut easing = EasingLoop::new(params);
        easing.snap_to(initial.progress);
        let mut days = DayBackwardTransition::new();
        days.observe(initial.day);

        Self {
            style,
            samples: None,
            easing,
            days,
            label: LabelTransition::new(Label::new(initial.day, initial.distance), timings),
            progress: initial.progress,
            frame_loop: FrameLoop::Running,
        }
    }

    /// Samples the outline. The table is built once; later calls are ignored.
    pub fn init_path(&mut self, path: &dyn PathMeasure) {
        if self.samples.is_some() {
            warn!("Path already sampled, ignoring");
            return;
        }
        let table = SampleTable::sample(path, self.style.sample_spacing);
        info!("Pill path ready: {} samples", table.len());
        self.samples = Some(table);
    }

    /// Feeds new host props. Ignored after teardown.
    pub fn set_props(&mut self, day: u32, distance: &str, progress: f32) {
        if !self.frame_loop.is_running() {
            trace!("Props after teardown, ignoring");
            return;
        }
        self.progress = progress;
        self.label.update(day, distance);

        match self.days.observe(day) {
            DayChange::Backward => {
                self.easing.snap_to(progress);
                let from = self.colors_at(0.0);
                self.easing.begin_crossfade(Crossfade::new(from));
            }
            _ => self.easing.set_target(progress),
        }
    }

    pub fn apply(&mut self, props: &PillProps) {
        self.set_props(props.day, &props.distance, props.progress);
    }

    /// One frame. Returns `false` when the frame was skipped.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.frame_loop.is_running() {
            return false;
        }

        self.label.on_frame();
        self.label.advance(elapsed);

        if self.samples.is_none() {
            trace!("No sample table yet, skipping frame");
            return false;
        }
        self.easing.tick(elapsed.as_secs_f32());
        true
    }

    pub fn teardown(&mut self) {
        if self.frame_loop.is_running() {
            debug!("Pill teardown");
        }
        self.frame_loop = FrameLoop::Stopped;
        self.label.teardown();
    }

    pub fn frame_loop(&self) -> FrameLoop {
        self.frame_loop
    }

    pub fn easing(&self) -> &EasingLoop {
        &self.easing
    }

    pub fn samples(&self) -> Option<&SampleTable> {
        self.samples.as_ref()
    }

    pub fn label(&self) -> &LabelTransition {
        &self.label
    }

    pub fn label_view(&self) -> LabelView<'_> {
        self.label.view()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_visible(&self) -> bool {
        clamp_unit(self.progress) > self.style.render_threshold
    }

    pub fn colors_at(&self, t: f32) -> BandColors {
        BandColors {
            track: self.style.track.color_at(t),
            marker: self.style.marker.color_at(t),
        }
    }

    fn shown_colors(&self, t: f32) -> BandColors {
        let live = self.colors_at(t);
        match self.easing.crossfade() {
            Some(cf) => cf.blend(live),
            None => live,
        }
    }

    /// Normalized position where the stroke ends.
    pub fn stroke_end(&self) -> f32 {
        clamp_unit(self.progress)
    }

    pub fn marker(&self) -> Option<MarkerState> {
        let samples = self.samples.as_ref()?;
        let t = self.easing.displayed().clamp(0.0, LOOKUP_CEILING);
        let point = samples.lookup(t);
        Some(MarkerState {
            pos: point.pos(),
            colors: self.shown_colors(t),
        })
    }

    /// Draws the current frame. Returns `false` if nothing was drawn.
    pub fn render(&self, surface: &mut dyn Surface) -> bool {
        surface.clear();
        if !self.frame_loop.is_running() || !self.is_visible() {
            return false;
        }
        let (Some(samples), Some(marker)) = (self.samples.as_ref(), self.marker()) else {
            return false;
        };

        let dpr = surface.device_pixel_ratio();
        let width = self.style.stroke_width * dpr;
        let end = samples.index_of(self.stroke_end());
        for pair in samples.points()[..=end].windows(2) {
            let color = self.shown_colors(pair[0].t).track;
            surface.stroke_segment(
                pair[0].pos().scale(dpr),
                pair[1].pos().scale(dpr),
                color.into(),
                width,
            );
        }

        surface.marker(
            marker.pos.scale(dpr),
            self.style.marker_radius * dpr,
            marker.colors.marker.into(),
            marker.colors.track.into(),
            self.style.marker_stroke_width * dpr,
        );
        true
    }
}
