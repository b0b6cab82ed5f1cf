use super::math::{Rect, Vec2};
use log::{debug, warn};
use std::f32::consts::{FRAC_PI_2, PI};

/// Target distance between neighbouring samples, in path units.
pub const DEFAULT_SAMPLE_SPACING: f32 = 1.4;

/// Spacings below this fall back to [`DEFAULT_SAMPLE_SPACING`].
pub const MIN_SAMPLE_SPACING: f32 = 0.05;

/// Upper bound on the table size, whatever the path length.
pub const MAX_SAMPLES: usize = 1 << 16;

/// Highest `t` a lookup resolves to. Position 1.0 is the closing seam, which
/// draws on top of 0.0.
pub const LOOKUP_CEILING: f32 = 0.998;

/// Length queries over a static path.
pub trait PathMeasure {
    fn total_length(&self) -> f32;
    fn point_at_length(&self, length: f32) -> Vec2;
}

/// Rounded rectangle outline starting at the top centre and running
/// clockwise. With `radius = height / 2` this is a pill.
#[derive(Debug, Clone, Copy)]
pub struct RoundedRectPath {
    rect: Rect,
    radius: f32,
}

impl RoundedRectPath {
    pub fn new(rect: Rect, radius: f32) -> Self {
        let max_radius = (rect.width.min(rect.height) * 0.5).max(0.0);
        Self {
            rect,
            radius: radius.clamp(0.0, max_radius),
        }
    }

    pub fn pill(rect: Rect) -> Self {
        Self::new(rect, rect.height * 0.5)
    }

    fn straight_x(&self) -> f32 {
        (self.rect.width - 2.0 * self.radius).max(0.0)
    }

    fn straight_y(&self) -> f32 {
        (self.rect.height - 2.0 * self.radius).max(0.0)
    }

    fn arc_len(&self) -> f32 {
        self.radius * FRAC_PI_2
    }

    fn arc_point(&self, center: Vec2, start_angle: f32, along: f32) -> Vec2 {
        if self.radius <= 0.0 {
            return center;
        }
        let angle = start_angle + along / self.radius;
        Vec2::new(
            center.x + self.radius * angle.cos(),
            center.y + self.radius * angle.sin(),
        )
    }
}

impl PathMeasure for RoundedRectPath {
    fn total_length(&self) -> f32 {
        2.0 * (self.straight_x() + self.straight_y()) + 4.0 * self.arc_len()
    }

    fn point_at_length(&self, length: f32) -> Vec2 {
        let total = self.total_length();
        if total <= 0.0 || !length.is_finite() {
            return Vec2::new(self.rect.x + self.rect.width * 0.5, self.rect.y);
        }
        let mut s = length.rem_euclid(total);

        let Rect { x, y, width, height } = self.rect;
        let r = self.radius;
        let (sx, sy, arc) = (self.straight_x(), self.straight_y(), self.arc_len());
        let left = x + r;
        let right = x + width - r;
        let top = y + r;
        let bottom = y + height - r;

        // Top edge, right half.
        let half_top = sx * 0.5;
        if s <= half_top {
            return Vec2::new(x + width * 0.5 + s, y);
        }
        s -= half_top;
        if s <= arc {
            return self.arc_point(Vec2::new(right, top), -FRAC_PI_2, s);
        }
        s -= arc;
        if s <= sy {
            return Vec2::new(x + width, top + s);
        }
        s -= sy;
        if s <= arc {
            return self.arc_point(Vec2::new(right, bottom), 0.0, s);
        }
        s -= arc;
        if s <= sx {
            return Vec2::new(right - s, y + height);
        }
        s -= sx;
        if s <= arc {
            return self.arc_point(Vec2::new(left, bottom), FRAC_PI_2, s);
        }
        s -= arc;
        if s <= sy {
            return Vec2::new(x, bottom - s);
        }
        s -= sy;
        if s <= arc {
            return self.arc_point(Vec2::new(left, top), PI, s);
        }
        s -= arc;
        Vec2::new(left + s.min(half_top), y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f32,
    pub y: f32,
    pub t: f32,
}

impl SamplePoint {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Fixed lookup table of points along a path, indexed by normalized position.
#[derive(Debug, Clone)]
pub struct SampleTable {
    points: Box<[SamplePoint]>,
}

impl SampleTable {
    /// Samples `path` once. A path of `length` yields `ceil(length / spacing) + 1`
    /// points with `t = i / n`; a degenerate path yields a single point.
    pub fn sample(path: &dyn PathMeasure, spacing: f32) -> Self {
        let length = path.total_length();
        if !length.is_finite() || length <= 0.0 {
            warn!("Degenerate path (length={}), using a single sample", length);
            let p = path.point_at_length(0.0);
            return Self {
                points: vec![SamplePoint { x: p.x, y: p.y, t: 0.0 }].into_boxed_slice(),
            };
        }

        let spacing = if spacing.is_finite() && spacing >= MIN_SAMPLE_SPACING {
            spacing
        } else {
            warn!(
                "Sample spacing {} is too small, using {}",
                spacing, DEFAULT_SAMPLE_SPACING
            );
            DEFAULT_SAMPLE_SPACING
        };

        let n = ((length / spacing).ceil().max(1.0) as usize).min(MAX_SAMPLES - 1);
        let points: Vec<SamplePoint> = (0..=n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let p = path.point_at_length(t * length);
                SamplePoint { x: p.x, y: p.y, t }
            })
            .collect();

        debug!("Sampled path of length {:.1} into {} points", length, points.len());
        Self {
            points: points.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn index_of(&self, t: f32) -> usize {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, LOOKUP_CEILING) };
        let last = self.points.len().saturating_sub(1);
        ((t * last as f32).floor() as usize).min(last)
    }

    pub fn lookup(&self, t: f32) -> SamplePoint {
        self.points[self.index_of(t)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line(f32);

    impl PathMeasure for Line {
        fn total_length(&self) -> f32 {
            self.0
        }

        fn point_at_length(&self, length: f32) -> Vec2 {
            Vec2::new(length, 0.0)
        }
    }

    #[test]
    fn sample_count_follows_spacing() {
        let table = SampleTable::sample(&Line(20.0), 2.0);
        assert_eq!(table.len(), 11);
        let table = SampleTable::sample(&Line(20.5), 2.0);
        assert_eq!(table.len(), 12);
        assert_eq!(table.points()[0].t, 0.0);
        assert_eq!(table.points().last().unwrap().t, 1.0);
    }

    #[test]
    fn samples_are_evenly_spaced_in_t() {
        let table = SampleTable::sample(&Line(100.0), 1.4);
        let n = (table.len() - 1) as f32;
        for (i, p) in table.points().iter().enumerate() {
            assert!((p.t - i as f32 / n).abs() < 1e-6);
            assert!((p.x - p.t * 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn degenerate_path_gives_one_sample() {
        let table = SampleTable::sample(&Line(0.0), 1.4);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(0.7).t, 0.0);
        let table = SampleTable::sample(&Line(f32::NAN), 1.4);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn tiny_or_bad_spacing_falls_back_to_default() {
        let path = RoundedRectPath::pill(Rect::new(0.0, 0.0, 220.0, 56.0));
        let expected = SampleTable::sample(&path, DEFAULT_SAMPLE_SPACING).len();
        for spacing in [1e-30, 0.0, -2.0, f32::NAN, f32::INFINITY] {
            assert_eq!(SampleTable::sample(&path, spacing).len(), expected);
        }
    }

    #[test]
    fn huge_path_is_capped() {
        let table = SampleTable::sample(&Line(1e12), 1.0);
        assert_eq!(table.len(), MAX_SAMPLES);
        assert_eq!(table.points().last().unwrap().t, 1.0);
    }

    #[test]
    fn lookup_stops_short_of_the_seam() {
        let table = SampleTable::sample(&Line(140.0), 1.4);
        let last = table.len() - 1;
        assert_eq!(table.index_of(1.0), (0.998 * last as f32).floor() as usize);
        assert!(table.index_of(1.0) < last);
        assert_eq!(table.index_of(-1.0), 0);
        assert_eq!(table.index_of(5.0), table.index_of(1.0));
    }

    #[test]
    fn pill_length_and_corners() {
        let path = RoundedRectPath::pill(Rect::new(0.0, 0.0, 100.0, 40.0));
        let expected = 2.0 * 60.0 + 2.0 * PI * 20.0;
        assert!((path.total_length() - expected).abs() < 1e-3);

        let start = path.point_at_length(0.0);
        assert!((start.x - 50.0).abs() < 1e-4 && start.y.abs() < 1e-4);

        // Half way round lands on the bottom centre.
        let half = path.point_at_length(expected * 0.5);
        assert!((half.x - 50.0).abs() < 1e-2, "{half:?}");
        assert!((half.y - 40.0).abs() < 1e-2, "{half:?}");

        // Right-most point of the pill is the middle of the right arc.
        let east = path.point_at_length(30.0 + PI * 10.0);
        assert!((east.x - 100.0).abs() < 1e-2 && (east.y - 20.0).abs() < 1e-2, "{east:?}");
    }

    #[test]
    fn rounded_rect_wraps_and_stays_on_outline() {
        let path = RoundedRectPath::new(Rect::new(10.0, 10.0, 80.0, 50.0), 8.0);
        let total = path.total_length();
        let a = path.point_at_length(total + 5.0);
        let b = path.point_at_length(5.0);
        assert!(a.distance(b) < 1e-3);

        for i in 0..200 {
            let p = path.point_at_length(total * i as f32 / 200.0);
            assert!(p.x >= 10.0 - 1e-3 && p.x <= 90.0 + 1e-3);
            assert!(p.y >= 10.0 - 1e-3 && p.y <= 60.0 + 1e-3);
        }
    }

    #[test]
    fn consecutive_pill_samples_are_close() {
        let path = RoundedRectPath::pill(Rect::new(0.0, 0.0, 220.0, 56.0));
        let table = SampleTable::sample(&path, DEFAULT_SAMPLE_SPACING);
        for pair in table.points().windows(2) {
            assert!(pair[0].pos().distance(pair[1].pos()) <= DEFAULT_SAMPLE_SPACING + 1e-2);
        }
    }
}
