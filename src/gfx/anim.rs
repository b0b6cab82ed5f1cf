pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// `f²(3-2f)` on a fraction clamped to [0, 1].
pub fn smoothstep(f: f32) -> f32 {
    let f = f.clamp(0.0, 1.0);
    f * f * (3.0 - 2.0 * f)
}

/// Fraction of the remaining distance covered in `dt` seconds by an
/// exponential approach with rate `k`.
pub fn exp_approach(k: f32, dt: f32) -> f32 {
    1.0 - (-k * dt).exp()
}

#[derive(Debug, Clone)]
pub struct Timeline {
    pub start_time: f32,
    pub duration: f32,
    pub current_time: f32,
}

impl Timeline {
    pub fn new(duration: f32) -> Self {
        Self {
            start_time: 0.0,
            duration,
            current_time: 0.0,
        }
    }

    pub fn start(&mut self, now: f32) {
        self.start_time = now;
        self.current_time = now;
    }

    pub fn update(&mut self, now: f32) {
        self.current_time = now;
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let elapsed = self.current_time - self.start_time;
        (elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn eased_progress(&self) -> f32 {
        ease_in_out(self.progress())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_hits_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(smoothstep(-3.0), 0.0);
        assert_eq!(smoothstep(7.0), 1.0);
    }

    #[test]
    fn exp_approach_is_zero_without_time() {
        assert_eq!(exp_approach(12.0, 0.0), 0.0);
        let f = exp_approach(12.0, 0.016);
        assert!(f > 0.17 && f < 0.18, "got {f}");
    }

    #[test]
    fn timeline_clamps_progress() {
        let mut tl = Timeline::new(0.24);
        tl.start(1.0);
        assert_eq!(tl.progress(), 0.0);
        tl.update(1.12);
        assert!((tl.progress() - 0.5).abs() < 1e-4);
        tl.update(5.0);
        assert!(tl.is_complete());
        assert_eq!(tl.eased_progress(), 1.0);
    }

    #[test]
    fn zero_length_timeline_is_complete() {
        let tl = Timeline::new(0.0);
        assert!(tl.is_complete());
    }
}
