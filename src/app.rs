use crate::config::{Config, Demo};
use crate::features::pill::{label::TextPhase, PillProps, ProgressPill};
use crate::gfx::draw::{DrawList, Surface};
use anyhow::Result;
use log::{debug, info, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

/// Stand-in for the host page: a scroll position measured in days that
/// drifts forward, wobbles, and now and then jumps back.
pub struct ScrollScript {
    demo: Demo,
    rng: StdRng,
    position: f32,
}

impl ScrollScript {
    pub fn new(demo: Demo) -> Self {
        Self {
            rng: StdRng::seed_from_u64(demo.seed),
            demo,
            position: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.end()
    }

    fn end(&self) -> f32 {
        self.demo.days.max(1) as f32 - 1e-3
    }

    pub fn props(&self) -> PillProps {
        let day = self.position.floor() as u32 + 1;
        let distance = format!("{:.1} km", self.position * self.demo.km_per_day);
        PillProps::new(day, distance, self.position.fract())
    }

    pub fn advance(&mut self, dt: f32) -> PillProps {
        let speed = 1.0 / self.demo.seconds_per_day.max(0.1);
        let mut next = self.position + dt.max(0.0) * speed;

        if self.demo.jitter > 0.0 {
            next += self.rng.gen_range(-self.demo.jitter..=self.demo.jitter);
        }
        let chance = self.demo.rewind_chance * dt;
        let chance = if chance.is_finite() {
            chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if self.rng.gen_bool(chance as f64) {
            let back = self.rng.gen_range(0.3..1.2);
            debug!("Scroll rewind by {:.2} days", back);
            next -= back;
        }

        self.position = next.clamp(0.0, self.end());

        let mut props = self.props();
        // Hosts hand over progress unclamped; keep a little overshoot in.
        if self.demo.jitter > 0.0 {
            props.progress += self.rng.gen_range(-self.demo.jitter..=self.demo.jitter);
        }
        props
    }
}

pub struct App {
    pub config: Config,
    pub pill: ProgressPill,
    pub script: ScrollScript,
    pub surface: DrawList,
    pub time: f32,
    pub frames_drawn: u64,
    last_phase: TextPhase,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let script = ScrollScript::new(config.demo.clone());
        let mut pill = ProgressPill::new(
            script.props(),
            config.pill_style()?,
            config.easing_params(),
            config.label_timings(),
        );
        pill.init_path(&config.outline_path());
        let surface = DrawList::new(config.theme.device_pixel_ratio);

        Ok(Self {
            config,
            pill,
            script,
            surface,
            time: 0.0,
            frames_drawn: 0,
            last_phase: TextPhase::Idle,
        })
    }

    /// Runs one frame. Returns `false` once the script has played out.
    pub fn update(&mut self, dt: f32) -> bool {
        self.time += dt;

        let props = self.script.advance(dt);
        self.pill.apply(&props);
        self.pill.tick(Duration::from_secs_f32(dt.max(0.0)));

        if self.pill.render(&mut self.surface) {
            self.frames_drawn += 1;
        }

        let view = self.pill.label_view();
        if view.phase != self.last_phase {
            info!(
                "Label {:?}: day {} / {} (opacity {:.2})",
                view.phase, view.day, view.distance, view.style.opacity
            );
            self.last_phase = view.phase;
        }
        trace!(
            "t={:.3} progress={:.3} displayed={:.3} draws={}",
            self.time,
            props.progress,
            self.pill.easing().displayed(),
            self.surface.commands().len()
        );

        !self.script.is_finished()
    }

    pub fn shutdown(&mut self) {
        self.pill.teardown();
        self.surface.clear();
        info!(
            "Finished after {:.1}s, {} frames drawn",
            self.time, self.frames_drawn
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_demo() -> Demo {
        Demo {
            days: 3,
            seconds_per_day: 1.0,
            km_per_day: 10.0,
            jitter: 0.0,
            rewind_chance: 0.0,
            seed: 1,
        }
    }

    #[test]
    fn script_walks_through_days() {
        let mut script = ScrollScript::new(quiet_demo());
        let p = script.advance(0.5);
        assert_eq!(p.day, 1);
        assert!((p.progress - 0.5).abs() < 1e-5);
        assert_eq!(p.distance, "5.0 km");

        let p = script.advance(1.0);
        assert_eq!(p.day, 2);
        assert!((p.progress - 0.5).abs() < 1e-4);

        for _ in 0..10 {
            script.advance(1.0);
        }
        assert!(script.is_finished());
        assert_eq!(script.props().day, 3);
    }

    #[test]
    fn same_seed_same_script() {
        let demo = Demo {
            rewind_chance: 2.0,
            jitter: 0.01,
            ..quiet_demo()
        };
        let mut a = ScrollScript::new(demo.clone());
        let mut b = ScrollScript::new(demo);
        for _ in 0..50 {
            assert_eq!(a.advance(0.05), b.advance(0.05));
        }
    }

    #[test]
    fn non_finite_rewind_chance_never_rewinds() {
        for rewind_chance in [f32::NAN, f32::INFINITY] {
            let mut script = ScrollScript::new(Demo {
                rewind_chance,
                ..quiet_demo()
            });
            let p = script.advance(0.5);
            assert_eq!(p.day, 1);
            assert!((p.progress - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn app_runs_to_completion_and_tears_down() {
        let config = Config {
            demo: quiet_demo(),
            ..Config::default()
        };
        let mut app = App::new(config).unwrap();
        let mut frames = 0;
        while app.update(1.0 / 60.0) {
            frames += 1;
            assert!(frames < 10_000);
        }
        assert!(app.frames_drawn > 0);
        app.shutdown();
        assert!(!app.pill.frame_loop().is_running());
        assert!(app.surface.is_empty());
    }
}
