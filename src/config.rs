use crate::features::pill::{easing::EasingParams, label::LabelTimings, PillStyle};
use crate::gfx::{color::Palette, math::Rect, path::RoundedRectPath};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub outline: Outline,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub motion: Motion,

    #[serde(default)]
    pub label: LabelConfig,

    #[serde(default = "default_fps_cap")]
    pub fps_cap: u32,

    #[serde(default)]
    pub demo: Demo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Outline {
    pub width: f32,
    pub height: f32,
    /// Defaults to half the height, which makes a pill.
    pub corner_radius: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub track_palette: Vec<String>,
    pub marker_palette: Vec<String>,
    pub stroke_width: f32,
    pub marker_radius: f32,
    pub marker_stroke_width: f32,
    pub device_pixel_ratio: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Motion {
    pub sample_spacing: f32,
    pub easing_rate: f32,
    pub snap_back_threshold: f32,
    pub settle_epsilon: f32,
    pub max_frame_dt: f32,
    pub crossfade_rate: f32,
    pub render_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub exit_ms: u64,
    pub enter_ms: u64,
    pub travel: f32,
}

/// Simulated scroll host used by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Demo {
    pub days: u32,
    pub seconds_per_day: f32,
    pub km_per_day: f32,
    pub jitter: f32,
    /// Chance per second of scrolling back a day or so.
    pub rewind_chance: f32,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            outline: Outline::default(),
            theme: Theme::default(),
            motion: Motion::default(),
            label: LabelConfig::default(),
            fps_cap: default_fps_cap(),
            demo: Demo::default(),
        }
    }
}

impl Default for Outline {
    fn default() -> Self {
        Self {
            width: 220.0,
            height: 56.0,
            corner_radius: None,
        }
    }
}

fn hex_list(palette: &Palette) -> Vec<String> {
    palette
        .0
        .iter()
        .map(|c| format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b))
        .collect()
}

impl Default for Theme {
    fn default() -> Self {
        let style = PillStyle::default();
        Self {
            track_palette: hex_list(&Palette::TRACK),
            marker_palette: hex_list(&Palette::MARKER),
            stroke_width: style.stroke_width,
            marker_radius: style.marker_radius,
            marker_stroke_width: style.marker_stroke_width,
            device_pixel_ratio: 2.0,
        }
    }
}

impl Default for Motion {
    fn default() -> Self {
        let params = EasingParams::default();
        let style = PillStyle::default();
        Self {
            sample_spacing: style.sample_spacing,
            easing_rate: params.rate,
            snap_back_threshold: params.snap_back_threshold,
            settle_epsilon: params.settle_epsilon,
            max_frame_dt: params.max_dt,
            crossfade_rate: params.crossfade_rate,
            render_threshold: style.render_threshold,
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            exit_ms: 240,
            enter_ms: 280,
            travel: 6.0,
        }
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self {
            days: 5,
            seconds_per_day: 2.5,
            km_per_day: 18.4,
            jitter: 0.004,
            rewind_chance: 0.15,
            seed: 7,
        }
    }
}

fn default_fps_cap() -> u32 {
    60
}

impl Config {
    /// `<config dir>/pilltrack/config.toml`.
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join("pilltrack").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn pill_style(&self) -> Result<PillStyle> {
        Ok(PillStyle {
            track: Palette::from_hex(&self.theme.track_palette)?,
            marker: Palette::from_hex(&self.theme.marker_palette)?,
            stroke_width: self.theme.stroke_width,
            marker_radius: self.theme.marker_radius,
            marker_stroke_width: self.theme.marker_stroke_width,
            render_threshold: self.motion.render_threshold,
            sample_spacing: self.motion.sample_spacing,
        })
    }

    pub fn easing_params(&self) -> EasingParams {
        EasingParams {
            rate: self.motion.easing_rate,
            snap_back_threshold: self.motion.snap_back_threshold,
            settle_epsilon: self.motion.settle_epsilon,
            max_dt: self.motion.max_frame_dt,
            crossfade_rate: self.motion.crossfade_rate,
        }
    }

    pub fn label_timings(&self) -> LabelTimings {
        LabelTimings {
            exit: Duration::from_millis(self.label.exit_ms),
            enter: Duration::from_millis(self.label.enter_ms),
            travel: self.label.travel,
        }
    }

    pub fn outline_path(&self) -> RoundedRectPath {
        let rect = Rect::new(0.0, 0.0, self.outline.width, self.outline.height);
        match self.outline.corner_radius {
            Some(radius) => RoundedRectPath::new(rect, radius),
            None => RoundedRectPath::pill(rect),
        }
    }
}
