use super::math::{Color, Vec2};

/// What the pill needs from whatever it is drawn on.
pub trait Surface {
    fn device_pixel_ratio(&self) -> f32;
    fn clear(&mut self);
    fn stroke_segment(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
    fn marker(&mut self, at: Vec2, radius: f32, fill: Color, stroke: Color, stroke_width: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Stroke {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    Marker {
        at: Vec2,
        radius: f32,
        fill: Color,
        stroke: Color,
        stroke_width: f32,
    },
}

/// Surface that records draw calls for the current frame.
#[derive(Debug, Clone)]
pub struct DrawList {
    scale: f32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(scale: f32) -> Self {
        Self {
            scale: if scale.is_finite() && scale > 0.0 { scale } else { 1.0 },
            commands: Vec::with_capacity(1024),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn strokes(&self) -> impl Iterator<Item = (Vec2, Vec2, Color, f32)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            DrawCommand::Stroke { from, to, color, width } => Some((from, to, color, width)),
            _ => None,
        })
    }

    pub fn marker_command(&self) -> Option<&DrawCommand> {
        self.commands
            .iter()
            .find(|cmd| matches!(cmd, DrawCommand::Marker { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for DrawList {
    fn device_pixel_ratio(&self) -> f32 {
        self.scale
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Stroke { from, to, color, width });
    }

    fn marker(&mut self, at: Vec2, radius: f32, fill: Color, stroke: Color, stroke_width: f32) {
        self.commands.push(DrawCommand::Marker {
            at,
            radius,
            fill,
            stroke,
            stroke_width,
        });
    }
}
