use glam::Vec3;
use surface_common::Color;

/// A light source in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient { color: Color, intensity: f32 },
    /// Omnidirectional light from a point, no distance falloff.
    Point {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    pub fn point(color: Color, intensity: f32, position: Vec3) -> Self {
        Light::Point {
            color,
            intensity,
            position,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Light::Ambient { color, .. } | Light::Point { color, .. } => *color,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Ambient { intensity, .. } | Light::Point { intensity, .. } => *intensity,
        }
    }

    /// Color premultiplied by intensity.
    pub fn radiance(&self) -> Color {
        self.color().scaled(self.intensity())
    }
}
