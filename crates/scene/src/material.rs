use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use surface_assets::{CubeTextureHandle, TextureHandle};
use surface_common::Color;

/// Shading model of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// Unlit color and texture.
    Basic,
    /// Lookup of a pre-lit sphere image by view-space normal.
    Matcap,
    /// Grayscale by distance from the camera.
    Depth,
    /// Per-vertex-style diffuse lighting.
    Lambert,
    /// Diffuse plus specular highlight.
    Phong,
    /// Diffuse quantized through a gradient ramp.
    Toon,
    /// Metalness/roughness physically based shading.
    #[default]
    Standard,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 7] = [
        MaterialKind::Basic,
        MaterialKind::Matcap,
        MaterialKind::Depth,
        MaterialKind::Lambert,
        MaterialKind::Phong,
        MaterialKind::Toon,
        MaterialKind::Standard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MaterialKind::Basic => "basic",
            MaterialKind::Matcap => "matcap",
            MaterialKind::Depth => "depth",
            MaterialKind::Lambert => "lambert",
            MaterialKind::Phong => "phong",
            MaterialKind::Toon => "toon",
            MaterialKind::Standard => "standard",
        }
    }

    /// Numeric id the shader switches on.
    pub fn shader_id(self) -> u32 {
        self as u32
    }

    /// Whether scene lights contribute to this model.
    pub fn is_lit(self) -> bool {
        matches!(
            self,
            MaterialKind::Lambert | MaterialKind::Phong | MaterialKind::Toon | MaterialKind::Standard
        )
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised material kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown material kind {0:?} (expected one of basic, matcap, depth, lambert, phong, toon, standard)")]
pub struct UnknownMaterialKind(pub String);

impl FromStr for MaterialKind {
    type Err = UnknownMaterialKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        MaterialKind::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| UnknownMaterialKind(s.to_string()))
    }
}

/// Which faces of a mesh are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Surface-appearance parameters shared by every node that references them.
///
/// Metalness and roughness are private so every write goes through a
/// clamping setter.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub kind: MaterialKind,
    pub color: Color,
    metalness: f32,
    roughness: f32,
    pub shininess: f32,
    pub specular: Color,
    pub side: Side,
    pub transparent: bool,
    pub map: Option<TextureHandle>,
    pub alpha_map: Option<TextureHandle>,
    pub matcap: Option<TextureHandle>,
    pub gradient_map: Option<TextureHandle>,
    pub env_map: Option<CubeTextureHandle>,
}

impl Material {
    /// A material of the given model with neutral parameters and no textures.
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            name: kind.name().to_string(),
            kind,
            color: Color::WHITE,
            metalness: 0.0,
            roughness: 1.0,
            shininess: 30.0,
            specular: Color::from_hex(0x111111),
            side: Side::Front,
            transparent: false,
            map: None,
            alpha_map: None,
            matcap: None,
            gradient_map: None,
            env_map: None,
        }
    }

    pub fn standard(metalness: f32, roughness: f32) -> Self {
        let mut m = Self::new(MaterialKind::Standard);
        m.set_metalness(metalness);
        m.set_roughness(roughness);
        m
    }

    pub fn metalness(&self) -> f32 {
        self.metalness
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    /// Set metalness, clamped to [0, 1]. NaN becomes 0.
    pub fn set_metalness(&mut self, value: f32) {
        self.metalness = clamp_unit(value);
    }

    /// Set roughness, clamped to [0, 1]. NaN becomes 0.
    pub fn set_roughness(&mut self, value: f32) {
        self.roughness = clamp_unit(value);
    }

    /// Every texture handle this material samples, for upload bookkeeping.
    pub fn textures(&self) -> impl Iterator<Item = &TextureHandle> {
        self.map
            .iter()
            .chain(self.alpha_map.iter())
            .chain(self.matcap.iter())
            .chain(self.gradient_map.iter())
            .chain(self.env_map.iter().flat_map(|c| c.faces().iter()))
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(MaterialKind::Standard)
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_are_clamped() {
        let mut m = Material::standard(0.7, 0.2);
        assert_eq!(m.metalness(), 0.7);
        assert_eq!(m.roughness(), 0.2);

        m.set_metalness(1.5);
        m.set_roughness(-0.5);
        assert_eq!(m.metalness(), 1.0);
        assert_eq!(m.roughness(), 0.0);

        m.set_metalness(f32::NAN);
        assert_eq!(m.metalness(), 0.0);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Standard".parse::<MaterialKind>().unwrap(), MaterialKind::Standard);
        assert_eq!("toon".parse::<MaterialKind>().unwrap(), MaterialKind::Toon);
        assert!("glass".parse::<MaterialKind>().is_err());
    }

    #[test]
    fn default_kind_is_standard() {
        assert_eq!(MaterialKind::default(), MaterialKind::Standard);
        assert!(MaterialKind::Standard.is_lit());
        assert!(!MaterialKind::Basic.is_lit());
    }

    #[test]
    fn untextured_material_has_no_textures() {
        assert_eq!(Material::default().textures().count(), 0);
    }
}
