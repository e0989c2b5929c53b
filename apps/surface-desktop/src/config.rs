use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use surface_assets::TextureManifest;
use surface_scene::{Material, MaterialKind, Side};
use surface_scene::demo::{DEFAULT_METALNESS, DEFAULT_ROUGHNESS};

/// Desktop app settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    /// Directory texture paths are resolved against.
    pub assets: PathBuf,
    pub material: MaterialConfig,
    pub camera: CameraConfig,
    pub textures: TextureManifest,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            assets: PathBuf::from("static"),
            material: MaterialConfig::default(),
            camera: CameraConfig::default(),
            textures: TextureManifest::demo(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Surface Materials".into(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub kind: MaterialKind,
    /// Starting metalness of the standard model.
    pub metalness: f32,
    /// Starting roughness of the standard model.
    pub roughness: f32,
    /// Face mode for every model; unset keeps the model's own.
    pub side: Option<Side>,
    /// Alpha blending for every model; unset keeps the model's own.
    pub transparent: Option<bool>,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Standard,
            metalness: DEFAULT_METALNESS,
            roughness: DEFAULT_ROUGHNESS,
            side: None,
            transparent: None,
        }
    }
}

impl MaterialConfig {
    /// Apply the face-mode and blending overrides to a built material.
    pub fn apply_overrides(&self, material: &mut Material) {
        if let Some(side) = self.side {
            material.side = side;
        }
        if let Some(transparent) = self.transparent {
            material.transparent = transparent;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov: f32,
    pub position: [f32; 3],
    pub damping: bool,
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            position: [1.0, 1.0, 2.0],
            damping: true,
            damping_factor: 0.05,
        }
    }
}

impl CameraConfig {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

impl DemoConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let config = DemoConfig::parse("{}").unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.material.kind, MaterialKind::Standard);
        assert_eq!(config.material.metalness, 0.7);
        assert_eq!(config.material.roughness, 0.2);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = DemoConfig::parse(
            "material:\n  kind: toon\ncamera:\n  fov: 60\nwindow:\n  width: 800\n",
        )
        .unwrap();
        assert_eq!(config.material.kind, MaterialKind::Toon);
        assert_eq!(config.material.roughness, 0.2);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.position(), Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
    }

    #[test]
    fn single_door_path_keeps_the_rest_of_the_set() {
        let config =
            DemoConfig::parse("textures:\n  door:\n    color: /custom/door.png\n").unwrap();
        let door = &config.textures.door;
        assert_eq!(door.color, "/custom/door.png");
        assert_eq!(door.alpha, "/textures/door/alpha.jpg");
        assert_eq!(door.roughness, "/textures/door/roughness.jpg");
        assert_eq!(config.textures.matcap, "/textures/matcaps/3.png");
    }

    #[test]
    fn face_and_blend_overrides() {
        let config =
            DemoConfig::parse("material:\n  side: back\n  transparent: false\n").unwrap();
        assert_eq!(config.material.side, Some(Side::Back));
        assert_eq!(config.material.transparent, Some(false));

        let mut material = Material::new(MaterialKind::Basic);
        material.transparent = true;
        config.material.apply_overrides(&mut material);
        assert_eq!(material.side, Side::Back);
        assert!(!material.transparent);

        // Unset overrides leave the model's settings alone.
        let mut material = Material::new(MaterialKind::Basic);
        material.side = Side::Double;
        MaterialConfig::default().apply_overrides(&mut material);
        assert_eq!(material.side, Side::Double);
        assert!(!material.transparent);
    }

    #[test]
    fn unknown_material_kind_is_an_error() {
        assert!(DemoConfig::parse("material:\n  kind: glass\n").is_err());
    }

    #[test]
    fn load_reads_file_and_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "assets: /srv/demo").unwrap();
        let config = DemoConfig::load(file.path()).unwrap();
        assert_eq!(config.assets, PathBuf::from("/srv/demo"));

        let missing = file.path().with_extension("missing");
        let err = DemoConfig::load(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
