use crate::{CubeFace, CubeTextureHandle, TextureHandle, TextureLoader};
use serde::{Deserialize, Serialize};

/// Paths of the door texture set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorTextures {
    pub color: String,
    pub alpha: String,
    pub ambient_occlusion: String,
    pub height: String,
    pub normal: String,
    pub metalness: String,
    pub roughness: String,
}

impl Default for DoorTextures {
    fn default() -> Self {
        let door = |name: &str| format!("/textures/door/{name}.jpg");
        Self {
            color: door("color"),
            alpha: door("alpha"),
            ambient_occlusion: door("ambientOcclusion"),
            height: door("height"),
            normal: door("normal"),
            metalness: door("metalness"),
            roughness: door("roughness"),
        }
    }
}

/// Every texture path the demo requests, grouped by use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureManifest {
    pub door: DoorTextures,
    pub matcap: String,
    pub gradient: String,
    /// Cube map faces in +X, -X, +Y, -Y, +Z, -Z order.
    pub environment_map: [String; 6],
}

impl Default for TextureManifest {
    fn default() -> Self {
        Self::demo()
    }
}

impl TextureManifest {
    /// The fixed asset set of the material showcase.
    pub fn demo() -> Self {
        Self {
            door: DoorTextures::default(),
            matcap: "/textures/matcaps/3.png".into(),
            gradient: "/textures/gradients/3.jpg".into(),
            environment_map: CubeFace::ALL
                .map(|face| format!("/textures/environmentMaps/0/{}.jpg", face.stem())),
        }
    }

    /// `(name, path)` for every single image and cube face, in request order.
    pub fn entries(&self) -> Vec<(String, &str)> {
        let d = &self.door;
        let mut out: Vec<(String, &str)> = vec![
            ("door.color".into(), d.color.as_str()),
            ("door.alpha".into(), d.alpha.as_str()),
            ("door.ambient_occlusion".into(), d.ambient_occlusion.as_str()),
            ("door.height".into(), d.height.as_str()),
            ("door.normal".into(), d.normal.as_str()),
            ("door.metalness".into(), d.metalness.as_str()),
            ("door.roughness".into(), d.roughness.as_str()),
            ("matcap".into(), self.matcap.as_str()),
            ("gradient".into(), self.gradient.as_str()),
        ];
        for (face, path) in CubeFace::ALL.iter().zip(&self.environment_map) {
            out.push((format!("environment_map.{}", face.stem()), path.as_str()));
        }
        out
    }
}

/// Handles for every texture in a manifest, all requested up front.
#[derive(Debug, Clone)]
pub struct DemoTextures {
    pub door_color: TextureHandle,
    pub door_alpha: TextureHandle,
    pub door_ambient_occlusion: TextureHandle,
    pub door_height: TextureHandle,
    pub door_normal: TextureHandle,
    pub door_metalness: TextureHandle,
    pub door_roughness: TextureHandle,
    pub matcap: TextureHandle,
    pub gradient: TextureHandle,
    pub environment_map: CubeTextureHandle,
}

impl DemoTextures {
    /// Kick off every load and return immediately.
    pub fn request(loader: &mut TextureLoader, manifest: &TextureManifest) -> Self {
        let d = &manifest.door;
        let textures = Self {
            door_color: loader.load(&d.color),
            door_alpha: loader.load(&d.alpha),
            door_ambient_occlusion: loader.load(&d.ambient_occlusion),
            door_height: loader.load(&d.height),
            door_normal: loader.load(&d.normal),
            door_metalness: loader.load(&d.metalness),
            door_roughness: loader.load(&d.roughness),
            matcap: loader.load(&manifest.matcap),
            gradient: loader.load(&manifest.gradient),
            environment_map: loader.load_cube(&manifest.environment_map),
        };
        tracing::info!("requested {} textures", loader.len());
        textures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySource;
    use std::time::Duration;

    #[test]
    fn demo_manifest_paths() {
        let m = TextureManifest::demo();
        assert_eq!(m.door.ambient_occlusion, "/textures/door/ambientOcclusion.jpg");
        assert_eq!(m.matcap, "/textures/matcaps/3.png");
        assert_eq!(m.environment_map[0], "/textures/environmentMaps/0/px.jpg");
        assert_eq!(m.environment_map[5], "/textures/environmentMaps/0/nz.jpg");
        assert_eq!(m.entries().len(), 15);
    }

    #[test]
    fn request_is_fire_and_forget() {
        let mut loader = TextureLoader::new(MemorySource::new());
        let textures = DemoTextures::request(&mut loader, &TextureManifest::demo());
        assert_eq!(loader.len(), 15);

        // Nothing exists in the source, so every slot ends up failed, never panicking.
        assert!(loader.wait_all(Duration::from_secs(5)));
        assert!(!textures.door_color.is_ready());
        assert!(textures.environment_map.images().unwrap().is_none());
    }
}
