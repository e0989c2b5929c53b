//! The material showcase scene: sphere, plane and torus sharing one
//! material, lit by an ambient and a point light.

use crate::{Geometry, Light, Material, MaterialHandle, MaterialKind, Scene, Side};
use glam::Vec3;
use surface_assets::DemoTextures;
use surface_common::{Color, NodeId, Transform};

pub const DEFAULT_METALNESS: f32 = 0.7;
pub const DEFAULT_ROUGHNESS: f32 = 0.2;

/// Build the material for `kind`, wired to the demo textures it uses.
pub fn material(kind: MaterialKind, textures: &DemoTextures) -> Material {
    let mut m = Material::new(kind);
    match kind {
        MaterialKind::Basic => {
            m.map = Some(textures.door_color.clone());
            m.alpha_map = Some(textures.door_alpha.clone());
            m.transparent = true;
            m.side = Side::Double;
        }
        MaterialKind::Matcap => {
            m.matcap = Some(textures.matcap.clone());
        }
        MaterialKind::Phong => {
            m.shininess = 1000.0;
            m.specular = Color::from_hex(0x1188ff);
        }
        MaterialKind::Toon => {
            m.gradient_map = Some(textures.gradient.clone());
        }
        MaterialKind::Standard => {
            m.set_metalness(DEFAULT_METALNESS);
            m.set_roughness(DEFAULT_ROUGHNESS);
            m.env_map = Some(textures.environment_map.clone());
        }
        MaterialKind::Depth | MaterialKind::Lambert => {}
    }
    m
}

/// The assembled showcase scene and the ids of its parts.
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub scene: Scene,
    pub material: MaterialHandle,
    pub sphere: NodeId,
    pub plane: NodeId,
    pub torus: NodeId,
}

impl DemoScene {
    /// Assemble the scene around one shared material.
    pub fn build(material: Material) -> Self {
        let mut scene = Scene::new();
        let handle = scene.add_material(material);

        let mesh = |scene: &mut Scene, name: &str, geometry: Geometry, x: f32| {
            scene
                .add_mesh(name, geometry, Transform::from_position(Vec3::new(x, 0.0, 0.0)), handle)
                .unwrap_or_else(|_| unreachable!("material was registered above"))
        };
        let sphere = mesh(&mut scene, "sphere", Geometry::sphere(0.5, 16, 16), -1.5);
        let plane = mesh(&mut scene, "plane", Geometry::plane(1.0, 1.0), 0.0);
        let torus = mesh(&mut scene, "torus", Geometry::torus(0.3, 0.2, 16, 32), 1.5);

        scene.add_light(Light::ambient(Color::WHITE, 0.5));
        scene.add_light(Light::point(Color::WHITE, 0.5, Vec3::ZERO));

        tracing::info!(
            "demo scene assembled: {} meshes, {} lights",
            scene.node_count(),
            scene.lights().len()
        );

        Self {
            scene,
            material: handle,
            sphere,
            plane,
            torus,
        }
    }

    pub fn material(&self) -> &Material {
        self.scene
            .material(self.material)
            .unwrap_or_else(|| unreachable!("demo material is never removed"))
    }

    pub fn material_mut(&mut self) -> &mut Material {
        self.scene
            .material_mut(self.material)
            .unwrap_or_else(|| unreachable!("demo material is never removed"))
    }

    pub fn mesh_ids(&self) -> [NodeId; 3] {
        [self.sphere, self.plane, self.torus]
    }
}
