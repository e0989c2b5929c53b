use crate::{Geometry, Light, Material};
use surface_common::{Color, NodeId, Transform};

/// Index of a material in the scene's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u32);

/// Errors from scene graph operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("unknown material handle {0:?}")]
    UnknownMaterial(MaterialHandle),
    #[error("unknown node {}", .0.short())]
    UnknownNode(NodeId),
}

/// A renderable entity: geometry, placement, and a reference to a shared material.
#[derive(Debug, Clone)]
pub struct MeshNode {
    pub id: NodeId,
    pub name: String,
    pub geometry: Geometry,
    pub transform: Transform,
    pub material: MaterialHandle,
}

/// The set of mesh nodes and lights composed for rendering.
///
/// The scene owns every material; nodes refer to them by handle, so editing
/// a material through [`Scene::material_mut`] changes what every referencing
/// node renders with.
#[derive(Debug, Clone)]
pub struct Scene {
    materials: Vec<Material>,
    nodes: Vec<MeshNode>,
    lights: Vec<Light>,
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            materials: Vec::new(),
            nodes: Vec::new(),
            lights: Vec::new(),
            background: Color::BLACK,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a material and return a handle to it.
    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle(self.materials.len() as u32);
        tracing::debug!("material {:?} registered as {handle:?}", material.name);
        self.materials.push(material);
        handle
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.0 as usize)
    }

    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle.0 as usize)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Add a mesh node referencing an existing material.
    pub fn add_mesh(
        &mut self,
        name: impl Into<String>,
        geometry: Geometry,
        transform: Transform,
        material: MaterialHandle,
    ) -> Result<NodeId, SceneError> {
        if self.material(material).is_none() {
            return Err(SceneError::UnknownMaterial(material));
        }
        let id = NodeId::new();
        let name = name.into();
        tracing::debug!("added {} node {name:?} ({})", geometry.kind(), id.short());
        self.nodes.push(MeshNode {
            id,
            name,
            geometry,
            transform,
            material,
        });
        Ok(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[MeshNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut MeshNode> {
        self.nodes.iter_mut()
    }

    pub fn node(&self, id: NodeId) -> Option<&MeshNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The material a node renders with.
    pub fn node_material(&self, id: NodeId) -> Result<&Material, SceneError> {
        let node = self.node(id).ok_or(SceneError::UnknownNode(id))?;
        self.material(node.material)
            .ok_or(SceneError::UnknownMaterial(node.material))
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn add_mesh_requires_known_material() {
        let mut scene = Scene::new();
        let err = scene
            .add_mesh(
                "ghost",
                Geometry::plane(1.0, 1.0),
                Transform::default(),
                MaterialHandle(3),
            )
            .unwrap_err();
        assert_eq!(err, SceneError::UnknownMaterial(MaterialHandle(3)));
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn material_edit_is_shared_by_all_nodes() {
        let mut scene = Scene::new();
        let mat = scene.add_material(Material::standard(0.7, 0.2));
        let a = scene
            .add_mesh("a", Geometry::plane(1.0, 1.0), Transform::default(), mat)
            .unwrap();
        let b = scene
            .add_mesh(
                "b",
                Geometry::sphere(0.5, 8, 8),
                Transform::from_position(Vec3::X),
                mat,
            )
            .unwrap();

        scene.material_mut(mat).unwrap().set_roughness(0.9);

        assert_eq!(scene.node_material(a).unwrap().roughness(), 0.9);
        assert_eq!(scene.node_material(b).unwrap().roughness(), 0.9);
    }

    #[test]
    fn nodes_keep_insertion_order() {
        let mut scene = Scene::new();
        let mat = scene.add_material(Material::default());
        for name in ["first", "second", "third"] {
            scene
                .add_mesh(name, Geometry::plane(1.0, 1.0), Transform::default(), mat)
                .unwrap();
        }
        let names: Vec<&str> = scene.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn unknown_node_lookup() {
        let scene = Scene::new();
        let id = NodeId::new();
        assert_eq!(
            scene.node_material(id).unwrap_err(),
            SceneError::UnknownNode(id)
        );
    }
}
