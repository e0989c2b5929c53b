use crate::PerspectiveCamera;
use std::fmt::Write;
use surface_scene::Scene;

/// Renderer-agnostic interface.
///
/// A renderer reads the scene and a camera, then produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the scene from the given camera.
    fn render(&self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;
}

/// Text renderer for headless runs: a readable dump of what a frame would draw.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Scene ({} meshes, {} lights) ===",
            scene.node_count(),
            scene.lights().len()
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov_degrees,
            camera.aspect()
        );

        for node in scene.nodes() {
            let p = node.transform.position;
            let r = node.transform.rotation;
            let _ = writeln!(
                out,
                "  {} [{}] pos=({:.2}, {:.2}, {:.2}) rot=({:.4}, {:.4}, {:.4})",
                node.name,
                node.geometry.kind(),
                p.x,
                p.y,
                p.z,
                r.x,
                r.y,
                r.z
            );
            if let Some(m) = scene.material(node.material) {
                let _ = writeln!(
                    out,
                    "    material {} ({}) metalness={:.4} roughness={:.4}",
                    node.material.0,
                    m.kind,
                    m.metalness(),
                    m.roughness()
                );
            }
        }

        for light in scene.lights() {
            let _ = writeln!(out, "  light {light:?}");
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surface_scene::{DemoScene, Material, animate};

    #[test]
    fn debug_renderer_empty_scene() {
        let output = DebugTextRenderer::new().render(&Scene::new(), &PerspectiveCamera::default());
        assert!(output.contains("0 meshes"));
        assert!(output.contains("fov=75"));
    }

    #[test]
    fn debug_renderer_shows_shared_material() {
        let mut demo = DemoScene::build(Material::standard(0.7, 0.2));
        animate::spin(&mut demo.scene, 10.0);
        let output = DebugTextRenderer::new().render(&demo.scene, &PerspectiveCamera::default());

        assert!(output.contains("3 meshes, 2 lights"));
        assert!(output.contains("sphere [sphere] pos=(-1.50, 0.00, 0.00)"));
        assert!(output.contains("rot=(1.0000, 1.0000, 0.0000)"));
        assert_eq!(output.matches("material 0 (standard) metalness=0.7000 roughness=0.2000").count(), 3);
    }
}
