use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use surface_common::Transform;
use surface_render::PerspectiveCamera;
use surface_scene::{Light, Material, Scene, Side};

/// Point lights beyond this count are ignored by the shader.
pub const MAX_POINT_LIGHTS: usize = 4;

/// Per-frame camera and light block, bind group 0.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    point_positions: [[f32; 4]; MAX_POINT_LIGHTS],
    point_colors: [[f32; 4]; MAX_POINT_LIGHTS],
    point_count: [u32; 4],
}

impl FrameUniforms {
    pub(crate) fn new(camera: &PerspectiveCamera, scene: &Scene) -> Self {
        let mut ambient = [0.0f32; 3];
        let mut point_positions = [[0.0; 4]; MAX_POINT_LIGHTS];
        let mut point_colors = [[0.0; 4]; MAX_POINT_LIGHTS];
        let mut count = 0usize;

        for light in scene.lights() {
            let radiance = light.radiance().to_array();
            match light {
                Light::Ambient { .. } => {
                    for (sum, c) in ambient.iter_mut().zip(radiance) {
                        *sum += c;
                    }
                }
                Light::Point { position, .. } => {
                    if count == MAX_POINT_LIGHTS {
                        continue;
                    }
                    point_positions[count] = position.extend(1.0).to_array();
                    point_colors[count] = [radiance[0], radiance[1], radiance[2], 1.0];
                    count += 1;
                }
            }
        }

        let p = camera.position;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            camera_pos: [p.x, p.y, p.z, camera.near],
            ambient: [ambient[0], ambient[1], ambient[2], camera.far],
            point_positions,
            point_colors,
            point_count: [count as u32, 0, 0, 0],
        }
    }

    #[cfg(test)]
    pub(crate) fn point_count(&self) -> u32 {
        self.point_count[0]
    }

    #[cfg(test)]
    pub(crate) fn ambient(&self) -> [f32; 3] {
        [self.ambient[0], self.ambient[1], self.ambient[2]]
    }
}

/// Per-node model and normal matrices, bind group 2 (dynamic offset).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct ObjectUniforms {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

impl ObjectUniforms {
    pub(crate) fn new(transform: &Transform) -> Self {
        let model = transform.matrix();
        Self {
            model: model.to_cols_array_2d(),
            normal: normal_matrix(model).to_cols_array_2d(),
        }
    }
}

fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant().abs() < f32::EPSILON {
        return Mat4::IDENTITY;
    }
    model.inverse().transpose()
}

/// Which material texture slots hold an uploaded texture this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BoundMaps {
    pub map: bool,
    pub alpha_map: bool,
    pub matcap: bool,
    pub gradient_map: bool,
    pub env_map: bool,
}

/// Material parameter block, bind group 1 binding 0.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct MaterialUniforms {
    color: [f32; 4],
    specular: [f32; 4],
    pbr: [f32; 4],
    kind: [u32; 4],
    maps: [u32; 4],
    env: [u32; 4],
}

impl MaterialUniforms {
    pub(crate) fn new(material: &Material, bound: BoundMaps) -> Self {
        let c = material.color;
        let s = material.specular;
        Self {
            color: [c.r, c.g, c.b, 1.0],
            specular: [s.r, s.g, s.b, material.shininess],
            pbr: [material.metalness(), material.roughness(), 0.0, 0.0],
            kind: [
                material.kind.shader_id(),
                material.transparent as u32,
                0,
                0,
            ],
            maps: [
                bound.map as u32,
                bound.alpha_map as u32,
                bound.matcap as u32,
                bound.gradient_map as u32,
            ],
            env: [bound.env_map as u32, 0, 0, 0],
        }
    }

    #[cfg(test)]
    pub(crate) fn metalness(&self) -> f32 {
        self.pbr[0]
    }

    #[cfg(test)]
    pub(crate) fn roughness(&self) -> f32 {
        self.pbr[1]
    }
}

/// Index into the pipeline table for a face mode and blend mode.
pub(crate) fn pipeline_index(side: Side, transparent: bool) -> usize {
    let side = match side {
        Side::Front => 0,
        Side::Back => 1,
        Side::Double => 2,
    };
    side * 2 + transparent as usize
}
