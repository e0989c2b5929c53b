use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Parametric primitive shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Lies in the XY plane facing +Z.
    Plane { width: f32, height: f32 },
    /// Ring in the XY plane around the Z axis.
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
}

impl Geometry {
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Geometry::Sphere {
            radius,
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Geometry::Plane { width, height }
    }

    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        Geometry::Torus {
            radius,
            tube,
            radial_segments: radial_segments.max(3),
            tubular_segments: tubular_segments.max(3),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Sphere { .. } => "sphere",
            Geometry::Plane { .. } => "plane",
            Geometry::Torus { .. } => "torus",
        }
    }

    /// Generate triangle-list vertex data.
    pub fn build(&self) -> MeshData {
        match *self {
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments, height_segments),
            Geometry::Plane { width, height } => plane(width, height),
            Geometry::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus(radius, tube, radial_segments, tubular_segments),
        }
    }
}

/// CPU-side indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) {
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.uvs.push(uv);
    }
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);
    let mut index = 0u32;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        // Shift pole uvs half a segment so each pole triangle samples its own column.
        let u_offset = if iy == 0 {
            0.5 / width_segments as f32
        } else if iy == height_segments {
            -0.5 / width_segments as f32
        } else {
            0.0
        };

        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let position = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.push(position, position.normalize_or_zero(), [u + u_offset, 1.0 - v]);
            row.push(index);
            index += 1;
        }
        grid.push(row);
    }

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

fn plane(width: f32, height: f32) -> MeshData {
    let mut mesh = MeshData::default();
    let (half_w, half_h) = (width / 2.0, height / 2.0);

    for iy in 0..=1u32 {
        let y = half_h - iy as f32 * height;
        for ix in 0..=1u32 {
            let x = ix as f32 * width - half_w;
            mesh.push(Vec3::new(x, y, 0.0), Vec3::Z, [ix as f32, 1.0 - iy as f32]);
        }
    }
    // a = top-left, b = bottom-left, c = bottom-right, d = top-right
    mesh.indices.extend_from_slice(&[0, 2, 1, 2, 3, 1]);
    mesh
}

fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();

    for j in 0..=radial_segments {
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let v = j as f32 / radial_segments as f32 * TAU;

            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.push(
                position,
                (position - center).normalize_or_zero(),
                [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
            );
        }
    }

    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(mesh: &MeshData) {
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.indices.len() % 3, 0);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        assert_eq!(mesh.uvs.len(), mesh.positions.len());
    }

    #[test]
    fn sphere_counts() {
        let mesh = Geometry::sphere(0.5, 16, 16).build();
        assert_eq!(mesh.vertex_count(), 17 * 17);
        // Pole rows contribute one triangle per segment, the rest two.
        assert_eq!(mesh.triangle_count(), 16 * (2 * 16 - 2));
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = Geometry::sphere(0.5, 16, 16).build();
        for p in &mesh.positions {
            let len = Vec3::from_array(*p).length();
            assert!((len - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn plane_is_unit_quad() {
        let mesh = Geometry::plane(1.0, 1.0).build();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.positions[0], [-0.5, 0.5, 0.0]);
        assert_eq!(mesh.positions[3], [0.5, -0.5, 0.0]);
        assert!(mesh.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn plane_winding_faces_positive_z() {
        let mesh = Geometry::plane(1.0, 1.0).build();
        let p = |i: u32| Vec3::from_array(mesh.positions[i as usize]);
        for tri in mesh.indices.chunks(3) {
            let n = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            assert!(n.z > 0.0);
        }
    }

    #[test]
    fn torus_counts() {
        let mesh = Geometry::torus(0.3, 0.2, 16, 32).build();
        assert_eq!(mesh.vertex_count(), 17 * 33);
        assert_eq!(mesh.indices.len(), 6 * 16 * 32);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn torus_extent() {
        let mesh = Geometry::torus(0.3, 0.2, 16, 32).build();
        let max_r = mesh
            .positions
            .iter()
            .map(|p| (p[0] * p[0] + p[1] * p[1]).sqrt())
            .fold(0.0f32, f32::max);
        assert!((max_r - 0.5).abs() < 1e-5);
    }

    #[test]
    fn segment_minimums() {
        assert_eq!(
            Geometry::sphere(1.0, 0, 0),
            Geometry::Sphere {
                radius: 1.0,
                width_segments: 3,
                height_segments: 2
            }
        );
    }
}
