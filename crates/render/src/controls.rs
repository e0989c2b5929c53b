use crate::PerspectiveCamera;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};
use surface_input::CameraAction;

const EPS: f32 = 1e-6;

/// Orbit-style camera controller: rotates, pans and dollies the camera
/// around a target point.
///
/// Actions accumulate into pending deltas. [`OrbitControls::update`] applies
/// them once per frame; with damping enabled it applies a fraction each
/// frame and lets the rest decay, so motion eases out after input stops.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits in radians, measured from +Y.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    // Pending azimuth (theta) and polar (phi) rotation.
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.1,
            max_distance: 100.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default controls with the given damping settings.
    pub fn with_damping(enabled: bool, factor: f32) -> Self {
        Self {
            enable_damping: enabled,
            damping_factor: factor.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    /// Queue an action. `viewport_height` is in the same pixels as the action's deltas.
    pub fn handle(&mut self, action: CameraAction, camera: &PerspectiveCamera, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        match action {
            CameraAction::Rotate(d) => {
                self.delta_theta -= TAU * d.x / height * self.rotate_speed;
                self.delta_phi -= TAU * d.y / height * self.rotate_speed;
            }
            CameraAction::Pan(d) => self.pan(d, camera, height),
            CameraAction::Zoom(steps) => {
                let zoom_scale = 0.95f32.powf(self.zoom_speed);
                // Positive steps dolly in, shrinking the orbit radius.
                self.scale *= zoom_scale.powf(steps);
            }
        }
    }

    fn pan(&mut self, delta: Vec2, camera: &PerspectiveCamera, height: f32) {
        let offset = camera.position - camera.target;
        // Distance covered by the full viewport height at the target's depth.
        let target_distance = offset.length() * (camera.fov_degrees.to_radians() / 2.0).tan();
        let view = camera.view_matrix().inverse();
        let right = view.x_axis.truncate();
        let up = view.y_axis.truncate();
        let scale = 2.0 * target_distance / height * self.pan_speed;
        self.pan_offset += -right * delta.x * scale + up * delta.y * scale;
    }

    /// Apply queued motion to the camera. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - camera.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > EPS {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        theta += self.delta_theta * factor;
        phi += self.delta_phi * factor;
        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        let target = camera.target + self.pan_offset * factor;

        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let new_position = target + new_offset;

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        let moved = new_position.distance_squared(camera.position) > EPS
            || target.distance_squared(camera.target) > EPS;
        camera.position = new_position;
        camera.target = target;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::default()
    }

    #[test]
    fn idle_update_keeps_camera() {
        let mut cam = camera();
        let mut controls = OrbitControls::new();
        let before = cam.position;
        assert!(!controls.update(&mut cam));
        assert!(cam.position.distance(before) < 1e-5);
    }

    #[test]
    fn rotation_preserves_distance() {
        let mut cam = camera();
        let mut controls = OrbitControls::new();
        let radius = cam.position.length();
        controls.handle(CameraAction::Rotate(Vec2::new(100.0, 0.0)), &cam, 720.0);
        for _ in 0..10 {
            controls.update(&mut cam);
        }
        assert!((cam.position.length() - radius).abs() < 1e-4);
    }

    #[test]
    fn damping_eases_in_and_out() {
        let mut damped_cam = camera();
        let mut damped = OrbitControls::new();
        let mut direct_cam = camera();
        let mut direct = OrbitControls::with_damping(false, 0.05);

        let action = CameraAction::Rotate(Vec2::new(50.0, 0.0));
        damped.handle(action, &damped_cam, 720.0);
        direct.handle(action, &direct_cam, 720.0);

        let start = damped_cam.position;
        damped.update(&mut damped_cam);
        direct.update(&mut direct_cam);

        // One damped step covers only part of the undamped move.
        let damped_step = damped_cam.position.distance(start);
        let direct_step = direct_cam.position.distance(start);
        assert!(damped_step > 0.0 && damped_step < direct_step);

        // Undamped motion is spent in one step; damped motion carries over.
        let (mut damped_next_cam, mut direct_next_cam) = (damped_cam, direct_cam);
        assert!(damped.clone().update(&mut damped_next_cam));
        assert!(!direct.update(&mut direct_next_cam));

        // The remainder decays geometrically towards the full move.
        for _ in 0..500 {
            damped.update(&mut damped_cam);
        }
        assert!(damped_cam.position.distance(direct_cam.position) < 1e-3);
    }

    #[test]
    fn with_damping_sets_only_damping() {
        let controls = OrbitControls::with_damping(false, 0.2);
        assert!(!controls.enable_damping);
        assert_eq!(controls.damping_factor, 0.2);
        assert_eq!(controls.max_distance, OrbitControls::default().max_distance);
        assert_eq!(OrbitControls::with_damping(true, 3.0).damping_factor, 1.0);
    }

    #[test]
    fn zoom_in_shrinks_radius_within_limits() {
        let mut cam = camera();
        let mut controls = OrbitControls::new();
        let radius = cam.position.length();
        controls.handle(CameraAction::Zoom(2.0), &cam, 720.0);
        controls.update(&mut cam);
        assert!(cam.position.length() < radius);

        controls.handle(CameraAction::Zoom(-1000.0), &cam, 720.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - controls.max_distance).abs() < 1e-3);
    }

    #[test]
    fn polar_angle_never_reaches_pole() {
        let mut cam = camera();
        let mut controls = OrbitControls {
            enable_damping: false,
            ..OrbitControls::default()
        };
        controls.handle(CameraAction::Rotate(Vec2::new(0.0, 10_000.0)), &cam, 720.0);
        controls.update(&mut cam);
        let offset = cam.position - cam.target;
        assert!(offset.x.abs() + offset.z.abs() > 0.0);
        assert!(!cam.view_projection().col(0).x.is_nan());
    }

    #[test]
    fn pan_moves_target() {
        let mut cam = camera();
        let mut controls = OrbitControls {
            enable_damping: false,
            ..OrbitControls::default()
        };
        controls.handle(CameraAction::Pan(Vec2::new(100.0, 0.0)), &cam, 720.0);
        controls.update(&mut cam);
        assert!(cam.target.length() > 0.0);
        // Panning keeps the viewing direction.
        let dir = (cam.target - cam.position).normalize();
        let initial = (Vec3::ZERO - Vec3::new(1.0, 1.0, 2.0)).normalize();
        assert!(dir.distance(initial) < 1e-4);
    }
}
