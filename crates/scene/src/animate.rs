use crate::{Clock, Scene};

/// Radians per second each mesh turns about its X and Y axes.
pub const ROTATION_SPEED: f32 = 0.1;

/// Set every mesh's X and Y rotation to `ROTATION_SPEED * elapsed`.
///
/// Absolute, not incremental: the same `elapsed` always yields the same pose.
pub fn spin(scene: &mut Scene, elapsed: f32) {
    let angle = ROTATION_SPEED * elapsed;
    for node in scene.nodes_mut() {
        node.transform.rotation.x = angle;
        node.transform.rotation.y = angle;
    }
}

/// Result of the animation half of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStamp {
    pub index: u64,
    pub elapsed: f32,
}

/// Drives the scene-side part of each frame: read the clock, then animate.
///
/// Callers follow `advance` with their control update and draw, so the
/// drawn scene is always fully animated for the frame.
#[derive(Debug)]
pub struct FrameLoop {
    clock: Clock,
    frames: u64,
}

impl FrameLoop {
    pub fn new(clock: Clock) -> Self {
        Self { clock, frames: 0 }
    }

    pub fn advance(&mut self, scene: &mut Scene) -> FrameStamp {
        let elapsed = self.clock.elapsed();
        spin(scene, elapsed);
        let stamp = FrameStamp {
            index: self.frames,
            elapsed,
        };
        self.frames += 1;
        stamp
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DemoScene, ManualClock, Material};
    use std::time::Duration;

    #[test]
    fn rotation_is_a_tenth_of_elapsed() {
        let mut demo = DemoScene::build(Material::standard(0.7, 0.2));
        spin(&mut demo.scene, 10.0);
        for node in demo.scene.nodes() {
            assert_eq!(node.transform.rotation.x, 1.0);
            assert_eq!(node.transform.rotation.y, 1.0);
            assert_eq!(node.transform.rotation.z, 0.0);
        }
    }

    #[test]
    fn spin_is_idempotent_and_keeps_position() {
        let mut demo = DemoScene::build(Material::default());
        spin(&mut demo.scene, 3.0);
        let first: Vec<_> = demo.scene.nodes().iter().map(|n| n.transform).collect();
        spin(&mut demo.scene, 3.0);
        let second: Vec<_> = demo.scene.nodes().iter().map(|n| n.transform).collect();
        assert_eq!(first, second);
        assert_eq!(demo.scene.node(demo.sphere).unwrap().transform.position.x, -1.5);
    }

    #[test]
    fn frame_loop_reads_clock_then_animates() {
        let manual = ManualClock::new();
        let mut frames = FrameLoop::new(Clock::new(manual.clone()));
        let mut demo = DemoScene::build(Material::default());

        let stamp = frames.advance(&mut demo.scene);
        assert_eq!(stamp, FrameStamp { index: 0, elapsed: 0.0 });

        manual.advance(Duration::from_secs(5));
        let stamp = frames.advance(&mut demo.scene);
        assert_eq!(stamp.index, 1);
        assert_eq!(stamp.elapsed, 5.0);
        let torus = demo.scene.node(demo.torus).unwrap();
        assert!((torus.transform.rotation.y - 0.5).abs() < 1e-6);
        assert_eq!(frames.frames(), 2);
    }
}
