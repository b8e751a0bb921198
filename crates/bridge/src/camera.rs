use glam::Vec3;
use roadster_render::{Camera, SceneGraph};

/// Hard-snap camera follow: the eye sits at a fixed offset from the target
/// and looks straight at it. No smoothing; the camera is a pure function of
/// the latest target position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFollower {
    offset: Vec3,
}

impl CameraFollower {
    pub fn new(offset: Vec3) -> Self {
        Self { offset }
    }

    /// Camera placement for a target position.
    pub fn placement(&self, target: Vec3) -> Camera {
        Camera::new(target + self.offset, target)
    }

    /// Move the scene camera onto `target`. Returns false if it was already there.
    pub fn follow<S: SceneGraph + ?Sized>(&self, scene: &mut S, target: Vec3) -> bool {
        scene.set_camera(self.placement(target))
    }
}
