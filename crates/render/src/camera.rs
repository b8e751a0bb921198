use glam::{Mat4, Vec3};

/// Scene camera: an eye position aimed at a target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(-100.0, 100.0, -100.0),
            target: Vec3::ZERO,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Unit view direction. Falls back to -Z when eye and target coincide.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_at_origin() {
        let cam = Camera::default();
        assert_eq!(cam.target, Vec3::ZERO);
        assert!(cam.position.y > 0.0);
        let view = cam.view_matrix();
        assert!(!view.col(0).x.is_nan());
        let origin_in_view = view.transform_point3(Vec3::ZERO);
        // Target sits straight ahead, down -Z in view space.
        assert!(origin_in_view.x.abs() < 1e-3);
        assert!(origin_in_view.z < 0.0);
    }

    #[test]
    fn degenerate_camera_has_a_direction() {
        let cam = Camera::new(Vec3::ONE, Vec3::ONE);
        assert_eq!(cam.forward(), Vec3::NEG_Z);
    }
}
