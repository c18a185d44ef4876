use glam::{Mat4, Vec3};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32
}

impl Camera {
    pub fn new(look_from: Vec3, look_at: Vec3) -> Self {

        let position = look_from;
        let forwards = (look_at - position).normalize();

        // pitch is elevation above the xz-plane, yaw is measured from +z towards +x
        let pitch = forwards.y.asin();
        let yaw = forwards.x.atan2(forwards.z);

        Self {
            position,
            pitch,
            yaw
        }
    }

    pub fn showcase_camera() -> Self {
        let look_from = Vec3::new(1.5, 0.0, 28.0);
        let look_at = Vec3::new(1.5, 0.0, 0.0);
        Self::new(look_from, look_at)
    }

    pub fn forward(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    // no roll, so right always lies in the xz-plane
    pub fn right(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(-cos_yaw, 0.0, sin_yaw)
    }

    pub fn view_transform(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles() {
        let look_from = Vec3::new(13.0, 2.0, 3.0);
        let look_at = Vec3::new(0.0, 0.0, 0.0);
        let camera = Camera::new(look_from, look_at);
        let expected = (look_at - look_from).normalize();
        assert!(camera.forward().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn showcase_camera_looks_down_negative_z() {
        let camera = Camera::showcase_camera();
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(camera.right().abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn right_is_orthogonal_to_forward() {
        let camera = Camera { position: Vec3::ZERO, pitch: 0.4, yaw: 1.2 };
        assert!(camera.right().dot(camera.forward()).abs() < 1e-6);
        // right-handed: forward x up points right
        let r = camera.forward().cross(Vec3::Y).normalize();
        assert!(r.abs_diff_eq(camera.right(), 1e-5));
    }
}
