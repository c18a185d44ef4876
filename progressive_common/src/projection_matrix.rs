use glam::{Mat4, Vec3};
use crate::parameters::RenderParameters;
use crate::shader_params::{Param, ParamValue, ParameterSink};

pub struct ProjectionMatrix {
    vfov_rad: f32,
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
    viewport_size: (u32, u32),
}

impl ProjectionMatrix {
    pub fn new(rp: &RenderParameters) -> Self {
        let (z_near, z_far) = rp.get_clip_planes();
        Self {
            vfov_rad: rp.vfov_rad(),
            aspect_ratio: rp.aspect_ratio(),
            z_near,
            z_far,
            viewport_size: rp.viewport_size(),
        }
    }

    pub fn p(&self) -> Mat4 {
        Mat4::perspective_rh(self.vfov_rad, self.aspect_ratio, self.z_near, self.z_far)
    }

    // half height of the image plane at z = -1
    fn half_height(&self) -> f32 {
        (self.vfov_rad / 2.0).tan()
    }

    /// Corners of the image plane at z = -1 in camera space, clockwise from
    /// top left. Projected with `p()` they land exactly on the screen corners.
    pub fn quad_corners(&self) -> [[f32; 3]; 4] {
        let h = self.half_height();
        let w = h * self.aspect_ratio;
        [
            [-w, h, -1.0],
            [w, h, -1.0],
            [w, -h, -1.0],
            [-w, -h, -1.0],
        ]
    }

    /// Size of one pixel on the image plane, used by the trace shader to
    /// jitter primary rays inside their pixel.
    pub fn view_pixel_size(&self) -> (f32, f32) {
        let h = self.half_height();
        let (width, height) = self.viewport_size;
        (2.0 * self.aspect_ratio * h / width as f32, 2.0 * h / height as f32)
    }

    pub fn upload(&self, sink: &mut dyn ParameterSink) {
        let (pixel_width, pixel_height) = self.view_pixel_size();
        let (width, height) = self.viewport_size;
        sink.set(Param::Proj, ParamValue::Mat4(self.p()));
        sink.set(Param::ViewPixelWidth, ParamValue::F32(pixel_width));
        sink.set(Param::ViewPixelHeight, ParamValue::F32(pixel_height));
        sink.set(Param::Width, ParamValue::U32(width));
        sink.set(Param::Height, ParamValue::U32(height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader_params::tests::RecordingSink;

    #[test]
    fn quad_fills_the_screen() {
        let pm = ProjectionMatrix::new(&RenderParameters::default());
        let p = pm.p();
        let expected = [(-1.0, 1.0), (1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)];
        for (corner, (x, y)) in pm.quad_corners().iter().zip(expected) {
            let ndc = p.project_point3(Vec3::from_array(*corner));
            assert!((ndc.x - x).abs() < 1e-5 && (ndc.y - y).abs() < 1e-5, "{ndc}");
            assert!((0.0..=1.0).contains(&ndc.z));
        }
    }

    #[test]
    fn pixel_size_spans_image_plane() {
        let rp = RenderParameters::new((1280, 720), 90.0, 0.1, 100.0);
        let pm = ProjectionMatrix::new(&rp);
        let (pw, ph) = pm.view_pixel_size();
        // at 90 degrees the image plane at z = -1 is 2 units tall
        assert!((ph * 720.0 - 2.0).abs() < 1e-4);
        assert!((pw * 1280.0 - 2.0 * 1280.0 / 720.0).abs() < 1e-4);
    }

    #[test]
    fn uploads_viewport_slots() {
        let pm = ProjectionMatrix::new(&RenderParameters::default());
        let mut sink = RecordingSink::default();
        pm.upload(&mut sink);
        assert_eq!(sink.names(), ["proj", "view_pixel_width", "view_pixel_height", "width", "height"]);
        assert_eq!(sink.value_of(Param::Width), Some(ParamValue::U32(1280)));
    }
}
