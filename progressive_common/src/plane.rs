use glam::Vec3;
use crate::material::Material;
use crate::shader_params::{Param, ParamValue, ParameterSink, PlaneField};

/// A finite patch of a plane. Hits farther than `extent` from `position` along
/// any world axis are clipped by the trace shader, which also expects `normal`
/// to already be unit length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    normal: Vec3,
    position: Vec3,
    extent: f32,
    material: Material,
}

impl Plane {
    pub fn new(normal: Vec3, position: Vec3, extent: f32, material: Material) -> Self {
        debug_assert!(normal.is_normalized(), "plane normal must be unit length, got {normal}");
        debug_assert!(extent > 0.0, "plane extent must be positive, got {extent}");
        Self { normal, position, extent, material }
    }

    pub fn normal(&self) -> Vec3 { self.normal }
    pub fn position(&self) -> Vec3 { self.position }
    pub fn extent(&self) -> f32 { self.extent }
    pub fn material(&self) -> Material { self.material }

    pub fn upload(&self, idx: usize, sink: &mut dyn ParameterSink) {
        sink.set(Param::Plane(idx, PlaneField::Normal), ParamValue::Vec3(self.normal));
        sink.set(Param::Plane(idx, PlaneField::Position), ParamValue::Vec3(self.position));
        sink.set(Param::Plane(idx, PlaneField::Extent), ParamValue::F32(self.extent));
        self.material.upload(sink, |field| Param::Plane(idx, PlaneField::Material(field)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_normal_is_accepted() {
        let n = Vec3::new(0.7071067, 0.0, 0.7071067);
        let plane = Plane::new(n, Vec3::new(-5.0, 0.0, 0.0), 5.0, Material::metallic(Vec3::ONE));
        assert_eq!(plane.normal(), n);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn non_unit_normal_is_rejected_in_debug() {
        Plane::new(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO, 1.0, Material::diffuse(Vec3::ONE));
    }
}
