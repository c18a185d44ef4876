use glam::Vec3;
use crate::material::Material;
use crate::shader_params::{Param, ParamValue, ParameterSink, SphereField};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive, got {radius}");
        Self { center, radius, material }
    }

    pub fn center(&self) -> Vec3 { self.center }
    pub fn radius(&self) -> f32 { self.radius }
    pub fn material(&self) -> Material { self.material }

    pub fn upload(&self, idx: usize, sink: &mut dyn ParameterSink) {
        sink.set(Param::Sphere(idx, SphereField::Center), ParamValue::Vec3(self.center));
        sink.set(Param::Sphere(idx, SphereField::Radius), ParamValue::F32(self.radius));
        self.material.upload(sink, |field| Param::Sphere(idx, SphereField::Material(field)));
    }
}
