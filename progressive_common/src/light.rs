use glam::Vec3;
use crate::shader_params::{LightField, Param, ParamValue, ParameterSink};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Light {
    position: Vec3,
    intensity: Vec3,
}

impl Light {
    pub fn new(position: Vec3, intensity: Vec3) -> Self {
        Self { position, intensity }
    }

    pub fn position(&self) -> Vec3 { self.position }
    pub fn intensity(&self) -> Vec3 { self.intensity }

    pub fn upload(&self, idx: usize, sink: &mut dyn ParameterSink) {
        sink.set(Param::Light(idx, LightField::Position), ParamValue::Vec3(self.position));
        sink.set(Param::Light(idx, LightField::Intensity), ParamValue::Vec3(self.intensity));
    }
}
