use glam::Vec3;
use crate::shader_params::{MaterialField, Param, ParamValue, ParameterSink};

// the trace shader knows exactly two shading behaviors
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Material {
    Diffuse { attenuation: Vec3 },
    Metallic { attenuation: Vec3 },
}

impl Material {
    pub fn diffuse(attenuation: Vec3) -> Self {
        Material::Diffuse { attenuation }
    }

    pub fn metallic(attenuation: Vec3) -> Self {
        Material::Metallic { attenuation }
    }

    pub fn attenuation(&self) -> Vec3 {
        match *self {
            Material::Diffuse { attenuation } | Material::Metallic { attenuation } => attenuation,
        }
    }

    pub fn is_diffuse(&self) -> bool {
        matches!(self, Material::Diffuse { .. })
    }

    pub fn is_metallic(&self) -> bool {
        matches!(self, Material::Metallic { .. })
    }

    /// Writes the three `mtl.*` slots of a primitive. `slot` builds the full
    /// parameter name for a material field of that primitive.
    pub fn upload(&self, sink: &mut dyn ParameterSink, slot: impl Fn(MaterialField) -> Param) {
        sink.set(slot(MaterialField::Diffuse), ParamValue::Bool(self.is_diffuse()));
        sink.set(slot(MaterialField::Metallic), ParamValue::Bool(self.is_metallic()));
        sink.set(slot(MaterialField::Attenuation), ParamValue::Vec3(self.attenuation()));
    }
}
