use glam::Vec3;
use crate::light::Light;
use crate::material::Material;
use crate::plane::Plane;
use crate::shader_params::ParameterSink;
use crate::sphere::Sphere;

// sequence order fixes the uniform array index each primitive is uploaded to;
// it has no other meaning
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub planes: Vec<Plane>,
    pub lights: Vec<Light>,
}

impl Scene {
    pub fn new(spheres: Vec<Sphere>, planes: Vec<Plane>, lights: Vec<Light>) -> Self {
        Self { spheres, planes, lights }
    }

    pub fn showcase() -> Self {
        let spheres = vec![
            // metallic
            Sphere::new(Vec3::new(0.0, 0.0, 0.0), 2.0, Material::metallic(Vec3::new(1.0, 1.0, 1.0))),
            Sphere::new(Vec3::new(6.0, -0.5, 4.0), 1.5, Material::metallic(Vec3::new(1.0, 0.7, 0.4))),
            // red
            Sphere::new(Vec3::new(1.0, -1.5, 5.0), 0.5, Material::diffuse(Vec3::new(1.0, 0.0, 0.0))),
            // purple pink
            Sphere::new(Vec3::new(-2.0, -1.0, 6.0), 1.0, Material::diffuse(Vec3::new(0.9, 0.5, 0.9))),
            // green
            Sphere::new(Vec3::new(3.0, -1.0, 4.0), 1.0, Material::diffuse(Vec3::new(0.0, 1.0, 0.0))),
            // mellow pink
            Sphere::new(Vec3::new(4.5, -1.5, 8.0), 0.5, Material::diffuse(Vec3::new(1.0, 0.6, 0.5))),
            // yellow
            Sphere::new(Vec3::new(-3.0, -1.5, 8.0), 0.5, Material::diffuse(Vec3::new(1.0, 1.0, 0.0))),
        ];

        let left_facing = Vec3::new(0.7071067, 0.0, 0.7071067);
        let right_facing = Vec3::new(-0.7071067, 0.0, 0.7071067);
        let planes = vec![
            // ground
            Plane::new(Vec3::Y, Vec3::new(0.0, -2.0, 0.0), 100.0,
                       Material::diffuse(Vec3::new(0.5, 0.5, 0.5))),
            // each mirror sits in front of a slightly larger backdrop
            Plane::new(left_facing, Vec3::new(-5.0, 0.0, 0.0), 5.0,
                       Material::metallic(Vec3::ONE)),
            Plane::new(left_facing, Vec3::new(-5.0, 0.0, 0.0), 5.5,
                       Material::diffuse(Vec3::new(0.4, 0.3, 0.9))),
            Plane::new(right_facing, Vec3::new(5.0, 0.0, -8.0), 10.0,
                       Material::metallic(Vec3::ONE)),
            Plane::new(right_facing, Vec3::new(5.0, 0.0, -8.0), 10.5,
                       Material::diffuse(Vec3::new(0.9, 1.0, 0.8))),
        ];

        let lights = vec![Light::new(Vec3::new(0.0, 10.0, 15.0), Vec3::ONE)];

        Self { spheres, planes, lights }
    }

    /// Pushes every field of every primitive to its named slot. Must run once,
    /// before the first frame is traced.
    pub fn upload(&self, sink: &mut dyn ParameterSink) {
        for (idx, sphere) in self.spheres.iter().enumerate() {
            sphere.upload(idx, sink);
        }
        for (idx, plane) in self.planes.iter().enumerate() {
            plane.upload(idx, sink);
        }
        for (idx, light) in self.lights.iter().enumerate() {
            light.upload(idx, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader_params::tests::RecordingSink;
    use crate::shader_params::{MaterialField, Param, ParamValue, PlaneField, SphereField};

    #[test]
    fn upload_count_matches_field_contract() {
        let scene = Scene::showcase();
        let mut sink = RecordingSink::default();
        scene.upload(&mut sink);

        let (s, p, l) = (scene.spheres.len(), scene.planes.len(), scene.lights.len());
        assert_eq!((s, p, l), (7, 5, 1));
        assert_eq!(sink.uploads.len(), 5 * s + 6 * p + 2 * l);
    }

    #[test]
    fn uploads_use_sequence_index() {
        let scene = Scene::showcase();
        let mut sink = RecordingSink::default();
        scene.upload(&mut sink);

        for (i, sphere) in scene.spheres.iter().enumerate() {
            assert_eq!(sink.value_of(Param::Sphere(i, SphereField::Center)),
                       Some(ParamValue::Vec3(sphere.center())));
            assert_eq!(sink.value_of(Param::Sphere(i, SphereField::Radius)),
                       Some(ParamValue::F32(sphere.radius())));
        }
        for (i, plane) in scene.planes.iter().enumerate() {
            assert_eq!(sink.value_of(Param::Plane(i, PlaneField::Extent)),
                       Some(ParamValue::F32(plane.extent())));
        }
        // the first plane is the diffuse ground, the second a mirror
        assert_eq!(sink.value_of(Param::Plane(0, PlaneField::Material(MaterialField::Diffuse))),
                   Some(ParamValue::Bool(true)));
        assert_eq!(sink.value_of(Param::Plane(1, PlaneField::Material(MaterialField::Metallic))),
                   Some(ParamValue::Bool(true)));

        let names = sink.names();
        assert_eq!(names[0], "spheres[0].center");
        assert_eq!(names[4], "spheres[0].mtl.attenuation");
        assert_eq!(names[5], "spheres[1].center");
        assert_eq!(names.last().map(String::as_str), Some("lights[0].intensity"));
    }

    #[test]
    fn mirrors_come_before_their_backdrops() {
        // coplanar planes tie on distance and the trace shader keeps the first one
        let planes = Scene::showcase().planes;
        for (i, mirror) in planes.iter().enumerate().filter(|(_, p)| p.material().is_metallic()) {
            let backdrop = planes.iter().position(|p| {
                p.material().is_diffuse() && p.normal() == mirror.normal()
                    && p.position() == mirror.position()
            });
            let backdrop = backdrop.expect("every mirror has a backdrop");
            assert!(i < backdrop, "mirror {i} is listed after its backdrop {backdrop}");
            assert!(planes[backdrop].extent() > mirror.extent());
        }
    }

    #[test]
    fn empty_scene_uploads_nothing() {
        let mut sink = RecordingSink::default();
        Scene::default().upload(&mut sink);
        assert!(sink.uploads.is_empty());
    }

    #[test]
    fn mixed_counts() {
        let m = Material::diffuse(Vec3::ONE);
        let scene = Scene::new(
            vec![Sphere::new(Vec3::ZERO, 1.0, m); 2],
            vec![Plane::new(Vec3::Y, Vec3::ZERO, 1.0, m); 3],
            vec![],
        );
        let mut sink = RecordingSink::default();
        scene.upload(&mut sink);
        assert_eq!(sink.uploads.len(), 5 * 2 + 6 * 3);
        assert_eq!(sink.names()[10], "planes[0].normal");
    }
}
