//! The named parameter slots the trace and present shaders read.
//!
//! Every value the host hands to the GPU goes through [`ParameterSink::set`]
//! with a [`Param`] key. The key's `Display` form is the slot name as the
//! shaders see it, e.g. `spheres[2].mtl.attenuation` or `c2w`.

use std::fmt;
use glam::{Mat4, Vec2, Vec3};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MaterialField {
    Diffuse,
    Metallic,
    Attenuation,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SphereField {
    Center,
    Radius,
    Material(MaterialField),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlaneField {
    Normal,
    Position,
    Extent,
    Material(MaterialField),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LightField {
    Position,
    Intensity,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    // set once per viewport
    Proj,
    ViewPixelWidth,
    ViewPixelHeight,
    Width,
    Height,
    // scene, set once
    Sphere(usize, SphereField),
    Plane(usize, PlaneField),
    Light(usize, LightField),
    // per frame
    CameraToWorld,
    CameraPos,
    RandomVector(usize),
    CameraIsMoving,
    Count,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    U32(u32),
    F32(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Mat4(Mat4),
}

/// Anything that accepts named parameter uploads: the GPU uniform blocks at
/// runtime, a recorder in tests.
pub trait ParameterSink {
    fn set(&mut self, param: Param, value: ParamValue);
}

impl fmt::Display for MaterialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MaterialField::Diffuse => "diffuse",
            MaterialField::Metallic => "metallic",
            MaterialField::Attenuation => "attenuation",
        };
        write!(f, "mtl.{name}")
    }
}

impl fmt::Display for SphereField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SphereField::Center => f.write_str("center"),
            SphereField::Radius => f.write_str("radius"),
            SphereField::Material(field) => write!(f, "{field}"),
        }
    }
}

impl fmt::Display for PlaneField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaneField::Normal => f.write_str("normal"),
            PlaneField::Position => f.write_str("position"),
            PlaneField::Extent => f.write_str("extent"),
            PlaneField::Material(field) => write!(f, "{field}"),
        }
    }
}

impl fmt::Display for LightField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightField::Position => f.write_str("position"),
            LightField::Intensity => f.write_str("intensity"),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Proj => f.write_str("proj"),
            Param::ViewPixelWidth => f.write_str("view_pixel_width"),
            Param::ViewPixelHeight => f.write_str("view_pixel_height"),
            Param::Width => f.write_str("width"),
            Param::Height => f.write_str("height"),
            Param::Sphere(i, field) => write!(f, "spheres[{i}].{field}"),
            Param::Plane(i, field) => write!(f, "planes[{i}].{field}"),
            Param::Light(i, field) => write!(f, "lights[{i}].{field}"),
            Param::CameraToWorld => f.write_str("c2w"),
            Param::CameraPos => f.write_str("cameraPos"),
            Param::RandomVector(i) => write!(f, "randomVector[{i}]"),
            Param::CameraIsMoving => f.write_str("cameraIsMoving"),
            Param::Count => f.write_str("count"),
        }
    }
}
