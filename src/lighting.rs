//! The transform & lighting stage.
//!
//! Vertices arrive in world space and leave in clip space with their final diffuse and specular colours. Lighting is
//! evaluated in view space, where the camera sits at the origin.

use crate::{
    light::{Light, LightSource},
    math::{normalized_or_zero, saturate, transform_direction, transform_point},
    vertex::Vertex,
};
use vek::{Mat4, Rgb, Vec3};

/// The view-space location of a light's source, recomputed whenever the view or the active light changes.
#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewSource {
    /// Unit vector pointing from any vertex towards the light.
    ToLight(Vec3<f32>),
    /// View-space position of a point light.
    At(Vec3<f32>),
}

/// Everything the lighting stage needs about the active light, resolved into view space.
#[derive(Clone, Debug, PartialEq)]
pub struct Lighting {
    ambient: Rgb<f32>,
    diffuse: Rgb<f32>,
    specular: Rgb<f32>,
    emissive: Rgb<f32>,
    source: Option<ViewSource>,
    camera: Vec3<f32>,
    shininess: f32,
}

impl Lighting {
    pub fn new(light: &Light, view: &Mat4<f32>, shininess: f32) -> Self {
        let source = if light.illuminates_vertices() {
            light.source().map(|source| match source {
                LightSource::Directional(dir) => {
                    ViewSource::ToLight(-normalized_or_zero(transform_direction(view, dir)))
                }
                LightSource::Positional(pos) => ViewSource::At(transform_point(view, pos)),
            })
        } else {
            None
        };

        Self {
            ambient: light.ambient.unwrap_or_else(Rgb::zero),
            diffuse: light.diffuse.unwrap_or_else(Rgb::zero),
            specular: light.specular.unwrap_or_else(Rgb::zero),
            emissive: light.emissive.unwrap_or_else(Rgb::zero),
            source,
            camera: Vec3::zero(),
            shininess,
        }
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    /// Light a vertex whose position and normal are already in view space.
    fn shade(&self, vert: &mut Vertex) {
        let (diffuse_light, specular_light) = match self.source {
            Some(source) => {
                let to_light = match source {
                    ViewSource::ToLight(dir) => dir,
                    ViewSource::At(pos) => normalized_or_zero(pos - vert.pos),
                };
                let to_camera = normalized_or_zero(self.camera - vert.pos);

                let intensity = to_light.dot(vert.normal).max(0.0);
                let half = normalized_or_zero(to_light + to_camera);
                let highlight = specular_falloff(half.dot(vert.normal).max(0.0), self.shininess);

                (
                    self.ambient + self.diffuse * intensity,
                    self.specular * highlight,
                )
            }
            None => (self.ambient, Rgb::zero()),
        };

        vert.diffuse = saturate(vert.diffuse * diffuse_light);
        vert.specular = saturate(vert.specular * specular_light + self.emissive);
    }
}

/// Cheap highlight falloff: `s / (n - n·s + s)`.
///
/// This approximates a Phong-like highlight without a `powf` per vertex.
#[inline(always)]
pub fn specular_falloff(s: f32, shininess: f32) -> f32 {
    if s > 0.0 {
        s / (shininess - shininess * s + s)
    } else {
        0.0
    }
}

/// Move a world-space vertex into clip space, lighting it along the way when a light is active.
///
/// Without a light, vertex colours pass through unchanged.
pub fn transform_and_light(
    vert: &mut Vertex,
    world_view: &Mat4<f32>,
    projection: &Mat4<f32>,
    lighting: Option<&Lighting>,
) {
    vert.pos = transform_point(world_view, vert.pos);

    if let Some(lighting) = lighting {
        if lighting.source.is_some() {
            vert.normal = normalized_or_zero(transform_direction(world_view, vert.normal));
        }
        lighting.shade(vert);
    }

    vert.pos = transform_point(projection, vert.pos);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vek::Vec2;

    fn vertex_at(pos: Vec3<f32>, normal: Vec3<f32>) -> Vertex {
        Vertex::new(pos, normal, Rgb::one(), Rgb::one(), Vec2::zero())
    }

    #[test]
    fn falloff_matches_formula() {
        assert_eq!(specular_falloff(0.0, 30.0), 0.0);
        assert_eq!(specular_falloff(1.0, 30.0), 1.0);
        let s = 0.5;
        assert!((specular_falloff(s, 4.0) - s / (4.0 - 4.0 * s + s)).abs() < 1e-7);
        // Shininess 1 is the identity
        assert!((specular_falloff(0.3, 1.0) - 0.3).abs() < 1e-7);
    }

    #[test]
    fn unlit_vertex_passes_through() {
        let mut v = vertex_at(Vec3::new(1.0, 2.0, 3.0), Vec3::unit_y());
        v.diffuse = Rgb::new(0.2, 0.4, 0.6);
        let before = v;
        transform_and_light(&mut v, &Mat4::identity(), &Mat4::identity(), None);
        assert_eq!(v.diffuse, before.diffuse);
        assert_eq!(v.specular, before.specular);
        assert_eq!(v.pos, before.pos);
    }

    #[test]
    fn directional_light_facing_normal_is_full_diffuse() {
        // Light travels along +z; the surface faces -z (towards the camera)
        let light = Light::directional(Vec3::unit_z()).with_diffuse(Rgb::new(1.0, 0.5, 0.25));
        let lighting = Lighting::new(&light, &Mat4::identity(), 1.0);
        let mut v = vertex_at(Vec3::new(0.0, 0.0, 4.0), -Vec3::unit_z());
        transform_and_light(&mut v, &Mat4::identity(), &Mat4::identity(), Some(&lighting));
        assert_eq!(v.diffuse, Rgb::new(1.0, 0.5, 0.25));
    }

    #[test]
    fn back_lit_vertex_gets_only_ambient_and_emissive() {
        let light = Light::directional(-Vec3::unit_z())
            .with_diffuse(Rgb::one())
            .with_specular(Rgb::one())
            .with_ambient(Rgb::broadcast(0.25))
            .with_emissive(Rgb::broadcast(0.125));
        let lighting = Lighting::new(&light, &Mat4::identity(), 10.0);
        let mut v = vertex_at(Vec3::new(0.0, 0.0, 4.0), -Vec3::unit_z());
        transform_and_light(&mut v, &Mat4::identity(), &Mat4::identity(), Some(&lighting));
        assert_eq!(v.diffuse, Rgb::broadcast(0.25));
        assert_eq!(v.specular, Rgb::broadcast(0.125));
    }

    #[test]
    fn sourceless_light_applies_ambient_only() {
        let light = Light::new().with_ambient(Rgb::broadcast(0.5)).with_diffuse(Rgb::one());
        let lighting = Lighting::new(&light, &Mat4::identity(), 10.0);
        let mut v = vertex_at(Vec3::new(0.0, 0.0, 4.0), -Vec3::unit_z());
        transform_and_light(&mut v, &Mat4::identity(), &Mat4::identity(), Some(&lighting));
        assert_eq!(v.diffuse, Rgb::broadcast(0.5));
        assert_eq!(v.specular, Rgb::zero());
        // The normal is left alone when nothing uses it
        assert_eq!(v.normal, -Vec3::unit_z());
    }

    #[test]
    fn point_light_uses_view_space_position() {
        let view = Mat4::<f32>::translation_3d(Vec3::new(0.0, 0.0, 10.0));
        let light = Light::positional(Vec3::new(0.0, 0.0, -5.0)).with_diffuse(Rgb::one());
        let lighting = Lighting::new(&light, &view, 1.0);
        // Light ends up at z = 5 in view space, directly in front of a vertex at z = 6 facing it
        let mut v = vertex_at(Vec3::new(0.0, 0.0, -4.0), -Vec3::unit_z());
        transform_and_light(&mut v, &view, &Mat4::identity(), Some(&lighting));
        assert_eq!(v.pos, Vec3::new(0.0, 0.0, 6.0));
        assert!((v.diffuse.r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn colours_are_clamped() {
        let light = Light::directional(Vec3::unit_z())
            .with_diffuse(Rgb::broadcast(3.0))
            .with_ambient(Rgb::broadcast(2.0));
        let lighting = Lighting::new(&light, &Mat4::identity(), 1.0);
        let mut v = vertex_at(Vec3::new(0.0, 0.0, 4.0), -Vec3::unit_z());
        transform_and_light(&mut v, &Mat4::identity(), &Mat4::identity(), Some(&lighting));
        assert_eq!(v.diffuse, Rgb::one());
    }
}
