use crate::math::Lerp;
use vek::{Rgb, Vec2, Vec3};

/// A single vertex flowing through the pipeline.
///
/// `pos` is reinterpreted as the vertex moves through the stages: world space when submitted, clip space after
/// transformation (where `z` holds the view depth), and screen space once handed to the rasterizer (where `z` holds
/// `1 / depth`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub pos: Vec3<f32>,
    pub normal: Vec3<f32>,
    pub diffuse: Rgb<f32>,
    pub specular: Rgb<f32>,
    pub tex: Vec2<f32>,
}

impl Vertex {
    pub fn new(
        pos: Vec3<f32>,
        normal: Vec3<f32>,
        diffuse: Rgb<f32>,
        specular: Rgb<f32>,
        tex: Vec2<f32>,
    ) -> Self {
        Self {
            pos,
            normal,
            diffuse,
            specular,
            tex,
        }
    }

    /// A white, non-specular vertex with the given position, normal and texture coordinate.
    pub fn with_pos_normal_tex(pos: Vec3<f32>, normal: Vec3<f32>, tex: Vec2<f32>) -> Self {
        Self::new(pos, normal, Rgb::one(), Rgb::zero(), tex)
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Vec3::zero(), Vec3::zero(), Rgb::one(), Rgb::zero(), Vec2::zero())
    }
}

impl Lerp<f32> for Vertex {
    #[inline(always)]
    fn lerp_unchecked(a: &Self, b: &Self, t: &f32) -> Self {
        Self {
            pos: Lerp::lerp_unchecked(&a.pos, &b.pos, t),
            normal: Lerp::lerp_unchecked(&a.normal, &b.normal, t),
            diffuse: Lerp::lerp_unchecked(&a.diffuse, &b.diffuse, t),
            specular: Lerp::lerp_unchecked(&a.specular, &b.specular, t),
            tex: Lerp::lerp_unchecked(&a.tex, &b.tex, t),
        }
    }
}
