use crate::vertex::Vertex;
use core::ops::{Add, AddAssign, Mul, Sub};
use vek::{Rgb, Vec2};

/// The attributes carried across a triangle during scan conversion.
///
/// Values of this type are used both as running accumulators and as per-step deltas, so that the inner loops only
/// ever add into existing storage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interpolants {
    /// `1 / depth`, which varies linearly in screen space.
    pub inv_z: f32,
    /// Texel-space coordinate premultiplied by `inv_z`.
    pub tex: Vec2<f32>,
    pub diffuse: Rgb<f32>,
    pub specular: Rgb<f32>,
}

impl Interpolants {
    /// Extract the interpolants of a screen-space vertex, scaling its texture coordinate into texel space.
    ///
    /// The vertex's `pos.z` must already hold `1 / depth`, and its texture coordinate must already be premultiplied
    /// by it.
    #[inline(always)]
    pub fn from_vertex(v: &Vertex, tex_scale: Vec2<f32>) -> Self {
        Self {
            inv_z: v.pos.z,
            tex: v.tex * tex_scale,
            diffuse: v.diffuse,
            specular: v.specular,
        }
    }

    /// Recover the perspective-correct texel coordinate.
    #[inline(always)]
    pub fn tex_coord(&self, depth: f32) -> Vec2<f32> {
        self.tex * depth
    }
}

impl Add for Interpolants {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            inv_z: self.inv_z + rhs.inv_z,
            tex: self.tex + rhs.tex,
            diffuse: self.diffuse + rhs.diffuse,
            specular: self.specular + rhs.specular,
        }
    }
}

impl AddAssign for Interpolants {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.inv_z += rhs.inv_z;
        self.tex += rhs.tex;
        self.diffuse += rhs.diffuse;
        self.specular += rhs.specular;
    }
}

impl Sub for Interpolants {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            inv_z: self.inv_z - rhs.inv_z,
            tex: self.tex - rhs.tex,
            diffuse: self.diffuse - rhs.diffuse,
            specular: self.specular - rhs.specular,
        }
    }
}

impl Mul<f32> for Interpolants {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: f32) -> Self {
        Self {
            inv_z: self.inv_z * rhs,
            tex: self.tex * rhs,
            diffuse: self.diffuse * rhs,
            specular: self.specular * rhs,
        }
    }
}
