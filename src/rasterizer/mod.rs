mod triangles;

pub use self::triangles::TriangleOutcome;

use crate::{
    sampler::{AddressingMode, FilterMode},
    texture::Texture,
    vertex::Vertex,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The screen-space winding that marks a triangle as front-facing. Back-facing triangles are culled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrontFace {
    /// Clockwise as seen on screen (with +y pointing down).
    Clockwise,
    CounterClockwise,
}

impl Default for FrontFace {
    fn default() -> Self {
        FrontFace::Clockwise
    }
}

impl FrontFace {
    /// Whether a triangle with the given signed screen-space area (positive for clockwise) faces the viewer.
    #[inline(always)]
    pub fn is_front(self, signed_area: f32) -> bool {
        match self {
            FrontFace::Clockwise => signed_area > 0.0,
            FrontFace::CounterClockwise => signed_area < 0.0,
        }
    }
}

/// Per-draw state consulted for every pixel of a triangle.
#[derive(Copy, Clone, Debug)]
pub struct DrawState<'a> {
    pub texture: Option<&'a Texture>,
    pub addressing: AddressingMode,
    pub filter: FilterMode,
}

impl<'a> Default for DrawState<'a> {
    fn default() -> Self {
        Self {
            texture: None,
            addressing: AddressingMode::default(),
            filter: FilterMode::default(),
        }
    }
}

/// Maps clip-space vertices onto the screen of a particular size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    half_width: f32,
    half_height: f32,
}

impl Viewport {
    pub fn new([width, height]: [usize; 2]) -> Self {
        Self {
            half_width: width as f32 * 0.5,
            half_height: height as f32 * 0.5,
        }
    }

    /// Perspective-divide a clipped vertex and map it into screen space, in place.
    ///
    /// Afterwards `pos.xy` are pixel coordinates (+y down), `pos.z` holds `1 / depth`, and the texture coordinate is
    /// premultiplied by `1 / depth` so that it interpolates linearly across the screen.
    #[inline(always)]
    pub fn to_screen(&self, v: &mut Vertex) {
        let inv_z = 1.0 / v.pos.z;
        v.pos.x = self.half_width + v.pos.x * inv_z * self.half_width;
        v.pos.y = self.half_height - v.pos.y * inv_z * self.half_height;
        v.pos.z = inv_z;
        v.tex *= inv_z;
    }
}

/// The scan converter.
///
/// Takes screen-space triangles and fills the pixels they cover, testing each against the depth buffer and shading
/// it from the bound texture and the interpolated vertex colours.
#[derive(Copy, Clone, Debug, Default)]
pub struct Rasterizer {
    front_face: FrontFace,
}

impl Rasterizer {
    pub fn new(front_face: FrontFace) -> Self {
        Self { front_face }
    }

    pub fn front_face(&self) -> FrontFace {
        self.front_face
    }

    pub fn set_front_face(&mut self, front_face: FrontFace) {
        self.front_face = front_face;
    }
}

/// Twice the signed area of a screen-space triangle; positive when its vertices run clockwise on screen.
#[inline(always)]
pub fn signed_area(tri: &[Vertex; 3]) -> f32 {
    let (a, b, c) = (tri[0].pos, tri[1].pos, tri[2].pos);
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}
