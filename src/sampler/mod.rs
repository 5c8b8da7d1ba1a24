mod linear;
mod nearest;

pub use self::{linear::Linear, nearest::Nearest};

use vek::{Rgb, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How an out-of-range texel index is mapped back into the texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AddressingMode {
    /// Saturate to the edge texel.
    Clamp,
    /// Repeat the texture.
    Wrap,
    /// Repeat the texture, reflecting every other repetition.
    Mirror,
}

impl Default for AddressingMode {
    fn default() -> Self {
        AddressingMode::Clamp
    }
}

impl AddressingMode {
    /// Map an integer texel index onto `0..dim`.
    ///
    /// `dim` must be non-zero.
    #[inline(always)]
    pub fn address(self, c: i64, dim: usize) -> usize {
        let d = dim as i64;
        let c = match self {
            AddressingMode::Clamp => c.max(0).min(d - 1),
            AddressingMode::Wrap => c.rem_euclid(d),
            AddressingMode::Mirror => {
                let c = c.rem_euclid(d + d);
                if c < d {
                    c
                } else {
                    d + d - c - 1
                }
            }
        };
        c as usize
    }
}

/// How texels are combined when sampling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FilterMode {
    /// Take the single texel containing the coordinate.
    Point,
    /// Blend the 4 nearest texels by their overlap with a texel-sized footprint around the coordinate.
    Linear,
}

impl Default for FilterMode {
    fn default() -> Self {
        FilterMode::Point
    }
}

/// A trait that describes a sampler of a texture.
///
/// Samplers take texel-space coordinates (`0..width`, `0..height` covers the texture once). Coordinates outside that
/// range are resolved by the sampler's [`AddressingMode`]; sampling never fails and never reads out of bounds.
pub trait Sampler {
    /// Sample the texture at the given texel-space coordinate.
    fn sample(&self, coord: Vec2<f32>) -> Rgb<f32>;
}

#[inline(always)]
fn texel_index(c: f32) -> i64 {
    // `as` saturates huge values and maps NaN to 0
    c.floor() as i64
}
