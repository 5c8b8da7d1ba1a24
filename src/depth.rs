use crate::{
    buffer::Buffer2d,
    error::{Error, Result},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The near and far clip planes, in view-space depth.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DepthPlanes {
    pub near: f32,
    pub far: f32,
}

impl DepthPlanes {
    /// Create a new pair of planes. The near plane must be strictly positive (perspective division happens after
    /// clipping against it) and the far plane must lie beyond it.
    pub fn new(near: f32, far: f32) -> Result<Self> {
        if near > 0.0 && far > near && far.is_finite() {
            Ok(Self { near, far })
        } else {
            Err(Error::InvalidDepthPlanes { near, far })
        }
    }
}

impl Default for DepthPlanes {
    fn default() -> Self {
        Self {
            near: 0.25,
            far: 75.0,
        }
    }
}

/// A per-pixel record of the nearest depth drawn so far.
///
/// Depths are stored as `u16`, linearly scaled between the near and far planes. Writes go through a cursor: select a
/// pixel with [`DepthBuffer::set_index`], then call [`DepthBuffer::test_and_advance`] once per pixel along the
/// scanline.
#[derive(Clone, Debug)]
pub struct DepthBuffer {
    buffer: Buffer2d<u16>,
    planes: DepthPlanes,
    scale: f32,
    cursor: usize,
    skip: bool,
}

impl DepthBuffer {
    /// The value representing the far plane (and everything beyond it).
    pub const FARTHEST: u16 = u16::MAX;

    pub fn new(size: [usize; 2], planes: DepthPlanes) -> Self {
        Self {
            buffer: Buffer2d::fill(size, Self::FARTHEST),
            scale: Self::scale_for(&planes),
            planes,
            cursor: 0,
            skip: false,
        }
    }

    fn scale_for(planes: &DepthPlanes) -> f32 {
        Self::FARTHEST as f32 / (planes.far - planes.near)
    }

    pub fn size(&self) -> [usize; 2] {
        self.buffer.size()
    }

    pub fn planes(&self) -> DepthPlanes {
        self.planes
    }

    /// Reconfigure the depth range.
    ///
    /// Existing contents are not rescaled: clear the buffer before drawing with the new range.
    pub fn set_planes(&mut self, planes: DepthPlanes) {
        self.planes = planes;
        self.scale = Self::scale_for(&planes);
    }

    /// When set, [`DepthBuffer::test_and_advance`] passes every pixel and never writes.
    pub fn set_skip(&mut self, skip: bool) {
        self.skip = skip;
    }

    pub fn skip(&self) -> bool {
        self.skip
    }

    /// Scale a view-space depth into the buffer's fixed range.
    #[inline(always)]
    pub fn quantize(&self, depth: f32) -> u16 {
        let z = ((depth - self.planes.near) * self.scale).floor();
        // `as` saturates, and maps NaN to 0
        z.max(0.0).min(Self::FARTHEST as f32) as u16
    }

    /// Move the cursor to the given pixel. Returns `false` (leaving the cursor where it was) if the pixel is outside
    /// the buffer.
    #[inline]
    pub fn set_index(&mut self, x: usize, y: usize) -> bool {
        if self.buffer.contains([x, y]) {
            self.cursor = self.buffer.linear_index([x, y]);
            true
        } else {
            false
        }
    }

    /// Test a depth against the pixel under the cursor, recording it if it is nearer or equal, then advance the
    /// cursor to the next pixel of the scanline.
    #[inline]
    pub fn test_and_advance(&mut self, depth: f32) -> bool {
        let idx = self.cursor;
        self.cursor += 1;
        if self.skip {
            return true;
        }

        let z = self.quantize(depth);
        match self.buffer.raw_mut().get_mut(idx) {
            Some(stored) if z <= *stored => {
                *stored = z;
                true
            }
            _ => false,
        }
    }

    /// Read the stored value of a pixel.
    pub fn get(&self, x: usize, y: usize) -> Option<u16> {
        self.buffer.get([x, y]).copied()
    }

    /// Reset every pixel to the farthest representable depth.
    pub fn clear(&mut self) {
        self.buffer.clear(Self::FARTHEST);
    }

    pub fn raw(&self) -> &[u16] {
        self.buffer.raw()
    }
}
