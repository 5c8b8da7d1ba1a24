use super::*;
use crate::texture::Texture;

/// A sampler that bilinearly interpolates the 4 texels nearest to the coordinate.
#[derive(Copy, Clone, Debug)]
pub struct Linear<'a> {
    texture: &'a Texture,
    mode: AddressingMode,
}

impl<'a> Linear<'a> {
    pub fn new(texture: &'a Texture, mode: AddressingMode) -> Self {
        Self { texture, mode }
    }
}

impl<'a> Sampler for Linear<'a> {
    #[inline(always)]
    fn sample(&self, coord: Vec2<f32>) -> Rgb<f32> {
        let [w, h] = self.texture.size();
        // Shift so that texel centres land on integer coordinates
        let (x, y) = (coord.x - 0.5, coord.y - 0.5);
        let (x0, y0) = (texel_index(x), texel_index(y));
        let fract = Vec2::new(x - x.floor(), y - y.floor());

        let p0x = self.mode.address(x0, w);
        let p1x = self.mode.address(x0.saturating_add(1), w);
        let p0y = self.mode.address(y0, h);
        let p1y = self.mode.address(y0.saturating_add(1), h);

        let t00 = self.texture.texel(p0x, p0y);
        let t10 = self.texture.texel(p1x, p0y);
        let t01 = self.texture.texel(p0x, p1y);
        let t11 = self.texture.texel(p1x, p1y);

        let t0 = t00 * (1.0 - fract.y) + t01 * fract.y;
        let t1 = t10 * (1.0 - fract.y) + t11 * fract.y;

        t0 * (1.0 - fract.x) + t1 * fract.x
    }
}
