use super::*;
use crate::texture::Texture;

/// A sampler that uses nearest-neighbour (point) sampling.
#[derive(Copy, Clone, Debug)]
pub struct Nearest<'a> {
    texture: &'a Texture,
    mode: AddressingMode,
}

impl<'a> Nearest<'a> {
    pub fn new(texture: &'a Texture, mode: AddressingMode) -> Self {
        Self { texture, mode }
    }
}

impl<'a> Sampler for Nearest<'a> {
    #[inline(always)]
    fn sample(&self, coord: Vec2<f32>) -> Rgb<f32> {
        let [w, h] = self.texture.size();
        let x = self.mode.address(texel_index(coord.x), w);
        let y = self.mode.address(texel_index(coord.y), h);
        self.texture.texel(x, y)
    }
}
