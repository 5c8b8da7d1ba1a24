use crate::{
    buffer::Buffer2d,
    error::{Error, Result},
    sampler::{AddressingMode, FilterMode, Linear, Nearest, Sampler},
};
use fxhash::FxHashMap;
use std::sync::Arc;
use vek::{Rgb, Vec2};

/// Decoded image data, normalized to `0..1` colour channels.
///
/// Textures are immutable once created, which lets a single texture be shared by any number of streams and frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    texels: Buffer2d<Rgb<f32>>,
}

impl Texture {
    /// Create a texture from row-major RGBA8 data. The alpha channel is discarded.
    pub fn from_rgba8(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyTexture { width, height });
        }
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(Error::TextureSize {
                expected,
                found: data.len(),
            });
        }

        let texels = data
            .chunks_exact(4)
            .map(|px| Rgb::new(px[0], px[1], px[2]).map(|e| e as f32 / 255.0))
            .collect();
        Ok(Self {
            texels: Buffer2d::from_vec([width, height], texels)
                .ok_or(Error::TextureSize { expected, found: data.len() })?,
        })
    }

    /// Create a texture filled with a single colour.
    pub fn solid([width, height]: [usize; 2], color: Rgb<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyTexture { width, height });
        }
        Ok(Self {
            texels: Buffer2d::fill([width, height], color),
        })
    }

    /// Create a texture by evaluating a function at every texel.
    pub fn from_fn<F>([width, height]: [usize; 2], mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> Rgb<f32>,
    {
        if width == 0 || height == 0 {
            return Err(Error::EmptyTexture { width, height });
        }
        let texels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Ok(Self {
            texels: Buffer2d::from_vec([width, height], texels).ok_or(Error::EmptyTexture { width, height })?,
        })
    }

    #[cfg(feature = "image")]
    pub fn from_image(image: &image::RgbaImage) -> Result<Self> {
        Self::from_rgba8(image.width() as usize, image.height() as usize, image.as_raw())
    }

    pub fn size(&self) -> [usize; 2] {
        self.texels.size()
    }

    pub fn width(&self) -> usize {
        self.texels.width()
    }

    pub fn height(&self) -> usize {
        self.texels.height()
    }

    /// Read the texel at an already-addressed (in-bounds) index.
    #[inline(always)]
    pub fn texel(&self, x: usize, y: usize) -> Rgb<f32> {
        self.texels.read([x, y])
    }

    /// Sample the texture at a texel-space coordinate using the given addressing and filter modes.
    #[inline]
    pub fn sample(&self, coord: Vec2<f32>, mode: AddressingMode, filter: FilterMode) -> Rgb<f32> {
        match filter {
            FilterMode::Point => Nearest::new(self, mode).sample(coord),
            FilterMode::Linear => Linear::new(self, mode).sample(coord),
        }
    }
}

/// A cache of loaded textures, keyed by their source identifier (usually a path or URL).
///
/// Repeated requests for the same identifier return the same shared texture without loading it again.
#[derive(Default, Debug)]
pub struct TextureCache {
    textures: FxHashMap<String, Arc<Texture>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a previously loaded texture.
    pub fn get(&self, id: &str) -> Option<Arc<Texture>> {
        self.textures.get(id).cloned()
    }

    /// Fetch the texture with the given identifier, calling `load` to produce it on the first request.
    pub fn get_or_load<F>(&mut self, id: &str, load: F) -> Result<Arc<Texture>>
    where
        F: FnOnce() -> Result<Texture>,
    {
        if let Some(texture) = self.textures.get(id) {
            return Ok(texture.clone());
        }

        let texture = Arc::new(load()?);
        log::debug!(
            "Loaded texture '{}' ({}x{})",
            id,
            texture.width(),
            texture.height()
        );
        self.textures.insert(id.to_owned(), texture.clone());
        Ok(texture)
    }

    /// Decode an image file, caching it by path.
    #[cfg(feature = "image")]
    pub fn open<P: AsRef<std::path::Path>>(&mut self, path: P) -> Result<Arc<Texture>> {
        let path = path.as_ref();
        self.get_or_load(&path.to_string_lossy(), || {
            let image = image::open(path)?.to_rgba8();
            Texture::from_image(&image)
        })
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
