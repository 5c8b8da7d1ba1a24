use thiserror::Error;

/// Errors reported while setting up a pipeline or loading its resources.
///
/// Nothing on the per-frame draw path produces an error: malformed or out-of-range geometry simply draws nothing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Presentation surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("Invalid depth planes: near {near} must be positive and less than far {far}")]
    InvalidDepthPlanes { near: f32, far: f32 },
    #[error("Texture data has {found} bytes, expected {expected}")]
    TextureSize { expected: usize, found: usize },
    #[error("Texture must have a non-zero size, got {width}x{height}")]
    EmptyTexture { width: usize, height: usize },
    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
