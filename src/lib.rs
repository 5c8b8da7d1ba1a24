//! A software 3D rendering pipeline.
//!
//! `strata` turns streams of lit, textured triangles into a finished RGBA image using nothing but scalar
//! floating-point arithmetic on the CPU. Each frame runs the same fixed sequence of stages:
//!
//! - Transform & lighting: vertices move from world space to clip space, picking up per-vertex diffuse and specular
//!   colour from the active [`Light`]
//! - Triangle assembly from each [`Primitive`]'s list, fan or strip pattern
//! - Clipping against the 6 faces of the view frustum
//! - Perspective division and mapping onto the screen
//! - Scan conversion with back-face culling, depth testing and perspective-correct texturing
//!
//! The [`Pipeline`] drives these stages. Scene code submits [`Stream`]s to it once per frame, and a [`Surface`]
//! presents the results.
//!
//! ```no_run
//! use strata::{geometry, Light, Pipeline, PipelineConfig, Stream};
//! use vek::{Mat4, Rgb, Vec2, Vec3};
//!
//! let mut pipeline = Pipeline::with_size([640, 480], PipelineConfig::default()).unwrap();
//! pipeline.set_light(Some(Light::directional(Vec3::unit_z()).with_diffuse(Rgb::one())));
//!
//! let quad = Stream::new(Mat4::<f32>::translation_3d(Vec3::new(0.0, 0.0, 4.0)))
//!     .with_primitive(geometry::quad(Vec2::one(), Rgb::one()));
//! pipeline.add_stream(&quad);
//! pipeline.draw();
//!
//! let pixels = pipeline.color().to_rgba_bytes();
//! ```

pub mod buffer;
pub mod clip;
pub mod depth;
pub mod error;
pub mod geometry;
pub mod interpolate;
pub mod light;
pub mod lighting;
pub mod math;
pub mod pipeline;
pub mod primitives;
pub mod rasterizer;
pub mod sampler;
pub mod stream;
pub mod texture;
pub mod vertex;

// Reexports
pub use self::{
    buffer::{Buffer2d, FrameBuffer},
    clip::{Clipper, Triangle},
    depth::{DepthBuffer, DepthPlanes},
    error::{Error, Result},
    light::{Light, LightSource},
    pipeline::{FrameRate, FrameStats, Pipeline, PipelineConfig, Surface},
    primitives::{Primitive, VertexPattern},
    rasterizer::{FrontFace, Rasterizer},
    sampler::{AddressingMode, FilterMode, Sampler},
    stream::{RenderSettings, Stream},
    texture::{Texture, TextureCache},
    vertex::Vertex,
};
