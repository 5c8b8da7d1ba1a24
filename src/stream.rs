use crate::{
    light::Light,
    primitives::Primitive,
    sampler::{AddressingMode, FilterMode},
    texture::Texture,
};
use std::sync::Arc;
use vek::Mat4;

/// Per-stream overrides of the pipeline-wide render state.
///
/// Every field left at its default falls back to the pipeline's own setting for the duration of the stream only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderSettings {
    /// Light used instead of the pipeline's light.
    pub light: Option<Light>,
    pub texture: Option<Arc<Texture>>,
    pub addressing: AddressingMode,
    /// Filter used instead of the pipeline's filter.
    pub filter: Option<FilterMode>,
    /// Shininess used instead of the pipeline's shininess.
    pub shininess: Option<f32>,
    /// Draw without testing against or writing to the depth buffer.
    pub ignore_depth: bool,
}

/// A batch of geometry sharing a world transform and render settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Stream {
    pub world: Mat4<f32>,
    pub primitives: Vec<Primitive>,
    pub settings: RenderSettings,
}

impl Default for Stream {
    fn default() -> Self {
        Self::new(Mat4::identity())
    }
}

impl Stream {
    /// An empty stream with the given world transform.
    pub fn new(world: Mat4<f32>) -> Self {
        Self {
            world,
            primitives: Vec::new(),
            settings: RenderSettings::default(),
        }
    }

    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitives.push(primitive);
        self
    }

    pub fn with_primitives<I: IntoIterator<Item = Primitive>>(mut self, primitives: I) -> Self {
        self.primitives.extend(primitives);
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.settings.light = Some(light);
        self
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.settings.texture = Some(texture);
        self
    }

    pub fn with_addressing(mut self, addressing: AddressingMode) -> Self {
        self.settings.addressing = addressing;
        self
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.settings.filter = Some(filter);
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.settings.shininess = Some(shininess);
        self
    }

    pub fn ignoring_depth(mut self) -> Self {
        self.settings.ignore_depth = true;
        self
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// The number of vertices across all primitives.
    pub fn vertex_count(&self) -> usize {
        self.primitives.iter().map(|p| p.vertices.len()).sum()
    }
}
