use crate::math::normalized_or_zero;
use vek::{Rgb, Vec3};

/// Where a light's illumination comes from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightSource {
    /// A point light at the given world-space position.
    Positional(Vec3<f32>),
    /// A light at infinity, travelling along the given (unit) world-space direction.
    Directional(Vec3<f32>),
}

/// A light in the scene.
///
/// A light without a [`LightSource`] contributes no per-vertex shading: only its ambient and emissive terms apply.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Light {
    source: Option<LightSource>,
    pub ambient: Option<Rgb<f32>>,
    pub diffuse: Option<Rgb<f32>>,
    pub specular: Option<Rgb<f32>>,
    pub emissive: Option<Rgb<f32>>,
}

impl Light {
    /// A light with no source and no colour terms.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional(position: Vec3<f32>) -> Self {
        let mut light = Self::new();
        light.set_position(position);
        light
    }

    pub fn directional(direction: Vec3<f32>) -> Self {
        let mut light = Self::new();
        light.set_direction(direction);
        light
    }

    /// Make this a point light at the given position, replacing any previous source.
    pub fn set_position(&mut self, position: Vec3<f32>) {
        self.source = Some(LightSource::Positional(position));
    }

    /// Make this a directional light, replacing any previous source. The direction is normalized.
    pub fn set_direction(&mut self, direction: Vec3<f32>) {
        self.source = Some(LightSource::Directional(normalized_or_zero(direction)));
    }

    /// Remove the light's source, leaving only its ambient and emissive terms.
    pub fn clear_source(&mut self) {
        self.source = None;
    }

    pub fn source(&self) -> Option<LightSource> {
        self.source
    }

    pub fn position(&self) -> Option<Vec3<f32>> {
        match self.source {
            Some(LightSource::Positional(p)) => Some(p),
            _ => None,
        }
    }

    pub fn direction(&self) -> Option<Vec3<f32>> {
        match self.source {
            Some(LightSource::Directional(d)) => Some(d),
            _ => None,
        }
    }

    pub fn with_ambient(mut self, ambient: Rgb<f32>) -> Self {
        self.ambient = Some(ambient);
        self
    }

    pub fn with_diffuse(mut self, diffuse: Rgb<f32>) -> Self {
        self.diffuse = Some(diffuse);
        self
    }

    pub fn with_specular(mut self, specular: Rgb<f32>) -> Self {
        self.specular = Some(specular);
        self
    }

    pub fn with_emissive(mut self, emissive: Rgb<f32>) -> Self {
        self.emissive = Some(emissive);
        self
    }

    /// Whether this light produces per-vertex diffuse or specular shading.
    pub fn illuminates_vertices(&self) -> bool {
        self.source.is_some() && (self.diffuse.is_some() || self.specular.is_some())
    }
}
