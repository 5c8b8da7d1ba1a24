use crate::{
    buffer::FrameBuffer,
    clip::Clipper,
    depth::{DepthBuffer, DepthPlanes},
    error::{Error, Result},
    light::Light,
    lighting::{transform_and_light, Lighting},
    math,
    rasterizer::{DrawState, FrontFace, Rasterizer, TriangleOutcome, Viewport},
    sampler::FilterMode,
    stream::Stream,
    vertex::Vertex,
};
use std::time::Instant;
use vek::Mat4;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Somewhere finished frames are shown, and which decides when the next frame starts.
pub trait Surface {
    /// The size of the drawable area in pixels, or `None` if the surface cannot be drawn to.
    fn size(&self) -> Option<[usize; 2]>;

    /// Show a finished frame.
    fn present(&mut self, color: &FrameBuffer);

    /// Block until the next frame should be drawn. Returning `false` ends the frame loop.
    ///
    /// `vsync` asks the surface to pace frames to the display rather than running as fast as possible.
    fn next_tick(&mut self, vsync: bool) -> bool;
}

/// Pipeline-wide settings.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    pub depth_planes: DepthPlanes,
    pub front_face: FrontFace,
    /// Colour every frame starts from. Cleared pixels are fully opaque.
    pub clear_color: [u8; 3],
    /// Horizontal field of view of the default projection, in radians.
    pub field_of_view: f32,
    /// Specular exponent used by streams that do not override it.
    pub shininess: f32,
    /// Texture filter used by streams that do not override it.
    pub filter: FilterMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            depth_planes: DepthPlanes::default(),
            front_face: FrontFace::default(),
            clear_color: [0, 0, 0],
            field_of_view: core::f32::consts::FRAC_PI_4,
            shininess: 30.0,
            filter: FilterMode::default(),
        }
    }
}

/// A rolling frames-per-second estimate.
#[derive(Copy, Clone, Debug, Default)]
pub struct FrameRate {
    last: Option<Instant>,
    fps: f32,
    frames: u64,
}

impl FrameRate {
    /// Weight given to the previous estimate on every update.
    const SMOOTHING: f32 = 0.9;

    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a frame now.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Record the start of a frame at the given instant.
    pub fn tick_at(&mut self, now: Instant) {
        if let Some(last) = self.last {
            let dt = now.saturating_duration_since(last).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                self.fps = if self.fps > 0.0 {
                    self.fps * Self::SMOOTHING + fps * (1.0 - Self::SMOOTHING)
                } else {
                    fps
                };
            }
        }
        self.last = Some(now);
        self.frames += 1;
    }

    /// The smoothed estimate, or zero before two frames have been recorded.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// The number of frames recorded so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Counters gathered while drawing a frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub streams: usize,
    /// Primitives whose vertex count did not fit their pattern.
    pub malformed: usize,
    /// Triangles assembled from primitives, before clipping.
    pub triangles: usize,
    /// Assembled triangles that lay entirely outside the view frustum.
    pub clipped: usize,
    pub drawn: usize,
    pub culled: usize,
    pub degenerate: usize,
}

/// The frame orchestrator.
///
/// Owns the colour and depth buffers and the pipeline-wide state (camera, projection, light). Geometry is submitted
/// each frame as [`Stream`]s through [`Pipeline::add_stream`] and drawn, in submission order, by
/// [`Pipeline::draw`].
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    color: FrameBuffer,
    depth: DepthBuffer,
    clipper: Clipper,
    rasterizer: Rasterizer,
    viewport: Viewport,
    view: Mat4<f32>,
    projection: Mat4<f32>,
    light: Option<Light>,
    shininess: f32,
    pending: Vec<Stream>,
    scratch: Vec<Vertex>,
    frame_rate: FrameRate,
}

impl Pipeline {
    /// Create a pipeline drawing at the size of the given surface.
    pub fn new<S: Surface + ?Sized>(surface: &S, config: PipelineConfig) -> Result<Self> {
        let size = surface
            .size()
            .ok_or_else(|| Error::SurfaceUnavailable("surface has no drawable area".to_string()))?;
        Self::with_size(size, config)
    }

    /// Create a pipeline with buffers of the given size.
    pub fn with_size([width, height]: [usize; 2], config: PipelineConfig) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::SurfaceUnavailable(format!(
                "cannot draw to a {}x{} surface",
                width, height
            )));
        }
        let planes = DepthPlanes::new(config.depth_planes.near, config.depth_planes.far)?;

        log::debug!(
            "Creating {}x{} pipeline (near {}, far {}, {:?} front faces)",
            width,
            height,
            planes.near,
            planes.far,
            config.front_face
        );

        let [r, g, b] = config.clear_color;
        Ok(Self {
            color: FrameBuffer::fill([width, height], [r, g, b, 255]),
            depth: DepthBuffer::new([width, height], planes),
            clipper: Clipper::new(planes),
            rasterizer: Rasterizer::new(config.front_face),
            viewport: Viewport::new([width, height]),
            view: Mat4::identity(),
            projection: math::perspective(width as f32, height as f32, config.field_of_view),
            light: None,
            shininess: config.shininess,
            pending: Vec::new(),
            scratch: Vec::new(),
            frame_rate: FrameRate::new(),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn size(&self) -> [usize; 2] {
        self.color.size()
    }

    pub fn color(&self) -> &FrameBuffer {
        &self.color
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn frame_rate(&self) -> &FrameRate {
        &self.frame_rate
    }

    pub fn view(&self) -> Mat4<f32> {
        self.view
    }

    /// Set the world-to-view transform. The camera sits at the view-space origin looking down +z.
    pub fn set_view(&mut self, view: Mat4<f32>) {
        self.view = view;
    }

    pub fn projection(&self) -> Mat4<f32> {
        self.projection
    }

    /// Replace the projection. It must keep the view depth in clip-space `z` (see [`math::perspective`]).
    pub fn set_projection(&mut self, projection: Mat4<f32>) {
        self.projection = projection;
    }

    pub fn light(&self) -> Option<&Light> {
        self.light.as_ref()
    }

    /// Set the light used by streams that do not bring their own. `None` draws them unlit.
    pub fn set_light(&mut self, light: Option<Light>) {
        self.light = light;
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn set_shininess(&mut self, shininess: f32) {
        self.shininess = shininess;
    }

    pub fn set_front_face(&mut self, front_face: FrontFace) {
        self.config.front_face = front_face;
        self.rasterizer.set_front_face(front_face);
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        self.config.filter = filter;
    }

    /// Reconfigure the near and far planes used for clipping and depth testing.
    ///
    /// The depth buffer is cleared, since its contents were scaled for the old range.
    pub fn set_depth_planes(&mut self, planes: DepthPlanes) -> Result<()> {
        let planes = DepthPlanes::new(planes.near, planes.far)?;
        log::debug!("Depth planes set to near {}, far {}", planes.near, planes.far);
        self.config.depth_planes = planes;
        self.clipper.set_planes(planes);
        self.depth.set_planes(planes);
        self.depth.clear();
        Ok(())
    }

    /// Queue a copy of a stream for drawing this frame.
    pub fn add_stream(&mut self, stream: &Stream) {
        self.pending.push(stream.clone());
    }

    /// The number of streams queued for this frame.
    pub fn pending_streams(&self) -> usize {
        self.pending.len()
    }

    /// Reset the colour buffer to the clear colour and the depth buffer to the far plane.
    pub fn clear(&mut self) {
        let [r, g, b] = self.config.clear_color;
        self.color.clear([r, g, b, 255]);
        self.depth.clear();
    }

    /// Run a single frame: present the previous frame, clear, let `frame` submit streams, then draw them.
    pub fn tick<S, F>(&mut self, surface: &mut S, mut frame: F) -> FrameStats
    where
        S: Surface + ?Sized,
        F: FnMut(&mut Self),
    {
        self.frame_rate.tick();
        surface.present(&self.color);
        self.clear();
        frame(self);
        self.draw()
    }

    /// Run frames until the surface stops the loop.
    pub fn begin_loop<S, F>(&mut self, surface: &mut S, vsync: bool, mut frame: F)
    where
        S: Surface + ?Sized,
        F: FnMut(&mut Self),
    {
        loop {
            self.tick(surface, &mut frame);
            if !surface.next_tick(vsync) {
                break;
            }
        }
        log::debug!("Frame loop ended after {} frames", self.frame_rate.frames());
    }

    /// Draw every queued stream, in submission order, then empty the queue.
    pub fn draw(&mut self) -> FrameStats {
        let mut streams = core::mem::take(&mut self.pending);
        let mut stats = FrameStats {
            streams: streams.len(),
            ..FrameStats::default()
        };

        let lighting = self
            .light
            .as_ref()
            .map(|light| Lighting::new(light, &self.view, self.shininess));
        for stream in &streams {
            self.draw_stream(stream, lighting.as_ref(), &mut stats);
        }
        self.depth.set_skip(false);

        log::trace!(
            "Drew {} streams: {} triangles, {} rasterized, {} clipped away, {} culled",
            stats.streams,
            stats.triangles,
            stats.drawn,
            stats.clipped,
            stats.culled
        );

        // Keep the allocation for the next frame
        streams.clear();
        self.pending = streams;
        stats
    }

    fn draw_stream(&mut self, stream: &Stream, global: Option<&Lighting>, stats: &mut FrameStats) {
        let settings = &stream.settings;

        // Overrides only live for this stream; the pipeline's own light and shininess are never touched
        let local;
        let lighting = if settings.light.is_some() || settings.shininess.is_some() {
            let shininess = settings.shininess.unwrap_or(self.shininess);
            local = settings
                .light
                .as_ref()
                .or(self.light.as_ref())
                .map(|light| Lighting::new(light, &self.view, shininess));
            local.as_ref()
        } else {
            global
        };

        self.depth.set_skip(settings.ignore_depth);
        let state = DrawState {
            texture: settings.texture.as_deref(),
            addressing: settings.addressing,
            filter: settings.filter.unwrap_or(self.config.filter),
        };
        let world_view = self.view * stream.world;

        for primitive in &stream.primitives {
            if !primitive.is_well_formed() {
                log::trace!(
                    "{:?} primitive has {} vertices, drawing only complete triangles",
                    primitive.pattern,
                    primitive.vertices.len()
                );
                stats.malformed += 1;
            }

            let projection = &self.projection;
            self.scratch.clear();
            self.scratch.extend(primitive.vertices.iter().map(|v| {
                let mut v = *v;
                transform_and_light(&mut v, &world_view, projection, lighting);
                v
            }));

            for [a, b, c] in primitive.triangles() {
                stats.triangles += 1;
                let tri = [self.scratch[a], self.scratch[b], self.scratch[c]];
                let clipped = self.clipper.clip(&tri);
                if clipped.is_empty() {
                    stats.clipped += 1;
                    continue;
                }

                for tri in clipped {
                    let mut tri = *tri;
                    tri.iter_mut().for_each(|v| self.viewport.to_screen(v));
                    match self
                        .rasterizer
                        .draw_triangle(&tri, &state, &mut self.color, &mut self.depth)
                    {
                        TriangleOutcome::Drawn => stats.drawn += 1,
                        TriangleOutcome::Culled => stats.culled += 1,
                        TriangleOutcome::Degenerate => stats.degenerate += 1,
                    }
                }
            }
        }
    }
}
