use minifb::{Key, Window, WindowOptions};
use std::{env, f32::consts::PI};
use strata::{
    geometry, AddressingMode, FilterMode, FrameBuffer, Light, Pipeline, PipelineConfig, Primitive, Stream, Surface,
    Texture, TextureCache, Vertex,
};
use vek::{Mat4, Rgb, Vec2, Vec3};

const W: usize = 800;
const H: usize = 600;

struct WindowSurface {
    window: Window,
    pixels: Vec<u32>,
}

impl Surface for WindowSurface {
    fn size(&self) -> Option<[usize; 2]> {
        let (w, h) = self.window.get_size();
        Some([w, h]).filter(|_| w > 0 && h > 0)
    }

    fn present(&mut self, color: &FrameBuffer) {
        self.pixels.clear();
        self.pixels.extend(
            color
                .raw()
                .iter()
                .map(|[r, g, b, _]| (*r as u32) << 16 | (*g as u32) << 8 | *b as u32),
        );
        if let Err(err) = self
            .window
            .update_with_buffer(&self.pixels, color.width(), color.height())
        {
            log::warn!("Failed to present frame: {}", err);
        }
    }

    fn next_tick(&mut self, vsync: bool) -> bool {
        self.window.set_target_fps(if vsync { 60 } else { 0 });
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }
}

/// A field of small quads far behind everything else, drawn as an overlay lit only by ambient light.
fn starfield() -> Stream {
    let mut seed = 0x2545_f491_u32;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        seed as f32 / u32::MAX as f32
    };

    let stars = (0..400)
        .map(|_| {
            let (x, y) = (next() * 120.0 - 60.0, next() * 90.0 - 45.0);
            let brightness = Rgb::broadcast(0.4 + next() * 0.6);
            let vert = |dx: f32, dy: f32| {
                Vertex::new(Vec3::new(x + dx, y + dy, 60.0), -Vec3::unit_z(), brightness, Rgb::zero(), Vec2::zero())
            };
            Primitive::fan(vec![vert(0.0, 0.15), vert(0.15, 0.15), vert(0.15, 0.0), vert(0.0, 0.0)])
        })
        .collect::<Vec<_>>();

    Stream::default()
        .with_primitives(stars)
        .with_light(Light::new().with_ambient(Rgb::one()))
        .ignoring_depth()
}

fn checker() -> strata::Result<Texture> {
    Texture::from_fn([64, 64], |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgb::one()
        } else {
            Rgb::new(0.1, 0.3, 0.6)
        }
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut surface = WindowSurface {
        window: Window::new("Scene", W, H, WindowOptions::default())?,
        pixels: Vec::with_capacity(W * H),
    };

    let mut pipeline = Pipeline::new(&surface, PipelineConfig::default())?;
    pipeline.set_light(Some(
        Light::positional(Vec3::new(-4.0, 6.0, -2.0))
            .with_ambient(Rgb::broadcast(0.15))
            .with_diffuse(Rgb::broadcast(0.9))
            .with_specular(Rgb::one()),
    ));

    // An image passed on the command line replaces the generated checker texture
    let mut textures = TextureCache::new();
    let texture = match env::args().nth(1) {
        Some(path) => textures.open(path)?,
        None => textures.get_or_load("checker", checker)?,
    };

    let mut stars = starfield();
    let floor = Stream::new(Mat4::<f32>::translation_3d(Vec3::new(0.0, -1.0, 0.0)) * Mat4::rotation_x(PI / 2.0))
        .with_primitive(geometry::quad(Vec2::broadcast(12.0), Rgb::broadcast(0.8)))
        .with_texture(texture.clone())
        .with_addressing(AddressingMode::Mirror)
        .with_filter(FilterMode::Linear);
    let mut cube = Stream::default()
        .with_primitives(geometry::cuboid(Vec3::one(), Rgb::one()))
        .with_texture(texture);
    let mut sphere = Stream::new(Mat4::<f32>::translation_3d(Vec3::new(1.5, 0.2, 0.0)))
        .with_primitives(geometry::sphere(0.8, 16, 32, Rgb::new(1.0, 0.6, 0.2)))
        .with_shininess(8.0);
    for v in sphere.primitives.iter_mut().flat_map(|p| p.vertices.iter_mut()) {
        v.specular = Rgb::one();
    }
    let mut cylinder = Stream::default().with_primitives(geometry::cylinder(0.5, 1.5, 24, Rgb::new(0.3, 0.9, 0.4)));

    let mut time = 0.0f32;
    pipeline.begin_loop(&mut surface, true, |pipeline| {
        time += 1.0 / 60.0;
        let view = Mat4::<f32>::translation_3d(Vec3::new(0.0, -0.5, 6.0))
            * Mat4::rotation_x(0.3)
            * Mat4::rotation_y(time * 0.2);
        pipeline.set_view(view);

        // Stars stay fixed relative to the camera
        stars.world = view.inverted();
        cube.world = Mat4::<f32>::translation_3d(Vec3::new(-1.5, 0.0, 0.0))
            * Mat4::rotation_y(time)
            * Mat4::rotation_x(time * 0.7);
        cylinder.world = Mat4::<f32>::translation_3d(Vec3::new(0.0, -0.25, 1.5)) * Mat4::rotation_z(time * 0.5);

        for stream in [&stars, &floor, &cube, &sphere, &cylinder] {
            pipeline.add_stream(stream);
        }

        if pipeline.frame_rate().frames() % 120 == 0 {
            log::info!("{:.1} fps", pipeline.frame_rate().fps());
        }
    });

    Ok(())
}
