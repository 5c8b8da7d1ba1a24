use super::*;
use crate::{buffer::FrameBuffer, depth::DepthBuffer, interpolate::Interpolants, math::saturate};
use core::cmp::Ordering;
use vek::{Rgb, Vec2};

/// What happened to a triangle handed to [`Rasterizer::draw_triangle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TriangleOutcome {
    /// The triangle was scan converted (possibly covering no pixel centres).
    Drawn,
    /// The triangle faces away from the viewer.
    Culled,
    /// The triangle has no area or no height, or its coordinates are not finite.
    Degenerate,
}

/// Walks one edge of a triangle from its upper vertex to its lower vertex, one scanline at a time.
#[derive(Copy, Clone, Debug)]
struct Edge {
    origin: Vec2<f32>,
    dx: f32,
    attr: Interpolants,
    step: Interpolants,
}

impl Edge {
    /// Set up a walker from `a` to `b` (with `a.y <= b.y`), with its attributes prestepped to scanline `y`.
    #[inline(always)]
    fn new(a: (&Vertex, Interpolants), b: (&Vertex, Interpolants), y: f32) -> Self {
        let height = b.0.pos.y - a.0.pos.y;
        let inv_height = if height > 0.0 { 1.0 / height } else { 0.0 };
        let step = (b.1 - a.1) * inv_height;
        Self {
            origin: Vec2::new(a.0.pos.x, a.0.pos.y),
            dx: (b.0.pos.x - a.0.pos.x) * inv_height,
            attr: a.1 + step * (y - a.0.pos.y),
            step,
        }
    }

    /// The edge's x coordinate on scanline `y`.
    ///
    /// This is derived from the edge's endpoints alone, so two triangles sharing an edge always agree on it.
    #[inline(always)]
    fn x_at(&self, y: f32) -> f32 {
        self.origin.x + self.dx * (y - self.origin.y)
    }

    #[inline(always)]
    fn advance(&mut self) {
        self.attr += self.step;
    }
}

impl Rasterizer {
    /// Scan convert a screen-space triangle.
    ///
    /// Vertex positions must be in pixel coordinates with `pos.z` holding `1 / depth`, and texture coordinates must be
    /// premultiplied by `1 / depth` (see [`Viewport::to_screen`]). A pixel is covered when its integer coordinate lies
    /// on or right of the left edge and strictly left of the right edge (and likewise top/bottom), so triangles that
    /// share an edge never overlap or leave gaps along it.
    pub fn draw_triangle(
        &self,
        tri: &[Vertex; 3],
        state: &DrawState,
        color: &mut FrameBuffer,
        depth: &mut DepthBuffer,
    ) -> TriangleOutcome {
        let area = signed_area(tri);
        if !area.is_finite() || area == 0.0 {
            return TriangleOutcome::Degenerate;
        }
        if !self.front_face.is_front(area) {
            return TriangleOutcome::Culled;
        }

        let tex_scale = state.texture.map_or(Vec2::zero(), |t| {
            Vec2::new(t.width() as f32, t.height() as f32)
        });

        let mut sorted = [&tri[0], &tri[1], &tri[2]];
        sorted.sort_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal));
        let [top, mid, bot] = sorted;
        if !(bot.pos.y - top.pos.y > 0.0) {
            return TriangleOutcome::Degenerate;
        }

        let top = (top, Interpolants::from_vertex(top, tex_scale));
        let mid = (mid, Interpolants::from_vertex(mid, tex_scale));
        let bot = (bot, Interpolants::from_vertex(bot, tex_scale));

        // Is the middle vertex left of the long top-to-bottom edge?
        let mid_is_left = (mid.0.pos.x - top.0.pos.x) * (bot.0.pos.y - top.0.pos.y)
            - (mid.0.pos.y - top.0.pos.y) * (bot.0.pos.x - top.0.pos.x)
            < 0.0;

        let height = color.height().min(depth.size()[1]) as f32;
        let y_top = top.0.pos.y.ceil().max(0.0);
        let y_mid = mid.0.pos.y.ceil().max(0.0);
        let y_bot = bot.0.pos.y.ceil().max(0.0);

        let mut long = Edge::new(top, bot, y_top);

        // Upper half: top -> mid
        let mut short = Edge::new(top, mid, y_top);
        self.fill_half(&mut long, &mut short, mid_is_left, y_top, y_mid.min(height), state, color, depth);

        // Lower half: mid -> bot
        let mut short = Edge::new(mid, bot, y_mid);
        self.fill_half(&mut long, &mut short, mid_is_left, y_mid, y_bot.min(height), state, color, depth);

        TriangleOutcome::Drawn
    }

    #[allow(clippy::too_many_arguments)]
    #[inline(always)]
    fn fill_half(
        &self,
        long: &mut Edge,
        short: &mut Edge,
        short_is_left: bool,
        y_start: f32,
        y_end: f32,
        state: &DrawState,
        color: &mut FrameBuffer,
        depth: &mut DepthBuffer,
    ) {
        let mut y = y_start;
        while y < y_end {
            let (left, right) = if short_is_left {
                (&*short, &*long)
            } else {
                (&*long, &*short)
            };
            draw_span(y as usize, y, left, right, state, color, depth);
            long.advance();
            short.advance();
            y += 1.0;
        }
    }
}

#[inline(always)]
fn draw_span(
    y: usize,
    y_f: f32,
    left: &Edge,
    right: &Edge,
    state: &DrawState,
    color: &mut FrameBuffer,
    depth: &mut DepthBuffer,
) {
    let (xl, xr) = (left.x_at(y_f), right.x_at(y_f));
    let width = xr - xl;
    if !(width > 0.0) {
        return;
    }

    let step = (right.attr - left.attr) * (1.0 / width);
    let x_start = xl.ceil().max(0.0);
    let x_end = xr.ceil().min(color.width().min(depth.size()[0]) as f32);
    if !(x_start < x_end) {
        return;
    }

    // Offset by the distance to the first covered pixel to keep sub-pixel accuracy
    let mut attr = left.attr + step * (x_start - xl);
    let (x_start, x_end) = (x_start as usize, x_end as usize);
    if !depth.set_index(x_start, y) {
        return;
    }

    let row = color.linear_index([0, y]);
    let pixels = color.raw_mut();
    for x in x_start..x_end {
        let z = 1.0 / attr.inv_z;
        if depth.test_and_advance(z) {
            let texel = match state.texture {
                Some(texture) => texture.sample(attr.tex_coord(z), state.addressing, state.filter),
                None => Rgb::one(),
            };
            let c = saturate(texel * attr.diffuse + attr.specular).map(to_channel);
            if let Some(px) = pixels.get_mut(row + x) {
                *px = [c.r, c.g, c.b, 255];
            }
        }
        attr += step;
    }
}

#[inline(always)]
fn to_channel(e: f32) -> u8 {
    (e * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::DepthPlanes;
    use vek::Vec3;

    const W: usize = 16;
    const H: usize = 12;
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn targets() -> (FrameBuffer, DepthBuffer) {
        (
            FrameBuffer::fill([W, H], CLEAR),
            DepthBuffer::new([W, H], DepthPlanes::new(0.5, 100.0).unwrap()),
        )
    }

    /// A screen-space vertex at depth 1 with the given colour.
    fn screen(x: f32, y: f32, diffuse: Rgb<f32>) -> Vertex {
        Vertex::new(Vec3::new(x, y, 1.0), Vec3::zero(), diffuse, Rgb::zero(), Vec2::zero())
    }

    fn covered(color: &FrameBuffer) -> Vec<bool> {
        color.raw().iter().map(|px| *px != CLEAR).collect()
    }

    #[test]
    fn back_faces_are_culled() {
        let (mut color, mut depth) = targets();
        let cw = [screen(1.0, 1.0, Rgb::one()), screen(8.0, 1.0, Rgb::one()), screen(1.0, 8.0, Rgb::one())];
        let ccw = [cw[0], cw[2], cw[1]];
        let raster = Rasterizer::new(FrontFace::Clockwise);
        assert_eq!(raster.draw_triangle(&ccw, &DrawState::default(), &mut color, &mut depth), TriangleOutcome::Culled);
        assert!(color.raw().iter().all(|px| *px == CLEAR));
        assert_eq!(raster.draw_triangle(&cw, &DrawState::default(), &mut color, &mut depth), TriangleOutcome::Drawn);

        let raster = Rasterizer::new(FrontFace::CounterClockwise);
        assert_eq!(raster.draw_triangle(&cw, &DrawState::default(), &mut color, &mut depth), TriangleOutcome::Culled);
    }

    #[test]
    fn degenerate_triangles_draw_nothing() {
        let (mut color, mut depth) = targets();
        let raster = Rasterizer::default();
        let line = [screen(1.0, 1.0, Rgb::one()), screen(5.0, 5.0, Rgb::one()), screen(9.0, 9.0, Rgb::one())];
        let nan = [screen(f32::NAN, 1.0, Rgb::one()), screen(5.0, 5.0, Rgb::one()), screen(1.0, 9.0, Rgb::one())];
        let state = DrawState::default();
        assert_eq!(raster.draw_triangle(&line, &state, &mut color, &mut depth), TriangleOutcome::Degenerate);
        assert_eq!(raster.draw_triangle(&nan, &state, &mut color, &mut depth), TriangleOutcome::Degenerate);
        assert!(color.raw().iter().all(|px| *px == CLEAR));
    }

    #[test]
    fn fills_exactly_the_covered_pixel_grid() {
        let (mut color, mut depth) = targets();
        // Right triangle with legs along x = 2 and y = 2
        let tri = [screen(2.0, 2.0, Rgb::one()), screen(10.0, 2.0, Rgb::one()), screen(2.0, 10.0, Rgb::one())];
        Rasterizer::default().draw_triangle(&tri, &DrawState::default(), &mut color, &mut depth);
        for y in 0..H {
            for x in 0..W {
                // Pixel (x, y) is covered when x >= 2, y >= 2 and x < 2 + (10 - y)
                let inside = x >= 2 && y >= 2 && y < 10 && x < 12 - y;
                assert_eq!(color.read([x, y]) != CLEAR, inside, "({}, {})", x, y);
            }
        }
        assert_eq!(color.read([2, 2]), [255, 255, 255, 255]);
    }

    #[test]
    fn shared_edges_have_no_gaps_or_overlaps() {
        let (mut first, mut depth_a) = targets();
        let (mut second, mut depth_b) = targets();
        let raster = Rasterizer::default();
        let (tl, tr) = (screen(2.0, 2.0, Rgb::one()), screen(13.0, 1.5, Rgb::one()));
        let (br, bl) = (screen(14.5, 10.0, Rgb::one()), screen(1.25, 9.5, Rgb::one()));

        let state = DrawState::default();
        assert_eq!(raster.draw_triangle(&[tl, tr, br], &state, &mut first, &mut depth_a), TriangleOutcome::Drawn);
        assert_eq!(raster.draw_triangle(&[tl, br, bl], &state, &mut second, &mut depth_b), TriangleOutcome::Drawn);

        let (a, b) = (covered(&first), covered(&second));
        assert!(a.iter().zip(b.iter()).all(|(a, b)| !(*a && *b)), "triangles overlap");

        // Every pixel along the diagonal's scanlines lies in exactly one triangle when it lies inside the quad
        for y in 2..10 {
            let row = y * W;
            let covered_xs = (0..W).filter(|x| a[row + x] || b[row + x]).collect::<Vec<_>>();
            assert!(!covered_xs.is_empty());
            let (lo, hi) = (covered_xs[0], covered_xs[covered_xs.len() - 1]);
            assert_eq!(covered_xs.len(), hi - lo + 1, "gap on row {}", y);
        }
    }

    #[test]
    fn depth_test_keeps_nearer_pixels() {
        let (mut color, mut depth) = targets();
        let raster = Rasterizer::default();
        let at_depth = |d: f32, c: Rgb<f32>| {
            let mut tri = [screen(0.0, 0.0, c), screen(8.0, 0.0, c), screen(0.0, 8.0, c)];
            tri.iter_mut().for_each(|v| v.pos.z = 1.0 / d);
            tri
        };
        let state = DrawState::default();
        raster.draw_triangle(&at_depth(2.0, Rgb::new(1.0, 0.0, 0.0)), &state, &mut color, &mut depth);
        raster.draw_triangle(&at_depth(4.0, Rgb::new(0.0, 1.0, 0.0)), &state, &mut color, &mut depth);
        assert_eq!(color.read([1, 1]), [255, 0, 0, 255]);
        assert_eq!(depth.get(1, 1), Some(depth.quantize(2.0)));

        raster.draw_triangle(&at_depth(1.0, Rgb::new(0.0, 0.0, 1.0)), &state, &mut color, &mut depth);
        assert_eq!(color.read([1, 1]), [0, 0, 255, 255]);
    }

    #[test]
    fn specular_is_added_after_modulation() {
        let (mut color, mut depth) = targets();
        let mut tri = [
            screen(0.0, 0.0, Rgb::new(0.5, 0.0, 0.0)),
            screen(8.0, 0.0, Rgb::new(0.5, 0.0, 0.0)),
            screen(0.0, 8.0, Rgb::new(0.5, 0.0, 0.0)),
        ];
        tri.iter_mut().for_each(|v| v.specular = Rgb::new(0.75, 0.0, 0.25));
        let texture = Texture::solid([2, 2], Rgb::new(1.0, 1.0, 0.0)).unwrap();
        let state = DrawState {
            texture: Some(&texture),
            ..DrawState::default()
        };
        Rasterizer::default().draw_triangle(&tri, &state, &mut color, &mut depth);
        // 1.0 * 0.5 + 0.75 saturates; 0 * 0 + 0.25
        assert_eq!(color.read([1, 1]), [255, 0, 64, 255]);
    }

    #[test]
    fn offscreen_parts_are_clipped_to_the_buffer() {
        let (mut color, mut depth) = targets();
        let tri = [screen(-40.0, -30.0, Rgb::one()), screen(60.0, -30.0, Rgb::one()), screen(5.0, 50.0, Rgb::one())];
        let outcome = Rasterizer::default().draw_triangle(&tri, &DrawState::default(), &mut color, &mut depth);
        assert_eq!(outcome, TriangleOutcome::Drawn);
        assert!(color.raw().iter().all(|px| *px == [255, 255, 255, 255]));
    }

    #[test]
    fn texture_coordinates_are_perspective_correct() {
        // A 256-texel gradient whose red channel encodes the texel index
        let texture = Texture::from_fn([256, 1], |x, _| Rgb::new(x as f32 / 255.0, 0.0, 0.0)).unwrap();
        let state = DrawState {
            texture: Some(&texture),
            ..DrawState::default()
        };
        let mut color = FrameBuffer::fill([256, 64], CLEAR);
        let mut depth = DepthBuffer::new([256, 64], DepthPlanes::new(0.5, 100.0).unwrap());

        // a is at depth 1 with u = 0; b is at depth 4 with u = 200 texels
        let mut a = screen(0.0, 0.0, Rgb::one());
        let mut b = screen(200.0, 0.0, Rgb::one());
        let c = screen(0.0, 50.0, Rgb::one());
        a.pos.z = 1.0;
        b.pos.z = 0.25;
        b.tex = Vec2::new(200.0 / 256.0, 0.0) * b.pos.z;
        a.tex = Vec2::zero();

        Rasterizer::default().draw_triangle(&[a, b, c], &state, &mut color, &mut depth);

        // Halfway across the screen, 1/z = 0.625, so the true depth is 1.6 and the view-space
        // parameter along a-b is (1.6 - 1) / (4 - 1) = 0.2, i.e. u = 40 (naive screen-space lerp would say 100)
        let sampled = color.read([100, 0])[0] as i32;
        assert!((sampled - 40).abs() <= 1, "sampled texel {}", sampled);
    }
}
