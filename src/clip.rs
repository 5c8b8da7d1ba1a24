//! View-frustum clipping in clip space.
//!
//! Clip space here keeps the view depth in `z`, so every frustum face is a linear half-space in `(x, y, z)`. A
//! triangle is clipped against the faces one after another; only the survivors of a face move on to the next.

use crate::{depth::DepthPlanes, math::Lerp, vertex::Vertex};
use vek::Vec3;

/// A triangle, as three vertices in winding order.
pub type Triangle = [Vertex; 3];

/// One face of the canonical view frustum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClipFace {
    Near,
    Far,
    Left,
    Right,
    Top,
    Bottom,
}

impl ClipFace {
    /// Every face, in the order triangles are clipped against them.
    pub const ALL: [ClipFace; 6] = [
        ClipFace::Near,
        ClipFace::Far,
        ClipFace::Left,
        ClipFace::Right,
        ClipFace::Top,
        ClipFace::Bottom,
    ];

    /// Signed distance-like measure of a clip-space position from this face: non-negative inside.
    #[inline(always)]
    pub fn distance(self, p: Vec3<f32>, planes: &DepthPlanes) -> f32 {
        match self {
            ClipFace::Near => p.z - planes.near,
            ClipFace::Far => planes.far - p.z,
            ClipFace::Left => p.x + p.z,
            ClipFace::Right => p.z - p.x,
            ClipFace::Top => p.z - p.y,
            ClipFace::Bottom => p.y + p.z,
        }
    }

    #[inline(always)]
    pub fn contains(self, p: Vec3<f32>, planes: &DepthPlanes) -> bool {
        self.distance(p, planes) >= 0.0
    }

    /// Place a position that was interpolated onto this face exactly on it.
    #[inline(always)]
    fn snap(self, p: &mut Vec3<f32>, planes: &DepthPlanes) {
        match self {
            ClipFace::Near => p.z = planes.near,
            ClipFace::Far => p.z = planes.far,
            ClipFace::Left => p.x = -p.z,
            ClipFace::Right => p.x = p.z,
            ClipFace::Top => p.y = p.z,
            ClipFace::Bottom => p.y = -p.z,
        }
    }

    /// The vertex where the edge from `inside` to `outside` crosses this face.
    #[inline(always)]
    fn intersect(self, inside: &Vertex, outside: &Vertex, planes: &DepthPlanes) -> Vertex {
        let d_in = self.distance(inside.pos, planes);
        let d_out = self.distance(outside.pos, planes);
        let t = d_in / (d_in - d_out);
        let mut v = Vertex::lerp_unchecked(inside, outside, &t);
        self.snap(&mut v.pos, planes);
        v
    }

    /// Clip a single triangle against this face, pushing 0, 1 or 2 triangles to `out` in the original winding.
    pub fn clip(self, tri: &Triangle, planes: &DepthPlanes, out: &mut Vec<Triangle>) {
        let inside = [
            self.contains(tri[0].pos, planes),
            self.contains(tri[1].pos, planes),
            self.contains(tri[2].pos, planes),
        ];

        match inside.iter().filter(|i| **i).count() {
            3 => out.push(*tri),
            0 => {}
            1 => {
                // Rotate so that the inside vertex comes first; rotation preserves winding
                let i = inside.iter().position(|i| *i).unwrap_or(0);
                let (a, b, c) = (&tri[i], &tri[(i + 1) % 3], &tri[(i + 2) % 3]);
                out.push([
                    *a,
                    self.intersect(a, b, planes),
                    self.intersect(a, c, planes),
                ]);
            }
            _ => {
                // Rotate so that the outside vertex comes first
                let i = inside.iter().position(|i| !*i).unwrap_or(0);
                let (o, b, c) = (&tri[i], &tri[(i + 1) % 3], &tri[(i + 2) % 3]);
                let ob = self.intersect(b, o, planes);
                let co = self.intersect(c, o, planes);
                // The quad (ob, b, c, co), split along the diagonal from ob to c
                out.push([ob, *b, *c]);
                out.push([ob, *c, co]);
            }
        }
    }
}

/// Clips triangles against all 6 frustum faces, reusing its scratch storage between calls.
#[derive(Clone, Debug, Default)]
pub struct Clipper {
    planes: DepthPlanes,
    current: Vec<Triangle>,
    next: Vec<Triangle>,
}

impl Clipper {
    pub fn new(planes: DepthPlanes) -> Self {
        Self {
            planes,
            current: Vec::new(),
            next: Vec::new(),
        }
    }

    pub fn planes(&self) -> DepthPlanes {
        self.planes
    }

    pub fn set_planes(&mut self, planes: DepthPlanes) {
        self.planes = planes;
    }

    /// Clip a clip-space triangle, returning the (possibly empty) set of triangles that lie within the frustum.
    pub fn clip(&mut self, tri: &Triangle) -> &[Triangle] {
        self.current.clear();
        self.current.push(*tri);

        for face in ClipFace::ALL {
            // Fast path: nothing to split against this face
            if self
                .current
                .iter()
                .all(|t| t.iter().all(|v| face.contains(v.pos, &self.planes)))
            {
                continue;
            }

            self.next.clear();
            for t in &self.current {
                face.clip(t, &self.planes, &mut self.next);
            }
            core::mem::swap(&mut self.current, &mut self.next);

            if self.current.is_empty() {
                break;
            }
        }

        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vek::{Rgb, Vec2};

    const EPSILON: f32 = 1e-4;

    fn vert(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(
            Vec3::new(x, y, z),
            Vec3::new(0.0, 0.0, -1.0),
            Rgb::new(x, y, z),
            Rgb::zero(),
            Vec2::new(x, y),
        )
    }

    fn planes() -> DepthPlanes {
        DepthPlanes::new(1.0, 100.0).unwrap()
    }

    /// Signed area of a triangle projected onto the xy plane.
    fn signed_area(t: &Triangle) -> f32 {
        let (a, b, c) = (t[0].pos, t[1].pos, t[2].pos);
        0.5 * ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x))
    }

    #[test]
    fn inside_triangle_is_unchanged() {
        let tri = [vert(-1.0, -1.0, 5.0), vert(1.0, -1.0, 6.0), vert(0.0, 2.0, 7.0)];
        let mut clipper = Clipper::new(planes());
        let out = clipper.clip(&tri);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0], tri);
        for (a, b) in out[0].iter().zip(tri.iter()) {
            assert_eq!(a.pos.map(f32::to_bits), b.pos.map(f32::to_bits));
        }
    }

    #[test]
    fn triangle_outside_any_face_is_discarded() {
        let mut clipper = Clipper::new(planes());
        let cases = [
            // Behind the near plane
            [vert(0.0, 0.0, 0.5), vert(0.1, 0.0, 0.5), vert(0.0, 0.1, 0.2)],
            // Beyond the far plane
            [vert(0.0, 0.0, 101.0), vert(1.0, 0.0, 150.0), vert(0.0, 1.0, 120.0)],
            // Left
            [vert(-20.0, 0.0, 5.0), vert(-10.0, 0.0, 5.0), vert(-15.0, 1.0, 5.0)],
            // Right
            [vert(20.0, 0.0, 5.0), vert(10.0, 0.0, 5.0), vert(15.0, 1.0, 5.0)],
            // Top
            [vert(0.0, 20.0, 5.0), vert(1.0, 10.0, 5.0), vert(-1.0, 15.0, 5.0)],
            // Bottom
            [vert(0.0, -20.0, 5.0), vert(1.0, -10.0, 5.0), vert(-1.0, -15.0, 5.0)],
        ];
        for tri in cases.iter() {
            assert!(clipper.clip(tri).is_empty(), "{:?}", tri);
        }
    }

    #[test]
    fn two_inside_vertices_yield_two_triangles_on_the_plane() {
        // A flat triangle at z = 5 poking out of the left face (x >= -5)
        let tri = [vert(-7.0, 0.0, 5.0), vert(3.0, 0.0, 5.0), vert(3.0, 4.0, 5.0)];
        let mut out = Vec::new();
        ClipFace::Left.clip(&tri, &planes(), &mut out);
        assert_eq!(out.len(), 2);

        let original = signed_area(&tri);
        let total: f32 = out.iter().map(signed_area).sum();
        // Clipped polygon: (-5, 0), (3, 0), (3, 4), (-5, 0.8)
        assert!((total - 19.2).abs() < EPSILON, "{}", total);
        for t in out.iter() {
            // Winding is preserved
            assert!(signed_area(t).signum() == original.signum());
            for v in t.iter() {
                assert!(ClipFace::Left.distance(v.pos, &planes()) >= -EPSILON);
            }
        }

        let new_verts = out
            .iter()
            .flatten()
            .filter(|v| !tri.contains(v))
            .collect::<Vec<_>>();
        assert!(!new_verts.is_empty());
        for v in new_verts {
            assert_eq!(v.pos.x, -v.pos.z);
        }
    }

    #[test]
    fn one_inside_vertex_yields_one_triangle() {
        let tri = [vert(0.0, 0.0, 10.0), vert(0.0, 0.0, -10.0), vert(2.0, 0.0, -10.0)];
        let mut out = Vec::new();
        ClipFace::Near.clip(&tri, &planes(), &mut out);
        assert_eq!(out.len(), 1);
        let [a, b, c] = out[0];
        assert_eq!(a, tri[0]);
        assert_eq!(b.pos.z, 1.0);
        assert_eq!(c.pos.z, 1.0);
        // Attributes are interpolated at the exact crossing (t = 9 / 20)
        assert!((c.pos.x - 0.9).abs() < EPSILON);
        assert!((c.tex.x - 0.9).abs() < EPSILON);
        assert!((b.diffuse.b - 1.0).abs() < EPSILON);
    }

    #[test]
    fn new_vertices_land_exactly_on_each_face() {
        let planes = planes();
        let cases: [(ClipFace, Triangle, fn(Vec3<f32>) -> bool); 4] = [
            (
                ClipFace::Far,
                [vert(0.0, 0.0, 50.0), vert(1.0, 0.0, 150.0), vert(0.0, 1.0, 130.0)],
                |p| p.z == 100.0,
            ),
            (
                ClipFace::Right,
                [vert(0.0, 0.0, 4.0), vert(10.0, 0.0, 6.0), vert(10.0, 1.0, 7.0)],
                |p| p.x == p.z,
            ),
            (
                ClipFace::Top,
                [vert(0.0, 0.0, 4.0), vert(1.0, 10.0, 6.0), vert(0.0, 10.0, 7.0)],
                |p| p.y == p.z,
            ),
            (
                ClipFace::Bottom,
                [vert(0.0, 0.0, 4.0), vert(0.0, -10.0, 6.0), vert(1.0, -10.0, 7.0)],
                |p| p.y == -p.z,
            ),
        ];

        for (face, tri, on_plane) in cases.iter() {
            let mut out = Vec::new();
            face.clip(tri, &planes, &mut out);
            assert_eq!(out.len(), 1, "{:?}", face);
            assert_eq!(out[0][0], tri[0]);
            for v in &out[0][1..] {
                assert!(on_plane(v.pos), "{:?} {:?}", face, v.pos);
                assert!(face.contains(v.pos, &planes), "{:?} {:?}", face, v.pos);
            }
        }
    }

    #[test]
    fn straddling_every_side_stays_within_frustum() {
        let tri = [vert(-30.0, -30.0, 10.0), vert(30.0, -30.0, 10.0), vert(0.0, 40.0, 10.0)];
        let mut clipper = Clipper::new(planes());
        let out = clipper.clip(&tri).to_vec();
        assert!(!out.is_empty());

        // The frustum cross-section at z = 10 is the square [-10, 10]^2, which the triangle fully covers
        let total: f32 = out.iter().map(signed_area).sum();
        assert!((total.abs() - 400.0).abs() < 1e-2, "{}", total);
        for v in out.iter().flatten() {
            for face in ClipFace::ALL {
                assert!(face.distance(v.pos, &planes()) >= -EPSILON, "{:?} {:?}", face, v.pos);
            }
        }
    }

    #[test]
    fn clipper_reuses_storage_between_calls() {
        let mut clipper = Clipper::new(planes());
        let outside = [vert(0.0, 0.0, 0.1), vert(0.1, 0.0, 0.1), vert(0.0, 0.1, 0.1)];
        let inside = [vert(-1.0, -1.0, 5.0), vert(1.0, -1.0, 5.0), vert(0.0, 1.0, 5.0)];
        assert!(clipper.clip(&outside).is_empty());
        assert_eq!(clipper.clip(&inside).len(), 1);
    }
}
