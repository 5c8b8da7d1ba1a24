//! Generators for simple shapes, centred on the origin.
//!
//! Every generated triangle is wound clockwise when seen from outside the shape, matching the default
//! [`FrontFace`](crate::rasterizer::FrontFace), and every vertex carries an outward unit normal.

use crate::{primitives::Primitive, vertex::Vertex};
use core::f32::consts::PI;
use vek::{Rgb, Vec2, Vec3};

/// A flat rectangle spanned by `right` and `up` around `center`, facing along `normal`.
fn face(center: Vec3<f32>, right: Vec3<f32>, up: Vec3<f32>, normal: Vec3<f32>, diffuse: Rgb<f32>) -> Primitive {
    let vert = |pos, tex| Vertex::new(pos, normal, diffuse, Rgb::zero(), tex);
    Primitive::fan(vec![
        vert(center - right + up, Vec2::new(0.0, 0.0)),
        vert(center + right + up, Vec2::new(1.0, 0.0)),
        vert(center + right - up, Vec2::new(1.0, 1.0)),
        vert(center - right - up, Vec2::new(0.0, 1.0)),
    ])
}

/// A rectangle in the xy plane facing -z, towards a camera at the origin looking down +z.
pub fn quad(size: Vec2<f32>, diffuse: Rgb<f32>) -> Primitive {
    let half = size * 0.5;
    face(
        Vec3::zero(),
        Vec3::unit_x() * half.x,
        Vec3::unit_y() * half.y,
        -Vec3::unit_z(),
        diffuse,
    )
}

/// An axis-aligned box, one fan per face.
pub fn cuboid(size: Vec3<f32>, diffuse: Rgb<f32>) -> Vec<Primitive> {
    let h = size * 0.5;
    let (x, y, z) = (Vec3::unit_x(), Vec3::unit_y(), Vec3::unit_z());
    // (normal, right, up), with right x up pointing into the box
    [
        (-z * h.z, x * h.x, y * h.y),
        (z * h.z, -x * h.x, y * h.y),
        (x * h.x, z * h.z, y * h.y),
        (-x * h.x, -z * h.z, y * h.y),
        (y * h.y, x * h.x, z * h.z),
        (-y * h.y, x * h.x, -z * h.z),
    ]
    .iter()
    .map(|&(center, right, up)| face(center, right, up, center.normalized(), diffuse))
    .collect()
}

/// Point on a unit circle in the xz plane.
fn around(phi: f32) -> Vec3<f32> {
    Vec3::new(phi.cos(), 0.0, phi.sin())
}

/// A UV sphere made of one strip per band of latitude. The bands touching the poles collapse to a single point at
/// one end.
pub fn sphere(radius: f32, bands: usize, segments: usize, diffuse: Rgb<f32>) -> Vec<Primitive> {
    let (bands, segments) = (bands.max(2), segments.max(3));
    let point = |band: usize, segment: usize| {
        let theta = PI * band as f32 / bands as f32;
        let phi = 2.0 * PI * segment as f32 / segments as f32;
        let normal = around(phi) * theta.sin() + Vec3::unit_y() * theta.cos();
        let tex = Vec2::new(segment as f32 / segments as f32, band as f32 / bands as f32);
        Vertex::new(normal * radius, normal, diffuse, Rgb::zero(), tex)
    };

    (0..bands)
        .map(|band| {
            Primitive::strip(
                (0..=segments)
                    .flat_map(|segment| [point(band + 1, segment), point(band, segment)])
                    .collect(),
            )
        })
        .collect()
}

/// A capped cylinder standing on the y axis: a strip around the side and a fan for each cap.
pub fn cylinder(radius: f32, height: f32, segments: usize, diffuse: Rgb<f32>) -> Vec<Primitive> {
    let segments = segments.max(3);
    let half = height * 0.5;
    let phi = |segment: usize| 2.0 * PI * segment as f32 / segments as f32;
    let vert = |pos, normal, tex| Vertex::new(pos, normal, diffuse, Rgb::zero(), tex);

    let side = (0..=segments)
        .flat_map(|segment| {
            let normal = around(phi(segment));
            let u = segment as f32 / segments as f32;
            [
                vert(normal * radius - Vec3::unit_y() * half, normal, Vec2::new(u, 1.0)),
                vert(normal * radius + Vec3::unit_y() * half, normal, Vec2::new(u, 0.0)),
            ]
        })
        .collect();

    let cap = |y: f32, normal: Vec3<f32>, order: &mut dyn Iterator<Item = usize>| {
        let center = vert(Vec3::unit_y() * y, normal, Vec2::broadcast(0.5));
        let rim = order.map(|segment| {
            let dir = around(phi(segment));
            vert(dir * radius + Vec3::unit_y() * y, normal, Vec2::new(dir.x, dir.z) * 0.5 + 0.5)
        });
        Primitive::fan(core::iter::once(center).chain(rim).collect())
    };

    vec![
        Primitive::strip(side),
        cap(half, Vec3::unit_y(), &mut (0..=segments).rev()),
        cap(-half, -Vec3::unit_y(), &mut (0..=segments)),
    ]
}
