use vek::{Mat4, Rgb, Vec2, Vec3, Vec4};

/// Linear interpolation between two values of the same type.
pub trait Lerp<F = f32> {
    fn lerp_unchecked(a: &Self, b: &Self, factor: &F) -> Self;
}

impl Lerp<f32> for f32 {
    #[inline(always)]
    fn lerp_unchecked(a: &Self, b: &Self, factor: &f32) -> Self {
        factor.mul_add(*b - *a, *a)
    }
}

macro_rules! impl_lerp_for_vek {
    ($($t:ident),*) => {
        $(
            impl Lerp<f32> for $t<f32> {
                #[inline(always)]
                fn lerp_unchecked(a: &Self, b: &Self, factor: &f32) -> Self {
                    a.map2(*b, |a, b| f32::lerp_unchecked(&a, &b, factor))
                }
            }
        )*
    };
}

impl_lerp_for_vek!(Vec2, Vec3, Rgb);

/// Clamp every channel of a colour to the displayable `[0, 1]` range.
#[inline(always)]
pub fn saturate(c: Rgb<f32>) -> Rgb<f32> {
    c.map(|e| e.max(0.0).min(1.0))
}

/// Drop the `w` component of a homogeneous vector.
#[inline(always)]
pub fn xyz(v: Vec4<f32>) -> Vec3<f32> {
    Vec3::new(v.x, v.y, v.z)
}

/// Transform a point (w = 1) by the given matrix.
#[inline(always)]
pub fn transform_point(m: &Mat4<f32>, p: Vec3<f32>) -> Vec3<f32> {
    xyz(*m * Vec4::from_point(p))
}

/// Transform a direction (w = 0) by the given matrix, ignoring translation.
#[inline(always)]
pub fn transform_direction(m: &Mat4<f32>, d: Vec3<f32>) -> Vec3<f32> {
    xyz(*m * Vec4::from_direction(d))
}

/// Normalize a vector, leaving zero-length vectors untouched instead of producing NaNs.
#[inline(always)]
pub fn normalized_or_zero(v: Vec3<f32>) -> Vec3<f32> {
    let mag = v.magnitude();
    if mag > 0.0 {
        v / mag
    } else {
        v
    }
}

/// Build a perspective projection for a viewport of the given size and horizontal field of view (in radians).
///
/// The resulting clip space keeps the view depth in `z` (the matrix's `w` row repeats it), so that the frustum faces
/// become `-z <= x <= z`, `-z <= y <= z` and `near <= z <= far`.
pub fn perspective(width: f32, height: f32, horizontal_fov: f32) -> Mat4<f32> {
    let t = 1.0 / (horizontal_fov * 0.5).tan();
    let a = width / height;
    Mat4::from_row_arrays([
        [t, 0.0, 0.0, 0.0],
        [0.0, a * t, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
    ])
}
