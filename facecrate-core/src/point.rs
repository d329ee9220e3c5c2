//! Point and vector types and small geometric helpers

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Unnormalized normal of the triangle `(a, b, c)`; its length is twice the area.
#[inline]
pub fn triangle_cross(a: &Point3f, b: &Point3f, c: &Point3f) -> Vector3f {
    (b - a).cross(&(c - a))
}

/// Area of the triangle `(a, b, c)`.
#[inline]
pub fn triangle_area(a: &Point3f, b: &Point3f, c: &Point3f) -> f32 {
    triangle_cross(a, b, c).norm() * 0.5
}

/// Unit normal of the triangle `(a, b, c)`, or `None` when it has no area.
pub fn triangle_normal(a: &Point3f, b: &Point3f, c: &Point3f) -> Option<Vector3f> {
    let n = triangle_cross(a, b, c);
    let len = n.norm();
    if len > 1e-12 && len.is_finite() {
        Some(n / len)
    } else {
        None
    }
}

/// Centroid of the triangle `(a, b, c)`.
#[inline]
pub fn triangle_centroid(a: &Point3f, b: &Point3f, c: &Point3f) -> Point3f {
    Point3f::from((a.coords + b.coords + c.coords) / 3.0)
}

/// Whether every coordinate of the point is finite.
#[inline]
pub fn is_finite_point(p: &Point3f) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}
