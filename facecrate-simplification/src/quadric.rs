//! Quadric error metrics
//!
//! A quadric accumulates the squared distances to a set of planes as a
//! symmetric 4×4 matrix `Q = Σ p pᵀ` with `p = [a, b, c, d]`. The error of a
//! point `v` is `vᵀ Q v` in homogeneous coordinates.

use facecrate_core::{triangle_normal, Point3f, Vector3f};
use nalgebra::{Matrix4, Vector4};
use std::ops::{Add, AddAssign};

/// Determinant below which the 3×3 system is treated as singular.
const SINGULAR_DET: f64 = 1e-10;

/// Symmetric 4×4 quadric error matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadric(Matrix4<f64>);

impl Default for Quadric {
    fn default() -> Self {
        Self::zero()
    }
}

impl Quadric {
    pub fn zero() -> Self {
        Self(Matrix4::zeros())
    }

    /// Quadric of the plane `ax + by + cz + d = 0`; `(a, b, c)` should be unit length.
    pub fn from_plane(plane: Vector4<f64>) -> Self {
        Self(plane * plane.transpose())
    }

    /// Quadric of a triangle's supporting plane, `None` for degenerate triangles.
    pub fn from_triangle(a: &Point3f, b: &Point3f, c: &Point3f) -> Option<Self> {
        let n = triangle_normal(a, b, c)?;
        Some(Self::from_point_normal(a, &n))
    }

    /// Quadric of the plane through `p` with unit normal `n`.
    pub fn from_point_normal(p: &Point3f, n: &Vector3f) -> Self {
        let n = n.cast::<f64>();
        let d = -n.dot(&p.coords.cast::<f64>());
        Self::from_plane(Vector4::new(n.x, n.y, n.z, d))
    }

    /// Constraint plane through the boundary edge `a`–`b`, perpendicular to
    /// the adjacent face, scaled by `weight`. Keeps open borders from
    /// shrinking inward.
    pub fn boundary_constraint(
        a: &Point3f,
        b: &Point3f,
        face_normal: &Vector3f,
        weight: f64,
    ) -> Option<Self> {
        let edge = b - a;
        let n = edge.cross(face_normal);
        let len = n.norm();
        if !(len > 1e-12) || !len.is_finite() {
            return None;
        }
        Some(Self::from_point_normal(a, &(n / len)) * weight)
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// Squared-distance error of `p`, clamped at zero.
    pub fn error(&self, p: &Point3f) -> f64 {
        let v = Vector4::new(p.x as f64, p.y as f64, p.z as f64, 1.0);
        (v.transpose() * self.0 * v)[0].max(0.0)
    }

    /// Point minimizing the error, solved from the 3×3 normal equations.
    /// `None` when the system is singular or the solution is not finite.
    pub fn optimal_point(&self) -> Option<Point3f> {
        let a = self.0.fixed_view::<3, 3>(0, 0).into_owned();
        if a.determinant().abs() < SINGULAR_DET {
            return None;
        }
        let inv = a.try_inverse()?;
        let p = -inv * self.0.fixed_view::<3, 1>(0, 3);
        let point = Point3f::new(p[0] as f32, p[1] as f32, p[2] as f32);
        point.iter().all(|c| c.is_finite()).then_some(point)
    }

    /// Target position and error for merging the endpoints `a` and `b` of
    /// an edge whose combined quadric is `self`. Falls back to the midpoint.
    pub fn collapse_target(&self, a: &Point3f, b: &Point3f) -> (Point3f, f64) {
        let position = self
            .optimal_point()
            .unwrap_or_else(|| nalgebra::center(a, b));
        (position, self.error(&position))
    }
}

impl Add for Quadric {
    type Output = Quadric;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quadric {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::Mul<f64> for Quadric {
    type Output = Quadric;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}
