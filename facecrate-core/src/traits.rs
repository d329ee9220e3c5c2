//! Bounding boxes and the trait for geometry that has one

use crate::{mesh::*, point::*};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    /// Box around the finite points; non-finite coordinates are skipped so a
    /// partly corrupted buffer still yields a usable box.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3f>) -> Option<Self> {
        let mut bounds: Option<Aabb> = None;
        for p in points.into_iter().filter(|p| is_finite_point(p)) {
            match bounds.as_mut() {
                None => bounds = Some(Aabb { min: *p, max: *p }),
                Some(b) => {
                    b.min.x = b.min.x.min(p.x);
                    b.min.y = b.min.y.min(p.y);
                    b.min.z = b.min.z.min(p.z);

                    b.max.x = b.max.x.max(p.x);
                    b.max.y = b.max.y.max(p.y);
                    b.max.z = b.max.z.max(p.z);
                }
            }
        }
        bounds
    }

    pub fn center(&self) -> Point3f {
        Point3f::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    pub fn extent(&self) -> Vector3f {
        self.max - self.min
    }

    pub fn diagonal(&self) -> f32 {
        self.extent().norm()
    }

    /// True when the box has no extent along any axis (all points coincide).
    pub fn is_degenerate(&self) -> bool {
        self.extent().iter().all(|e| *e <= f32::EPSILON)
    }
}

/// Trait for geometry with a bounding box
pub trait Bounded {
    /// Bounding box of the finite vertex positions, `None` when there are none.
    fn aabb(&self) -> Option<Aabb>;

    /// Get the bounding box of the object as `(min, max)`
    fn bounding_box(&self) -> (Point3f, Point3f) {
        self.aabb()
            .map(|b| (b.min, b.max))
            .unwrap_or((Point3f::origin(), Point3f::origin()))
    }

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        Point3f::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        )
    }
}

impl Bounded for IndexedMesh {
    fn aabb(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }
}
