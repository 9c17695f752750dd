//! Geometry for mesh rasterization.
//!
//! Everything here works in `f64` model space; meshes are converted once on
//! the way in so that grid-aligned vertices stay exact.

use glam::{DVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Determinant threshold below which a segment counts as parallel to (or
/// behind) a triangle.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Barycentric slack so that rays grazing an edge shared by two triangles hit
/// at least one of them.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Finite line segment used as a rasterizer ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Segment start
    pub start: DVec3,
    /// Segment end
    pub end: DVec3,
}

impl Segment {
    /// Create a new segment
    #[inline]
    pub const fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    /// Unnormalized direction from start to end
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.end - self.start
    }

    /// Point at parameter `t` (0 = start, 1 = end)
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.start + self.direction() * t
    }

    /// The same segment traversed end to start
    #[inline]
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}

/// Axis-Aligned Bounding Box in model space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    #[inline]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest AABB containing all points, or `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::new(first, first);
        for point in iter {
            aabb.expand_to_include(point);
        }
        Some(aabb)
    }

    /// Get the size of the AABB
    #[inline]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Longest edge length
    #[inline]
    pub fn longest_side(&self) -> f64 {
        self.size().max_element()
    }

    /// Check if a point is inside the AABB
    #[inline]
    pub fn contains_point(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Expand AABB to include a point
    #[inline]
    pub fn expand_to_include(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

/// A mesh triangle in model space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: DVec3,
    pub b: DVec3,
    pub c: DVec3,
}

impl Triangle {
    /// Create a triangle from three vertices
    #[inline]
    pub const fn new(a: DVec3, b: DVec3, c: DVec3) -> Self {
        Self { a, b, c }
    }

    /// The three vertices in winding order
    #[inline]
    pub const fn vertices(&self) -> [DVec3; 3] {
        [self.a, self.b, self.c]
    }

    /// Bounding box of the triangle
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            self.a.min(self.b).min(self.c),
            self.a.max(self.b).max(self.c),
        )
    }

    /// Twice the triangle area
    #[inline]
    pub fn double_area(&self) -> f64 {
        (self.b - self.a).cross(self.c - self.a).length()
    }

    /// Returns true if the triangle has (numerically) zero area
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.double_area() <= f64::EPSILON
    }

    /// Uniformly scale about the model origin
    #[inline]
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.a * factor, self.b * factor, self.c * factor)
    }

    /// One-sided segment intersection (Möller-Trumbore).
    ///
    /// Only hits where the segment direction runs against the triangle's
    /// winding normal are reported, so a segment and its reverse together
    /// cover both faces. Returns the hit point.
    pub fn intersect_segment(&self, segment: &Segment) -> Option<DVec3> {
        let dir = segment.direction();
        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;

        let p = dir.cross(edge2);
        let det = edge1.dot(p);
        if det < PARALLEL_EPSILON {
            return None;
        }
        let inv_det = det.recip();

        let s = segment.start - self.a;
        let u = s.dot(p) * inv_det;
        if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = dir.dot(q) * inv_det;
        if v < -EDGE_TOLERANCE || u + v > 1.0 + EDGE_TOLERANCE {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        Some(segment.at(t))
    }
}

impl From<[Vec3; 3]> for Triangle {
    fn from([a, b, c]: [Vec3; 3]) -> Self {
        Self::new(a.as_dvec3(), b.as_dvec3(), c.as_dvec3())
    }
}

impl From<[DVec3; 3]> for Triangle {
    fn from([a, b, c]: [DVec3; 3]) -> Self {
        Self::new(a, b, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Triangle {
        // Counter-clockwise in XY, normal +Z
        Triangle::new(
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(2.0, 0.0, 1.0),
            DVec3::new(0.0, 2.0, 1.0),
        )
    }

    #[test]
    fn segment_at() {
        let seg = Segment::new(DVec3::ZERO, DVec3::new(4.0, 0.0, 0.0));
        assert_eq!(seg.at(0.0), DVec3::ZERO);
        assert_eq!(seg.at(0.25), DVec3::X);
        assert_eq!(seg.reversed().at(0.0), DVec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn intersection_is_one_sided() {
        let tri = unit_triangle();
        let down = Segment::new(DVec3::new(0.5, 0.5, 3.0), DVec3::new(0.5, 0.5, -3.0));

        let hit = tri.intersect_segment(&down).expect("front face hit");
        assert_relative_eq!(hit.x, 0.5);
        assert_relative_eq!(hit.y, 0.5);
        assert_relative_eq!(hit.z, 1.0);

        assert!(tri.intersect_segment(&down.reversed()).is_none());
    }

    #[test]
    fn segment_too_short_misses() {
        let tri = unit_triangle();
        let seg = Segment::new(DVec3::new(0.5, 0.5, 3.0), DVec3::new(0.5, 0.5, 2.0));
        assert!(tri.intersect_segment(&seg).is_none());
        assert!(tri.intersect_segment(&seg.reversed()).is_none());
    }

    #[test]
    fn outside_triangle_misses() {
        let tri = unit_triangle();
        let seg = Segment::new(DVec3::new(1.5, 1.5, 3.0), DVec3::new(1.5, 1.5, -3.0));
        assert!(tri.intersect_segment(&seg).is_none());
    }

    #[test]
    fn parallel_segment_misses() {
        let tri = unit_triangle();
        let seg = Segment::new(DVec3::new(-1.0, 0.5, 1.0), DVec3::new(3.0, 0.5, 1.0));
        assert!(tri.intersect_segment(&seg).is_none());
        assert!(tri.intersect_segment(&seg.reversed()).is_none());
    }

    #[test]
    fn degenerate_triangle() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::X * 2.0);
        assert!(tri.is_degenerate());
        assert!(!unit_triangle().is_degenerate());
        assert_relative_eq!(unit_triangle().double_area(), 4.0);
    }

    #[test]
    fn aabb_from_points() {
        let aabb = Aabb::from_points(unit_triangle().vertices()).expect("non-empty");
        assert_eq!(aabb, unit_triangle().aabb());
        assert_eq!(aabb.min, DVec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(aabb.longest_side(), 2.0);
        assert!(aabb.contains_point(DVec3::new(1.0, 1.0, 1.0)));
        assert!(!aabb.contains_point(DVec3::new(1.0, 1.0, 1.5)));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn scaling_scales_vertices() {
        let tri = unit_triangle().scaled(2.0);
        assert_eq!(tri.b, DVec3::new(4.0, 0.0, 2.0));
    }
}
