use crate::{sampling::random_in_unit_sphere, types::PointIndex};
use glam::Vec3;
use rand::Rng;

/// A simulated point mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub pos: Vec3,
    pub prev_pos: Vec3,
    /// Pinned points are skipped by integration and never receive a
    /// constraint correction; only [`PointStore::pin`] moves them.
    pub pinned: bool,
}

impl Point {
    /// A free point at rest at `pos`.
    pub fn at_rest(pos: Vec3) -> Self {
        Self {
            pos,
            prev_pos: pos,
            pinned: false,
        }
    }
}

/// Rest-length relation between two points. Undirected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceConstraint {
    pub a: PointIndex,
    pub b: PointIndex,
    pub rest_length: f32,
}

/// Flat arena of points and the constraints between them.
///
/// Indices handed out by [`PointStore::allocate`] are permanent. Every
/// stored constraint references two distinct, valid indices.
#[derive(Debug, Default, Clone)]
pub struct PointStore {
    pub points: Vec<Point>,
    pub constraints: Vec<DistanceConstraint>,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends `count` free points sampled inside the unit sphere and
    /// returns the index of the first one.
    pub fn allocate(&mut self, count: usize, rng: &mut impl Rng) -> PointIndex {
        let start = self.points.len();
        self.points.reserve(count);
        for _ in 0..count {
            self.points.push(Point::at_rest(random_in_unit_sphere(rng)));
        }
        start
    }

    /// Adds a constraint between two existing points.
    ///
    /// ### Panics
    /// Panics if either index is out of range or `a == b`.
    pub fn add_constraint(&mut self, a: PointIndex, b: PointIndex, rest_length: f32) {
        let n = self.points.len();
        assert!(
            a < n && b < n,
            "constraint ({a}, {b}) references a point outside 0..{n}"
        );
        assert_ne!(a, b, "constraint endpoints must differ");
        self.constraints.push(DistanceConstraint { a, b, rest_length });
    }

    /// Connects `count` consecutive points starting at `start` with links
    /// of length `spacing`.
    pub fn add_chain(&mut self, start: PointIndex, count: usize, spacing: f32) {
        for i in 1..count {
            self.add_constraint(start + i - 1, start + i, spacing);
        }
    }

    /// Pins a point at `pos`. Idempotent.
    ///
    /// The previous position is reset as well, so the point carries no
    /// velocity if it is later released.
    ///
    /// ### Panics
    /// Panics if `index` is out of range.
    pub fn pin(&mut self, index: PointIndex, pos: Vec3) {
        let n = self.points.len();
        assert!(index < n, "pin index {index} outside 0..{n}");
        self.points[index] = Point {
            pos,
            prev_pos: pos,
            pinned: true,
        };
    }

    /// Releases a pinned point; its position is left untouched.
    ///
    /// ### Panics
    /// Panics if `index` is out of range.
    pub fn unpin(&mut self, index: PointIndex) {
        let n = self.points.len();
        assert!(index < n, "unpin index {index} outside 0..{n}");
        self.points[index].pinned = false;
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.points.iter().map(|p| p.pos).collect()
    }

    /// Sum of squared differences between current and rest lengths.
    pub fn constraint_error(&self) -> f32 {
        self.constraints
            .iter()
            .map(|c| {
                let d = self.points[c.a].pos.distance(self.points[c.b].pos) - c.rest_length;
                d * d
            })
            .sum()
    }
}
