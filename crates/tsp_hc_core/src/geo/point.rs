use std::fmt;

use crate::constants::THRESHOLD;

/// Capability every point type must provide to take part in a circuit.
///
/// Vertices are immutable once handed to a [`VertexArena`](super::arena::VertexArena)
/// and are shared by every clone of a circuit.
pub trait Vertex: fmt::Debug + Send + Sync {
    /// Distance to `other`. Must be non-negative and symmetric.
    fn distance_to(&self, other: &Self) -> f64;

    /// Equality within [`THRESHOLD`], used to drop near-coincident points.
    fn approx_eq(&self, other: &Self) -> bool {
        self.distance_to(other) < THRESHOLD
    }
}

/// Vertices that can be projected onto the plane, required by the convex hull
/// perimeter.
pub trait Planar {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Vertex for Point2d {
    #[inline]
    fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn approx_eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < THRESHOLD && (self.y - other.y).abs() < THRESHOLD
    }
}

impl Planar for Point2d {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl fmt::Display for Point2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(f, "{},{}", b1.format(self.x), b2.format(self.y))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub(crate) fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Vertex for Point3d {
    #[inline]
    fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    fn approx_eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < THRESHOLD
            && (self.y - other.y).abs() < THRESHOLD
            && (self.z - other.z).abs() < THRESHOLD
    }
}

impl fmt::Display for Point3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        let mut b3 = ryu::Buffer::new();
        write!(
            f,
            "{},{},{}",
            b1.format(self.x),
            b2.format(self.y),
            b3.format(self.z)
        )
    }
}
