use std::{
    fmt,
    hash::{Hash, Hasher},
};

use super::{
    arena::{VertexArena, VertexId},
    point::Vertex,
};

/// Directed tour edge `start -> end` with its length cached.
///
/// Equality and hashing only look at the endpoints; the cached length is
/// derived data.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    start: VertexId,
    end: VertexId,
    length: f64,
}

impl Edge {
    pub fn new(start: VertexId, end: VertexId, length: f64) -> Self {
        Self { start, end, length }
    }

    pub fn start(&self) -> VertexId {
        self.start
    }

    pub fn end(&self) -> VertexId {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// True when `vertex` is one of the endpoints.
    #[inline]
    pub fn touches(&self, vertex: VertexId) -> bool {
        self.start == vertex || self.end == vertex
    }

    /// Added tour length when `vertex` is inserted between `start` and `end`.
    #[inline]
    pub fn distance_increase<V: Vertex>(&self, arena: &VertexArena<V>, vertex: VertexId) -> f64 {
        arena.distance(self.start, vertex) + arena.distance(vertex, self.end) - self.length
    }

    pub fn split<V: Vertex>(&self, arena: &VertexArena<V>, vertex: VertexId) -> (Edge, Edge) {
        (arena.edge(self.start, vertex), arena.edge(vertex, self.end))
    }

    /// Joins `self` with the edge that follows it: `self.start -> other.end`.
    pub fn merge<V: Vertex>(&self, arena: &VertexArena<V>, other: &Edge) -> Edge {
        arena.edge(self.start, other.end)
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{} len={:.6}", self.start, self.end, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::Edge;
    use crate::geo::{
        arena::{VertexArena, VertexId},
        point::Point2d,
    };

    fn square() -> VertexArena<Point2d> {
        VertexArena::new(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(4.0, 0.0),
            Point2d::new(4.0, 3.0),
            Point2d::new(2.0, 0.0),
        ])
    }

    #[test]
    fn distance_increase_is_zero_for_collinear_midpoint() {
        let arena = square();
        let edge = arena.edge(VertexId(0), VertexId(1));
        assert!(edge.distance_increase(&arena, VertexId(3)).abs() < 1e-12);
    }

    #[test]
    fn distance_increase_matches_detour_length() {
        let arena = square();
        let edge = arena.edge(VertexId(0), VertexId(1));
        let increase = edge.distance_increase(&arena, VertexId(2));
        assert!((increase - (5.0 + 3.0 - 4.0)).abs() < 1e-12);
    }

    #[test]
    fn split_then_merge_restores_edge() {
        let arena = square();
        let edge = arena.edge(VertexId(0), VertexId(1));
        let (a, b) = edge.split(&arena, VertexId(2));

        assert_eq!(a, Edge::new(VertexId(0), VertexId(2), 0.0));
        assert_eq!(b, Edge::new(VertexId(2), VertexId(1), 0.0));
        assert!((a.length() - 5.0).abs() < 1e-12);

        let merged = a.merge(&arena, &b);
        assert_eq!(merged, edge);
        assert!((merged.length() - edge.length()).abs() < 1e-12);
    }

    #[test]
    fn equality_is_directional_and_ignores_length() {
        let forward = Edge::new(VertexId(1), VertexId(2), 1.0);
        assert_eq!(forward, Edge::new(VertexId(1), VertexId(2), 7.0));
        assert_ne!(forward, Edge::new(VertexId(2), VertexId(1), 1.0));
        assert!(forward.touches(VertexId(2)));
        assert!(!forward.touches(VertexId(3)));
    }
}
