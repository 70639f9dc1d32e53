use std::fmt;

use crate::geo::{
    arena::{VertexArena, VertexId},
    edge::Edge,
    point::Vertex,
};

/// Cached cost of placing `vertex` into `edge`.
///
/// For an unattached vertex `distance` is the plain insertion increase. For an
/// attached vertex it is the net change of relocating it there, i.e. the
/// insertion increase minus what removing it from its current position saves.
#[derive(Clone, Copy, Debug)]
pub struct InsertionCandidate {
    pub vertex: VertexId,
    pub edge: Edge,
    pub distance: f64,
}

impl InsertionCandidate {
    pub fn new(vertex: VertexId, edge: Edge, distance: f64) -> Self {
        Self {
            vertex,
            edge,
            distance,
        }
    }

    /// Computes the candidate against a vertex whose removal saves
    /// `removal_gain` (zero for unattached vertices).
    pub fn evaluate<V: Vertex>(
        arena: &VertexArena<V>,
        vertex: VertexId,
        edge: Edge,
        removal_gain: f64,
    ) -> Self {
        Self::new(
            vertex,
            edge,
            edge.distance_increase(arena, vertex) - removal_gain,
        )
    }

    pub fn priority(candidate: &Self) -> f64 {
        candidate.distance
    }

    #[inline]
    pub fn has_vertex(&self, vertex: VertexId) -> bool {
        self.vertex == vertex
    }
}

impl fmt::Display for InsertionCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "candidate vertex={} edge={} distance={:.6}",
            self.vertex, self.edge, self.distance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::InsertionCandidate;
    use crate::geo::{
        arena::{VertexArena, VertexId},
        point::Point2d,
    };

    #[test]
    fn evaluate_subtracts_removal_gain() {
        let arena = VertexArena::new(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(6.0, 0.0),
            Point2d::new(3.0, 4.0),
        ]);
        let edge = arena.edge(VertexId(0), VertexId(1));

        let insert = InsertionCandidate::evaluate(&arena, VertexId(2), edge, 0.0);
        let relocate = InsertionCandidate::evaluate(&arena, VertexId(2), edge, 1.5);

        assert!((insert.distance - 4.0).abs() < 1e-12);
        assert!((relocate.distance - 2.5).abs() < 1e-12);
        assert!(insert.has_vertex(VertexId(2)));
        assert!(!insert.has_vertex(VertexId(0)));
    }

    #[test]
    fn display_includes_vertex_edge_and_distance() {
        let candidate = InsertionCandidate::new(
            VertexId(4),
            crate::geo::edge::Edge::new(VertexId(1), VertexId(2), 2.0),
            0.25,
        );
        assert_eq!(
            candidate.to_string(),
            "candidate vertex=v4 edge=v1->v2 len=2.000000 distance=0.250000"
        );
    }
}
