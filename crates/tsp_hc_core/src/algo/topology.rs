//! Edge-list operations over a single closed tour.
//!
//! Every function mutates the caller's `Vec<Edge>` in place. Circuits own their
//! edge list exclusively and copy it when they fork, so no storage is ever
//! shared between clones. Invalid requests (missing edge or vertex, too few
//! edges) return `None` and leave the list untouched.

use std::collections::HashSet;

use crate::geo::{
    arena::{VertexArena, VertexId},
    edge::Edge,
    point::Vertex,
};

const MIN_MERGE_EDGES: usize = 2;

/// Edges touched when a vertex is removed from the tour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Merge {
    /// Edge that ended at the removed vertex.
    pub detached_a: Edge,
    /// Edge that started at the removed vertex.
    pub detached_b: Edge,
    pub merged: Edge,
    /// Position of `merged` in the updated list.
    pub index: usize,
}

/// Edges touched when a vertex is relocated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Move {
    pub detached_a: Edge,
    pub detached_b: Edge,
    pub merged: Edge,
    pub split_a: Edge,
    pub split_b: Edge,
}

pub fn index_of_edge(edges: &[Edge], target: &Edge) -> Option<usize> {
    edges.iter().position(|edge| edge == target)
}

/// Replaces `edge_to_split` with `start -> vertex -> end` at the same position
/// and returns the index of the first half.
pub fn split_edge<V: Vertex>(
    edges: &mut Vec<Edge>,
    arena: &VertexArena<V>,
    edge_to_split: &Edge,
    vertex: VertexId,
) -> Option<usize> {
    let idx = index_of_edge(edges, edge_to_split)?;
    let (a, b) = edges[idx].split(arena, vertex);
    edges[idx] = a;
    edges.insert(idx + 1, b);
    Some(idx)
}

/// Removes `vertex` from the tour by merging the edge ending at it with the
/// edge starting at it.
pub fn merge_edges_by_vertex<V: Vertex>(
    edges: &mut Vec<Edge>,
    arena: &VertexArena<V>,
    vertex: VertexId,
) -> Option<Merge> {
    let n = edges.len();
    if n < MIN_MERGE_EDGES {
        return None;
    }
    let next_idx = edges.iter().position(|edge| edge.start() == vertex)?;
    let prev_idx = (next_idx + n - 1) % n;

    let detached_a = edges[prev_idx];
    let detached_b = edges[next_idx];
    let merged = detached_a.merge(arena, &detached_b);

    edges[prev_idx] = merged;
    edges.remove(next_idx);
    let index = if next_idx == 0 { prev_idx - 1 } else { prev_idx };

    Some(Merge {
        detached_a,
        detached_b,
        merged,
        index,
    })
}

/// Relocates `vertex` into `destination` in one rebuild of the list.
///
/// The vertex's neighbours are joined where it used to be and `destination`
/// is split around it. Destinations incident to the vertex are rejected; any
/// other edge, including ones adjacent to its neighbours or across the
/// index-0 wrap, yields a well formed cycle.
pub fn move_vertex<V: Vertex>(
    edges: &mut Vec<Edge>,
    arena: &VertexArena<V>,
    vertex: VertexId,
    destination: &Edge,
) -> Option<Move> {
    let n = edges.len();
    if n < MIN_MERGE_EDGES || destination.touches(vertex) {
        return None;
    }

    let mut next_idx = None;
    let mut dest_idx = None;
    for (idx, edge) in edges.iter().enumerate() {
        if edge.start() == vertex {
            next_idx = Some(idx);
        }
        if edge == destination {
            dest_idx = Some(idx);
        }
    }
    let (next_idx, dest_idx) = (next_idx?, dest_idx?);
    let prev_idx = (next_idx + n - 1) % n;

    let detached_a = edges[prev_idx];
    let detached_b = edges[next_idx];
    let merged = detached_a.merge(arena, &detached_b);
    let (split_a, split_b) = edges[dest_idx].split(arena, vertex);

    let mut updated = Vec::with_capacity(n);
    for (idx, edge) in edges.iter().enumerate() {
        if idx == prev_idx {
            updated.push(merged);
        } else if idx == next_idx {
            continue;
        } else if idx == dest_idx {
            updated.push(split_a);
            updated.push(split_b);
        } else {
            updated.push(*edge);
        }
    }
    *edges = updated;

    Some(Move {
        detached_a,
        detached_b,
        merged,
        split_a,
        split_b,
    })
}

/// Adjacency holds across the whole list (including the wrap) and no vertex
/// starts two edges.
pub fn is_cycle(edges: &[Edge]) -> bool {
    let n = edges.len();
    if n == 0 {
        return false;
    }
    let mut starts = HashSet::with_capacity(n);
    (0..n).all(|i| edges[i].end() == edges[(i + 1) % n].start() && starts.insert(edges[i].start()))
}

pub fn tour_length(edges: &[Edge]) -> f64 {
    edges.iter().map(Edge::length).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::point::Point2d;

    fn arena() -> VertexArena<Point2d> {
        VertexArena::new(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(4.0, 0.0),
            Point2d::new(6.0, 3.0),
            Point2d::new(4.0, 6.0),
            Point2d::new(0.0, 6.0),
            Point2d::new(-2.0, 3.0),
            Point2d::new(2.0, 2.0),
        ])
    }

    fn cycle(arena: &VertexArena<Point2d>, order: &[usize]) -> Vec<Edge> {
        let n = order.len();
        (0..n)
            .map(|i| arena.edge(VertexId(order[i]), VertexId(order[(i + 1) % n])))
            .collect()
    }

    fn starts(edges: &[Edge]) -> Vec<usize> {
        edges.iter().map(|e| e.start().0).collect()
    }

    fn assert_consistent(edges: &[Edge], arena: &VertexArena<Point2d>) {
        assert!(is_cycle(edges), "broken cycle: {edges:?}");
        let recomputed: f64 = edges
            .iter()
            .map(|e| arena.distance(e.start(), e.end()))
            .sum();
        assert!((tour_length(edges) - recomputed).abs() < 1e-9);
    }

    #[test]
    fn index_of_edge_uses_endpoint_identity() {
        let arena = arena();
        let edges = cycle(&arena, &[0, 1, 2]);

        assert_eq!(index_of_edge(&edges, &arena.edge(VertexId(1), VertexId(2))), Some(1));
        assert_eq!(index_of_edge(&edges, &arena.edge(VertexId(2), VertexId(1))), None);
    }

    #[test]
    fn split_edge_inserts_in_place_preserving_order() {
        let arena = arena();
        let mut edges = cycle(&arena, &[0, 1, 2, 3]);

        let idx = split_edge(&mut edges, &arena, &arena.edge(VertexId(3), VertexId(0)), VertexId(6));

        assert_eq!(idx, Some(3));
        assert_eq!(starts(&edges), vec![0, 1, 2, 3, 6]);
        assert_consistent(&edges, &arena);
    }

    #[test]
    fn split_edge_leaves_list_untouched_when_edge_missing() {
        let arena = arena();
        let mut edges = cycle(&arena, &[0, 1, 2, 3]);
        let before = edges.clone();

        let idx = split_edge(&mut edges, &arena, &arena.edge(VertexId(0), VertexId(2)), VertexId(6));

        assert_eq!(idx, None);
        assert_eq!(edges, before);
    }

    #[test]
    fn merge_edges_by_vertex_joins_neighbours() {
        let arena = arena();
        let mut edges = cycle(&arena, &[0, 1, 2, 3]);

        let merge = merge_edges_by_vertex(&mut edges, &arena, VertexId(2)).expect("merge");

        assert_eq!(merge.detached_a, arena.edge(VertexId(1), VertexId(2)));
        assert_eq!(merge.detached_b, arena.edge(VertexId(2), VertexId(3)));
        assert_eq!(merge.merged, arena.edge(VertexId(1), VertexId(3)));
        assert_eq!(edges[merge.index], merge.merged);
        assert_eq!(starts(&edges), vec![0, 1, 3]);
        assert_consistent(&edges, &arena);
    }

    #[test]
    fn merge_edges_by_vertex_handles_index_zero_wraparound() {
        let arena = arena();
        let mut edges = cycle(&arena, &[0, 1, 2, 3]);

        let merge = merge_edges_by_vertex(&mut edges, &arena, VertexId(0)).expect("merge");

        assert_eq!(merge.merged, arena.edge(VertexId(3), VertexId(1)));
        assert_eq!(edges[merge.index], merge.merged);
        assert_eq!(starts(&edges), vec![1, 2, 3]);
        assert_consistent(&edges, &arena);
    }

    #[test]
    fn merge_edges_by_vertex_rejects_missing_vertex_and_tiny_lists() {
        let arena = arena();
        let mut edges = cycle(&arena, &[0, 1, 2]);
        let before = edges.clone();
        assert!(merge_edges_by_vertex(&mut edges, &arena, VertexId(5)).is_none());
        assert_eq!(edges, before);

        let mut single = vec![arena.edge(VertexId(0), VertexId(0))];
        assert!(merge_edges_by_vertex(&mut single, &arena, VertexId(0)).is_none());
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn split_then_merge_round_trip_restores_edges() {
        let arena = arena();
        let original = cycle(&arena, &[0, 1, 2, 3, 4, 5]);

        for target in original.clone() {
            let mut edges = original.clone();
            split_edge(&mut edges, &arena, &target, VertexId(6)).expect("split");
            merge_edges_by_vertex(&mut edges, &arena, VertexId(6)).expect("merge");
            assert_eq!(edges, original);
        }
    }

    #[test]
    fn move_vertex_relocates_in_one_pass() {
        let arena = arena();
        let mut edges = cycle(&arena, &[0, 1, 6, 2, 3, 4, 5]);
        let destination = arena.edge(VertexId(4), VertexId(5));

        let moved = move_vertex(&mut edges, &arena, VertexId(6), &destination).expect("move");

        assert_eq!(moved.merged, arena.edge(VertexId(1), VertexId(2)));
        assert_eq!(moved.split_a, arena.edge(VertexId(4), VertexId(6)));
        assert_eq!(moved.split_b, arena.edge(VertexId(6), VertexId(5)));
        assert_eq!(starts(&edges), vec![0, 1, 2, 3, 4, 6, 5]);
        assert_consistent(&edges, &arena);
    }

    #[test]
    fn move_vertex_handles_vertex_at_index_zero() {
        let arena = arena();
        let mut edges = cycle(&arena, &[6, 0, 1, 2, 3]);
        let destination = arena.edge(VertexId(1), VertexId(2));

        move_vertex(&mut edges, &arena, VertexId(6), &destination).expect("move");

        assert_eq!(starts(&edges), vec![0, 1, 6, 2, 3]);
        assert_consistent(&edges, &arena);
    }

    #[test]
    fn move_vertex_handles_destination_next_to_neighbours() {
        let arena = arena();

        let mut after = cycle(&arena, &[0, 6, 1, 2, 3]);
        move_vertex(&mut after, &arena, VertexId(6), &arena.edge(VertexId(1), VertexId(2)))
            .expect("move forward");
        assert_eq!(starts(&after), vec![0, 1, 6, 2, 3]);
        assert_consistent(&after, &arena);

        let mut before = cycle(&arena, &[0, 1, 2, 6, 3]);
        move_vertex(&mut before, &arena, VertexId(6), &arena.edge(VertexId(1), VertexId(2)))
            .expect("move backward");
        assert_eq!(starts(&before), vec![0, 1, 6, 2, 3]);
        assert_consistent(&before, &arena);

        let mut wrapped = cycle(&arena, &[0, 1, 2, 3, 6]);
        move_vertex(&mut wrapped, &arena, VertexId(6), &arena.edge(VertexId(0), VertexId(1)))
            .expect("move across wrap");
        assert_eq!(starts(&wrapped), vec![0, 6, 1, 2, 3]);
        assert_consistent(&wrapped, &arena);
    }

    #[test]
    fn move_vertex_on_triangle_keeps_three_edges() {
        let arena = arena();
        let mut edges = cycle(&arena, &[0, 1, 2]);

        move_vertex(&mut edges, &arena, VertexId(1), &arena.edge(VertexId(2), VertexId(0)))
            .expect("move");

        assert_eq!(edges.len(), 3);
        assert_consistent(&edges, &arena);
    }

    #[test]
    fn move_vertex_rejects_incident_or_missing_destination() {
        let arena = arena();
        let mut edges = cycle(&arena, &[0, 1, 2, 3]);
        let before = edges.clone();

        let incident = arena.edge(VertexId(1), VertexId(2));
        assert!(move_vertex(&mut edges, &arena, VertexId(1), &incident).is_none());

        let missing = arena.edge(VertexId(0), VertexId(2));
        assert!(move_vertex(&mut edges, &arena, VertexId(1), &missing).is_none());

        let absent_vertex = arena.edge(VertexId(2), VertexId(3));
        assert!(move_vertex(&mut edges, &arena, VertexId(5), &absent_vertex).is_none());

        assert_eq!(edges, before);
    }

    #[test]
    fn is_cycle_detects_broken_adjacency_and_duplicates() {
        let arena = arena();
        assert!(is_cycle(&cycle(&arena, &[0, 1, 2])));

        let broken = vec![
            arena.edge(VertexId(0), VertexId(1)),
            arena.edge(VertexId(2), VertexId(0)),
        ];
        assert!(!is_cycle(&broken));

        let duplicate = vec![
            arena.edge(VertexId(0), VertexId(1)),
            arena.edge(VertexId(1), VertexId(0)),
            arena.edge(VertexId(0), VertexId(1)),
            arena.edge(VertexId(1), VertexId(0)),
        ];
        assert!(!is_cycle(&duplicate));
        assert!(!is_cycle(&[]));
    }
}
