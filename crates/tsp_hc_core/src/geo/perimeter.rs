//! Strategies producing the initial sub-tour a circuit grows from.

use std::collections::BTreeSet;

use super::{
    arena::{VertexArena, VertexId},
    edge::Edge,
    point::{Planar, Vertex},
};
use crate::{Error, Result, constants::THRESHOLD};

const MIN_PERIMETER_VERTICES: usize = 2;

/// Initial sub-tour plus the vertices it leaves out.
#[derive(Clone, Debug, Default)]
pub struct Perimeter {
    pub edges: Vec<Edge>,
    pub unattached: BTreeSet<VertexId>,
}

impl Perimeter {
    /// Closes `order` into a cycle and marks every other arena vertex as
    /// unattached.
    pub fn from_cycle<V: Vertex>(arena: &VertexArena<V>, order: &[VertexId]) -> Result<Self> {
        if order.len() < MIN_PERIMETER_VERTICES {
            return Err(Error::invalid_input(format!(
                "perimeter needs at least {MIN_PERIMETER_VERTICES} distinct vertices, got {}",
                order.len()
            )));
        }

        let n = order.len();
        let edges = (0..n)
            .map(|i| arena.edge(order[i], order[(i + 1) % n]))
            .collect();
        let attached: BTreeSet<VertexId> = order.iter().copied().collect();
        let unattached = arena.ids().filter(|id| !attached.contains(id)).collect();

        Ok(Self { edges, unattached })
    }
}

pub trait PerimeterBuilder<V: Vertex> {
    fn build(&self, arena: &VertexArena<V>) -> Result<Perimeter>;
}

/// Counter-clockwise convex hull (Andrew's monotone chain). Points lying on a
/// hull edge stay unattached.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvexHullPerimeter;

impl<V: Vertex + Planar> PerimeterBuilder<V> for ConvexHullPerimeter {
    fn build(&self, arena: &VertexArena<V>) -> Result<Perimeter> {
        let hull = convex_hull(arena);
        log::debug!(
            "perimeter.hull: n={} hull={}",
            arena.len(),
            hull.len()
        );
        Perimeter::from_cycle(arena, &hull)
    }
}

fn convex_hull<V: Vertex + Planar>(arena: &VertexArena<V>) -> Vec<VertexId> {
    let mut ids: Vec<VertexId> = arena.ids().collect();
    ids.sort_by(|a, b| {
        let (pa, pb) = (&arena[*a], &arena[*b]);
        pa.x()
            .total_cmp(&pb.x())
            .then_with(|| pa.y().total_cmp(&pb.y()))
    });
    ids.dedup_by(|a, b| arena[*a].approx_eq(&arena[*b]));

    if ids.len() < 3 {
        return ids;
    }

    let mut lower: Vec<VertexId> = Vec::with_capacity(ids.len());
    for &id in &ids {
        while lower.len() >= 2
            && cross(arena, lower[lower.len() - 2], lower[lower.len() - 1], id) <= 0.0
        {
            lower.pop();
        }
        lower.push(id);
    }

    let mut upper: Vec<VertexId> = Vec::with_capacity(ids.len());
    for &id in ids.iter().rev() {
        while upper.len() >= 2
            && cross(arena, upper[upper.len() - 2], upper[upper.len() - 1], id) <= 0.0
        {
            upper.pop();
        }
        upper.push(id);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

#[inline]
fn cross<V: Planar>(arena: &VertexArena<V>, o: VertexId, a: VertexId, b: VertexId) -> f64 {
    let (o, a, b) = (&arena[o], &arena[a], &arena[b]);
    (a.x() - o.x()) * (b.y() - o.y()) - (a.y() - o.y()) * (b.x() - o.x())
}

/// Metric-only perimeter for vertices without a planar projection: the
/// farthest pair plus the vertex farthest from both.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtremeTrianglePerimeter;

impl<V: Vertex> PerimeterBuilder<V> for ExtremeTrianglePerimeter {
    fn build(&self, arena: &VertexArena<V>) -> Result<Perimeter> {
        let Some(first) = arena.ids().next() else {
            return Err(Error::invalid_input("perimeter needs at least one vertex"));
        };

        let a = farthest_from(arena.ids(), |id| arena.distance(first, id)).unwrap_or(first);
        let b = farthest_from(arena.ids(), |id| arena.distance(a, id)).unwrap_or(a);
        if arena.distance(a, b) < THRESHOLD {
            return Err(Error::invalid_input(
                "perimeter needs at least 2 distinct vertices",
            ));
        }

        let c = farthest_from(
            arena.ids().filter(|id| *id != a && *id != b),
            |id| arena.distance(a, id) + arena.distance(id, b),
        );

        let order = match c {
            Some(c) => vec![a, b, c],
            None => vec![a, b],
        };
        log::debug!("perimeter.triangle: n={} corners={:?}", arena.len(), order);
        Perimeter::from_cycle(arena, &order)
    }
}

fn farthest_from(
    ids: impl Iterator<Item = VertexId>,
    score: impl Fn(VertexId) -> f64,
) -> Option<VertexId> {
    // ties resolve to the smallest id
    ids.map(|id| (id, score(id)))
        .max_by(|lhs, rhs| lhs.1.total_cmp(&rhs.1).then_with(|| rhs.0.cmp(&lhs.0)))
        .map(|(id, _)| id)
}
