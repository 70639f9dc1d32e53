use std::{fmt, ops::Index};

use super::{edge::Edge, point::Vertex};

/// Handle to a vertex stored in a [`VertexArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Externally owned vertex storage shared by every circuit clone.
///
/// Circuits hold an `Arc<VertexArena<V>>` and never mutate it.
#[derive(Debug)]
pub struct VertexArena<V> {
    vertices: Vec<V>,
}

impl<V: Vertex> VertexArena<V> {
    pub fn new(vertices: Vec<V>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn get(&self, id: VertexId) -> Option<&V> {
        self.vertices.get(id.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId)
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    #[inline]
    pub fn distance(&self, a: VertexId, b: VertexId) -> f64 {
        self[a].distance_to(&self[b])
    }

    /// Builds the edge `a -> b` with its length cached.
    pub fn edge(&self, a: VertexId, b: VertexId) -> Edge {
        Edge::new(a, b, self.distance(a, b))
    }
}

impl<V> Index<VertexId> for VertexArena<V> {
    type Output = V;

    fn index(&self, id: VertexId) -> &Self::Output {
        &self.vertices[id.0]
    }
}
