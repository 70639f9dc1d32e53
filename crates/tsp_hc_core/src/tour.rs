use crate::geo::{
    arena::{VertexArena, VertexId},
    point::Vertex,
};

/// Closed tour as an ordered list of vertices; the last one links back to the
/// first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tour<V> {
    pub vertices: Vec<V>,
}

impl<V: Vertex + Clone> Tour<V> {
    pub fn new(vertices: Vec<V>) -> Self {
        Self { vertices }
    }

    /// Copies `order` out of the arena, rotated so the smallest id comes first.
    pub fn from_order(arena: &VertexArena<V>, order: &[VertexId]) -> Self {
        let start = order
            .iter()
            .enumerate()
            .min_by_key(|(_, id)| **id)
            .map_or(0, |(idx, _)| idx);
        let mut order = order.to_vec();
        order.rotate_left(start);

        Self::new(order.into_iter().map(|id| arena[id].clone()).collect())
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn total_length(&self) -> f64 {
        self.leg_lengths().sum()
    }

    pub fn tour_metrics(&self) -> TourMetrics {
        let n = self.len();

        if n < 2 {
            log::info!("metrics: n < 2 so there's nothing to report");
            return TourMetrics::default();
        }

        let (total, longest) = self
            .leg_lengths()
            .fold((0.0, 0.0_f64), |(total, longest), leg| {
                (total + leg, longest.max(leg))
            });
        let average = total / (n as f64);

        log::info!("metrics: n={n} total={total:.3} longest={longest:.3} avg={average:.3}");

        TourMetrics {
            total,
            longest,
            average,
        }
    }

    fn leg_lengths(&self) -> impl Iterator<Item = f64> + '_ {
        let n = self.len();
        (0..n).map(move |i| self.vertices[i].distance_to(&self.vertices[(i + 1) % n]))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub total: f64,
    pub longest: f64,
    pub average: f64,
}
