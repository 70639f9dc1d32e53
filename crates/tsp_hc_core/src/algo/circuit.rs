//! Incrementally built tour that keeps every pending placement in a heap.
//!
//! A [`HeapableCircuit`] starts from a perimeter and grows by popping the
//! cheapest [`InsertionCandidate`]. Unattached vertices are inserted in place.
//! Popping an option for a vertex that is already on the tour either forks the
//! state (other options for that vertex remain) or relocates it in place.
//! Every mutation rewrites the candidate heap in one pass so no stale entry can
//! ever be popped.

use std::{
    collections::{BTreeSet, HashSet},
    sync::Arc,
};

use rayon::prelude::*;

use super::{
    candidate::InsertionCandidate,
    heap::Heap,
    topology::{self, Move},
};
use crate::{
    Error, Result,
    constants::THRESHOLD,
    geo::{
        arena::{VertexArena, VertexId},
        edge::Edge,
        perimeter::PerimeterBuilder,
        point::Vertex,
    },
};

const LENGTH_TOLERANCE: f64 = 1e-6;

/// An edge that left the tour and the edges that took its place.
struct Rewire {
    removed: Edge,
    replacements: [Option<Edge>; 2],
}

#[derive(Debug)]
pub struct HeapableCircuit<V> {
    arena: Arc<VertexArena<V>>,
    edges: Vec<Edge>,
    unattached: BTreeSet<VertexId>,
    candidates: Heap<InsertionCandidate>,
    length: f64,
    candidate_limit: Option<usize>,
    perimeter_built: bool,
}

impl<V> Clone for HeapableCircuit<V> {
    fn clone(&self) -> Self {
        Self {
            arena: Arc::clone(&self.arena),
            edges: self.edges.clone(),
            unattached: self.unattached.clone(),
            candidates: self.candidates.clone(),
            length: self.length,
            candidate_limit: self.candidate_limit,
            perimeter_built: self.perimeter_built,
        }
    }
}

impl<V: Vertex> HeapableCircuit<V> {
    /// Empty state with every arena vertex unattached.
    ///
    /// `candidate_limit` keeps only each vertex's cheapest edges when the heap
    /// is seeded. This trades tour quality for memory on large inputs.
    pub fn new(arena: Arc<VertexArena<V>>, candidate_limit: Option<usize>) -> Self {
        let unattached = arena.ids().collect();
        Self {
            arena,
            edges: Vec::new(),
            unattached,
            candidates: Heap::new(InsertionCandidate::priority),
            length: 0.0,
            candidate_limit,
            perimeter_built: false,
        }
    }

    /// Installs the initial sub-tour and seeds one candidate per
    /// (unattached vertex, perimeter edge) pair.
    pub fn build_perimeter<B>(&mut self, builder: &B) -> Result<()>
    where
        B: PerimeterBuilder<V> + ?Sized,
    {
        if self.perimeter_built {
            return Err(Error::invalid_state("perimeter already built"));
        }

        let perimeter = builder.build(&self.arena)?;
        if !topology::is_cycle(&perimeter.edges) {
            return Err(Error::invalid_state(
                "perimeter builder returned edges that do not form a cycle",
            ));
        }

        self.edges = perimeter.edges;
        self.unattached = perimeter.unattached;
        self.length = topology::tour_length(&self.edges);
        self.perimeter_built = true;

        let arena = &*self.arena;
        let edges = &self.edges;
        let limit = self.candidate_limit;
        let pending: Vec<VertexId> = self.unattached.iter().copied().collect();
        let seeded: Vec<Vec<InsertionCandidate>> = pending
            .par_iter()
            .map(|&vertex| seed_candidates(arena, edges, vertex, limit))
            .collect();

        self.candidates.push_all(seeded.into_iter().flatten());

        log::debug!(
            "circuit.perimeter: edges={} unattached={} candidates={} length={:.6} limit={:?}",
            self.edges.len(),
            self.unattached.len(),
            self.candidates.len(),
            self.length,
            self.candidate_limit
        );
        Ok(())
    }

    /// Applies the cheapest pending candidate.
    ///
    /// Returns `Ok(Some(fork))` when the candidate relocates a vertex that still
    /// has other options: the fork carries the relocation and `self` keeps the
    /// current placement minus the popped option. Every other outcome mutates
    /// `self` in place (or not at all) and returns `Ok(None)`.
    pub fn clone_and_update(&mut self) -> Result<Option<Self>> {
        if self.is_complete() && !self.has_improvement() {
            return Ok(None);
        }
        let Some(candidate) = self.candidates.pop() else {
            return Ok(None);
        };

        if self.unattached.contains(&candidate.vertex) {
            self.attach(candidate)?;
            return Ok(None);
        }

        if self
            .candidates
            .any_match(|entry| entry.has_vertex(candidate.vertex))
        {
            let mut fork = self.clone();
            fork.relocate(candidate)?;
            log::trace!(
                "circuit.fork: vertex={} edge={} distance={:.6} length={:.6}",
                candidate.vertex,
                candidate.edge,
                candidate.distance,
                fork.length
            );
            return Ok(Some(fork));
        }

        // last option for this vertex
        if candidate.distance < THRESHOLD {
            self.relocate(candidate)?;
        } else {
            log::trace!("circuit.discard: {candidate}");
        }
        Ok(None)
    }

    /// Applies the cheapest pending candidate without ever forking.
    ///
    /// Unattached vertices are attached as in [`Self::clone_and_update`]. A
    /// relocation is applied only when it shortens the tour and is dropped
    /// otherwise, whether or not the vertex has other options left.
    pub fn update_in_place(&mut self) -> Result<()> {
        if self.is_complete() && !self.has_improvement() {
            return Ok(());
        }
        let Some(candidate) = self.candidates.pop() else {
            return Ok(());
        };

        if self.unattached.contains(&candidate.vertex) {
            return self.attach(candidate);
        }
        if candidate.distance < -THRESHOLD {
            self.relocate(candidate)
        } else {
            log::trace!("circuit.discard: {candidate}");
            Ok(())
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Current length plus the cost of the next candidate, or just the length
    /// once the tour is complete and nothing left would shorten it.
    pub fn length_with_next(&self) -> f64 {
        match self.candidates.peek() {
            Some(next) if !self.unattached.is_empty() || next.distance < -THRESHOLD => {
                self.length + next.distance
            }
            _ => self.length,
        }
    }

    /// Vertices in tour order.
    pub fn attached_vertices(&self) -> Vec<VertexId> {
        self.edges.iter().map(Edge::start).collect()
    }

    pub fn unattached_vertices(&self) -> &BTreeSet<VertexId> {
        &self.unattached
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn arena(&self) -> &Arc<VertexArena<V>> {
        &self.arena
    }

    pub fn candidate_limit(&self) -> Option<usize> {
        self.candidate_limit
    }

    pub fn pending_candidates(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_complete(&self) -> bool {
        self.perimeter_built && self.unattached.is_empty() && !self.edges.is_empty()
    }

    /// True when the cheapest pending candidate shortens the tour.
    pub fn has_improvement(&self) -> bool {
        self.candidates
            .peek()
            .is_some_and(|next| next.distance < -THRESHOLD)
    }

    /// Drops everything this state owns. The shared arena is left alone.
    pub fn release(&mut self) {
        self.candidates.clear();
        self.edges = Vec::new();
        self.unattached.clear();
        self.length = 0.0;
    }

    /// Checks the cycle, partition, length and candidate invariants.
    pub fn validate(&self) -> Result<()> {
        if !topology::is_cycle(&self.edges) {
            return Err(Error::invalid_state(format!(
                "edge list is not a cycle ({} edges)",
                self.edges.len()
            )));
        }

        let attached: HashSet<VertexId> = self.edges.iter().map(Edge::start).collect();
        for id in self.arena.ids() {
            if attached.contains(&id) == self.unattached.contains(&id) {
                return Err(Error::invalid_state(format!(
                    "vertex {id} must be either attached or unattached"
                )));
            }
        }

        let total = topology::tour_length(&self.edges);
        if (self.length - total).abs() > LENGTH_TOLERANCE * total.max(1.0) {
            return Err(Error::invalid_state(format!(
                "running length {:.9} drifted from edge sum {:.9}",
                self.length, total
            )));
        }

        let tour: HashSet<Edge> = self.edges.iter().copied().collect();
        let mut seen = HashSet::with_capacity(self.candidates.len());
        for entry in self.candidates.values() {
            if entry.edge.touches(entry.vertex) {
                return Err(Error::invalid_state(format!(
                    "{entry} is incident to its own vertex"
                )));
            }
            if !tour.contains(&entry.edge) {
                return Err(Error::invalid_state(format!(
                    "{entry} references an edge outside the tour"
                )));
            }
            if !seen.insert((entry.vertex, entry.edge)) {
                return Err(Error::invalid_state(format!("{entry} is duplicated")));
            }
        }

        let covered: HashSet<VertexId> = seen.iter().map(|(vertex, _)| *vertex).collect();
        if let Some(orphan) = self.unattached.iter().find(|id| !covered.contains(id)) {
            return Err(Error::invalid_state(format!(
                "unattached vertex {orphan} has no candidate"
            )));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn inject_candidate(&mut self, candidate: InsertionCandidate) {
        self.candidates.push(candidate);
    }

    fn attach(&mut self, candidate: InsertionCandidate) -> Result<()> {
        let vertex = candidate.vertex;
        if candidate.edge.touches(vertex) {
            return Err(Error::desync(candidate, &self.edges));
        }
        let Some(idx) = topology::split_edge(&mut self.edges, &self.arena, &candidate.edge, vertex)
        else {
            return Err(Error::desync(candidate, &self.edges));
        };

        self.unattached.remove(&vertex);
        self.length += candidate.distance;

        let (a, b) = (self.edges[idx], self.edges[idx + 1]);
        log::trace!(
            "circuit.attach: vertex={vertex} edge={} distance={:.6} unattached={}",
            candidate.edge,
            candidate.distance,
            self.unattached.len()
        );
        self.rewire(
            &[Rewire {
                removed: candidate.edge,
                replacements: [Some(a), Some(b)],
            }],
            &[vertex, a.start(), b.end()],
        );
        Ok(())
    }

    fn relocate(&mut self, candidate: InsertionCandidate) -> Result<()> {
        let vertex = candidate.vertex;
        let Some(Move {
            detached_a,
            detached_b,
            merged,
            split_a,
            split_b,
        }) = topology::move_vertex(&mut self.edges, &self.arena, vertex, &candidate.edge)
        else {
            return Err(Error::desync(candidate, &self.edges));
        };

        self.length += candidate.distance;
        self.rewire(
            &[
                Rewire {
                    removed: detached_a,
                    replacements: [Some(merged), None],
                },
                Rewire {
                    removed: detached_b,
                    replacements: [Some(merged), None],
                },
                Rewire {
                    removed: candidate.edge,
                    replacements: [Some(split_a), Some(split_b)],
                },
            ],
            &[
                vertex,
                merged.start(),
                merged.end(),
                split_a.start(),
                split_b.end(),
            ],
        );
        Ok(())
    }

    /// One pass over the heap: entries on removed edges move onto their
    /// replacements, entries of `rebased` vertices are re-priced, the rest is
    /// kept as is.
    fn rewire(&mut self, rewires: &[Rewire], rebased: &[VertexId]) {
        let arena = &*self.arena;
        let gains = removal_gains(arena, &self.edges);
        let mut seen: HashSet<(VertexId, Edge)> = HashSet::new();

        self.candidates.replace_all(|entry| {
            let vertex = entry.vertex;
            let gain = gains[vertex.0];

            if let Some(rewire) = rewires.iter().find(|r| r.removed == entry.edge) {
                return rewire
                    .replacements
                    .map(|replacement| {
                        replacement
                            .filter(|edge| !edge.touches(vertex) && seen.insert((vertex, *edge)))
                            .map(|edge| InsertionCandidate::evaluate(arena, vertex, edge, gain))
                    })
                    .into_iter()
                    .flatten();
            }

            if rebased.contains(&vertex) {
                let refreshed = (!entry.edge.touches(vertex))
                    .then(|| InsertionCandidate::evaluate(arena, vertex, entry.edge, gain));
                return [refreshed, None].into_iter().flatten();
            }

            [Some(entry), None].into_iter().flatten()
        });
    }
}

fn seed_candidates<V: Vertex>(
    arena: &VertexArena<V>,
    edges: &[Edge],
    vertex: VertexId,
    limit: Option<usize>,
) -> Vec<InsertionCandidate> {
    let all = edges
        .iter()
        .filter(|edge| !edge.touches(vertex))
        .map(|edge| InsertionCandidate::evaluate(arena, vertex, *edge, 0.0));

    match limit {
        Some(limit) => {
            let mut cheapest = Heap::with_capacity(InsertionCandidate::priority, edges.len());
            cheapest.push_all(all);
            cheapest.trim_to_smallest(limit);
            cheapest.into_sorted_vec()
        }
        None => all.collect(),
    }
}

/// What removing each attached vertex would save, indexed by vertex id.
/// Unattached vertices save nothing.
fn removal_gains<V: Vertex>(arena: &VertexArena<V>, edges: &[Edge]) -> Vec<f64> {
    let mut gains = vec![0.0; arena.len()];
    let n = edges.len();
    for (idx, next) in edges.iter().enumerate() {
        let prev = &edges[(idx + n - 1) % n];
        gains[next.start().0] =
            prev.length() + next.length() - arena.distance(prev.start(), next.end());
    }
    gains
}
