use super::{circuit::HeapableCircuit, heap::Heap};
use crate::{
    Error, Result,
    constants::{DEFAULT_MAX_CLONES, THRESHOLD},
    geo::point::Vertex,
};

const PROGRESS_EVERY_STEPS: usize = 10_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub steps: usize,
    /// Forks pushed onto the frontier.
    pub clones: usize,
    /// Frontier states dropped when the clone budget ran out.
    pub released_states: usize,
    pub dead_branches: usize,
    pub faulted_branches: usize,
}

#[derive(Debug)]
pub struct SearchOutcome<V> {
    pub circuit: HeapableCircuit<V>,
    pub stats: SearchStats,
}

/// Best-first search over circuit states ordered by
/// [`HeapableCircuit::length_with_next`].
///
/// The first complete state whose next candidate no longer shortens it wins.
/// After `max_clones` forks the search stops branching: the rest of the
/// frontier is released and the best state is finished in place.
#[derive(Clone, Copy, Debug)]
pub struct BestFirstSearch {
    max_clones: usize,
}

impl Default for BestFirstSearch {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CLONES)
    }
}

impl BestFirstSearch {
    pub fn new(max_clones: usize) -> Self {
        Self { max_clones }
    }

    pub fn max_clones(&self) -> usize {
        self.max_clones
    }

    pub fn run<V: Vertex>(&self, circuit: HeapableCircuit<V>) -> Result<SearchOutcome<V>> {
        let mut frontier: Heap<HeapableCircuit<V>> = Heap::new(HeapableCircuit::length_with_next);
        let mut stats = SearchStats::default();

        log::info!(
            "search: start n={} unattached={} candidates={} max_clones={}",
            circuit.arena().len(),
            circuit.unattached_vertices().len(),
            circuit.pending_candidates(),
            self.max_clones
        );
        frontier.push(circuit);

        while let Some(mut state) = frontier.pop() {
            if is_settled(&state) {
                match state.validate() {
                    Ok(()) => return Ok(accept(state, stats, frontier.len())),
                    Err(err) => {
                        log::error!("search: rejected settled state: {err}");
                        stats.faulted_branches += 1;
                        state.release();
                        continue;
                    }
                }
            }

            if stats.clones >= self.max_clones {
                while let Some(mut rest) = frontier.pop() {
                    rest.release();
                    stats.released_states += 1;
                }
                log::debug!(
                    "search.budget_spent: clones={} released={} best_bound={:.6}",
                    stats.clones,
                    stats.released_states,
                    state.length_with_next()
                );
                return finish_in_place(state, stats);
            }

            stats.steps += 1;
            match state.clone_and_update() {
                Ok(fork) => {
                    if let Some(fork) = fork {
                        stats.clones += 1;
                        frontier.push(fork);
                    }

                    if is_dead(&state) {
                        log::debug!(
                            "search.dead_branch: length={:.6} unattached={}",
                            state.length(),
                            state.unattached_vertices().len()
                        );
                        stats.dead_branches += 1;
                        state.release();
                    } else {
                        frontier.push(state);
                    }
                }
                Err(err) => {
                    log::error!(
                        "search: dropping branch length={:.6} unattached={}: {err}",
                        state.length(),
                        state.unattached_vertices().len()
                    );
                    stats.faulted_branches += 1;
                    state.release();
                }
            }

            if stats.steps % PROGRESS_EVERY_STEPS == 0 {
                log::debug!(
                    "search.progress: steps={} frontier={} clones={} best_bound={:.6}",
                    stats.steps,
                    frontier.len(),
                    stats.clones,
                    frontier
                        .peek()
                        .map_or(f64::NAN, HeapableCircuit::length_with_next)
                );
            }
        }

        Err(exhausted(&stats))
    }
}

/// Drives a single state to a settled tour without forking.
fn finish_in_place<V: Vertex>(
    mut state: HeapableCircuit<V>,
    mut stats: SearchStats,
) -> Result<SearchOutcome<V>> {
    while !is_settled(&state) {
        if is_dead(&state) {
            stats.dead_branches += 1;
            state.release();
            return Err(exhausted(&stats));
        }
        stats.steps += 1;
        if let Err(err) = state.update_in_place() {
            log::error!("search: dropping last branch: {err}");
            stats.faulted_branches += 1;
            state.release();
            return Err(exhausted(&stats));
        }
    }

    if let Err(err) = state.validate() {
        log::error!("search: rejected settled state: {err}");
        stats.faulted_branches += 1;
        state.release();
        return Err(exhausted(&stats));
    }
    Ok(accept(state, stats, 0))
}

fn accept<V: Vertex>(
    circuit: HeapableCircuit<V>,
    stats: SearchStats,
    frontier: usize,
) -> SearchOutcome<V> {
    log::info!(
        "search: complete length={:.6} steps={} clones={} released={} dead={} faulted={} frontier={frontier}",
        circuit.length(),
        stats.steps,
        stats.clones,
        stats.released_states,
        stats.dead_branches,
        stats.faulted_branches
    );
    SearchOutcome { circuit, stats }
}

fn exhausted(stats: &SearchStats) -> Error {
    log::warn!(
        "search: exhausted steps={} dead={} faulted={}",
        stats.steps,
        stats.dead_branches,
        stats.faulted_branches
    );
    Error::exhausted(format!(
        "no complete circuit after {} steps ({} dead branches, {} faulted branches)",
        stats.steps, stats.dead_branches, stats.faulted_branches
    ))
}

fn is_dead<V: Vertex>(state: &HeapableCircuit<V>) -> bool {
    !state.is_complete() && state.pending_candidates() == 0
}

fn is_settled<V: Vertex>(state: &HeapableCircuit<V>) -> bool {
    state.is_complete() && (state.length_with_next() - state.length()).abs() < THRESHOLD
}
