/// Tolerance used for vertex equality and for deciding whether a candidate
/// actually shortens a circuit.
pub const THRESHOLD: f64 = 1e-7;

pub const MIN_CYCLE_POINTS: usize = 3;

pub(crate) const DEFAULT_MAX_CLONES: usize = 1_000;
