//! Near-duplicate vertex removal.

use super::point::Vertex;

/// Drops vertices that are [`Vertex::approx_eq`] to an earlier one. The first
/// occurrence of each point is kept and input order is preserved.
///
/// O(n²); run it once before building a perimeter.
#[must_use]
pub fn dedup_vertices<V: Vertex>(vertices: Vec<V>) -> Vec<V> {
    let before = vertices.len();
    let mut unique: Vec<V> = Vec::with_capacity(before);

    'outer: for v in vertices {
        for u in &unique {
            if u.approx_eq(&v) {
                continue 'outer;
            }
        }
        unique.push(v);
    }

    if unique.len() != before {
        log::debug!(
            "dedupe: removed={} remaining={}",
            before - unique.len(),
            unique.len()
        );
    }
    unique
}
