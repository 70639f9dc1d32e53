//! Incremental insertion TSP solving over a heap of pending placements.
//! Tours grow from a perimeter and a best-first search explores relocations.

pub mod algo;
pub mod constants;
mod error;
pub mod geo;
pub mod io;
pub mod logging;
pub mod solver;
pub mod tour;

pub use algo::{
    circuit::HeapableCircuit,
    search::{BestFirstSearch, SearchOutcome, SearchStats},
};
pub use error::{Error, Result};
pub use geo::{
    arena::{VertexArena, VertexId},
    perimeter::{ConvexHullPerimeter, ExtremeTrianglePerimeter, Perimeter, PerimeterBuilder},
    point::{Planar, Point2d, Point3d, Vertex},
};
pub use io::{input::PointSet, options::SearchOptions};
pub use solver::{solve, solve_points};
pub use tour::{Tour, TourMetrics};
