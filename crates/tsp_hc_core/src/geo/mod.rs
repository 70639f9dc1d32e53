pub mod arena;
pub mod dedupe;
pub mod edge;
pub mod perimeter;
pub mod point;
