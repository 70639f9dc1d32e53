pub mod candidate;
pub mod circuit;
pub mod heap;
pub mod search;
pub mod topology;
