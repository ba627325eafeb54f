//! Algorithms composed from the matrix contract and the kernels

pub mod graph;
pub mod linalg;

pub use graph::{bellman_ford, breadth_first_search, predecessors};
pub use linalg::{reduced, skew_symmetric, symmetric};
