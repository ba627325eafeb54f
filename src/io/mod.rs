//! Readers that populate matrices from text input

pub mod tsv;

pub use tsv::{read_matrix, TsvReader};
