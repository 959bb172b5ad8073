//! Parser test suite

mod errors;
mod serializing;
mod trees;
