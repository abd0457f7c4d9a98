//! The four match stages composed by the retriever.
//!
//! Title and label matching run in-process against the corpus snapshot;
//! the lexical and vector stages are thin adapters over external index
//! collaborators with failure isolation.

pub mod label;
pub mod lexical;
pub mod title;
pub mod vector;
