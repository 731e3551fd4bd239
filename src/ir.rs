//! IR (intermediate representation) module.
//! Decoding never fails: unknown tags end up in fallback variants.

mod parser;
pub mod tree;

pub use parser::{convert, MAX_DEPTH};
