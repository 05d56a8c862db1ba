//! Value objects - Immutable objects defined by their attributes

mod stat;

pub use stat::{StatBlock, StatCatalog, StatCategory, StatDefinition, StatKey};
