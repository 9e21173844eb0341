// Service exports
pub mod customer_source;

pub use customer_source::{CustomerSource, Ingested, SourceLine};
