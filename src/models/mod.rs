// Model exports
pub mod domain;

pub use domain::{Coordinate, CustomerRecord, EligibleCustomer};
