//! Nearby Customers - finds customers within a great-circle radius
//!
//! Reads line-delimited JSON customer records, keeps those within a
//! configured distance of a reference point and returns them sorted.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::config::{AppConfig, Settings};
pub use crate::core::{
    distance::{distance, haversine_distance, DistanceUnit},
    CustomerPipeline, PipelineStage, RunReport, SortDirection,
};
pub use error::{AppError, Error, ErrorPosture};
pub use models::{Coordinate, CustomerRecord, EligibleCustomer};
