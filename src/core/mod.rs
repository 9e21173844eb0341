// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod pipeline;
pub mod sorting;

pub use distance::{distance, haversine_distance, DistanceUnit};
pub use filters::{distance_from_source, is_eligible, select_eligible, to_eligible, Selection};
pub use pipeline::{CustomerPipeline, PipelineStage, RunReport};
pub use sorting::{sort_customers, SortDirection};
