//! Spatial indexing and querying for placed blocks
//!
//! Blocks are bucketed by world, 16x16 chunk and category so that locality
//! queries only touch the handful of buckets around the point of interest.

mod query;
mod stats;
mod store;

pub use query::QueryEngine;
pub use stats::IndexStatistics;
pub use store::{BucketKey, IndexStore};
