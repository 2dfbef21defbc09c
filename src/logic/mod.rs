pub mod calculations;
pub mod data_sync;
pub mod normalize;
pub mod ranking;
pub mod scoring;

pub use data_sync::{AssembledEnvironment, DataSyncService};
pub use ranking::{RecommendationEngine, RecommendationRequest};
