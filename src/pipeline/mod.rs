//! Aggregation pipeline.
//!
//! Every stage is a pure function of the immutable [`DataContext`](crate::data::DataContext)
//! and the request parameters. Nothing is cached between calls.

pub mod biometrics;
pub mod filter;
pub mod geo;
pub mod heatmap;
pub mod leaderboard;
pub mod medals;
pub mod types;
pub mod utility;

pub use biometrics::biometrics;
pub use filter::{ResultsView, filter_results};
pub use geo::join_geometry;
pub use heatmap::heatmap;
pub use leaderboard::{LEADERBOARD_LIMIT, SortMode, leaderboard};
pub use medals::{dedup_awards, medal_pivot_global, medal_series, medals_by_country_year};
