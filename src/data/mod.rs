//! Reference data: typed records, file loaders and the shared context.

pub mod context;
pub mod loader;
pub mod types;

pub use context::{DataContext, RegionDirectory};
pub use types::{Biography, CountryFeature, Medal, Region, ResultRecord, Season};
