//! Aggregation core for the assessment report.
//!
//! Everything here is a pure batch transform over an immutable record frame:
//! the selector-keyed view builder, the shared color-scale bounds, and the
//! summary statistics the report header and charts consume. No state survives
//! a call; identical inputs give identical outputs.

pub mod bounds;
pub mod builder;
pub mod stats;

pub use bounds::shared_bounds;
pub use builder::{ExclusionReport, SelectorViews, View, ViewRequest, build_views};
pub use stats::{
    DistributionTable, DistributionViews, HeadlineStats, SeriesPoint, attainment_distribution,
    distinct_values, headline_stats, mean_series_by_group, yearly_means,
};
