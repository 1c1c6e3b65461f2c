pub mod growth;
pub mod report;

pub use growth::{calculate_growth, compound_growth_rate, GrowthError, GrowthResult};
pub use report::{GrowthAnalyzer, GrowthMetric, GrowthReport, GrowthWindow, MetricGrowth};
