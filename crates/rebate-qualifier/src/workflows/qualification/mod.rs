//! Qualification test scenarios: rule configuration, hypothetical transaction
//! sets, and the engine that turns them into a verdict and an earnings amount.
//!
//! The engine (`evaluate`) is pure. Everything around it (editing helpers,
//! the record store boundary, the scenario service, export) belongs to the
//! host side and never feeds state back into evaluation.

mod amounts;
pub mod domain;
mod editing;
pub mod evaluation;
mod export;
mod filters;
pub mod ids;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use amounts::{format_amount, line_total, parse_decimal, DEFAULT_TARGET_PERCENT};
pub use domain::{
    PriorYearTimeframe, ResultDetails, Scenario, ScenarioTest, TestResult, TestType, Timeframe,
    Transaction, YearTotal,
};
pub use editing::{EditError, TransactionField, MAX_PRIOR_YEARS, MIN_PRIOR_YEARS};
pub use evaluation::{count_matching, evaluate, sum_totals, ConfigurationError};
pub use export::{export_file_name, ScenarioExport};
pub use filters::{in_window, parse_calendar_date, DateWindow, Period, SkuSet};
pub use ids::{Clock, FixedClock, IdSource, SequentialIds, SystemClock, TimestampIds};
pub use service::{ScenarioService, ScenarioServiceError, ScenarioSummary};
pub use store::{FileRecordStore, InMemoryRecordStore, RecordStore, StoreError};
