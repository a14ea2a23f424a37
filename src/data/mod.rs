/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  risk factors .csv      causes of death .csv
///        │                        │
///        ▼                        ▼
///   ┌──────────────────────────────────┐
///   │  loader   parse file → Table     │
///   └──────────────────────────────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ DashboardContext │  both Tables, shared entities / years
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → filtered Table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  sums, top-N, pivots, correlation, metrics
///   └───────────┘
/// ```

pub mod aggregate;
pub mod context;
pub mod error;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;

pub use context::DashboardContext;
pub use error::{LoadError, UnknownCategoryError};
pub use filter::{FilterSpec, YearRange};
pub use model::{DatasetKind, MortalityRecord, Table};
