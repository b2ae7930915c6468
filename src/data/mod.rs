/// Data layer: core types, loading, caching, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table      (memoized by `cache`)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  rows, column kinds, domains
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply column predicates → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  means, counts, bins, grouped means
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
