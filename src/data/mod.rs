/// Data layer: core types, loading, indexing, querying and summarising.
///
/// Architecture:
/// ```text
///  .csv.gz / .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (once, at startup)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  index    │  most popular per (year, sex), extrema, names
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  pattern → matched names → row indices per sex
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  series   │   │  facts    │  plot lines / top-5 name facts
///   └──────────┘   └──────────┘
/// ```

pub mod facts;
pub mod filter;
pub mod index;
pub mod loader;
pub mod model;
pub mod series;
