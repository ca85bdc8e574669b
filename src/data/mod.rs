/// Data layer: table model, loading, cleaning, and category selection.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet      (absent file)
///        │                                  │
///        ▼                                  ▼
///   ┌──────────┐                      ┌───────────┐
///   │  loader   │  parse file          │ reference │  bundled iris + species
///   └──────────┘                      └───────────┘
///        │                                  │
///        └───────────────┬──────────────────┘
///                        ▼
///                  ┌──────────┐
///                  │ Dataset  │  ordered typed columns
///                  └──────────┘
///                        │
///                        ▼
///                  ┌──────────┐
///                  │  clean   │  missing counts, mean imputation
///                  └──────────┘
///                        │
///                        ▼
///                  ┌──────────┐
///                  │  filter  │  selected categories → visible rows
///                  └──────────┘
/// ```

pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;
pub mod reference;
