//! Data layer: core types, loading, filtering and the widget projections.
//!
//! Architecture:
//! ```text
//!   sample (built-in)    .csv / .json / .parquet
//!          │                      │
//!          └──────────┬───────────┘
//!                     ▼
//!            ┌─────────────────┐
//!            │ PenguinDataset  │  Vec<PenguinRecord>, category index
//!            └─────────────────┘
//!                     │
//!                     ▼
//!              ┌──────────┐
//!              │  filter   │  species ∈ selection ∧ mass < threshold → indices
//!              └──────────┘
//!                     │
//!        ┌────────────┼─────────────┐
//!        ▼            ▼             ▼
//!    summary       scatter        grid
//! ```

pub mod export;
pub mod filter;
pub mod grid;
pub mod loader;
pub mod model;
pub mod sample;
pub mod scatter;
pub mod summary;
