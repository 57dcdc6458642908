//! Data layer: core types, loading, and aggregation.
//!
//! Architecture:
//! ```text
//!  .json / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → LoadedFile (tagged by kind)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  sweep / section sweep → Vec<Observation>
//!   └───────────┘
//!        │
//!        ▼
//!   analysis::matrix
//! ```

pub mod aggregate;
pub mod input;
pub mod loader;
pub mod model;
