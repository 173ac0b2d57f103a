//! Scanning engine: pixel classification, grid layout, per-cell bounds, and
//! the sheet orchestrator, plus the serializable scan parameters. These are
//! pure, I/O-free primitives consumed by the high-level `api` module.
pub mod bounds;
pub mod grid;
pub mod params;
pub mod sampler;
pub mod sheet;
