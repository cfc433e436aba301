//! Geomagnetic storm monitoring service.
//!
//! Polls three NOAA SWPC products (1-minute Kp index, alert bulletins, and
//! the 3-hourly planetary K-index), normalizes them into zone-aware tables,
//! classifies storm severity, and renders a status page with a countdown to
//! the next forecast block.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod render;
pub mod severity;
pub mod time_context;
pub mod verify;
