//! HTTP route handlers grouped by resource domain.
//!
//! Each submodule corresponds to a logical area of the API (emails, stats,
//! analysis) and exposes typed Rocket handlers annotated with `#[openapi]`
//! so `rocket_okapi` can derive an OpenAPI document automatically.

pub mod analyze;
pub mod emails;
pub mod health;
pub mod params;
pub mod stats;
