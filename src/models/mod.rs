//! Data models
//!
//! Rust structs representing database entities.

mod health_insight;
mod health_record;
mod user;

pub use health_insight::HealthInsight;
pub use health_record::{HealthRecord, HealthTrendPoint};
pub use user::{User, UserCreate};
