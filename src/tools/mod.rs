//! PHS Tools module
//!
//! MCP tool implementations for the Personalized Health System.

pub mod health;
pub mod reports;
pub mod status;
pub mod users;
