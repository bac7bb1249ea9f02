//! Personalized Health System (PHS) Library
//!
//! Health metric tracking with AI-generated insights and PDF reports.

pub mod advice;
pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod report;
pub mod tools;
