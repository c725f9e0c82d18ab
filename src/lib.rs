// ABOUTME: Library root for nodelink - lifecycle-aware interface link management.
// ABOUTME: The simulator binary is in main.rs.

pub mod config;
pub mod error;
pub mod gateway;
pub mod link;
pub mod output;
pub mod status;
pub mod types;
