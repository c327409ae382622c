//! Household services marketplace: customers request services, approved
//! professionals accept and complete them, an admin curates the catalog and
//! the professionals.

pub mod api;
pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod telemetry;
pub mod utils;
pub mod workflow;
