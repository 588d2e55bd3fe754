//! Employee worker
//!
//! Fetches the employee list from a REST endpoint and computes per-employee
//! salary averages on a fixed-size pool of async workers.
pub mod client;
pub mod error;
pub mod models;
pub mod pool;

pub use client::EmployeeClient;
pub use error::{FetchError, Result};
pub use models::{ApiResponse, Employee};
pub use pool::{run_pool, EmployeeReport, PoolConfig};
