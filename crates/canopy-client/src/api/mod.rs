//! API endpoint implementations.

mod monitor;

pub use monitor::MonitorApi;
