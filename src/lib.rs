pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod logging;
pub mod state;

pub use error::{DashboardError, Result};
