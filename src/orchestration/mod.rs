//! Gathers the inputs for a return computation from a [`DataSource`].
//!
//! [`DataSource`]: crate::datasource::DataSource

pub mod returns;

pub use returns::{page_count, OrchestrationError, PoolReturns, ReturnsOrchestrator};
