pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod report;

pub use config::Config;
pub use datasource::{DataSource, DataSourceError, MidgardDataSource, MockDataSource};
pub use domain::{
    Action, ActionStatus, ActionType, Address, Asset, Coin, Decimal, MemberPool, PoolReturnSummary,
    PoolState, Position, PriceSeries, TimeNs, TimeSecs,
};
pub use engine::{compute, ComputationError};
pub use error::AppError;
pub use orchestration::{OrchestrationError, ReturnsOrchestrator};
pub use report::PositionReport;
