// Market domain services
pub mod market_service;
pub mod state;

pub use market_service::*;
pub use state::*;
