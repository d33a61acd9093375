// Wallet domain services
pub mod state;
pub mod transaction_service;
pub mod wallet_service;

pub use state::*;
pub use transaction_service::*;
pub use wallet_service::*;
