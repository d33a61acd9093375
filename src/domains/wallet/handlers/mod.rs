// Wallet domain handlers
pub mod transaction_handler;
pub mod wallet_handler;

pub use transaction_handler::*;
pub use wallet_handler::*;
