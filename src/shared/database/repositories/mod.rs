// All repositories module
pub mod auth;
pub mod wallet;

// Re-export all repositories for convenience
pub use auth::*;
pub use wallet::*;
