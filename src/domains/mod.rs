// Domain modules
pub mod admin;
pub mod auth;
pub mod market;
pub mod wallet;
