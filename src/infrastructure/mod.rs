pub mod auth;
pub mod observability;
pub mod persistence;
