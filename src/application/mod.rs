pub mod dto;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod use_cases;

pub use error::ApplicationError;
