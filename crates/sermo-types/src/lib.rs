pub mod config;
pub mod error;
pub mod general;

pub use error::FieldErrors;
