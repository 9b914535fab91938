pub mod config;
pub mod convert;
pub mod error;
pub mod server;

pub use error::{ConvertError, ConvertResult, Error, Result};
