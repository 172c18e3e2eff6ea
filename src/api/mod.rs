//! HTTP transport for the pricing and risk engines
//!
//! Handlers only parse requests, call the engines and shape responses;
//! presentation rounding of exit levels happens here, not in the core.

pub mod error;
pub mod handlers;
pub mod server;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use server::{store_from_settings, ApiServer, AppState};
