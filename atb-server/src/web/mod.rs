//! Web layer for the bus departure API.
//!
//! Provides JSON endpoints for listing bus stops and their departures.

mod dto;
mod error;
mod routes;
mod state;

pub use dto::{ErrorResponse, FormatQuery, JsonBody};
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
