//! HTTP/REST API adapter.
//!
//! Inbound adapter implementing REST endpoints that delegate to the strategy
//! service and the option chain port.

mod controller;
mod response;

pub use controller::{AppState, REQUEST_ID_HEADER, create_router};
pub use response::*;
