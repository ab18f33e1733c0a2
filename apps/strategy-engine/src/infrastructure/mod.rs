//! Infrastructure Layer
//!
//! Adapters that connect the application to the outside world:
//!
//! - **HTTP**: axum REST driver adapter
//! - **Option chain**: JSON file catalog source

pub mod http;
pub mod option_chain;
