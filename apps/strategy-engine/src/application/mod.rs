//! Application Layer
//!
//! The application layer orchestrates domain logic for the driver adapters.
//! It defines:
//!
//! - **Ports**: Interfaces for interacting with external systems
//! - **Services**: The simulate and adjust pipelines
//! - **DTOs**: Data transfer objects for API boundaries

pub mod dto;
pub mod ports;
pub mod services;

pub use dto::*;
pub use ports::*;
pub use services::*;
