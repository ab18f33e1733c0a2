//! Application Ports (Driven)
//!
//! Ports define interfaces for the external systems the engine reads from.

mod option_chain_port;

#[cfg(test)]
pub use option_chain_port::MockOptionChainPort;
pub use option_chain_port::{
    InMemoryOptionChain, OptionChainError, OptionChainPort, OptionContract,
};
