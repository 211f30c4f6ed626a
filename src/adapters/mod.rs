//! Adapters - implementations of the ports against external services, plus
//! the HTTP surface.

pub mod gateway;
pub mod http;
pub mod reasoning;
