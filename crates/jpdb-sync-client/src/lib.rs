pub mod client;
pub mod wire;

pub use client::{ClientConfig, DEFAULT_API_BASE, DEFAULT_TIMEOUT, JpdbClient};
