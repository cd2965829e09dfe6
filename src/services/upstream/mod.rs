pub mod client;

pub use client::{UpstreamClient, UpstreamConfig, UpstreamError, UpstreamResponse};
