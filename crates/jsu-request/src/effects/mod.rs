//! I/O operations: transports, the in-flight registry and the deduplicating client.

mod client;
mod http;
mod registry;

pub use client::Client;
pub use http::HttpTransport;
pub use registry::{InFlightGuard, InFlightRegistry};

#[cfg(feature = "reqwest")]
pub use http::ReqwestTransport;
